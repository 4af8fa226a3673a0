//! `CAT`: ordered concatenation.
//!
//! Forward, children are tried left to right starting at `begin`, each
//! consuming where the previous one left off. Behind (inside `BKA`/`BKN`),
//! the same left-to-right child order still applies conceptually, but since
//! the match is anchored to end at `begin` and grow backward, the children
//! are applied in reverse, each one ending where the next-earlier one
//! begins.

use crate::error::ParseError;
use crate::sysdata::Direction;

use super::super::{Engine, Outcome};

pub(super) fn eval<U>(engine: &mut Engine<'_, U>, rule_index: usize, children: &[usize], begin: usize) -> Result<Outcome, ParseError> {
    match engine.sys.direction() {
        Direction::Forward => eval_forward(engine, rule_index, children, begin),
        Direction::Behind => eval_behind(engine, rule_index, children, begin),
    }
}

fn eval_forward<U>(engine: &mut Engine<'_, U>, rule_index: usize, children: &[usize], begin: usize) -> Result<Outcome, ParseError> {
    let mark = engine.ast.mark();
    let mut cursor = begin;
    for &child in children {
        let outcome = engine.dispatch(rule_index, child, cursor)?;
        if !outcome.state.matched() {
            engine.ast.rollback(mark);
            return Ok(Outcome::no_match());
        }
        cursor += outcome.length;
    }
    Ok(Outcome::matched(cursor - begin))
}

fn eval_behind<U>(engine: &mut Engine<'_, U>, rule_index: usize, children: &[usize], begin: usize) -> Result<Outcome, ParseError> {
    let mark = engine.ast.mark();
    let mut cursor = begin;
    for &child in children.iter().rev() {
        let outcome = engine.dispatch(rule_index, child, cursor)?;
        if !outcome.state.matched() {
            engine.ast.rollback(mark);
            return Ok(Outcome::no_match());
        }
        cursor -= outcome.length;
    }
    Ok(Outcome::matched(begin - cursor))
}

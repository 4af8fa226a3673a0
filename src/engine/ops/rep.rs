//! `REP`: bounded repetition of the opcode immediately following it.
//!
//! A child match of zero length is counted once and then the loop stops —
//! without that rule a child capable of matching empty (e.g. `*x` where `x`
//! itself can be empty) would spin forever without ever advancing the
//! cursor.
//!
//! If the final repetition count falls short of `min`, every AST record
//! contributed by the repetitions attempted so far is rolled back — a
//! REP that ultimately fails must leave the AST exactly as it found it.

use crate::error::ParseError;
use crate::sysdata::Direction;

use super::super::{Engine, Outcome};

pub(super) fn eval<U>(
    engine: &mut Engine<'_, U>,
    rule_index: usize,
    op_index: usize,
    min: u32,
    max: Option<u32>,
    begin: usize,
) -> Result<Outcome, ParseError> {
    let child = op_index + 1;
    match engine.sys.direction() {
        Direction::Forward => eval_forward(engine, rule_index, child, min, max, begin),
        Direction::Behind => eval_behind(engine, rule_index, child, min, max, begin),
    }
}

fn eval_forward<U>(
    engine: &mut Engine<'_, U>,
    rule_index: usize,
    child: usize,
    min: u32,
    max: Option<u32>,
    begin: usize,
) -> Result<Outcome, ParseError> {
    let mark = engine.ast.mark();
    let mut count = 0u32;
    let mut cursor = begin;
    loop {
        if let Some(max) = max {
            if count >= max {
                break;
            }
        }
        let attempt = engine.dispatch(rule_index, child, cursor)?;
        if !attempt.state.matched() {
            break;
        }
        count += 1;
        if attempt.length == 0 {
            break;
        }
        cursor += attempt.length;
    }
    if count >= min {
        Ok(Outcome::matched(cursor - begin))
    } else {
        engine.ast.rollback(mark);
        Ok(Outcome::no_match())
    }
}

fn eval_behind<U>(
    engine: &mut Engine<'_, U>,
    rule_index: usize,
    child: usize,
    min: u32,
    max: Option<u32>,
    begin: usize,
) -> Result<Outcome, ParseError> {
    let mark = engine.ast.mark();
    let mut count = 0u32;
    let mut cursor = begin;
    loop {
        if let Some(max) = max {
            if count >= max {
                break;
            }
        }
        let attempt = engine.dispatch(rule_index, child, cursor)?;
        if !attempt.state.matched() {
            break;
        }
        count += 1;
        if attempt.length == 0 {
            break;
        }
        cursor -= attempt.length;
    }
    if count >= min {
        Ok(Outcome::matched(begin - cursor))
    } else {
        engine.ast.rollback(mark);
        Ok(Outcome::no_match())
    }
}

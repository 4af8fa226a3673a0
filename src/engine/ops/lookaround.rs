//! `AND`/`NOT` (look-ahead) and `BKA`/`BKN` (look-behind): zero-width
//! predicates over the opcode immediately following them. `AND`/`BKA` are
//! positive (succeed iff the child matches), `NOT`/`BKN` negative (succeed
//! iff it doesn't). None of the four ever consumes input themselves,
//! whatever the child consumed is discarded once the predicate is decided.
//!
//! Look-around is also required to be transparent: whatever the child did
//! to reach its verdict — AST records from a nested `RNM`/`UDT`, back-
//! reference frames it updated — is undone once the verdict is in, whether
//! the child matched or not. Only the predicate's own zero-width yes/no
//! result escapes.

use crate::error::ParseError;
use crate::sysdata::{Direction, LookAroundKind};

use super::super::{Engine, Outcome};

pub(super) fn eval_and<U>(engine: &mut Engine<'_, U>, rule_index: usize, op_index: usize, begin: usize) -> Result<Outcome, ParseError> {
    eval(engine, LookAroundKind::And, Direction::Forward, rule_index, op_index, begin, true)
}

pub(super) fn eval_not<U>(engine: &mut Engine<'_, U>, rule_index: usize, op_index: usize, begin: usize) -> Result<Outcome, ParseError> {
    eval(engine, LookAroundKind::Not, Direction::Forward, rule_index, op_index, begin, false)
}

pub(super) fn eval_bka<U>(engine: &mut Engine<'_, U>, rule_index: usize, op_index: usize, begin: usize) -> Result<Outcome, ParseError> {
    eval(engine, LookAroundKind::Bka, Direction::Behind, rule_index, op_index, begin, true)
}

pub(super) fn eval_bkn<U>(engine: &mut Engine<'_, U>, rule_index: usize, op_index: usize, begin: usize) -> Result<Outcome, ParseError> {
    eval(engine, LookAroundKind::Bkn, Direction::Behind, rule_index, op_index, begin, false)
}

fn eval<U>(
    engine: &mut Engine<'_, U>,
    kind: LookAroundKind,
    direction: Direction,
    rule_index: usize,
    op_index: usize,
    begin: usize,
    positive: bool,
) -> Result<Outcome, ParseError> {
    let direction_guard = engine.sys.push_direction(direction);
    let look_around_guard = engine.sys.push_look_around(kind, begin);
    let ast_mark = engine.ast.mark();
    let bkr_snapshot = engine.sys.bkr_frames.clone();

    let outcome = engine.dispatch(rule_index, op_index + 1, begin);

    engine.ast.rollback(ast_mark);
    engine.sys.bkr_frames = bkr_snapshot;
    drop(look_around_guard);
    drop(direction_guard);

    Ok(resolve(outcome?, positive))
}

fn resolve(child: Outcome, positive: bool) -> Outcome {
    let matched = child.state.matched();
    if matched == positive {
        Outcome::empty()
    } else {
        Outcome::no_match()
    }
}

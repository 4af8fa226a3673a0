//! `ALT`: ordered alternation — the first child that doesn't `NoMatch` wins.
//! Direction-agnostic; each child's own opcode handles direction.

use crate::error::ParseError;

use super::super::{Engine, Outcome};

pub(super) fn eval<U>(engine: &mut Engine<'_, U>, rule_index: usize, children: &[usize], begin: usize) -> Result<Outcome, ParseError> {
    for &child in children {
        let outcome = engine.dispatch(rule_index, child, begin)?;
        if outcome.state.matched() {
            return Ok(outcome);
        }
    }
    Ok(Outcome::no_match())
}

//! `RNM` and `UDT`: invocation of a named rule or user-defined terminal.
//! Both simply forward to the corresponding `Engine` method, which owns
//! the AST/trace/stats bookkeeping and callback plumbing for that rule/UDT.

use crate::error::ParseError;

use super::super::{Engine, Outcome};

pub(super) fn eval_rnm<U>(engine: &mut Engine<'_, U>, index: usize, begin: usize) -> Result<Outcome, ParseError> {
    engine.evaluate_rule(index, begin)
}

pub(super) fn eval_udt<U>(engine: &mut Engine<'_, U>, index: usize, begin: usize) -> Result<Outcome, ParseError> {
    engine.evaluate_udt(index, begin)
}

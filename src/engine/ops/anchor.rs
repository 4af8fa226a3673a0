//! `ABG`/`AEN`: zero-width anchors to the start and end of the whole input
//! phrase, independent of any `AND`/`NOT`/`BKA`/`BKN` window narrowing and
//! independent of direction.

use crate::error::ParseError;

use super::super::{Engine, Outcome};

pub(super) fn eval_abg<U>(engine: &mut Engine<'_, U>, begin: usize) -> Result<Outcome, ParseError> {
    if begin == 0 {
        Ok(Outcome::empty())
    } else {
        Ok(Outcome::no_match())
    }
}

pub(super) fn eval_aen<U>(engine: &mut Engine<'_, U>, begin: usize) -> Result<Outcome, ParseError> {
    if begin == engine.input.phrase().len() {
        Ok(Outcome::empty())
    } else {
        Ok(Outcome::no_match())
    }
}

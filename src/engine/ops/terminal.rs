//! `TRG`, `TBS`, `TLS`: character-range and literal terminals.
//!
//! Forward evaluation reads characters starting at `begin`; behind
//! evaluation (inside `BKA`/`BKN`) treats `begin` as the position *after*
//! the characters being matched and reads backward from there, comparing
//! the literal in its normal left-to-right order against the characters
//! immediately preceding `begin`.

use std::sync::Arc;

use crate::char_code::CharCode;
use crate::error::ParseError;
use crate::sysdata::Direction;

use super::super::{Engine, Outcome};

pub(super) fn eval_trg<U>(engine: &mut Engine<'_, U>, min: CharCode, max: CharCode, begin: usize) -> Result<Outcome, ParseError> {
    let candidate = match engine.sys.direction() {
        Direction::Forward => engine.input.at(begin),
        Direction::Behind => begin
            .checked_sub(1)
            .filter(|&p| p >= engine.input.begin())
            .and_then(|p| engine.input.at(p)),
    };
    match candidate {
        Some(c) if c >= min && c <= max => Ok(Outcome::matched(1)),
        _ => Ok(Outcome::no_match()),
    }
}

pub(super) fn eval_tbs<U>(engine: &mut Engine<'_, U>, bytes: &Arc<[CharCode]>, begin: usize) -> Result<Outcome, ParseError> {
    match_literal(engine, bytes, begin, false)
}

pub(super) fn eval_tls<U>(engine: &mut Engine<'_, U>, bytes: &Arc<[CharCode]>, begin: usize) -> Result<Outcome, ParseError> {
    match_literal(engine, bytes, begin, true)
}

fn match_literal<U>(engine: &mut Engine<'_, U>, bytes: &[CharCode], begin: usize, case_insensitive: bool) -> Result<Outcome, ParseError> {
    let len = bytes.len();
    if len == 0 {
        return Ok(Outcome::empty());
    }

    let start = match engine.sys.direction() {
        Direction::Forward => {
            if begin + len > engine.input.end() {
                return Ok(Outcome::no_match());
            }
            begin
        }
        Direction::Behind => match begin.checked_sub(len) {
            Some(start) if start >= engine.input.begin() => start,
            _ => return Ok(Outcome::no_match()),
        },
    };

    for (i, &expected) in bytes.iter().enumerate() {
        let actual = engine.input.at(start + i).expect("bounds already checked");
        let actual = if case_insensitive { actual.to_ascii_lowercase() } else { actual };
        if actual != expected {
            return Ok(Outcome::no_match());
        }
    }
    Ok(Outcome::matched(len))
}

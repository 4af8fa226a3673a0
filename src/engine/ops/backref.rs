//! `BKR`: match the phrase last matched by a rule or UDT again.
//!
//! If the referenced rule/UDT hasn't matched yet in the relevant scope,
//! there's no saved frame entry to select, so the reference fails outright
//! rather than matching vacuously. A rule/UDT that previously matched empty
//! does have an entry — comparing against zero characters always succeeds —
//! so that case is still an empty match, not a failure.

use crate::error::ParseError;
use crate::grammar::{BkrCase, BkrMode, BkrTarget};
use crate::sysdata::Direction;

use super::super::{Engine, Outcome};

pub(super) fn eval<U>(
    engine: &mut Engine<'_, U>,
    index: usize,
    case: BkrCase,
    mode: BkrMode,
    target: BkrTarget,
    begin: usize,
) -> Result<Outcome, ParseError> {
    let Some(frames) = engine.sys.bkr_frames.as_ref() else {
        return Ok(Outcome::no_match());
    };

    let recorded = match (target, mode) {
        (BkrTarget::Rule, BkrMode::Universal) => frames.universal_rule(index),
        (BkrTarget::Rule, BkrMode::Parent) => frames.parent_rule(index),
        (BkrTarget::Udt, BkrMode::Universal) => frames.universal_udt(index),
        (BkrTarget::Udt, BkrMode::Parent) => frames.parent_udt(index),
    };

    let Some((ref_begin, ref_len)) = recorded else {
        return Ok(Outcome::no_match());
    };
    if ref_len == 0 {
        return Ok(Outcome::empty());
    }

    let start = match engine.sys.direction() {
        Direction::Forward => {
            if begin + ref_len > engine.input.end() {
                return Ok(Outcome::no_match());
            }
            begin
        }
        Direction::Behind => match begin.checked_sub(ref_len) {
            Some(start) if start >= engine.input.begin() => start,
            _ => return Ok(Outcome::no_match()),
        },
    };

    for i in 0..ref_len {
        let reference = engine.input.at(ref_begin + i).expect("recorded match was in-bounds");
        let candidate = engine.input.at(start + i).expect("bounds already checked");
        let (reference, candidate) = match case {
            BkrCase::Sensitive => (reference, candidate),
            BkrCase::Insensitive => (reference.to_ascii_lowercase(), candidate.to_ascii_lowercase()),
        };
        if reference != candidate {
            return Ok(Outcome::no_match());
        }
    }
    Ok(Outcome::matched(ref_len))
}

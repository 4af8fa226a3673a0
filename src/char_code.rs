//! The character code type the engine operates over.
//!
//! The engine never decodes text itself (see crate-level docs); callers
//! hand it a sequence of [`CharCode`] values, typically produced by decoding
//! UTF-8/UTF-16 input upstream. Wrapping `u32` in a newtype keeps an input
//! offset from ever being accidentally compared against a character value.

use serde::{Deserialize, Serialize};

/// A single character code, wide enough for any Unicode scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharCode(pub u32);

impl CharCode {
    /// Folds an ASCII uppercase letter to lowercase; all other codes pass through unchanged.
    pub fn to_ascii_lowercase(self) -> CharCode {
        match self.0 {
            0x41..=0x5A => CharCode(self.0 + 32),
            _ => self,
        }
    }
}

impl From<u32> for CharCode {
    fn from(value: u32) -> Self {
        CharCode(value)
    }
}

impl From<char> for CharCode {
    fn from(value: char) -> Self {
        CharCode(value as u32)
    }
}

/// Convenience conversion for building test/demo input from an ASCII string.
pub fn codes_from_str(s: &str) -> Vec<CharCode> {
    s.chars().map(CharCode::from).collect()
}

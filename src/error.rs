//! Fatal, non-recoverable parser errors.
//!
//! Kept strictly separate from [`crate::callback::MatchState`]: a `NoMatch`
//! is an expected, routine outcome of trying an alternative and is never
//! routed through `Result`. Only conditions that mean the parse cannot
//! continue at all — a malformed grammar, an unregistered UDT callback, a
//! safety cap tripping — become a `ParseError`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid grammar: {0}")]
    InvalidGrammar(String),

    #[error("unknown start rule `{0}`")]
    UnknownStartRule(String),

    #[error("requested window [{begin}, {begin}+{length}) is out of bounds for input of length {input_length}")]
    WindowOutOfBounds {
        begin: usize,
        length: usize,
        input_length: usize,
    },

    #[error("udt `{0}` has no registered callback")]
    MissingUdtCallback(String),

    #[error("trace filter names unknown operator `{0}`")]
    UnknownOperatorFilter(String),

    #[error("trace filter names unknown rule `{0}`")]
    UnknownRuleFilter(String),

    #[error("node hit cap ({cap}) exceeded while evaluating rule `{rule}`")]
    NodeHitsExceeded { rule: String, cap: u64 },

    #[error("tree depth cap ({cap}) exceeded while evaluating rule `{rule}`")]
    TreeDepthExceeded { rule: String, cap: u32 },

    #[error("callback for `{name}` violated its contract: {detail}")]
    CallbackContractViolation { name: String, detail: String },
}

//! Runtime core for an interpreted SABNF parse engine.
//!
//! This crate takes a pre-compiled [`Grammar`] (an `ALT`/`CAT`/`REP`/`RNM`/
//! `UDT`/`AND`/`NOT`/`TRG`/`TBS`/`TLS`/`BKR`/`BKA`/`BKN`/`ABG`/`AEN` opcode
//! tree per rule) and a phrase of [`CharCode`]s, and interprets the grammar
//! against the phrase: a recursive-descent evaluator with backtracking,
//! building an AST event log, an optional execution trace, and match
//! statistics as it goes.
//!
//! It does not parse grammar source text itself and defines no on-disk
//! grammar format — callers hand it an already-built `Grammar`, typically
//! produced by a separate generator. It does not decode text either;
//! callers supply `CharCode` sequences (`char_code::codes_from_str` is a
//! convenience for the common ASCII/Unicode-scalar case).
//!
//! The facade is [`Parser`]: build one from an `Arc<Grammar>`, register any
//! UDT callbacks (mandatory) and rule hooks (optional), then call
//! [`Parser::parse`].

#![forbid(unsafe_code)]

pub mod ast;
pub mod callback;
pub mod char_code;
mod engine;
pub mod error;
pub mod grammar;
pub mod input;
mod parser;
pub mod stats;
mod sysdata;
#[cfg(test)]
mod test;
pub mod trace;

pub use ast::{AstBuilder, AstEventKind, AstMark, AstRecord, AstTarget, TranslateDirective, TranslateEvent};
pub use callback::{CallbackCtx, CallbackDirective, MatchState, RuleFn, UdtFn};
pub use char_code::{codes_from_str, CharCode};
pub use engine::{Outcome, SafetyLimits};
pub use error::ParseError;
pub use grammar::{BkrCase, BkrMode, BkrTarget, Grammar, OpKind, Opcode, Rule, Udt};
pub use input::InputBuffer;
pub use parser::{ParseOutcome, Parser, ParserConfig};
pub use stats::{Counts, StatsCollector};
pub use sysdata::{Direction, LookAroundKind};
pub use trace::{Filter, TraceRecord, TraceRecorder};

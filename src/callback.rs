//! Rule/UDT callbacks and the context handed to them (component C6 glue).
//!
//! `MatchState` is the routine backtracking result — entirely distinct from
//! [`crate::error::ParseError`], which only ever signals a parse that cannot
//! continue at all. A callback can also ask the engine to treat a rule as
//! temporarily `Active`/`Empty`/etc. via [`CallbackDirective`] rather than
//! actually evaluating its opcodes, which is how pre/post rule hooks (for
//! tracing, memoization, or grammar debugging) can short-circuit or observe
//! a rule invocation.

use std::rc::Rc;

use crate::char_code::CharCode;
use crate::error::ParseError;

/// The outcome of trying to match an opcode, rule, or UDT against the
/// current window. This is the "normal" channel: trying an alternative that
/// comes back `NoMatch` is expected control flow, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchState {
    /// Matched, consuming zero characters.
    Empty,
    /// Matched, consuming one or more characters.
    Match,
    /// Did not match.
    NoMatch,
}

impl MatchState {
    pub fn matched(self) -> bool {
        matches!(self, MatchState::Empty | MatchState::Match)
    }
}

/// What a rule or UDT pre/post callback directs the engine to do in place
/// of (or after) its normal opcode evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackDirective {
    /// Proceed with the engine's normal opcode evaluation for this rule/UDT.
    Active,
    /// Treat the rule as matching the empty string without evaluating it.
    Empty,
    /// Treat the rule as matching `length` characters without evaluating it.
    Match,
    /// Treat the rule as failing to match without evaluating it.
    NoMatch,
}

/// The view into engine state exposed to a rule/UDT callback: the relevant
/// slice of input, the current window, and user data — but not the engine's
/// internals, so a callback can't corrupt trace/stat bookkeeping directly.
pub struct CallbackCtx<'a, U> {
    pub(crate) phrase: &'a [CharCode],
    pub(crate) begin: usize,
    pub(crate) length: usize,
    pub(crate) name: &'a str,
    pub user_data: &'a mut U,
}

impl<'a, U> CallbackCtx<'a, U> {
    /// The subslice of the input phrase covered by the active window.
    pub fn window(&self) -> &[CharCode] {
        &self.phrase[self.begin..self.begin + self.length]
    }

    pub fn phrase(&self) -> &[CharCode] {
        self.phrase
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// The rule or UDT name this callback was invoked for.
    pub fn name(&self) -> &str {
        self.name
    }
}

/// A rule pre/post-evaluation hook. Called twice per invocation attempt:
/// once before evaluation with `result: None` (to decide `Active` vs. a
/// short-circuit), once after with `result: Some(_)` (to observe or veto
/// the outcome). Returning anything other than `Active` on the post call is
/// a contract violation, surfaced as [`ParseError::CallbackContractViolation`].
pub type RuleFn<U> = Rc<dyn Fn(&mut CallbackCtx<'_, U>, Option<MatchState>) -> CallbackDirective>;

/// A UDT's matching logic: given the context, returns how much of the
/// window (`0..=length`) it matched, or `None` for no match. UDTs have no
/// opcodes of their own, so unlike `RuleFn` this is mandatory and always
/// produces the final result rather than merely observing one.
pub type UdtFn<U> = Rc<dyn Fn(&mut CallbackCtx<'_, U>) -> Result<Option<usize>, ParseError>>;

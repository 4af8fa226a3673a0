//! The parser facade (component C9): the public entry point that wires a
//! grammar, its callbacks, and a phrase together and runs a single parse.

use std::collections::HashSet;
use std::sync::Arc;

use crate::ast::AstBuilder;
use crate::callback::{RuleFn, UdtFn};
use crate::char_code::CharCode;
use crate::engine::{Engine, SafetyLimits};
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::input::InputBuffer;
use crate::stats::StatsCollector;
use crate::trace::{Filter, TraceRecorder, DEFAULT_CAPACITY};

/// Tunables for a parse: safety caps and how much trace/statistics detail
/// to collect. Defaults favor a cheap parse with tracing off and
/// statistics on, matching typical production use — tracing is for
/// diagnosing a grammar, not for steady-state running.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    pub limits: SafetyLimits,
    /// `0` disables tracing entirely.
    pub trace_capacity: usize,
    pub trace_operator_filter: Filter,
    pub trace_rule_filter: Option<HashSet<String>>,
    pub stats_enabled: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            limits: SafetyLimits::default(),
            trace_capacity: 0,
            trace_operator_filter: Filter::All,
            trace_rule_filter: None,
            stats_enabled: true,
        }
    }
}

/// Everything produced by a single parse: the match result, the recorded
/// AST events, the trace (empty if tracing was off), and the statistics.
pub struct ParseOutcome<U> {
    /// `true` iff the start rule matched or matched empty *and* that match
    /// consumed the whole window — a start rule that only matches a strict
    /// prefix of the window is not a successful parse.
    pub matched: bool,
    /// Length of the match, valid only when `matched` is true.
    pub phrase_length: usize,
    /// Furthest forward offset reached during the parse, useful for
    /// building a "expected X near offset N" diagnostic on failure.
    pub max_matched: usize,
    pub ast: AstBuilder,
    pub trace: TraceRecorder,
    pub stats: StatsCollector,
    pub user_data: U,
}

/// Binds a grammar to its rule/UDT callbacks and runs parses against it.
/// Cheap to clone the pieces it holds (`Arc<Grammar>`, `Rc`-backed
/// callbacks), but a `Parser` itself is built once and reused across many
/// parses.
pub struct Parser<U> {
    grammar: Arc<Grammar>,
    rule_callbacks: Vec<Option<RuleFn<U>>>,
    udt_callbacks: Vec<Option<UdtFn<U>>>,
    config: ParserConfig,
}

impl<U> Parser<U> {
    pub fn new(grammar: Arc<Grammar>, config: ParserConfig) -> Parser<U> {
        let rule_callbacks = vec![None; grammar.rules.len()];
        let udt_callbacks = vec![None; grammar.udts.len()];
        Parser {
            grammar,
            rule_callbacks,
            udt_callbacks,
            config,
        }
    }

    pub fn grammar(&self) -> &Arc<Grammar> {
        &self.grammar
    }

    /// Registers a pre/post hook for the named rule. Optional: a rule with
    /// no hook just evaluates its opcodes directly.
    pub fn set_rule_callback(&mut self, name: &str, callback: RuleFn<U>) -> Result<(), ParseError> {
        let index = self
            .grammar
            .rule_index_by_name(name)
            .ok_or_else(|| ParseError::UnknownStartRule(name.to_owned()))?;
        self.rule_callbacks[index] = Some(callback);
        Ok(())
    }

    /// Registers the mandatory matching callback for the named UDT.
    pub fn set_udt_callback(&mut self, name: &str, callback: UdtFn<U>) -> Result<(), ParseError> {
        let index = self
            .grammar
            .udt_index_by_name(name)
            .ok_or_else(|| ParseError::MissingUdtCallback(name.to_owned()))?;
        self.udt_callbacks[index] = Some(callback);
        Ok(())
    }

    /// Parses the whole of `phrase` starting at rule `start_rule`.
    pub fn parse(&self, start_rule: &str, phrase: Vec<CharCode>, user_data: U) -> Result<ParseOutcome<U>, ParseError> {
        let length = phrase.len();
        self.parse_substring(start_rule, phrase, 0, length, user_data)
    }

    /// Parses the window `[begin, begin+length)` of `phrase` starting at
    /// rule `start_rule`, leaving the rest of `phrase` available to
    /// `AND`/`NOT`/`BKA`/`BKN` only insofar as it falls within the window.
    pub fn parse_substring(
        &self,
        start_rule: &str,
        phrase: Vec<CharCode>,
        begin: usize,
        length: usize,
        user_data: U,
    ) -> Result<ParseOutcome<U>, ParseError> {
        self.ensure_udt_callbacks_registered()?;
        let rule_index = self
            .grammar
            .rule_index_by_name(start_rule)
            .ok_or_else(|| ParseError::UnknownStartRule(start_rule.to_owned()))?;

        let input = InputBuffer::windowed(phrase, begin, length)?;
        let trace = if self.config.trace_capacity > 0 {
            TraceRecorder::new(
                self.config.trace_capacity,
                self.config.trace_operator_filter.clone(),
                self.config.trace_rule_filter.clone(),
            )
        } else {
            TraceRecorder::disabled()
        };

        let mut engine = Engine::new(
            self.grammar.clone(),
            input,
            self.rule_callbacks.clone(),
            self.udt_callbacks.clone(),
            user_data,
            self.config.limits,
            trace,
            self.config.stats_enabled,
        );

        tracing::debug!(rule = %start_rule, begin, length, "starting parse");
        let outcome = engine.evaluate_rule(rule_index, begin)?;
        let matched = outcome.state.matched() && outcome.length == engine.input().length();
        tracing::debug!(matched, length = outcome.length, "parse finished");

        Ok(ParseOutcome {
            matched,
            phrase_length: outcome.length,
            max_matched: engine.max_matched(),
            ast: engine.ast,
            trace: engine.trace,
            stats: engine.stats,
            user_data: engine.into_user_data(),
        })
    }

    fn ensure_udt_callbacks_registered(&self) -> Result<(), ParseError> {
        for udt in &self.grammar.udts {
            if self.udt_callbacks[udt.index].is_none() {
                return Err(ParseError::MissingUdtCallback(udt.name.clone()));
            }
        }
        Ok(())
    }
}

//! The recursive opcode evaluator (component C8): the heart of the engine.
//!
//! `Engine::dispatch` is the single recursive entry point every opcode
//! evaluation goes through; it owns node-hit and tree-depth accounting,
//! trace/stat emission, and direction-aware routing to the `ops` submodules.
//! Everything else in this module is bookkeeping around that one function.

mod ops;

use std::sync::Arc;

use crate::ast::{AstBuilder, AstTarget};
use crate::callback::{CallbackCtx, CallbackDirective, MatchState, RuleFn, UdtFn};
use crate::char_code::CharCode;
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::input::InputBuffer;
use crate::stats::StatsCollector;
use crate::sysdata::SysData;
use crate::trace::TraceRecorder;

/// The result of evaluating an opcode, rule, or UDT against a window
/// starting at some `begin`: whether it matched, and if so how much of the
/// window it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub state: MatchState,
    pub length: usize,
}

impl Outcome {
    pub fn no_match() -> Outcome {
        Outcome {
            state: MatchState::NoMatch,
            length: 0,
        }
    }

    pub fn empty() -> Outcome {
        Outcome {
            state: MatchState::Empty,
            length: 0,
        }
    }

    pub fn matched(length: usize) -> Outcome {
        Outcome {
            state: if length == 0 { MatchState::Empty } else { MatchState::Match },
            length,
        }
    }
}

/// Safety caps the evaluator enforces against pathological or accidentally
/// infinite grammars.
#[derive(Debug, Clone, Copy)]
pub struct SafetyLimits {
    pub max_tree_depth: u32,
    pub max_node_hits: u64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        SafetyLimits {
            max_tree_depth: 1_000,
            max_node_hits: 1_000_000,
        }
    }
}

pub struct Engine<'g, U> {
    pub(crate) grammar: Arc<Grammar>,
    pub(crate) input: InputBuffer,
    pub(crate) sys: SysData,
    pub(crate) ast: AstBuilder,
    pub(crate) trace: TraceRecorder,
    pub(crate) stats: StatsCollector,
    pub(crate) rule_callbacks: Vec<Option<RuleFn<U>>>,
    pub(crate) udt_callbacks: Vec<Option<UdtFn<U>>>,
    pub(crate) user_data: U,
    pub(crate) limits: SafetyLimits,
    pub(crate) node_hits: u64,
    pub(crate) tree_depth: u32,
    pub(crate) max_matched: usize,
    _marker: std::marker::PhantomData<&'g ()>,
}

impl<'g, U> Engine<'g, U> {
    pub fn new(
        grammar: Arc<Grammar>,
        input: InputBuffer,
        rule_callbacks: Vec<Option<RuleFn<U>>>,
        udt_callbacks: Vec<Option<UdtFn<U>>>,
        user_data: U,
        limits: SafetyLimits,
        trace: TraceRecorder,
        stats_enabled: bool,
    ) -> Engine<'g, U> {
        let needs_bkr = grammar.rules.iter().any(|r| r.is_back_referenced)
            || grammar.udts.iter().any(|u| u.is_back_referenced);
        Engine {
            grammar,
            input,
            sys: SysData::new(needs_bkr),
            ast: AstBuilder::new(),
            trace,
            stats: StatsCollector::new(stats_enabled),
            rule_callbacks,
            udt_callbacks,
            user_data,
            limits,
            node_hits: 0,
            tree_depth: 0,
            max_matched: 0,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn ast(&self) -> &AstBuilder {
        &self.ast
    }

    pub fn trace(&self) -> &TraceRecorder {
        &self.trace
    }

    pub fn stats(&self) -> &StatsCollector {
        &self.stats
    }

    pub fn max_matched(&self) -> usize {
        self.max_matched
    }

    pub fn into_user_data(self) -> U {
        self.user_data
    }

    fn char_at(&self, offset: usize) -> Option<CharCode> {
        self.input.at(offset)
    }

    fn bump_node_hits(&mut self, rule_name: &str) -> Result<(), ParseError> {
        self.node_hits += 1;
        if self.node_hits > self.limits.max_node_hits {
            return Err(ParseError::NodeHitsExceeded {
                rule: rule_name.to_owned(),
                cap: self.limits.max_node_hits,
            });
        }
        Ok(())
    }

    /// Advances `max_matched`, but not while any look-around (`AND`/`NOT`/
    /// `BKA`/`BKN`) is active: a look-around's internal progress — forward
    /// or backward — isn't progress the overall parse actually made, only a
    /// predicate it evaluated and then discarded.
    fn note_forward_progress(&mut self, begin: usize, length: usize) {
        if self.sys.look_around_depth() == 0 {
            self.max_matched = self.max_matched.max(begin + length);
        }
    }

    /// Evaluates the opcode at `rule.opcodes[op_index]` against the window
    /// starting at `begin`. This is the single recursive entry point every
    /// other evaluation — `evaluate_rule`, `evaluate_udt`, and every `ops::*`
    /// helper — funnels through.
    pub(crate) fn dispatch(&mut self, rule_index: usize, op_index: usize, begin: usize) -> Result<Outcome, ParseError> {
        self.tree_depth += 1;
        if self.tree_depth > self.limits.max_tree_depth {
            let rule_name = self.grammar.rule(rule_index).name.clone();
            self.tree_depth -= 1;
            return Err(ParseError::TreeDepthExceeded {
                rule: rule_name,
                cap: self.limits.max_tree_depth,
            });
        }
        {
            let rule_name = self.grammar.rule(rule_index).name.clone();
            self.bump_node_hits(&rule_name)?;
        }

        let op = self.grammar.rule(rule_index).opcodes[op_index].clone();
        let result = ops::eval(self, rule_index, op_index, &op, begin);
        self.tree_depth -= 1;
        let outcome = result?;
        if outcome.state.matched() {
            self.note_forward_progress(begin, outcome.length);
        }
        Ok(outcome)
    }

    /// Invokes the rule at `index` starting at `begin`: runs its pre-hook
    /// (if any), evaluates its opcode tree (unless the pre-hook
    /// short-circuited), records AST/trace/stats, updates `BKR` frames, and
    /// runs its post-hook.
    pub fn evaluate_rule(&mut self, index: usize, begin: usize) -> Result<Outcome, ParseError> {
        let rule = self.grammar.rule(index);
        let name = rule.name.clone();
        let has_opcodes = !rule.opcodes.is_empty();

        let pre_directive = self.run_rule_hook(index, begin, None)?;
        let mark = self.ast.down(AstTarget::Rule, index, begin);
        let parent_guard = self.sys.push_parent_frame();

        let outcome = match pre_directive {
            CallbackDirective::Empty => Outcome::empty(),
            CallbackDirective::Match => {
                return Err(ParseError::CallbackContractViolation {
                    name: name.clone(),
                    detail: "pre-hook directive `Match` requires a length; use `Active` and let evaluation run, or return `Empty`/`NoMatch`".into(),
                });
            }
            CallbackDirective::NoMatch => Outcome::no_match(),
            CallbackDirective::Active => {
                if has_opcodes {
                    self.dispatch(index, 0, begin)?
                } else {
                    Outcome::no_match()
                }
            }
        };

        drop(parent_guard);

        if outcome.state.matched() {
            self.ast.up(AstTarget::Rule, index, begin, outcome.length);
            if let Some(frames) = self.sys.bkr_frames.as_mut() {
                frames.record_rule(index, begin, outcome.length);
            }
        } else {
            self.ast.rollback(mark);
        }

        self.stats.record_rule(&name, outcome.state);
        let post_directive = self.run_rule_hook(index, begin, Some(outcome.state))?;
        if post_directive != CallbackDirective::Active {
            return Err(ParseError::CallbackContractViolation {
                name,
                detail: "post-hook must return `Active`".into(),
            });
        }

        Ok(outcome)
    }

    fn run_rule_hook(&mut self, index: usize, begin: usize, result: Option<MatchState>) -> Result<CallbackDirective, ParseError> {
        let Some(hook) = self.rule_callbacks[index].clone() else {
            return Ok(CallbackDirective::Active);
        };
        let name = self.grammar.rule(index).name.clone();
        let length = self.input.end().saturating_sub(begin);
        let phrase = self.input.phrase().to_vec();
        let mut ctx = CallbackCtx {
            phrase: &phrase,
            begin,
            length,
            name: &name,
            user_data: &mut self.user_data,
        };
        Ok(hook(&mut ctx, result))
    }

    /// Invokes the UDT at `index` starting at `begin` via its mandatory
    /// callback.
    pub fn evaluate_udt(&mut self, index: usize, begin: usize) -> Result<Outcome, ParseError> {
        let udt = self.grammar.udt(index);
        let name = udt.name.clone();
        let allow_empty = udt.empty;

        let Some(callback) = self.udt_callbacks[index].clone() else {
            return Err(ParseError::MissingUdtCallback(name));
        };

        let mark = self.ast.down(AstTarget::Udt, index, begin);

        let phrase = self.input.phrase().to_vec();
        let length = self.input.end().saturating_sub(begin);
        let matched_len = {
            let mut ctx = CallbackCtx {
                phrase: &phrase,
                begin,
                length,
                name: &name,
                user_data: &mut self.user_data,
            };
            callback(&mut ctx)?
        };

        let outcome = match matched_len {
            Some(0) if !allow_empty => {
                return Err(ParseError::CallbackContractViolation {
                    name,
                    detail: "udt matched empty but is not declared `empty`".into(),
                });
            }
            Some(len) => Outcome::matched(len),
            None => Outcome::no_match(),
        };

        if outcome.state.matched() {
            self.ast.up(AstTarget::Udt, index, begin, outcome.length);
            if let Some(frames) = self.sys.bkr_frames.as_mut() {
                frames.record_udt(index, begin, outcome.length);
            }
        } else {
            self.ast.rollback(mark);
        }
        self.stats.record_udt(&name, outcome.state);
        Ok(outcome)
    }
}

//! The trace recorder (component C5): an optional, filterable circular log
//! of every opcode evaluation, for diagnosing why a grammar didn't match
//! what a caller expected.

mod ring;

pub use ring::RecordRing;

use std::collections::HashSet;

use crate::callback::MatchState;
use crate::grammar::OpKind;
use crate::sysdata::{Direction, LookAroundKind};

/// The default ring capacity, chosen to keep a reasonably deep trace of a
/// typical grammar's evaluation in memory without unbounded growth on long
/// or pathological inputs.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Which opcode evaluations get traced.
#[derive(Debug, Clone)]
pub enum Filter {
    All,
    None,
    /// Only operators named here, matched case-insensitively against
    /// [`OpKind::name`].
    Set(HashSet<OpKind>),
}

impl Filter {
    fn allows(&self, kind: OpKind) -> bool {
        match self {
            Filter::All => true,
            Filter::None => false,
            Filter::Set(set) => set.contains(&kind),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TraceRecord {
    pub phase: TracePhase,
    pub kind: OpKind,
    pub rule_or_udt_name: Option<String>,
    pub begin: usize,
    /// `Forward` or `Behind`, as of this opcode's evaluation.
    pub direction: Direction,
    /// Recursion depth at which this opcode was evaluated (the start rule
    /// is depth 1).
    pub tree_depth: u32,
    /// The phrase offset the innermost active look-around is anchored at,
    /// or `None` if this opcode is evaluated outside any look-around.
    pub look_anchor: Option<usize>,
    /// Which look-around opcode this record was evaluated inside of, if
    /// any, innermost one wins when look-arounds nest.
    pub look_around_kind: Option<LookAroundKind>,
    /// The outcome, set only on the `Up` half of the pair.
    pub state: Option<MatchState>,
    pub length: usize,
    /// Line number of the matching `Down`/`Up` record, once known.
    pub paired_line: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePhase {
    Down,
    Up,
}

/// The per-evaluation context `down`/`up` stamp onto a [`TraceRecord`],
/// bundled so both halves of a pair carry identical values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TraceContext {
    pub direction: Direction,
    pub tree_depth: u32,
    pub look_anchor: Option<usize>,
    pub look_around_kind: Option<LookAroundKind>,
}

/// Records opcode evaluation as a sequence of `Down`/`Up` pairs into a
/// bounded ring, honoring an operator-level and rule-level filter.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    ring: RecordRing<TraceRecord>,
    operator_filter: Filter,
    rule_filter: Option<HashSet<String>>,
    enabled: bool,
}

impl TraceRecorder {
    pub fn new(capacity: usize, operator_filter: Filter, rule_filter: Option<HashSet<String>>) -> TraceRecorder {
        TraceRecorder {
            ring: RecordRing::new(capacity),
            operator_filter,
            rule_filter,
            enabled: true,
        }
    }

    pub fn disabled() -> TraceRecorder {
        TraceRecorder {
            ring: RecordRing::new(1),
            operator_filter: Filter::None,
            rule_filter: None,
            enabled: false,
        }
    }

    fn should_record(&self, kind: OpKind, name: Option<&str>) -> bool {
        if !self.enabled || !self.operator_filter.allows(kind) {
            return false;
        }
        match (&self.rule_filter, name) {
            (None, _) => true,
            (Some(set), Some(name)) => set.contains(name),
            (Some(_), None) => false,
        }
    }

    /// Records entry into an opcode, returning a handle to pair with the
    /// later `up` call, or `None` if this evaluation is filtered out.
    pub(crate) fn down(&mut self, kind: OpKind, rule_or_udt_name: Option<&str>, begin: usize, ctx: TraceContext) -> Option<TraceMark> {
        if !self.should_record(kind, rule_or_udt_name) {
            return None;
        }
        let line = self.ring.push(TraceRecord {
            phase: TracePhase::Down,
            kind,
            rule_or_udt_name: rule_or_udt_name.map(str::to_owned),
            begin,
            direction: ctx.direction,
            tree_depth: ctx.tree_depth,
            look_anchor: ctx.look_anchor,
            look_around_kind: ctx.look_around_kind,
            state: None,
            length: 0,
            paired_line: None,
        });
        Some(TraceMark(line))
    }

    /// Records the matching exit for a prior `down` call.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn up(
        &mut self,
        mark: TraceMark,
        kind: OpKind,
        rule_or_udt_name: Option<&str>,
        begin: usize,
        state: MatchState,
        length: usize,
        ctx: TraceContext,
    ) {
        let up_line = self.ring.push(TraceRecord {
            phase: TracePhase::Up,
            kind,
            rule_or_udt_name: rule_or_udt_name.map(str::to_owned),
            begin,
            direction: ctx.direction,
            tree_depth: ctx.tree_depth,
            look_anchor: ctx.look_anchor,
            look_around_kind: ctx.look_around_kind,
            state: Some(state),
            length,
            paired_line: Some(mark.0),
        });
        self.ring.patch(mark.0, |down| down.paired_line = Some(up_line));
    }

    pub fn records(&self) -> impl Iterator<Item = (u64, &TraceRecord)> {
        self.ring.iter()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraceMark(u64);

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> TraceContext {
        TraceContext {
            direction: Direction::Forward,
            tree_depth: 1,
            look_anchor: None,
            look_around_kind: None,
        }
    }

    #[test]
    fn down_up_pair_gets_patched() {
        let mut rec = TraceRecorder::new(10, Filter::All, None);
        let mark = rec.down(OpKind::Tbs, None, 0, ctx()).expect("not filtered");
        rec.up(mark, OpKind::Tbs, None, 0, MatchState::Match, 3, ctx());
        let records: Vec<_> = rec.records().collect();
        assert_eq!(records.len(), 2);
        let (_, down) = records[0];
        assert_eq!(down.paired_line, Some(1));
    }

    #[test]
    fn disabled_recorder_records_nothing() {
        let mut rec = TraceRecorder::disabled();
        assert!(rec.down(OpKind::Alt, None, 0, ctx()).is_none());
        assert!(rec.is_empty());
    }

    #[test]
    fn operator_filter_excludes_unlisted_kinds() {
        let mut set = HashSet::new();
        set.insert(OpKind::Rnm);
        let mut rec = TraceRecorder::new(10, Filter::Set(set), None);
        assert!(rec.down(OpKind::Tbs, None, 0, ctx()).is_none());
        assert!(rec.down(OpKind::Rnm, Some("start"), 0, ctx()).is_some());
    }

    #[test]
    fn records_carry_the_supplied_trace_context() {
        let mut rec = TraceRecorder::new(10, Filter::All, None);
        let inside_lookaround = TraceContext {
            direction: Direction::Behind,
            tree_depth: 4,
            look_anchor: Some(2),
            look_around_kind: Some(LookAroundKind::Bkn),
        };
        let mark = rec.down(OpKind::Tbs, None, 2, inside_lookaround).expect("not filtered");
        rec.up(mark, OpKind::Tbs, None, 2, MatchState::NoMatch, 0, inside_lookaround);
        let records: Vec<_> = rec.records().map(|(_, r)| r).collect();
        assert_eq!(records[0].direction, Direction::Behind);
        assert_eq!(records[0].tree_depth, 4);
        assert_eq!(records[0].look_anchor, Some(2));
        assert_eq!(records[0].look_around_kind, Some(LookAroundKind::Bkn));
    }

    #[test]
    fn ring_evicts_oldest_beyond_capacity() {
        let mut ring: RecordRing<u32> = RecordRing::new(2);
        ring.push(1);
        ring.push(2);
        ring.push(3);
        let kept: Vec<_> = ring.iter().map(|(_, v)| *v).collect();
        assert_eq!(kept, vec![2, 3]);
    }

    #[test]
    fn patch_on_evicted_line_is_a_no_op() {
        let mut ring: RecordRing<u32> = RecordRing::new(1);
        ring.push(1);
        ring.push(2);
        assert!(!ring.patch(0, |v| *v = 99));
    }
}

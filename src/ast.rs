//! The AST builder (component C4): a flat, rollback-friendly record of
//! rule/UDT match events, built up during evaluation and walked afterwards
//! via [`AstBuilder::translate`].
//!
//! Nodes are recorded as a pair of entries — a `Down` record when a rule or
//! UDT is entered and an `Up` record when it matches — rather than as a
//! nested tree. This mirrors the engine's own call/return shape and makes
//! rollback on backtrack a single `truncate` instead of a tree edit.

use crate::grammar::BkrTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstEventKind {
    Down,
    Up,
}

/// Which kind of production an AST record names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstTarget {
    Rule,
    Udt,
}

impl From<BkrTarget> for AstTarget {
    fn from(t: BkrTarget) -> Self {
        match t {
            BkrTarget::Rule => AstTarget::Rule,
            BkrTarget::Udt => AstTarget::Udt,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AstRecord {
    pub kind: AstEventKind,
    pub target: AstTarget,
    pub index: usize,
    pub begin: usize,
    /// Set on the `Up` record only; the matched phrase length. `Down`
    /// records carry `0` here and are never read for it.
    pub length: usize,
}

/// The flat event log itself. Every successful rule/UDT match contributes
/// exactly one `Down`/`Up` pair; a backtracked-out-of match is rolled back
/// by truncating the log to the length it had before the attempt began.
#[derive(Debug, Clone, Default)]
pub struct AstBuilder {
    records: Vec<AstRecord>,
}

impl AstBuilder {
    pub fn new() -> AstBuilder {
        AstBuilder::default()
    }

    /// A mark at the current position, without recording an event. Used by
    /// callers (`CAT`, `REP`, look-around) that need to roll back everything
    /// recorded by their children without adding a record of their own.
    pub fn mark(&self) -> AstMark {
        AstMark(self.records.len())
    }

    /// Marks the start of a rule/UDT attempt and returns the mark needed to
    /// either commit it (`up`) or discard it (`rollback`).
    pub fn down(&mut self, target: AstTarget, index: usize, begin: usize) -> AstMark {
        let mark = self.records.len();
        self.records.push(AstRecord {
            kind: AstEventKind::Down,
            target,
            index,
            begin,
            length: 0,
        });
        AstMark(mark)
    }

    /// Commits a successful match: appends the matching `Up` record. The
    /// `Down`/`Up` pair from this attempt, and any nested pairs recorded
    /// between them, are kept.
    pub fn up(&mut self, target: AstTarget, index: usize, begin: usize, length: usize) {
        self.records.push(AstRecord {
            kind: AstEventKind::Up,
            target,
            index,
            begin,
            length,
        });
    }

    /// Discards everything recorded since `mark`, including nested
    /// `Down`/`Up` pairs from child rules that matched before the overall
    /// attempt failed.
    pub fn rollback(&mut self, mark: AstMark) {
        self.records.truncate(mark.0);
    }

    pub fn records(&self) -> &[AstRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Walks the recorded event log depth-first, invoking `visit` on each
    /// `Down` and `Up` event in the order they occurred. `visit` returns a
    /// [`TranslateDirective`] telling the walk whether to descend into the
    /// node just entered.
    pub fn translate<F>(&self, mut visit: F)
    where
        F: FnMut(TranslateEvent<'_>) -> TranslateDirective,
    {
        let mut skip_until_depth: Option<usize> = None;
        let mut depth = 0usize;
        for record in &self.records {
            match record.kind {
                AstEventKind::Down => {
                    let event = TranslateEvent {
                        kind: AstEventKind::Down,
                        record,
                        depth,
                    };
                    depth += 1;
                    if skip_until_depth.is_none() {
                        if let TranslateDirective::SkipChildren = visit(event) {
                            skip_until_depth = Some(depth);
                        }
                    }
                }
                AstEventKind::Up => {
                    depth -= 1;
                    if let Some(skip_depth) = skip_until_depth {
                        if depth < skip_depth {
                            skip_until_depth = None;
                        } else {
                            continue;
                        }
                    }
                    visit(TranslateEvent {
                        kind: AstEventKind::Up,
                        record,
                        depth,
                    });
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AstMark(usize);

pub struct TranslateEvent<'a> {
    pub kind: AstEventKind,
    pub record: &'a AstRecord,
    pub depth: usize,
}

/// Returned by the `translate` visitor to control descent. Only meaningful
/// on `Down` events; ignored on `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateDirective {
    Descend,
    SkipChildren,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_discards_nested_records() {
        let mut ast = AstBuilder::new();
        let outer = ast.down(AstTarget::Rule, 0, 0);
        let _inner = ast.down(AstTarget::Rule, 1, 0);
        ast.up(AstTarget::Rule, 1, 0, 2);
        assert_eq!(ast.len(), 2);
        ast.rollback(outer);
        assert!(ast.is_empty());
    }

    #[test]
    fn commit_keeps_down_up_pair() {
        let mut ast = AstBuilder::new();
        let mark = ast.down(AstTarget::Rule, 0, 0);
        ast.up(AstTarget::Rule, 0, 0, 3);
        assert_eq!(ast.len(), 2);
        let _ = mark;
    }

    #[test]
    fn translate_visits_down_then_up_in_order() {
        let mut ast = AstBuilder::new();
        ast.down(AstTarget::Rule, 0, 0);
        ast.down(AstTarget::Rule, 1, 0);
        ast.up(AstTarget::Rule, 1, 0, 1);
        ast.up(AstTarget::Rule, 0, 0, 1);

        let mut kinds = Vec::new();
        ast.translate(|event| {
            kinds.push((event.kind, event.record.index));
            TranslateDirective::Descend
        });
        assert_eq!(
            kinds,
            vec![
                (AstEventKind::Down, 0),
                (AstEventKind::Down, 1),
                (AstEventKind::Up, 1),
                (AstEventKind::Up, 0),
            ]
        );
    }

    #[test]
    fn translate_skip_children_omits_nested_up_events() {
        let mut ast = AstBuilder::new();
        ast.down(AstTarget::Rule, 0, 0);
        ast.down(AstTarget::Rule, 1, 0);
        ast.up(AstTarget::Rule, 1, 0, 1);
        ast.up(AstTarget::Rule, 0, 0, 1);

        let mut visited = Vec::new();
        ast.translate(|event| {
            visited.push((event.kind, event.record.index));
            if event.kind == AstEventKind::Down && event.record.index == 0 {
                TranslateDirective::SkipChildren
            } else {
                TranslateDirective::Descend
            }
        });
        assert_eq!(visited, vec![(AstEventKind::Down, 0), (AstEventKind::Up, 0)]);
    }
}

//! System data (component C3): the mutable, per-parse bookkeeping that
//! doesn't belong to the input, the AST, the trace, or the statistics —
//! chiefly the look-around direction stack and the back-reference frames.

use std::collections::HashMap;

/// Which direction the active opcode subtree is being evaluated in. `AND`/
/// `NOT` push `Forward` (they already are forward, but nesting a `BKA`/`BKN`
/// inside a `NOT` needs an explicit stack entry to pop), `BKA`/`BKN` push
/// `Behind`. Every opcode that dispatches differently by direction (`CAT`,
/// `REP`, `TRG`, `TBS`, `TLS`, `BKR`) reads the top of this stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Behind,
}

/// Which of the four zero-width predicate opcodes is currently active,
/// innermost first. Tracked separately from `Direction` (`AND`/`NOT` are
/// both `Forward`, `BKA`/`BKN` both `Behind`) so the trace and the
/// AST/back-reference transparency rules can tell "inside a look-around"
/// apart from "evaluating backward".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookAroundKind {
    And,
    Not,
    Bka,
    Bkn,
}

/// The last phrase matched by a rule or UDT, recorded for `BKR`. Two maps
/// are kept: `universal` holds the latest match anywhere in the parse so
/// far, `parent` is reset each time a new parent-rule activation begins and
/// holds the latest match within that activation only (§4.1.1, `BKR`).
#[derive(Debug, Clone, Default)]
pub struct BkrFrames {
    universal: HashMap<(BkrTargetKind, usize), (usize, usize)>,
    parent: HashMap<(BkrTargetKind, usize), (usize, usize)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BkrTargetKind {
    Rule,
    Udt,
}

impl BkrFrames {
    pub fn record_rule(&mut self, index: usize, begin: usize, length: usize) {
        self.record(BkrTargetKind::Rule, index, begin, length);
    }

    pub fn record_udt(&mut self, index: usize, begin: usize, length: usize) {
        self.record(BkrTargetKind::Udt, index, begin, length);
    }

    fn record(&mut self, kind: BkrTargetKind, index: usize, begin: usize, length: usize) {
        self.universal.insert((kind, index), (begin, length));
        self.parent.insert((kind, index), (begin, length));
    }

    pub fn universal_rule(&self, index: usize) -> Option<(usize, usize)> {
        self.universal.get(&(BkrTargetKind::Rule, index)).copied()
    }

    pub fn universal_udt(&self, index: usize) -> Option<(usize, usize)> {
        self.universal.get(&(BkrTargetKind::Udt, index)).copied()
    }

    pub fn parent_rule(&self, index: usize) -> Option<(usize, usize)> {
        self.parent.get(&(BkrTargetKind::Rule, index)).copied()
    }

    pub fn parent_udt(&self, index: usize) -> Option<(usize, usize)> {
        self.parent.get(&(BkrTargetKind::Udt, index)).copied()
    }

    /// Clears the parent-scoped map; called on entry to a fresh rule
    /// activation so `BkrMode::Parent` only ever sees matches made since.
    fn reset_parent(&mut self) -> HashMap<(BkrTargetKind, usize), (usize, usize)> {
        std::mem::take(&mut self.parent)
    }

    fn restore_parent(&mut self, saved: HashMap<(BkrTargetKind, usize), (usize, usize)>) {
        self.parent = saved;
    }
}

/// Per-parse mutable state threaded through every opcode evaluation.
///
/// Back-reference bookkeeping is only allocated when the grammar actually
/// contains a `BKR` operator (`Rule::is_back_referenced`/`Udt::is_back_referenced`
/// checked at parser setup) — grammars without back-references pay nothing
/// for this feature.
#[derive(Debug, Clone, Default)]
pub struct SysData {
    direction_stack: Vec<Direction>,
    look_around_stack: Vec<(LookAroundKind, usize)>,
    pub bkr_frames: Option<BkrFrames>,
}

impl SysData {
    pub fn new(needs_bkr_frames: bool) -> SysData {
        SysData {
            direction_stack: Vec::new(),
            look_around_stack: Vec::new(),
            bkr_frames: if needs_bkr_frames {
                Some(BkrFrames::default())
            } else {
                None
            },
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction_stack.last().copied().unwrap_or(Direction::Forward)
    }

    /// Pushes `dir` onto the direction stack; callers hold the returned
    /// guard for exactly the lifetime of the opcode subtree that direction
    /// applies to and it pops automatically on drop, including on early
    /// return via `?`.
    pub fn push_direction(&mut self, dir: Direction) -> DirectionGuard<'_> {
        self.direction_stack.push(dir);
        DirectionGuard { sys: self }
    }

    /// How many look-around predicates (`AND`/`NOT`/`BKA`/`BKN`) are
    /// currently active, innermost included. Zero outside any of them.
    pub fn look_around_depth(&self) -> usize {
        self.look_around_stack.len()
    }

    /// The innermost active look-around's kind and the phrase offset it's
    /// anchored at, or `None` if no look-around is active.
    pub fn current_look_around(&self) -> Option<(LookAroundKind, usize)> {
        self.look_around_stack.last().copied()
    }

    /// Enters a look-around predicate anchored at `begin`; the guard pops it
    /// back off on drop.
    pub fn push_look_around(&mut self, kind: LookAroundKind, begin: usize) -> LookAroundGuard<'_> {
        self.look_around_stack.push((kind, begin));
        LookAroundGuard { sys: self }
    }

    /// Begins a new parent-rule activation for `BKR` scoping; the returned
    /// guard restores the previous parent-frame snapshot on drop so a
    /// backtracked-out-of rule's matches don't leak into its caller's view
    /// of "last match in this parent".
    pub fn push_parent_frame(&mut self) -> Option<ParentFrameGuard<'_>> {
        let frames = self.bkr_frames.as_mut()?;
        let saved = frames.reset_parent();
        Some(ParentFrameGuard {
            frames,
            saved: Some(saved),
        })
    }
}

pub struct DirectionGuard<'s> {
    sys: &'s mut SysData,
}

impl Drop for DirectionGuard<'_> {
    fn drop(&mut self) {
        self.sys.direction_stack.pop();
    }
}

pub struct LookAroundGuard<'s> {
    sys: &'s mut SysData,
}

impl Drop for LookAroundGuard<'_> {
    fn drop(&mut self) {
        self.sys.look_around_stack.pop();
    }
}

pub struct ParentFrameGuard<'s> {
    frames: &'s mut BkrFrames,
    saved: Option<HashMap<(BkrTargetKind, usize), (usize, usize)>>,
}

impl Drop for ParentFrameGuard<'_> {
    fn drop(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.frames.restore_parent(saved);
        }
    }
}

use std::sync::Arc;

use num_enum::IntoPrimitive;
use serde::{Deserialize, Serialize};

use crate::char_code::CharCode;

/// Case sensitivity of a back-reference match (`BKR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BkrCase {
    Sensitive,
    Insensitive,
}

/// Scoping of a back-reference (`BKR`): the last match anywhere in the parse,
/// or the last match within the currently active parent-rule activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BkrMode {
    Universal,
    Parent,
}

/// A node of a pre-compiled SABNF grammar.
///
/// Child/sibling lists (`ALT`/`CAT` children, `TBS`/`TLS` literal bytes) are
/// `Arc`-shared: a `Grammar` is built once and read only, so cloning an
/// `Opcode` out of a rule's opcode table to dispatch on it (see
/// `engine::Engine::execute`) never copies the underlying data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Opcode {
    /// Ordered alternatives; first non-`NoMatch` child wins.
    Alt { children: Arc<[usize]> },
    /// Ordered concatenation; all children must match (or be empty).
    Cat { children: Arc<[usize]> },
    /// Repetition of the opcode at `self_index + 1`, bounded by `[min, max]`.
    Rep { min: u32, max: Option<u32> },
    /// Invocation of the rule at `index` by index into `Grammar::rules`.
    Rnm { index: usize },
    /// A user-defined terminal, invoked purely through its registered callback.
    Udt { index: usize, empty: bool },
    /// Positive look-ahead over the child at `self_index + 1`.
    And,
    /// Negative look-ahead over the child at `self_index + 1`.
    Not,
    /// Positive look-behind over the child at `self_index + 1`.
    Bka,
    /// Negative look-behind over the child at `self_index + 1`.
    Bkn,
    /// A single-character range match, `min <= c <= max`.
    Trg { min: CharCode, max: CharCode },
    /// An exact, case-sensitive literal.
    Tbs { bytes: Arc<[CharCode]> },
    /// An ASCII case-insensitive literal; `bytes` is already folded to lowercase.
    Tls { bytes: Arc<[CharCode]> },
    /// A back-reference to a previously matched rule or UDT.
    Bkr {
        index: usize,
        case: BkrCase,
        mode: BkrMode,
        /// Whether `index` names a rule or a UDT — needed because rules and
        /// UDTs are addressed by separate index spaces in `Grammar`.
        target: BkrTarget,
    },
    /// Zero-width assertion: matches at the beginning of the active window.
    Abg,
    /// Zero-width assertion: matches at the end of the active window.
    Aen,
}

/// Which index space a `BKR` operator's `index` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BkrTarget {
    Rule,
    Udt,
}

/// Compact discriminant of an [`Opcode`], used as a small `Copy` key for
/// statistics and trace records instead of cloning the opcode itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive)]
#[repr(u8)]
pub enum OpKind {
    Alt,
    Cat,
    Rep,
    Rnm,
    Udt,
    And,
    Not,
    Bka,
    Bkn,
    Trg,
    Tbs,
    Tls,
    Bkr,
    Abg,
    Aen,
}

impl OpKind {
    pub const COUNT: usize = 15;

    pub fn of(op: &Opcode) -> OpKind {
        match op {
            Opcode::Alt { .. } => OpKind::Alt,
            Opcode::Cat { .. } => OpKind::Cat,
            Opcode::Rep { .. } => OpKind::Rep,
            Opcode::Rnm { .. } => OpKind::Rnm,
            Opcode::Udt { .. } => OpKind::Udt,
            Opcode::And => OpKind::And,
            Opcode::Not => OpKind::Not,
            Opcode::Bka => OpKind::Bka,
            Opcode::Bkn => OpKind::Bkn,
            Opcode::Trg { .. } => OpKind::Trg,
            Opcode::Tbs { .. } => OpKind::Tbs,
            Opcode::Tls { .. } => OpKind::Tls,
            Opcode::Bkr { .. } => OpKind::Bkr,
            Opcode::Abg => OpKind::Abg,
            Opcode::Aen => OpKind::Aen,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OpKind::Alt => "ALT",
            OpKind::Cat => "CAT",
            OpKind::Rep => "REP",
            OpKind::Rnm => "RNM",
            OpKind::Udt => "UDT",
            OpKind::And => "AND",
            OpKind::Not => "NOT",
            OpKind::Bka => "BKA",
            OpKind::Bkn => "BKN",
            OpKind::Trg => "TRG",
            OpKind::Tbs => "TBS",
            OpKind::Tls => "TLS",
            OpKind::Bkr => "BKR",
            OpKind::Abg => "ABG",
            OpKind::Aen => "AEN",
        }
    }

    /// Parses an operator name as it would appear in a trace filter set
    /// (see `trace::Filter`). Case-insensitive.
    pub fn from_name(name: &str) -> Option<OpKind> {
        let upper = name.to_ascii_uppercase();
        Some(match upper.as_str() {
            "ALT" => OpKind::Alt,
            "CAT" => OpKind::Cat,
            "REP" => OpKind::Rep,
            "RNM" => OpKind::Rnm,
            "UDT" => OpKind::Udt,
            "AND" => OpKind::And,
            "NOT" => OpKind::Not,
            "BKA" => OpKind::Bka,
            "BKN" => OpKind::Bkn,
            "TRG" => OpKind::Trg,
            "TBS" => OpKind::Tbs,
            "TLS" => OpKind::Tls,
            "BKR" => OpKind::Bkr,
            "ABG" => OpKind::Abg,
            "AEN" => OpKind::Aen,
            _ => return None,
        })
    }
}

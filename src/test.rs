//! Shared test tooling: small grammar builders so individual test modules
//! don't each hand-roll an `Opcode` tree, plus a tracing subscriber hook for
//! tests that want to see `tracing::debug!` output (`RUST_LOG=debug cargo
//! test -- --nocapture`).

use std::sync::Arc;

use crate::char_code::codes_from_str;
use crate::grammar::{BkrCase, BkrMode, BkrTarget, Grammar, OpKind, Opcode, Rule, Udt};
use crate::parser::{ParseOutcome, Parser, ParserConfig};

pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub(crate) fn rule(index: usize, name: &str, opcodes: Vec<Opcode>) -> Rule {
    Rule {
        name: name.to_owned(),
        lowercase: name.to_ascii_lowercase(),
        opcodes,
        is_back_referenced: false,
        index,
    }
}

pub(crate) fn back_referenced_rule(index: usize, name: &str, opcodes: Vec<Opcode>) -> Rule {
    let mut r = rule(index, name, opcodes);
    r.is_back_referenced = true;
    r
}

pub(crate) fn udt(index: usize, name: &str, empty: bool) -> Udt {
    Udt {
        name: name.to_owned(),
        lowercase: name.to_ascii_lowercase(),
        empty,
        is_back_referenced: false,
        index,
    }
}

pub(crate) fn build(rules: Vec<Rule>, udts: Vec<Udt>) -> Arc<Grammar> {
    Grammar::new(rules, udts).expect("test grammar should be well-formed")
}

/// A single-rule grammar whose only rule has the given opcodes at index 0.
pub(crate) fn single_rule_grammar(opcodes: Vec<Opcode>) -> Arc<Grammar> {
    build(vec![rule(0, "start", opcodes)], vec![])
}

pub(crate) fn tbs(s: &str) -> Opcode {
    Opcode::Tbs {
        bytes: codes_from_str(s).into(),
    }
}

pub(crate) fn tls(s: &str) -> Opcode {
    Opcode::Tls {
        bytes: codes_from_str(&s.to_ascii_lowercase()).into(),
    }
}

pub(crate) fn cat(children: &[usize]) -> Opcode {
    Opcode::Cat {
        children: children.to_vec().into(),
    }
}

pub(crate) fn alt(children: &[usize]) -> Opcode {
    Opcode::Alt {
        children: children.to_vec().into(),
    }
}

pub(crate) fn parse_str(opcodes: Vec<Opcode>, phrase: &str) -> ParseOutcome<()> {
    let grammar = single_rule_grammar(opcodes);
    let parser: Parser<()> = Parser::new(grammar, ParserConfig::default());
    parser
        .parse("start", codes_from_str(phrase), ())
        .expect("parse should not error")
}

#[allow(unused)]
pub(crate) fn bkr(index: usize, target: BkrTarget) -> Opcode {
    Opcode::Bkr {
        index,
        case: BkrCase::Sensitive,
        mode: BkrMode::Universal,
        target,
    }
}

#[allow(unused)]
pub(crate) const ALL_OPKINDS: [OpKind; OpKind::COUNT] = [
    OpKind::Alt,
    OpKind::Cat,
    OpKind::Rep,
    OpKind::Rnm,
    OpKind::Udt,
    OpKind::And,
    OpKind::Not,
    OpKind::Bka,
    OpKind::Bkn,
    OpKind::Trg,
    OpKind::Tbs,
    OpKind::Tls,
    OpKind::Bkr,
    OpKind::Abg,
    OpKind::Aen,
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_code::CharCode;

    #[test]
    fn tbs_matches_literal() {
        let outcome = parse_str(vec![tbs("abc")], "abc");
        assert!(outcome.matched);
        assert_eq!(outcome.phrase_length, 3);
    }

    #[test]
    fn tls_is_case_insensitive() {
        let outcome = parse_str(vec![tls("abc")], "ABC");
        assert!(outcome.matched);
    }

    #[test]
    fn alt_picks_first_match() {
        let opcodes = vec![alt(&[1, 2]), tbs("a"), tbs("ab")];
        let outcome = parse_str(opcodes, "ab");
        assert!(outcome.matched);
        assert_eq!(outcome.phrase_length, 1);
    }

    #[test]
    fn cat_requires_all_children() {
        let opcodes = vec![cat(&[1, 2]), tbs("ab"), tbs("cd")];
        assert!(parse_str(opcodes.clone(), "abcd").matched);
        assert!(!parse_str(opcodes, "abxx").matched);
    }

    #[test]
    fn trg_matches_range() {
        let outcome = parse_str(
            vec![Opcode::Trg {
                min: CharCode::from('0'),
                max: CharCode::from('9'),
            }],
            "5",
        );
        assert!(outcome.matched);
    }
}

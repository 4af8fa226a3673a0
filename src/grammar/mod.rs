//! The immutable grammar model (component C1): rules, UDTs, and their
//! opcode tables, plus the lookups the facade and evaluator need to resolve
//! rule names to indices and back-reference targets to their storage slot.

mod opcode;

pub use opcode::{BkrCase, BkrMode, BkrTarget, OpKind, Opcode};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ParseError;

/// A named grammar production: a lowercase-keyed name plus its own flat
/// opcode table. Opcode indices inside `opcodes` (children of `ALT`/`CAT`,
/// the implicit `self_index + 1` child of `REP`/`AND`/`NOT`/`BKA`/`BKN`) are
/// local to this vector, not to any other rule's.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub lowercase: String,
    pub opcodes: Vec<Opcode>,
    pub is_back_referenced: bool,
    pub index: usize,
}

/// A user-defined terminal: a rule-shaped node with no opcodes of its own,
/// matched entirely by a mandatory registered callback (see `callback`).
#[derive(Debug, Clone)]
pub struct Udt {
    pub name: String,
    pub lowercase: String,
    pub empty: bool,
    pub is_back_referenced: bool,
    pub index: usize,
}

/// The grammar object produced by an external generator: immutable, and
/// shared read-only across every parse (`Arc<Grammar>`, §5).
#[derive(Debug, Clone)]
pub struct Grammar {
    pub rules: Vec<Rule>,
    pub udts: Vec<Udt>,
    name_to_rule: HashMap<String, usize>,
    name_to_udt: HashMap<String, usize>,
}

impl Grammar {
    /// Builds a grammar from its rules and UDTs, validating the shape
    /// invariants the evaluator relies on (§6/§7 category 1 setup errors):
    /// rule/UDT indices must match their position, opcode indices referenced
    /// by `RNM`/`BKR`/`UDT` must resolve, and `REP`/`AND`/`NOT`/`BKA`/`BKN`
    /// must have a child opcode immediately following them.
    pub fn new(rules: Vec<Rule>, udts: Vec<Udt>) -> Result<Arc<Grammar>, ParseError> {
        let mut name_to_rule = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            if rule.index != i {
                return Err(ParseError::InvalidGrammar(format!(
                    "rule `{}` has index {} but occupies slot {i}",
                    rule.name, rule.index
                )));
            }
            if name_to_rule.insert(rule.lowercase.clone(), i).is_some() {
                return Err(ParseError::InvalidGrammar(format!(
                    "duplicate rule name `{}`",
                    rule.lowercase
                )));
            }
        }
        let mut name_to_udt = HashMap::with_capacity(udts.len());
        for (i, udt) in udts.iter().enumerate() {
            if udt.index != i {
                return Err(ParseError::InvalidGrammar(format!(
                    "udt `{}` has index {} but occupies slot {i}",
                    udt.name, udt.index
                )));
            }
            if name_to_udt.insert(udt.lowercase.clone(), i).is_some() {
                return Err(ParseError::InvalidGrammar(format!(
                    "duplicate udt name `{}`",
                    udt.lowercase
                )));
            }
        }

        let grammar = Grammar {
            rules,
            udts,
            name_to_rule,
            name_to_udt,
        };
        grammar.validate_opcode_shape()?;
        Ok(Arc::new(grammar))
    }

    fn validate_opcode_shape(&self) -> Result<(), ParseError> {
        for rule in &self.rules {
            for (i, op) in rule.opcodes.iter().enumerate() {
                match op {
                    Opcode::Alt { children } | Opcode::Cat { children } => {
                        for &child in children.iter() {
                            if child >= rule.opcodes.len() {
                                return Err(ParseError::InvalidGrammar(format!(
                                    "rule `{}` opcode {i}: child index {child} out of range",
                                    rule.name
                                )));
                            }
                        }
                    }
                    Opcode::Rep { .. }
                    | Opcode::And
                    | Opcode::Not
                    | Opcode::Bka
                    | Opcode::Bkn => {
                        if i + 1 >= rule.opcodes.len() {
                            return Err(ParseError::InvalidGrammar(format!(
                                "rule `{}` opcode {i}: missing required child opcode",
                                rule.name
                            )));
                        }
                    }
                    Opcode::Rnm { index } => {
                        if *index >= self.rules.len() {
                            return Err(ParseError::InvalidGrammar(format!(
                                "rule `{}` opcode {i}: RNM targets unknown rule {index}",
                                rule.name
                            )));
                        }
                    }
                    Opcode::Udt { index, .. } => {
                        if *index >= self.udts.len() {
                            return Err(ParseError::InvalidGrammar(format!(
                                "rule `{}` opcode {i}: UDT targets unknown udt {index}",
                                rule.name
                            )));
                        }
                    }
                    Opcode::Bkr { index, target, .. } => {
                        let len = match target {
                            BkrTarget::Rule => self.rules.len(),
                            BkrTarget::Udt => self.udts.len(),
                        };
                        if *index >= len {
                            return Err(ParseError::InvalidGrammar(format!(
                                "rule `{}` opcode {i}: BKR targets unknown index {index}",
                                rule.name
                            )));
                        }
                    }
                    Opcode::Trg { .. } | Opcode::Tbs { .. } | Opcode::Tls { .. } => {}
                    Opcode::Abg | Opcode::Aen => {}
                }
            }
        }
        Ok(())
    }

    pub fn rule_index_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_rule.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn udt_index_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_udt.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn rule(&self, index: usize) -> &Rule {
        &self.rules[index]
    }

    pub fn udt(&self, index: usize) -> &Udt {
        &self.udts[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc as StdArc;

    fn rule(index: usize, name: &str, opcodes: Vec<Opcode>) -> Rule {
        Rule {
            name: name.to_owned(),
            lowercase: name.to_ascii_lowercase(),
            opcodes,
            is_back_referenced: false,
            index,
        }
    }

    #[test]
    fn rejects_out_of_range_rnm_target() {
        let rules = vec![rule(0, "start", vec![Opcode::Rnm { index: 7 }])];
        let err = Grammar::new(rules, vec![]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidGrammar(_)));
    }

    #[test]
    fn rejects_mismatched_rule_index() {
        let rules = vec![rule(1, "start", vec![])];
        assert!(Grammar::new(rules, vec![]).is_err());
    }

    #[test]
    fn rejects_rep_without_child_opcode() {
        let rules = vec![rule(0, "start", vec![Opcode::Rep { min: 0, max: None }])];
        assert!(Grammar::new(rules, vec![]).is_err());
    }

    #[test]
    fn accepts_well_formed_grammar() {
        let rules = vec![rule(
            0,
            "start",
            vec![Opcode::Cat {
                children: StdArc::from(vec![1usize]),
            }, Opcode::Tbs {
                bytes: StdArc::from(vec![]),
            }],
        )];
        assert!(Grammar::new(rules, vec![]).is_ok());
    }

    #[test]
    fn name_lookup_is_case_insensitive() {
        let grammar = Grammar::new(vec![rule(0, "Start", vec![])], vec![]).unwrap();
        assert_eq!(grammar.rule_index_by_name("START"), Some(0));
        assert_eq!(grammar.rule_index_by_name("start"), Some(0));
    }
}

//! The statistics collector (component C7): tallies of how often each
//! opcode kind, rule, and UDT matched, failed, or matched empty, gathered
//! with zero overhead when disabled.

use std::collections::HashMap;

use crate::callback::MatchState;
use crate::grammar::OpKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub empty: u64,
    pub matched: u64,
    pub nomatch: u64,
}

impl Counts {
    pub fn total(&self) -> u64 {
        self.empty + self.matched + self.nomatch
    }

    fn record(&mut self, state: MatchState) {
        match state {
            MatchState::Empty => self.empty += 1,
            MatchState::Match => self.matched += 1,
            MatchState::NoMatch => self.nomatch += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsCollector {
    enabled: bool,
    by_opkind: HashMap<OpKind, Counts>,
    by_rule: HashMap<String, Counts>,
    by_udt: HashMap<String, Counts>,
}

impl StatsCollector {
    pub fn new(enabled: bool) -> StatsCollector {
        StatsCollector {
            enabled,
            ..Default::default()
        }
    }

    pub fn record_opcode(&mut self, kind: OpKind, state: MatchState) {
        if !self.enabled {
            return;
        }
        self.by_opkind.entry(kind).or_default().record(state);
    }

    pub fn record_rule(&mut self, name: &str, state: MatchState) {
        if !self.enabled {
            return;
        }
        self.by_rule.entry(name.to_owned()).or_default().record(state);
    }

    pub fn record_udt(&mut self, name: &str, state: MatchState) {
        if !self.enabled {
            return;
        }
        self.by_udt.entry(name.to_owned()).or_default().record(state);
    }

    pub fn opcode_counts(&self, kind: OpKind) -> Counts {
        self.by_opkind.get(&kind).copied().unwrap_or_default()
    }

    pub fn rule_counts(&self, name: &str) -> Counts {
        self.by_rule.get(name).copied().unwrap_or_default()
    }

    pub fn udt_counts(&self, name: &str) -> Counts {
        self.by_udt.get(name).copied().unwrap_or_default()
    }

    pub fn rules(&self) -> impl Iterator<Item = (&str, Counts)> {
        self.by_rule.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn udts(&self) -> impl Iterator<Item = (&str, Counts)> {
        self.by_udt.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn opcodes(&self) -> impl Iterator<Item = (OpKind, Counts)> + '_ {
        self.by_opkind.iter().map(|(k, v)| (*k, *v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_collector_tallies_nothing() {
        let mut stats = StatsCollector::new(false);
        stats.record_rule("start", MatchState::Match);
        assert_eq!(stats.rule_counts("start").total(), 0);
    }

    #[test]
    fn counts_split_by_outcome() {
        let mut stats = StatsCollector::new(true);
        stats.record_rule("start", MatchState::Match);
        stats.record_rule("start", MatchState::NoMatch);
        stats.record_rule("start", MatchState::Empty);
        let counts = stats.rule_counts("start");
        assert_eq!(counts.matched, 1);
        assert_eq!(counts.nomatch, 1);
        assert_eq!(counts.empty, 1);
        assert_eq!(counts.total(), 3);
    }
}

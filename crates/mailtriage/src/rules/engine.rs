use chrono::{DateTime, Utc};
use log::warn;

use crate::message::Message;

use super::schema::{Action, Rule, RulePredicate, RuleSet};

impl Rule {
    /// Tests every condition and combines the results.
    ///
    /// A rule without conditions never matches.
    pub fn evaluate(&self, message: &Message, now: DateTime<Utc>) -> bool {
        if self.conditions.is_empty() {
            return false;
        }

        let results: Vec<bool> = self
            .conditions
            .iter()
            .map(|cond| cond.evaluate(message, now))
            .collect();

        match &self.predicate {
            RulePredicate::All => results.iter().all(|&r| r),
            RulePredicate::Any => results.iter().any(|&r| r),
            RulePredicate::Unrecognized(name) => {
                warn!("Unknown rule predicate '{}', rule does not match", name);
                false
            }
        }
    }
}

/// A rule that matched a message, with its position in the rule file.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    pub index: usize,
    pub rule: &'a Rule,
}

impl<'a> MatchedRule<'a> {
    pub fn name(&self) -> String {
        self.rule.name(self.index)
    }

    /// Actions to apply, in rule-file order.
    pub fn actions(&self) -> &'a [Action] {
        &self.rule.actions
    }
}

/// Holds the ordered rule set and evaluates it against messages.
///
/// Stateless across calls: the result depends only on the rules, the message
/// and `now`.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Every rule matching the message, in file order.
    pub fn matches<'a>(&'a self, message: &Message, now: DateTime<Utc>) -> Vec<MatchedRule<'a>> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.evaluate(message, now))
            .map(|(index, rule)| MatchedRule { index, rule })
            .collect()
    }
}

impl From<RuleSet> for RuleEngine {
    fn from(set: RuleSet) -> Self {
        Self::new(set.rules)
    }
}

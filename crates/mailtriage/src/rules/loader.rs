use std::path::Path;

use log::{error, info, warn};

use crate::error::ConfigError;

use super::schema::{Action, ConditionField, DateUnit, Predicate, RulePredicate, RuleSet};

/// Reads and parses a rule file.
pub fn load_rules<P: AsRef<Path>>(path: P) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_rules_from_str(&content)
}

pub fn load_rules_from_str(content: &str) -> Result<RuleSet, ConfigError> {
    let rule_set: RuleSet = serde_json::from_str(content)?;

    for problem in lint(&rule_set) {
        warn!("{}", problem);
    }

    Ok(rule_set)
}

/// Loads a rule file, degrading to an empty rule set on any error.
///
/// A missing or malformed rule file turns the run into a no-op rather than a
/// failure.
pub fn load_rules_or_empty<P: AsRef<Path>>(path: P) -> RuleSet {
    let path = path.as_ref();
    match load_rules(path) {
        Ok(rule_set) => {
            info!(
                "Loaded {} rules from {}",
                rule_set.rules.len(),
                path.display()
            );
            rule_set
        }
        Err(e) => {
            error!("{}", e);
            RuleSet::default()
        }
    }
}

/// Lists names the engine will not recognize. These rules still load and
/// simply never match (or never act).
pub fn lint(rule_set: &RuleSet) -> Vec<String> {
    let mut problems = Vec::new();

    for (index, rule) in rule_set.rules.iter().enumerate() {
        let name = rule.name(index);

        if let RulePredicate::Unrecognized(p) = &rule.predicate {
            problems.push(format!("{}: unknown rule predicate '{}'", name, p));
        }
        if rule.conditions.is_empty() {
            problems.push(format!("{}: no conditions, rule will never match", name));
        }

        for condition in &rule.conditions {
            if let ConditionField::Unrecognized(f) = &condition.field {
                problems.push(format!("{}: unknown field '{}'", name, f));
            }
            if let Predicate::Unrecognized(p) = &condition.predicate {
                problems.push(format!("{}: unknown predicate '{}'", name, p));
            }
            if condition.field == ConditionField::DateReceived {
                if let DateUnit::Unrecognized(u) = &condition.unit {
                    problems.push(format!("{}: unknown date unit '{}'", name, u));
                }
            }
        }

        for action in &rule.actions {
            if let Action::Unrecognized(kind) = action {
                problems.push(format!("{}: unknown action type '{}'", name, kind));
            }
        }
    }

    problems
}

//! Declarative rule language and its evaluator.
//!
//! A rule file is a JSON document `{ "rules": [...] }`. Each rule combines
//! field conditions with `all` or `any` and lists the actions to request from
//! the provider when it matches. Evaluation is pure and fail-closed: anything
//! the engine does not understand evaluates to "no match".

pub mod condition;
pub mod date;
pub mod engine;
pub mod loader;
pub mod schema;

pub use condition::ConditionError;
pub use engine::{MatchedRule, RuleEngine};
pub use loader::{lint, load_rules, load_rules_from_str, load_rules_or_empty};
pub use schema::{
    Action, Condition, ConditionField, DateUnit, Predicate, Rule, RulePredicate, RuleSet,
};

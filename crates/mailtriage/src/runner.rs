//! Batch runner: evaluates every rule against recent messages and applies
//! the actions of each match.

use chrono::{DateTime, Utc};
use tracing::{info, info_span, warn, Instrument};

use crate::actions::ActionDispatcher;
use crate::error::Result;
use crate::message::Message;
use crate::provider::ActionProvider;
use crate::rules::RuleEngine;
use crate::sanitize::{sender_for_log, subject_for_log};
use crate::source::MessageSource;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Messages evaluated.
    pub messages: usize,
    /// (message, rule) pairs that matched.
    pub rules_matched: usize,
    pub actions_applied: usize,
    pub actions_failed: usize,
}

pub struct BatchRunner<'a> {
    engine: &'a RuleEngine,
    source: &'a dyn MessageSource,
    dispatcher: ActionDispatcher<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        engine: &'a RuleEngine,
        source: &'a dyn MessageSource,
        provider: &'a dyn ActionProvider,
    ) -> Self {
        Self {
            engine,
            source,
            dispatcher: ActionDispatcher::new(provider),
        }
    }

    pub async fn run(&self, limit: usize) -> Result<RunSummary> {
        self.run_at(limit, Utc::now()).await
    }

    /// Runs with every date condition evaluated against `now`.
    pub async fn run_at(&self, limit: usize, now: DateTime<Utc>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if self.engine.is_empty() {
            info!("No rules loaded, nothing to do");
            return Ok(summary);
        }

        let messages = self.source.fetch_recent(limit)?;
        info!(
            "Evaluating {} rules against {} messages",
            self.engine.len(),
            messages.len()
        );

        for message in &messages {
            let span = info_span!("message", id = %message.display_id());
            self.process(message, now, &mut summary)
                .instrument(span)
                .await;
        }

        info!(
            messages = summary.messages,
            matched = summary.rules_matched,
            failed = summary.actions_failed,
            "Applied {} actions",
            summary.actions_applied
        );
        Ok(summary)
    }

    async fn process(&self, message: &Message, now: DateTime<Utc>, summary: &mut RunSummary) {
        summary.messages += 1;

        for matched in self.engine.matches(message, now) {
            summary.rules_matched += 1;
            let rule_name = matched.name();
            info!(
                "Rule '{}' matched: {} (from {})",
                rule_name,
                subject_for_log(&message.subject),
                sender_for_log(&message.sender)
            );

            for action in matched.actions() {
                match self.dispatcher.dispatch(action, message).await {
                    Ok(_) => {
                        summary.actions_applied += 1;
                        info!("Applied {} on {}", action, message.display_id());
                    }
                    Err(e) => {
                        summary.actions_failed += 1;
                        warn!(
                            "Action {} from rule '{}' failed on {}: {}",
                            action,
                            rule_name,
                            message.display_id(),
                            e
                        );
                    }
                }
            }
        }
    }
}

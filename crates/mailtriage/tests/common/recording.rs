//! In-memory provider that records every call.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use mailtriage::provider::error::Result;
use mailtriage::{ActionProvider, ProviderError};

/// One provider call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetUnread { id: String, unread: bool },
    GetLabels { id: String },
    SetLabels {
        id: String,
        add: Vec<String>,
        remove: Vec<String>,
    },
}

/// Provider double keeping labels per message id.
#[derive(Default)]
pub struct RecordingProvider {
    labels: Mutex<HashMap<String, Vec<String>>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the current labels of a message.
    pub fn with_labels(self, id: &str, labels: &[&str]) -> Self {
        self.labels.lock().unwrap().insert(
            id.to_string(),
            labels.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Every call for this id fails with a 500.
    pub fn failing_for(mut self, id: &str) -> Self {
        self.failing.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn labels_of(&self, id: &str) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: Call, id: &str) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing.contains(id) {
            return Err(ProviderError::Status {
                status: 500,
                body: "backend error".to_string(),
            });
        }
        Ok(())
    }

    fn apply(&self, id: &str, add: &[String], remove: &[String]) {
        let mut labels = self.labels.lock().unwrap();
        let current = labels.entry(id.to_string()).or_default();
        current.retain(|l| !remove.contains(l));
        for label in add {
            if !current.contains(label) {
                current.push(label.clone());
            }
        }
    }
}

#[async_trait]
impl ActionProvider for RecordingProvider {
    async fn set_unread(&self, id: &str, unread: bool) -> Result<()> {
        self.record(
            Call::SetUnread {
                id: id.to_string(),
                unread,
            },
            id,
        )?;
        let unread_label = vec!["UNREAD".to_string()];
        if unread {
            self.apply(id, &unread_label, &[]);
        } else {
            self.apply(id, &[], &unread_label);
        }
        Ok(())
    }

    async fn get_labels(&self, id: &str) -> Result<Vec<String>> {
        self.record(Call::GetLabels { id: id.to_string() }, id)?;
        Ok(self.labels_of(id))
    }

    async fn set_labels(&self, id: &str, add: &[String], remove: &[String]) -> Result<()> {
        self.record(
            Call::SetLabels {
                id: id.to_string(),
                add: add.to_vec(),
                remove: remove.to_vec(),
            },
            id,
        )?;
        self.apply(id, add, remove);
        Ok(())
    }
}

//! Shared test utilities for mailtriage integration tests.
//!
//! This module provides:
//! - Builders for rules, conditions and messages
//! - `RecordingProvider`, an in-memory `ActionProvider` that records calls
//! - `StoredMessages`, an in-memory `MessageSource`

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod recording;
pub mod source;

pub use builders::*;
pub use recording::{Call, RecordingProvider};
pub use source::StoredMessages;

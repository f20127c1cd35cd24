//! Action dispatch: turns matched rule actions into provider updates.

pub mod dispatcher;
pub mod error;
pub mod labels;

pub use dispatcher::{ActionDispatcher, Applied};
pub use error::ActionError;
pub use labels::LabelChange;

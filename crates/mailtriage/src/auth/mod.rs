//! OAuth session handling for the mailbox account.

pub mod error;
pub mod session;
pub mod token_client;

pub use error::AuthError;
pub use session::{classify, SessionManager, TokenState};
pub use token_client::{TokenClient, TokenResponse};

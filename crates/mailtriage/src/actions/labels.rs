//! Label arithmetic for provider updates.

pub const INBOX: &str = "INBOX";
pub const TRASH: &str = "TRASH";
pub const SPAM: &str = "SPAM";
/// Label Gmail puts on unread messages.
pub const UNREAD: &str = "UNREAD";

/// Labels to add and remove in a single provider update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelChange {
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

impl LabelChange {
    pub fn mark_read() -> Self {
        Self {
            add: Vec::new(),
            remove: vec![UNREAD.to_string()],
        }
    }

    pub fn mark_unread() -> Self {
        Self {
            add: vec![UNREAD.to_string()],
            remove: Vec::new(),
        }
    }

    /// Change that moves a message carrying `current` labels into `mailbox`.
    ///
    /// The mailbox name is upper-cased and used as the label id. Moving to
    /// TRASH drops INBOX and SPAM, moving to INBOX drops TRASH and SPAM; only
    /// labels actually present are removed.
    pub fn move_to(mailbox: &str, current: &[String]) -> Self {
        let target = mailbox.trim().to_uppercase();

        let exclusive: &[&str] = match target.as_str() {
            TRASH => &[INBOX, SPAM],
            INBOX => &[TRASH, SPAM],
            _ => &[],
        };

        let remove = exclusive
            .iter()
            .filter(|label| current.iter().any(|c| c == *label))
            .map(|label| label.to_string())
            .collect();

        Self {
            add: vec![target],
            remove,
        }
    }
}

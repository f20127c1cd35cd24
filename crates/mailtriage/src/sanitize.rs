//! Helpers for shaping message and response data before it enters log lines.
//!
//! Logs are meant to be shareable for debugging, so long free-text values
//! (subjects, senders, provider error bodies) are cut to a bounded length.

/// Maximum subject length shown when a rule matches.
pub const SUBJECT_DISPLAY_LEN: usize = 60;

/// Maximum sender length shown when a rule matches.
pub const SENDER_DISPLAY_LEN: usize = 40;

/// Maximum length of an HTTP error body kept in errors and logs.
pub const ERROR_BODY_LEN: usize = 200;

/// Returns at most `max_chars` characters of `text`, never splitting a
/// multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Truncates an HTTP error body and marks the cut.
///
/// Token endpoints echo request parameters in some error bodies; bounding the
/// length keeps them out of logs.
pub fn error_body(body: &str) -> String {
    let cut = truncate_chars(body, ERROR_BODY_LEN);
    if cut.len() < body.len() {
        format!("{}... (truncated)", cut)
    } else {
        body.to_string()
    }
}

/// Display form of a subject for log lines.
pub fn subject_for_log(subject: &str) -> &str {
    if subject.is_empty() {
        "No Subject"
    } else {
        truncate_chars(subject, SUBJECT_DISPLAY_LEN)
    }
}

/// Display form of a sender for log lines.
pub fn sender_for_log(sender: &str) -> &str {
    if sender.is_empty() {
        "Unknown"
    } else {
        truncate_chars(sender, SENDER_DISPLAY_LEN)
    }
}

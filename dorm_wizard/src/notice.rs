//! Transient, non-fatal messages for the host to show

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A country, province or district list failed to load
    ReferenceData,
    /// The submission collaborator rejected or failed the registration
    Submission,
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoticeKind::ReferenceData => write!(f, "reference data"),
            NoticeKind::Submission => write!(f, "submission"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raised_at: Utc::now(),
        }
    }

    pub fn reference_data(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::ReferenceData, message)
    }

    pub fn submission(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Submission, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_display() {
        let notice = Notice::submission("Registration service unavailable");
        assert_eq!(notice.kind, NoticeKind::Submission);
        assert_eq!(
            notice.to_string(),
            "[submission] Registration service unavailable"
        );
    }
}

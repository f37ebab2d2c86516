//! # Notices
//!
//! Transient user-facing feedback emitted by the facades.
//!
//! A notice is not an error: a sold-out add or a capped increment is a
//! successful call that changed nothing and tells the user why. The UI
//! renders notices as toasts; the strings come from the fixed tables in
//! `techmart_core::locale`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Whether the toast renders as confirmation or complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
}

/// One transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// A success toast.
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    /// Whether this notice reports success.
    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_kinds() {
        assert!(Notice::success("ok").is_success());
        assert!(!Notice::error("no").is_success());
    }
}

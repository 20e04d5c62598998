//! Transient user-facing notifications.

use chrono::{DateTime, Duration, Utc};

/// How long a notice stays visible unless configured otherwise.
pub const DEFAULT_NOTICE_SECONDS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
    pub posted_at: DateTime<Utc>,
}

/// Holds the single visible notice plus a queue of notices not yet shown to the user.
///
/// Posting replaces the visible notice; it disappears once its display duration elapses.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    duration: Duration,
    visible: Option<Notice>,
    pending: Vec<Notice>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_NOTICE_SECONDS))
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            visible: None,
            pending: Vec::new(),
        }
    }

    pub fn post(&mut self, level: NoticeLevel, message: impl Into<String>, now: DateTime<Utc>) {
        let notice = Notice {
            message: message.into(),
            level,
            posted_at: now,
        };
        tracing::debug!(?level, message = %notice.message, "notice posted");
        self.pending.push(notice.clone());
        self.visible = Some(notice);
    }

    pub fn success(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.post(NoticeLevel::Success, message, now);
    }

    pub fn error(&mut self, message: impl Into<String>, now: DateTime<Utc>) {
        self.post(NoticeLevel::Error, message, now);
    }

    /// The notice still on screen at `now`, if any.
    pub fn visible(&self, now: DateTime<Utc>) -> Option<&Notice> {
        self.visible
            .as_ref()
            .filter(|notice| now - notice.posted_at < self.duration)
    }

    /// Drains notices that have not been delivered to the user yet.
    pub fn take_pending(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

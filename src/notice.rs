//! Transient user-facing notices emitted by session operations.
//!
//! DESIGN
//! ======
//! Notices are a side channel, never a return value. The session store only
//! knows the [`Notifier`] trait; a UI plugs in whatever toast mechanism it
//! has. [`LogNotifier`] routes notices into `tracing`, [`ChannelNotifier`]
//! hands them to an async consumer.

use std::fmt;

use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("ok"),
            Self::Failure => f.write_str("error"),
        }
    }
}

/// A short human-readable status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Failure, message: message.into() }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// "Show transient notice" sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the `tracing` log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(message = %notice.message, "notice"),
            NoticeLevel::Failure => tracing::warn!(message = %notice.message, "notice"),
        }
    }
}

/// Forwards notices over an unbounded channel.
///
/// Sending never blocks the session store. Notices are dropped once the
/// receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::debug!("notice receiver dropped");
        }
    }
}

/// Notice texts used by the session store.
///
/// Backend error messages take precedence over the `*_failed` texts when the
/// backend supplies one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeMessages {
    pub login_succeeded: String,
    pub login_failed: String,
    pub register_succeeded: String,
    pub register_failed: String,
    pub logout_succeeded: String,
    pub logout_failed: String,
}

impl Default for NoticeMessages {
    fn default() -> Self {
        Self {
            login_succeeded: "Logged in".into(),
            login_failed: "Login failed".into(),
            register_succeeded: "Registration succeeded".into(),
            register_failed: "Registration failed".into(),
            logout_succeeded: "Logged out".into(),
            logout_failed: "Logout failed".into(),
        }
    }
}

impl NoticeMessages {
    /// Texts matching the forum's Chinese web client.
    #[must_use]
    pub fn zh() -> Self {
        Self {
            login_succeeded: "登录成功".into(),
            login_failed: "登录失败".into(),
            register_succeeded: "注册成功".into(),
            register_failed: "注册失败".into(),
            logout_succeeded: "已退出登录".into(),
            logout_failed: "退出登录失败".into(),
        }
    }
}

#[cfg(test)]
#[path = "notice_test.rs"]
mod tests;

//! The single notification surfaced to the user.

use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Notification contents and visibility
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub is_open: bool,
}

/// Shared handle to the alert record
///
/// Clones refer to the same record. The record starts closed with empty
/// text, is opened by [`AlertCenter::alert`] and closed only by an explicit
/// [`AlertCenter::close`].
#[derive(Debug, Clone, Default)]
pub struct AlertCenter {
    record: Rc<RefCell<Alert>>,
}

impl AlertCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a notification, replacing any previous one
    pub fn alert(&self, title: impl Into<String>, message: impl Into<String>) {
        let title = title.into();
        let message = message.into();
        info!(%title, %message, "alert raised");
        *self.record.borrow_mut() = Alert {
            title,
            message,
            is_open: true,
        };
    }

    /// Dismiss the notification; the text is kept
    pub fn close(&self) {
        self.record.borrow_mut().is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.record.borrow().is_open
    }

    /// Background scrolling and input are suppressed while an alert is open
    pub fn scroll_locked(&self) -> bool {
        self.is_open()
    }

    pub fn snapshot(&self) -> Alert {
        self.record.borrow().clone()
    }
}

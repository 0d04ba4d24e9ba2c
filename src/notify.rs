use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::models::{Notice, NoticeLevel};

/// Default number of undelivered notices kept before the oldest are dropped.
pub const DEFAULT_NOTICE_CAPACITY: usize = 32;

/// Notifier
///
/// Fire-and-forget delivery of user-visible messages. Nothing is returned and
/// delivery failures are not reported to the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// NotificationQueue
///
/// Buffers notices until the client drains them (GET /api/notifications). The
/// queue is bounded; when full, the oldest notice is discarded.
pub struct NotificationQueue {
    pending: Mutex<VecDeque<Notice>>,
    capacity: usize,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NOTICE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => {
                tracing::warn!(text = %notice.message, level = ?notice.level, "notice")
            }
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(text = %notice.message, level = ?notice.level, "notice")
            }
        }

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.len() == self.capacity {
            pending.pop_front();
        }
        pending.push_back(notice);
    }
}

pub type NotifierState = Arc<dyn Notifier>;

use crate::util::time;

/// How long a notice stays on screen
pub const NOTICE_TTL_SECS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: f64,
}

/// Transient feedback messages, newest last
#[derive(Debug, Default)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push_at(NoticeKind::Success, message.into(), time::current_time_secs());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{}", message);
        self.push_at(NoticeKind::Error, message, time::current_time_secs());
    }

    fn push_at(&mut self, kind: NoticeKind, message: String, now: f64) {
        self.items.push(Notice {
            kind,
            message,
            expires_at: now + NOTICE_TTL_SECS,
        });
    }

    /// Drop expired notices and return the live ones
    pub fn visible(&mut self) -> &[Notice] {
        self.prune(time::current_time_secs());
        &self.items
    }

    fn prune(&mut self, now: f64) {
        self.items.retain(|n| n.expires_at > now);
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.items.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_expire() {
        let mut notices = Notices::new();
        notices.push_at(NoticeKind::Success, "Visual saved.".to_owned(), 100.0);
        notices.push_at(NoticeKind::Error, "Network down".to_owned(), 102.0);

        notices.prune(103.0);
        assert_eq!(notices.items.len(), 2);

        notices.prune(104.5);
        assert_eq!(notices.items.len(), 1);
        assert_eq!(notices.latest().map(|n| n.kind), Some(NoticeKind::Error));

        notices.prune(106.0);
        assert!(notices.latest().is_none());
    }
}

//! Live output mailbox
//!
//! Each slot holds only the latest snapshot. Publishing replaces it; readers
//! that fall behind skip straight to the newest value.

use tokio::sync::watch;

use crate::segment::SegmentUpdate;

/// Answer and status slots observed while a completion streams
#[derive(Debug)]
pub struct LiveOutput {
    answer: watch::Sender<String>,
    status: watch::Sender<String>,
}

impl Default for LiveOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveOutput {
    /// Empty mailbox
    pub fn new() -> Self {
        Self {
            answer: watch::Sender::new(String::new()),
            status: watch::Sender::new(String::new()),
        }
    }

    /// Overwrite the slot the update targets
    pub fn publish(&self, update: SegmentUpdate) {
        match update {
            SegmentUpdate::Answer(text) => {
                self.answer.send_replace(text);
            }
            SegmentUpdate::Status(text) => {
                self.status.send_replace(text);
            }
        }
    }

    /// Clear both slots
    pub fn reset(&self) {
        self.answer.send_replace(String::new());
        self.status.send_replace(String::new());
    }

    /// Receiver notified on every answer overwrite
    pub fn subscribe_answer(&self) -> watch::Receiver<String> {
        self.answer.subscribe()
    }

    /// Receiver notified on every status overwrite
    pub fn subscribe_status(&self) -> watch::Receiver<String> {
        self.status.subscribe()
    }

    /// Current answer snapshot
    pub fn answer(&self) -> String {
        self.answer.borrow().clone()
    }

    /// Current status snapshot
    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let live = LiveOutput::new();
        live.publish(SegmentUpdate::Answer("fe".to_owned()));
        live.publish(SegmentUpdate::Answer("feat".to_owned()));
        live.publish(SegmentUpdate::Status("thinking".to_owned()));

        assert_eq!(live.answer(), "feat");
        assert_eq!(live.status(), "thinking");
    }

    #[test]
    fn slow_reader_sees_only_latest() {
        let live = LiveOutput::new();
        let mut rx = live.subscribe_answer();

        live.publish(SegmentUpdate::Answer("a".to_owned()));
        live.publish(SegmentUpdate::Answer("ab".to_owned()));

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "ab");
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn reset_clears_both_slots() {
        let live = LiveOutput::new();
        live.publish(SegmentUpdate::Answer("x".to_owned()));
        live.publish(SegmentUpdate::Status("y".to_owned()));
        live.reset();

        assert!(live.answer().is_empty());
        assert!(live.status().is_empty());
    }
}

//! Thinking/answer segment classification
//!
//! Reasoning models wrap their chain of thought in `<think>...</think>`
//! inline with the answer. The opening tag is only recognised at the very
//! start of the answer text; once the closing tag has been seen everything
//! that follows is answer, for the rest of the invocation.

use std::sync::OnceLock;

use regex::Regex;

use crate::types::{Channel, Record};

const OPEN_MARKER: &str = "<think>";
const CLOSE_MARKER: &str = "</think>";

/// Length beyond which the status indicator starts over
const INDICATOR_WIDTH: usize = 30;

/// Snapshot produced by one record, for the live-output surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentUpdate {
    /// Full answer text so far
    Answer(String),
    /// Short reasoning indicator
    Status(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Answering,
    Thinking,
}

/// Per-invocation accumulator driven by decoded records
#[derive(Debug)]
pub struct StreamState {
    mode: Mode,
    answer: String,
    thinking: String,
    // Byte offset in `thinking` already searched for the close marker
    scanned: usize,
    indicator: String,
    closed: bool,
    vendor_error: Option<String>,
}

impl Default for StreamState {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamState {
    /// Empty state in answering mode
    pub const fn new() -> Self {
        Self {
            mode: Mode::Answering,
            answer: String::new(),
            thinking: String::new(),
            scanned: 0,
            indicator: String::new(),
            closed: false,
            vendor_error: None,
        }
    }

    /// Apply one record in arrival order
    ///
    /// Entering a thinking segment yields an empty answer snapshot ahead of
    /// the status, retracting any partial marker already shown as answer.
    pub fn apply(&mut self, record: Record) -> Vec<SegmentUpdate> {
        match record {
            Record::Delta {
                channel: Channel::Content,
                text,
            } => self.apply_content(&text),
            Record::Delta {
                channel: Channel::Reasoning,
                text,
            } => vec![self.apply_reasoning(&text)],
            Record::VendorError(message) => {
                self.vendor_error = Some(message);
                Vec::new()
            }
        }
    }

    /// Answer accumulated so far
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Thinking transcript, frozen once the segment closed
    pub fn thinking(&self) -> &str {
        &self.thinking
    }

    /// Whether the stream is currently inside a thinking segment
    pub fn is_thinking(&self) -> bool {
        self.mode == Mode::Thinking
    }

    /// Consume the state, returning the raw answer and any vendor error
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.answer, self.vendor_error)
    }

    fn apply_content(&mut self, text: &str) -> Vec<SegmentUpdate> {
        let mut updates = Vec::new();
        match self.mode {
            Mode::Thinking => {
                let text = leading_newlines_to_space(text);
                self.thinking.push_str(&text);
                self.indicator.push_str(&text);
            }
            Mode::Answering => {
                if self.answer.is_empty() {
                    self.answer.push_str(text.trim_start_matches('\n'));
                } else {
                    self.answer.push_str(&strip_delta_fences(text));
                }

                if !self.closed
                    && let Some(rest) = self.answer.strip_prefix(OPEN_MARKER)
                {
                    self.thinking = rest.to_owned();
                    self.indicator.clone_from(&self.thinking);
                    self.scanned = 0;
                    self.answer.clear();
                    self.mode = Mode::Thinking;
                    updates.push(SegmentUpdate::Answer(String::new()));
                }
            }
        }

        if self.mode == Mode::Thinking && self.close_if_marked() {
            updates.push(SegmentUpdate::Answer(self.answer.clone()));
            return updates;
        }

        match self.mode {
            Mode::Answering => updates.push(SegmentUpdate::Answer(self.answer.clone())),
            Mode::Thinking => updates.push(self.show_indicator()),
        }
        updates
    }

    fn apply_reasoning(&mut self, text: &str) -> SegmentUpdate {
        if self.indicator.chars().count() > INDICATOR_WIDTH {
            self.indicator.clear();
        }
        let text = text.replace('\n', " ");
        if !self.closed {
            self.thinking.push_str(&text);
        }
        self.indicator.push_str(&text);
        SegmentUpdate::Status(self.indicator.clone())
    }

    /// Leave thinking mode if the transcript now holds the close marker
    fn close_if_marked(&mut self) -> bool {
        let mut from = self.scanned.saturating_sub(CLOSE_MARKER.len() - 1);
        while !self.thinking.is_char_boundary(from) {
            from -= 1;
        }

        let Some(found) = self.thinking[from..].find(CLOSE_MARKER) else {
            self.scanned = self.thinking.len();
            return false;
        };

        let at = from + found;
        let trailing = &self.thinking[at + CLOSE_MARKER.len()..];
        self.answer = trailing.trim_start_matches('\n').to_owned();
        self.thinking.truncate(at);
        self.indicator.clear();
        self.mode = Mode::Answering;
        self.closed = true;
        true
    }

    fn show_indicator(&mut self) -> SegmentUpdate {
        let shown = SegmentUpdate::Status(self.indicator.clone());
        if self.indicator.chars().count() > INDICATOR_WIDTH {
            self.indicator.clear();
        }
        shown
    }
}

fn leading_newlines_to_space(text: &str) -> String {
    let rest = text.trim_start_matches('\n');
    if rest.len() == text.len() {
        text.to_owned()
    } else {
        format!(" {rest}")
    }
}

/// Drop a fenced-block opener at the start of a delta and every fence marker
fn strip_delta_fences(text: &str) -> String {
    static OPENER: OnceLock<Regex> = OnceLock::new();
    let opener = OPENER.get_or_init(|| Regex::new(r"^```[a-z0-9]+\n").expect("must be valid regex"));
    opener.replace(text, "").replace("```", "")
}

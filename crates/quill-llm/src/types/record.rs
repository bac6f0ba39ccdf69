/// Logical channel a text delta belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Inline content; may still contain thinking markup
    Content,
    /// Side-channel reasoning that never reaches the answer
    Reasoning,
}

/// Unit of information extracted from one parsed stream record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Text delta routed to the segment classifier
    Delta {
        /// Target channel
        channel: Channel,
        /// Text fragment, never empty
        text: String,
    },
    /// Error reported by the vendor inside the stream
    VendorError(String),
}

impl Record {
    /// Content delta, or `None` for empty text
    pub fn content(text: impl Into<String>) -> Option<Self> {
        Self::delta(Channel::Content, text.into())
    }

    /// Reasoning delta, or `None` for empty text
    pub fn reasoning(text: impl Into<String>) -> Option<Self> {
        Self::delta(Channel::Reasoning, text.into())
    }

    fn delta(channel: Channel, text: String) -> Option<Self> {
        (!text.is_empty()).then_some(Self::Delta { channel, text })
    }
}

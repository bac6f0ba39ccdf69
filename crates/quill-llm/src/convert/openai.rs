//! Conversion between internal types and `OpenAI` wire format

use crate::protocol::openai::{OpenAiMessage, OpenAiRequest, OpenAiStreamChunk};
use crate::types::{CanonicalRequest, Record};

impl From<&CanonicalRequest> for OpenAiRequest {
    fn from(req: &CanonicalRequest) -> Self {
        Self {
            model: req.model.clone(),
            messages: vec![
                OpenAiMessage {
                    role: "system",
                    content: req.system_text.clone(),
                },
                OpenAiMessage {
                    role: "user",
                    content: req.user_text.clone(),
                },
            ],
            temperature: req.sampling.temperature,
            top_p: req.sampling.top_p,
            max_tokens: req.sampling.max_tokens,
            stream: req.streaming,
            extra: serde_json::Map::new(),
        }
    }
}

impl OpenAiStreamChunk {
    /// Extract records from the first choice
    ///
    /// A streaming chunk yields up to two deltas (content and reasoning). A
    /// complete response, sent by vendors that ignore `stream`, yields its
    /// whole message as one content delta.
    pub fn into_records(self) -> Vec<Record> {
        let mut records = Vec::new();

        if let Some(error) = self.error {
            records.push(Record::VendorError(error.message()));
        }

        let Some(choice) = self.choices.into_iter().next() else {
            return records;
        };

        if let Some(delta) = choice.delta {
            records.extend(delta.content.and_then(Record::content));
            records.extend(delta.reasoning_content.and_then(Record::reasoning));
        }

        let whole = choice
            .message
            .and_then(|message| message.content)
            .map(crate::protocol::openai::OpenAiMessageContent::into_text)
            .filter(|text| !text.is_empty())
            .or(choice.text);
        records.extend(whole.and_then(Record::content));

        records
    }
}

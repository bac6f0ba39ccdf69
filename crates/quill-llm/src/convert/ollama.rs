//! Conversion between internal types and Ollama wire format

use crate::protocol::ollama::{OllamaChunk, OllamaRequest};
use crate::types::{CanonicalRequest, Record};

impl From<&CanonicalRequest> for OllamaRequest {
    fn from(req: &CanonicalRequest) -> Self {
        Self {
            model: req.model.clone(),
            system: req.system_text.clone(),
            prompt: req.user_text.clone(),
            temperature: req.sampling.temperature,
            top_p: req.sampling.top_p,
            max_tokens: req.sampling.max_tokens,
            stream: req.streaming,
        }
    }
}

impl OllamaChunk {
    /// Extract records from one generate line
    pub fn into_records(self) -> Vec<Record> {
        let mut records = Vec::new();
        if let Some(error) = self.error {
            records.push(Record::VendorError(error.message()));
        }
        records.extend(self.thinking.and_then(Record::reasoning));
        records.extend(self.response.and_then(Record::content));
        records
    }
}

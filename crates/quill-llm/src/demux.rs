//! Stream demultiplexing
//!
//! Chunk boundaries from the transport are arbitrary. Bytes are carried over
//! between chunks until a full line is available, so a record split across
//! chunks (or a UTF-8 sequence split mid-character) decodes exactly as if it
//! had arrived whole.

use serde::de::DeserializeOwned;

use crate::protocol::ProtocolFamily;
use crate::protocol::anthropic::AnthropicStreamEvent;
use crate::protocol::ollama::OllamaChunk;
use crate::protocol::openai::OpenAiStreamChunk;
use crate::types::Record;

/// What remains once the transport signals end of stream
#[derive(Debug)]
pub enum Flush {
    /// Records decoded from the final unterminated line
    Records(Vec<Record>),
    /// Whole response body of a non-chunked family
    Document(Vec<u8>),
}

/// Splits raw chunks into decoded records for one protocol family
#[derive(Debug)]
pub struct Demultiplexer {
    family: ProtocolFamily,
    pending: Vec<u8>,
    // Full body, kept until a line yields a record. Lets a multi-line error
    // document from a chunked endpoint still be read at end of stream.
    unframed: Option<Vec<u8>>,
}

impl Demultiplexer {
    /// Demultiplexer for `family`
    pub const fn new(family: ProtocolFamily) -> Self {
        Self {
            family,
            pending: Vec::new(),
            unframed: Some(Vec::new()),
        }
    }

    /// Feed one chunk, returning records from every line it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Record> {
        self.pending.extend_from_slice(chunk);
        if !self.family.is_chunked() {
            return Vec::new();
        }

        if let Some(body) = &mut self.unframed {
            body.extend_from_slice(chunk);
        }

        let mut records = Vec::new();
        while let Some(end) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=end).collect();
            self.decode_line(&line, &mut records);
        }
        records
    }

    /// Signal end of stream
    pub fn finish(mut self) -> Flush {
        if !self.family.is_chunked() {
            return Flush::Document(self.pending);
        }

        let mut records = Vec::new();
        let line = std::mem::take(&mut self.pending);
        self.decode_line(&line, &mut records);

        if let Some(body) = self.unframed.take()
            && !body.trim_ascii().is_empty()
        {
            tracing::debug!(protocol = %self.family, "no framed records, decoding body as one document");
            self.decode(body.trim_ascii(), &mut records);
        }

        Flush::Records(records)
    }

    fn decode_line(&mut self, line: &[u8], out: &mut Vec<Record>) {
        // SSE framing (`data:`, `event:`), keep-alives and `[DONE]` carry no `{`
        let Some(start) = line.iter().position(|&b| b == b'{') else {
            return;
        };
        // An inner line of a pretty-printed document may parse as an empty record
        if self.decode(line[start..].trim_ascii_end(), out) > 0 {
            self.unframed = None;
        }
    }

    /// Decode one JSON value into `out`, returning how many records it held
    fn decode(&self, json: &[u8], out: &mut Vec<Record>) -> usize {
        let records = match self.family {
            ProtocolFamily::OpenAiChat => parse::<OpenAiStreamChunk>(self.family, json).map(OpenAiStreamChunk::into_records),
            ProtocolFamily::OllamaGenerate => parse::<OllamaChunk>(self.family, json).map(OllamaChunk::into_records),
            ProtocolFamily::AnthropicMessages => {
                parse::<AnthropicStreamEvent>(self.family, json).map(AnthropicStreamEvent::into_records)
            }
            ProtocolFamily::GeminiGenerate => None,
        };

        let Some(records) = records else {
            return 0;
        };

        for record in &records {
            if let Record::VendorError(message) = record {
                tracing::warn!(protocol = %self.family, error = %message, "vendor reported an error in stream");
            }
        }
        let decoded = records.len();
        out.extend(records);
        decoded
    }
}

fn parse<T: DeserializeOwned>(family: ProtocolFamily, json: &[u8]) -> Option<T> {
    match serde_json::from_slice(json) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::debug!(protocol = %family, %error, "skipping malformed record");
            None
        }
    }
}

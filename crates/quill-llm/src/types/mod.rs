//! Internal types shared across protocol conversions

mod record;
mod request;

pub use record::{Channel, Record};
pub use request::{CanonicalRequest, SamplingParams};

//! Ingest pipeline domain types: request, validation, and outcome.

mod outcome;
mod request;

pub use outcome::IngestOutcome;
pub use request::{
    validate_request, IngestMessageInput, IngestRequest, IngestValidationError, MAX_BATCH_SIZE,
    MAX_CONTENT_CHARS,
};

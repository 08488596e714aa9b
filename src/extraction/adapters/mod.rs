//! Extractor adapters.

mod mock;
mod subprocess;

pub use mock::{MockExtractor, ScriptedResponse};
pub use subprocess::SubprocessExtractor;

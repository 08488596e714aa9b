//! Text embedding: the `Embedder` port plus HTTP and mock adapters.
//!
//! Grounded on `message::ports::repository`'s port shape; the HTTP client
//! idiom (`reqwest::Client` with connect/total timeouts) is learned from
//! `elisplash-paw`'s provider adapters
//! (`src-tauri/src/engine/providers/openai.rs`).

pub mod adapters;
pub mod ports;

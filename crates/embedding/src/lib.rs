//! SemSearch Embedding Model Adapter
//!
//! Ollama API client behind the `TextEmbedder` trait

mod client;
mod embedder;
mod types;

pub use client::OllamaClient;
pub use embedder::TextEmbedder;
pub use types::{EmbedRequest, EmbedResponse};

//! Gemini `generateContent` client.
//!
//! Sends the video reference as a `fileData` part next to the prompt text
//! and implements [`GenerationProvider`](labelbase_core::providers::GenerationProvider).

pub mod client;
pub mod types;

pub use client::{GeminiClient, GeminiConfig, GeminiError};

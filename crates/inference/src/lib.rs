//! HTTP client for the hosted image-generation provider.
//!
//! The provider is opaque to this system: a generation request goes in, a
//! finite ordered sequence of artifact byte buffers comes out. All model
//! execution happens on the provider's infrastructure.

mod client;
pub mod tuning;
mod types;

pub use client::{InferenceClient, InferenceError};
pub use types::GenerationInput;

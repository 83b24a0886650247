//! Data Transfer Objects - For API boundaries
//!
//! DTOs live in the application layer so the HTTP layer can
//! serialize/deserialize without knowing how services shape their results.

pub mod chat;
pub mod quest;

pub use chat::*;
pub use quest::*;

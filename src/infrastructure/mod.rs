//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - OpenRouter: LLM client for the OpenAI-compatible chat API
//! - Bounded LLM: worker pool limiting concurrent model calls
//! - Catalog store: the live, reloadable class catalog
//! - HTTP: REST API routes
//! - Config: Application configuration
//! - State: Shared application state

pub mod bounded_llm;
pub mod catalog_store;
pub mod config;
pub mod http;
pub mod openrouter;
pub mod state;

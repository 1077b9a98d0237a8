//! Catalog, LLM corpus and download service for a library of markdown
//! prompts and bundled skills.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;
pub mod runtime;

pub mod archive;
pub mod config;
pub mod content_store;
pub mod logging;
pub mod scanner;

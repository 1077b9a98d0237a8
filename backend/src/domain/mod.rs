pub mod assembly;
pub mod content;
pub mod error;
pub mod frontmatter;
pub mod markdown;
pub mod negotiation;
pub mod ports;

pub use error::{AppError, ErrorCode};

pub mod http;

pub use http::{router, AppState};

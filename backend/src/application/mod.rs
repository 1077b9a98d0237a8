pub mod catalog_service;
pub mod corpus;
pub mod download_service;

pub use catalog_service::CatalogService;
pub use download_service::{Archive, DownloadService};

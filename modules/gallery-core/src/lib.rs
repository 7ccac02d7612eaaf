pub mod balance;
pub mod cache;
pub mod config;
pub mod error;
pub mod gallery;
pub mod search;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;
pub mod types;

pub use cache::ResultCache;
pub use config::GalleryConfig;
pub use error::{GalleryError, Result};
pub use gallery::Gallery;
pub use search::{CloudinaryBackend, SearchBackend};
pub use types::{GalleryPage, ImageDescriptor, QueryFilter, SortOrder};

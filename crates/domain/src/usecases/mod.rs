//! Application use cases / business logic

pub mod post_service;

pub use post_service::{DynPostService, ErrorKind, PostService, PostServiceError};

//! post-sync domain crate
//!
//! This crate contains the core domain logic following hexagonal architecture:
//! - `model`: Domain entities
//! - `ports`: Trait definitions for the local store and the external API
//! - `usecases`: The post resolution service

pub mod model;
pub mod ports;
pub mod usecases;

pub use model::*;
pub use ports::*;

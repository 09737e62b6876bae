//! # API
//!
//! Route groups for the local JSON API.

pub mod assistant;
pub mod catalog;

pub use assistant::assistant_routes;
pub use catalog::catalog_routes;

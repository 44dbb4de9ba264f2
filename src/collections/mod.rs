//! Per-user favourites and history sets.

pub mod handlers;
mod service;

pub use service::CollectionService;

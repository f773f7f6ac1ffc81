pub mod client;
pub mod dto;
pub mod query;

pub use client::{CatalogApi, RawgClient};
pub use query::{GamesQuery, Ordering};

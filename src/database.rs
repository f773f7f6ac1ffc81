pub mod db;
pub mod repository;
pub mod store;

pub use store::{FavoriteStore, NoopFavoriteStore, SqliteFavoriteStore};

pub mod favorites_repository;
pub mod settings_repository;

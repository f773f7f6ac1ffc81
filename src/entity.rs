//! 数据实体模块
//!
//! 包含所有 SeaORM 实体定义。

pub mod prelude;

pub mod favorite_games;
pub mod settings;

//! 预导入模块
//!
//! 提供常用类型的快捷导入。

pub use super::favorite_games::Entity as FavoriteGames;
pub use super::settings::Entity as Settings;

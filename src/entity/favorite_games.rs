//! 本地收藏实体
//!
//! 以远端游戏 ID 为主键，保存列表页所需的快照字段。

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite_games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub game_id: i32,
    #[sea_orm(column_type = "Text")]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub background_image: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    /// `%Y-%m-%d` 格式的发售日期
    #[sea_orm(column_type = "Text", nullable)]
    pub released: Option<String>,
    pub added_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

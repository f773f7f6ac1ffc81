//! 收藏存储抽象
//!
//! 游戏仓库只依赖 `FavoriteStore`。默认实现基于 SQLite；
//! `NoopFavoriteStore` 用于无法打开数据库的场景：读取返回空结果，写入返回 `StorageUnavailable`。

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use sea_orm::DatabaseConnection;

use crate::database::repository::favorites_repository::{FavoritesRepository, InsertFavoriteData};
use crate::entity::favorite_games;
use crate::error::{CatalogError, CatalogResult};
use crate::model::{FavoriteGame, Game};
use crate::utils::date::{parse_api_date, API_DATE_FORMAT};
use crate::utils::image_url::normalize_optional;

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// 按添加时间倒序列出收藏
    async fn list(&self) -> CatalogResult<Vec<FavoriteGame>>;

    async fn contains(&self, game_id: u32) -> CatalogResult<bool>;

    async fn add(&self, game: &Game) -> CatalogResult<FavoriteGame>;

    /// 返回是否确实删除了记录
    async fn remove(&self, game_id: u32) -> CatalogResult<bool>;
}

fn to_column_id(game_id: u32) -> CatalogResult<i32> {
    i32::try_from(game_id)
        .map_err(|_| CatalogError::InvalidRequest(format!("游戏 ID 超出范围: {}", game_id)))
}

impl From<favorite_games::Model> for FavoriteGame {
    fn from(model: favorite_games::Model) -> Self {
        Self {
            game_id: model.game_id.max(0) as u32,
            slug: model.slug,
            name: model.name,
            image_url: normalize_optional(model.background_image.as_deref()),
            rating: model.rating,
            release_date: parse_api_date(model.released.as_deref()),
            added_at: Utc
                .timestamp_millis_opt(model.added_at)
                .single()
                .unwrap_or_default(),
        }
    }
}

pub struct SqliteFavoriteStore {
    db: DatabaseConnection,
}

impl SqliteFavoriteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FavoriteStore for SqliteFavoriteStore {
    async fn list(&self) -> CatalogResult<Vec<FavoriteGame>> {
        let rows = FavoritesRepository::find_all(&self.db).await?;
        Ok(rows.into_iter().map(FavoriteGame::from).collect())
    }

    async fn contains(&self, game_id: u32) -> CatalogResult<bool> {
        Ok(FavoritesRepository::exists(&self.db, to_column_id(game_id)?).await?)
    }

    async fn add(&self, game: &Game) -> CatalogResult<FavoriteGame> {
        let data = InsertFavoriteData {
            game_id: to_column_id(game.id)?,
            slug: game.slug.clone(),
            name: game.name.clone(),
            background_image: game.image_url.clone(),
            rating: game.rating,
            released: game
                .release_date
                .map(|d| d.format(API_DATE_FORMAT).to_string()),
        };
        let model = FavoritesRepository::upsert(&self.db, data).await?;
        log::info!("已收藏游戏: {} ({})", model.name, model.game_id);
        Ok(model.into())
    }

    async fn remove(&self, game_id: u32) -> CatalogResult<bool> {
        let result = FavoritesRepository::delete(&self.db, to_column_id(game_id)?).await?;
        if result.rows_affected > 0 {
            log::info!("已取消收藏游戏: {}", game_id);
        }
        Ok(result.rows_affected > 0)
    }
}

/// 不持久化任何数据的收藏存储
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopFavoriteStore;

#[async_trait]
impl FavoriteStore for NoopFavoriteStore {
    async fn list(&self) -> CatalogResult<Vec<FavoriteGame>> {
        Ok(Vec::new())
    }

    async fn contains(&self, _game_id: u32) -> CatalogResult<bool> {
        Ok(false)
    }

    async fn add(&self, game: &Game) -> CatalogResult<FavoriteGame> {
        log::warn!("本地存储不可用，无法收藏游戏: {}", game.id);
        Err(CatalogError::StorageUnavailable)
    }

    async fn remove(&self, game_id: u32) -> CatalogResult<bool> {
        log::warn!("本地存储不可用，无法取消收藏: {}", game_id);
        Err(CatalogError::StorageUnavailable)
    }
}

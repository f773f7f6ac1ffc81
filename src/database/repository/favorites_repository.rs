//! 本地收藏仓库

use crate::entity::favorite_games;
use crate::entity::prelude::*;
use sea_orm::*;

/// 插入收藏所需的数据
#[derive(Clone, Debug, PartialEq)]
pub struct InsertFavoriteData {
    pub game_id: i32,
    pub slug: String,
    pub name: String,
    pub background_image: Option<String>,
    pub rating: f64,
    pub released: Option<String>,
}

/// 收藏数据仓库
pub struct FavoritesRepository;

impl FavoritesRepository {
    /// 添加收藏；已存在时更新快照字段
    pub async fn upsert(
        db: &DatabaseConnection,
        data: InsertFavoriteData,
    ) -> Result<favorite_games::Model, DbErr> {
        let now = chrono::Utc::now().timestamp_millis();

        if let Some(existing) = Self::find_by_id(db, data.game_id).await? {
            let mut active: favorite_games::ActiveModel = existing.into();
            active.slug = Set(data.slug);
            active.name = Set(data.name);
            active.background_image = Set(data.background_image);
            active.rating = Set(data.rating);
            active.released = Set(data.released);
            return active.update(db).await;
        }

        let favorite = favorite_games::ActiveModel {
            game_id: Set(data.game_id),
            slug: Set(data.slug),
            name: Set(data.name),
            background_image: Set(data.background_image),
            rating: Set(data.rating),
            released: Set(data.released),
            added_at: Set(now),
        };
        favorite.insert(db).await
    }

    /// 根据游戏 ID 查询收藏
    pub async fn find_by_id(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Option<favorite_games::Model>, DbErr> {
        FavoriteGames::find_by_id(game_id).one(db).await
    }

    /// 检查是否已收藏
    pub async fn exists(db: &DatabaseConnection, game_id: i32) -> Result<bool, DbErr> {
        Ok(FavoriteGames::find()
            .filter(favorite_games::Column::GameId.eq(game_id))
            .count(db)
            .await?
            > 0)
    }

    /// 获取所有收藏（按添加时间倒序）
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<favorite_games::Model>, DbErr> {
        FavoriteGames::find()
            .order_by_desc(favorite_games::Column::AddedAt)
            .order_by_desc(favorite_games::Column::GameId)
            .all(db)
            .await
    }

    /// 删除收藏
    pub async fn delete(db: &DatabaseConnection, game_id: i32) -> Result<DeleteResult, DbErr> {
        FavoriteGames::delete_by_id(game_id).exec(db).await
    }

    /// 获取收藏总数
    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        FavoriteGames::find().count(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::db::connect_in_memory;

    fn data(game_id: i32, name: &str) -> InsertFavoriteData {
        InsertFavoriteData {
            game_id,
            slug: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            background_image: None,
            rating: 4.0,
            released: Some("2015-05-18".to_string()),
        }
    }

    #[tokio::test]
    async fn upsert_find_and_delete() {
        let db = connect_in_memory().await.unwrap();

        FavoritesRepository::upsert(&db, data(3328, "The Witcher 3"))
            .await
            .unwrap();
        assert!(FavoritesRepository::exists(&db, 3328).await.unwrap());
        assert_eq!(FavoritesRepository::count(&db).await.unwrap(), 1);

        let found = FavoritesRepository::find_by_id(&db, 3328)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.slug, "the-witcher-3");

        let deleted = FavoritesRepository::delete(&db, 3328).await.unwrap();
        assert_eq!(deleted.rows_affected, 1);
        assert!(!FavoritesRepository::exists(&db, 3328).await.unwrap());
    }

    #[tokio::test]
    async fn upsert_refreshes_snapshot_but_keeps_added_at() {
        let db = connect_in_memory().await.unwrap();

        let first = FavoritesRepository::upsert(&db, data(1, "Old Name"))
            .await
            .unwrap();
        let second = FavoritesRepository::upsert(&db, data(1, "New Name"))
            .await
            .unwrap();

        assert_eq!(second.name, "New Name");
        assert_eq!(second.added_at, first.added_at);
        assert_eq!(FavoritesRepository::count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_all_lists_newest_first() {
        let db = connect_in_memory().await.unwrap();

        FavoritesRepository::upsert(&db, data(1, "First")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        FavoritesRepository::upsert(&db, data(2, "Second")).await.unwrap();

        let all = FavoritesRepository::find_all(&db).await.unwrap();
        let ids: Vec<i32> = all.iter().map(|f| f.game_id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}

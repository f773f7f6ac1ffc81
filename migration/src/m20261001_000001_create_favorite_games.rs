//! 创建本地收藏表
//!
//! favorite_games 以远端游戏 ID 作为主键，只保留列表页展示所需的字段，
//! 离线时也能直接渲染收藏列表。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FavoriteGames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FavoriteGames::GameId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FavoriteGames::Slug).text().not_null())
                    .col(ColumnDef::new(FavoriteGames::Name).text().not_null())
                    .col(ColumnDef::new(FavoriteGames::BackgroundImage).text().null())
                    .col(
                        ColumnDef::new(FavoriteGames::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(FavoriteGames::Released).text().null())
                    .col(ColumnDef::new(FavoriteGames::AddedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 收藏列表按添加时间倒序展示
        manager
            .create_index(
                Index::create()
                    .name("idx_favorite_games_added_at")
                    .table(FavoriteGames::Table)
                    .col(FavoriteGames::AddedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(FavoriteGames::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum FavoriteGames {
    Table,
    GameId,
    Slug,
    Name,
    BackgroundImage,
    Rating,
    Released,
    AddedAt,
}

//! 游戏目录仓库
//!
//! 组合远端接口与本地收藏存储，对上层只暴露领域模型。

use async_trait::async_trait;
use std::sync::Arc;

use crate::database::FavoriteStore;
use crate::error::CatalogResult;
use crate::model::{Collection, FavoriteGame, Game, GameDetails, Genre, Page, Publisher, Screenshot};
use crate::remote::{CatalogApi, GamesQuery};

#[async_trait]
pub trait GameRepository: Send + Sync {
    async fn games(&self, query: &GamesQuery) -> CatalogResult<Page<Game>>;

    async fn game_details(&self, id: u32) -> CatalogResult<GameDetails>;

    async fn game_screenshots(&self, id: u32, page: u32) -> CatalogResult<Page<Screenshot>>;

    async fn genres(&self, page: u32, page_size: u32) -> CatalogResult<Page<Genre>>;

    async fn publishers(&self, page: u32, page_size: u32) -> CatalogResult<Page<Publisher>>;

    async fn collections(&self, page: u32, page_size: u32) -> CatalogResult<Page<Collection>>;

    async fn collection_games(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<Page<Game>>;

    async fn list_favorites(&self) -> CatalogResult<Vec<FavoriteGame>>;

    async fn is_favorite(&self, game_id: u32) -> CatalogResult<bool>;

    /// 切换收藏状态，返回切换后的状态
    async fn toggle_favorite(&self, game: &Game) -> CatalogResult<bool>;
}

pub struct CatalogRepository {
    api: Arc<dyn CatalogApi>,
    favorites: Arc<dyn FavoriteStore>,
}

impl CatalogRepository {
    pub fn new(api: Arc<dyn CatalogApi>, favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { api, favorites }
    }
}

#[async_trait]
impl GameRepository for CatalogRepository {
    async fn games(&self, query: &GamesQuery) -> CatalogResult<Page<Game>> {
        let response = self.api.games(query).await?;
        Ok(Page::from_response(response, Game::from))
    }

    async fn game_details(&self, id: u32) -> CatalogResult<GameDetails> {
        let dto = self.api.game_details(id).await?;
        Ok(GameDetails::from(dto))
    }

    async fn game_screenshots(&self, id: u32, page: u32) -> CatalogResult<Page<Screenshot>> {
        let response = self.api.game_screenshots(id, page).await?;
        let page = Page::from_response(response, Screenshot::from_dto);
        Ok(Page {
            items: page.items.into_iter().flatten().collect(),
            total: page.total,
            next_page: page.next_page,
        })
    }

    async fn genres(&self, page: u32, page_size: u32) -> CatalogResult<Page<Genre>> {
        let response = self.api.genres(page, page_size).await?;
        Ok(Page::from_response(response, Genre::from))
    }

    async fn publishers(&self, page: u32, page_size: u32) -> CatalogResult<Page<Publisher>> {
        let response = self.api.publishers(page, page_size).await?;
        Ok(Page::from_response(response, Publisher::from))
    }

    async fn collections(&self, page: u32, page_size: u32) -> CatalogResult<Page<Collection>> {
        let response = self.api.collections(page, page_size).await?;
        Ok(Page::from_response(response, Collection::from))
    }

    async fn collection_games(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<Page<Game>> {
        let response = self.api.collection_games(slug, page, page_size).await?;
        Ok(Page::from_response(response, Game::from))
    }

    async fn list_favorites(&self) -> CatalogResult<Vec<FavoriteGame>> {
        self.favorites.list().await
    }

    async fn is_favorite(&self, game_id: u32) -> CatalogResult<bool> {
        self.favorites.contains(game_id).await
    }

    async fn toggle_favorite(&self, game: &Game) -> CatalogResult<bool> {
        if self.favorites.contains(game.id).await? {
            self.favorites.remove(game.id).await?;
            Ok(false)
        } else {
            self.favorites.add(game).await?;
            Ok(true)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeCatalogApi;
    use super::*;
    use crate::database::{NoopFavoriteStore, SqliteFavoriteStore};
    use crate::database::db::connect_in_memory;
    use crate::error::{CatalogError, ErrorKind};

    fn repo(api: FakeCatalogApi) -> CatalogRepository {
        CatalogRepository::new(Arc::new(api), Arc::new(NoopFavoriteStore))
    }

    #[tokio::test]
    async fn games_are_mapped_and_paged() {
        let repo = repo(FakeCatalogApi::with_games(25));
        let query = GamesQuery {
            page_size: 10,
            ..GamesQuery::default()
        };

        let first = repo.games(&query).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 25);
        assert_eq!(first.next_page, Some(2));
        assert_eq!(first.items[0].release_date, chrono::NaiveDate::from_ymd_opt(2019, 11, 8));

        let last = repo.games(&query.clone().with_page(3)).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert!(!last.has_more());
    }

    #[tokio::test]
    async fn screenshots_without_valid_urls_are_dropped() {
        let repo = repo(FakeCatalogApi::with_games(1));
        let page = repo.game_screenshots(1, 1).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].image_url, "https://media.example.com/1/1.jpg");
    }

    #[tokio::test]
    async fn errors_pass_through_with_their_kind() {
        let api = FakeCatalogApi::with_games(1);
        api.fail_next(CatalogError::Http { status: 503 });
        let repo = repo(api);

        let err = repo.genres(1, 20).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Generic);

        let err = repo.game_details(999).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn toggle_favorite_flips_state() {
        let store = SqliteFavoriteStore::new(connect_in_memory().await.unwrap());
        let repo = CatalogRepository::new(
            Arc::new(FakeCatalogApi::with_games(3)),
            Arc::new(store),
        );

        let game = repo.game_details(2).await.unwrap().game;
        assert!(!repo.is_favorite(2).await.unwrap());
        assert!(repo.toggle_favorite(&game).await.unwrap());
        assert!(repo.is_favorite(2).await.unwrap());
        assert_eq!(repo.list_favorites().await.unwrap()[0].name, "Game 2");
        assert!(!repo.toggle_favorite(&game).await.unwrap());
        assert!(repo.list_favorites().await.unwrap().is_empty());
    }
}

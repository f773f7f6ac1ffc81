//! 用例层
//!
//! 每个界面动作对应一个用例，只做参数整理后委托给仓库。

use std::sync::Arc;

use crate::error::{CatalogError, CatalogResult};
use crate::model::{Collection, FavoriteGame, Game, GameDetails, Genre, Page, Publisher, Screenshot};
use crate::remote::GamesQuery;
use crate::repository::GameRepository;

#[derive(Clone)]
pub struct GetGames {
    repo: Arc<dyn GameRepository>,
}

impl GetGames {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, query: &GamesQuery) -> CatalogResult<Page<Game>> {
        self.repo.games(query).await
    }
}

#[derive(Clone)]
pub struct SearchGames {
    repo: Arc<dyn GameRepository>,
}

impl SearchGames {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    /// 搜索游戏，空白关键字直接拒绝
    pub async fn execute(&self, term: &str, page: u32, page_size: u32) -> CatalogResult<Page<Game>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(CatalogError::InvalidRequest("搜索关键字不能为空".to_string()));
        }
        let query = GamesQuery {
            page,
            page_size,
            search: Some(term.to_string()),
            ..GamesQuery::default()
        };
        self.repo.games(&query).await
    }
}

#[derive(Clone)]
pub struct GetGameDetails {
    repo: Arc<dyn GameRepository>,
}

impl GetGameDetails {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: u32) -> CatalogResult<GameDetails> {
        self.repo.game_details(id).await
    }
}

#[derive(Clone)]
pub struct GetGameScreenshots {
    repo: Arc<dyn GameRepository>,
}

impl GetGameScreenshots {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, id: u32, page: u32) -> CatalogResult<Page<Screenshot>> {
        self.repo.game_screenshots(id, page).await
    }
}

#[derive(Clone)]
pub struct GetGenres {
    repo: Arc<dyn GameRepository>,
}

impl GetGenres {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, page: u32, page_size: u32) -> CatalogResult<Page<Genre>> {
        self.repo.genres(page, page_size).await
    }
}

#[derive(Clone)]
pub struct GetPublishers {
    repo: Arc<dyn GameRepository>,
}

impl GetPublishers {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, page: u32, page_size: u32) -> CatalogResult<Page<Publisher>> {
        self.repo.publishers(page, page_size).await
    }
}

#[derive(Clone)]
pub struct GetCollections {
    repo: Arc<dyn GameRepository>,
}

impl GetCollections {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, page: u32, page_size: u32) -> CatalogResult<Page<Collection>> {
        self.repo.collections(page, page_size).await
    }
}

#[derive(Clone)]
pub struct GetCollectionGames {
    repo: Arc<dyn GameRepository>,
}

impl GetCollectionGames {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, slug: &str, page: u32, page_size: u32) -> CatalogResult<Page<Game>> {
        self.repo.collection_games(slug, page, page_size).await
    }
}

#[derive(Clone)]
pub struct GetFavorites {
    repo: Arc<dyn GameRepository>,
}

impl GetFavorites {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self) -> CatalogResult<Vec<FavoriteGame>> {
        self.repo.list_favorites().await
    }

    pub async fn contains(&self, game_id: u32) -> CatalogResult<bool> {
        self.repo.is_favorite(game_id).await
    }
}

#[derive(Clone)]
pub struct ToggleFavorite {
    repo: Arc<dyn GameRepository>,
}

impl ToggleFavorite {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    /// 返回切换后的收藏状态
    pub async fn execute(&self, game: &Game) -> CatalogResult<bool> {
        self.repo.toggle_favorite(game).await
    }
}

/// 全部用例的集合，由 `AppContext` 构建后分发给各个视图模型
#[derive(Clone)]
pub struct UseCases {
    pub get_games: GetGames,
    pub search_games: SearchGames,
    pub get_game_details: GetGameDetails,
    pub get_game_screenshots: GetGameScreenshots,
    pub get_genres: GetGenres,
    pub get_publishers: GetPublishers,
    pub get_collections: GetCollections,
    pub get_collection_games: GetCollectionGames,
    pub get_favorites: GetFavorites,
    pub toggle_favorite: ToggleFavorite,
}

impl UseCases {
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self {
            get_games: GetGames::new(repo.clone()),
            search_games: SearchGames::new(repo.clone()),
            get_game_details: GetGameDetails::new(repo.clone()),
            get_game_screenshots: GetGameScreenshots::new(repo.clone()),
            get_genres: GetGenres::new(repo.clone()),
            get_publishers: GetPublishers::new(repo.clone()),
            get_collections: GetCollections::new(repo.clone()),
            get_collection_games: GetCollectionGames::new(repo.clone()),
            get_favorites: GetFavorites::new(repo.clone()),
            toggle_favorite: ToggleFavorite::new(repo),
        }
    }
}

//! 游戏列表视图模型（分页）
//!
//! 首页、类型页、发行商页、搜索页与合集页共用同一套分页逻辑，
//! 仅数据来源 `FeedSource` 不同。

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::CatalogResult;
use crate::model::{Game, Page};
use crate::remote::{GamesQuery, Ordering};
use crate::usecase::UseCases;
use crate::viewmodel::scope::ViewModelScope;
use crate::viewmodel::state::{StateHolder, UiState};

/// 列表数据来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FeedSource {
    All(Ordering),
    Genre(String),
    Publisher(u32),
    Search(String),
    Collection(String),
}

/// 推送给界面的列表快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFeed {
    pub games: Vec<Game>,
    pub total: u64,
    pub has_more: bool,
    /// 正在加载下一页（界面在列表底部显示加载指示）
    pub loading_more: bool,
}

/// 失败的请求，重试时重新发起
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingLoad {
    Refresh,
    More(u32),
}

#[derive(Default)]
struct FeedData {
    items: Vec<Game>,
    total: u64,
    next_page: Option<u32>,
    in_flight: bool,
    failed: Option<PendingLoad>,
    /// 每次切换数据来源时递增，用于丢弃过期的响应
    generation: u64,
}

impl FeedData {
    fn snapshot(&self, loading_more: bool) -> GameFeed {
        GameFeed {
            games: self.items.clone(),
            total: self.total,
            has_more: self.next_page.is_some(),
            loading_more,
        }
    }
}

struct GameListCore {
    use_cases: UseCases,
    source: Mutex<FeedSource>,
    page_size: u32,
    state: StateHolder<GameFeed>,
    feed: Mutex<FeedData>,
}

impl GameListCore {
    async fn fetch(&self, source: &FeedSource, page: u32) -> CatalogResult<Page<Game>> {
        let base = GamesQuery {
            page,
            page_size: self.page_size,
            ..GamesQuery::default()
        };
        match source {
            FeedSource::All(ordering) => {
                let query = GamesQuery {
                    ordering: *ordering,
                    ..base
                };
                self.use_cases.get_games.execute(&query).await
            }
            FeedSource::Genre(slug) => {
                let query = GamesQuery {
                    genres: Some(slug.clone()),
                    ..base
                };
                self.use_cases.get_games.execute(&query).await
            }
            FeedSource::Publisher(id) => {
                let query = GamesQuery {
                    publishers: Some(*id),
                    ..base
                };
                self.use_cases.get_games.execute(&query).await
            }
            FeedSource::Search(term) => {
                self.use_cases
                    .search_games
                    .execute(term, page, self.page_size)
                    .await
            }
            FeedSource::Collection(slug) => {
                self.use_cases
                    .get_collection_games
                    .execute(slug, page, self.page_size)
                    .await
            }
        }
    }

    /// 标记开始加载；已有请求在途时返回 None
    fn begin(&self) -> Option<InFlight<'_>> {
        let mut feed = self.feed.lock();
        if feed.in_flight {
            return None;
        }
        feed.in_flight = true;
        Some(InFlight {
            core: self,
            generation: feed.generation,
            armed: true,
        })
    }

    async fn refresh(&self) {
        let Some(guard) = self.begin() else {
            log::debug!("列表正在加载，忽略刷新请求");
            return;
        };
        self.state.set(UiState::Loading);

        let source = self.source.lock().clone();
        let result = self.fetch(&source, 1).await;

        let mut feed = self.feed.lock();
        let generation = guard.complete();
        if feed.generation != generation {
            log::debug!("数据来源已切换，丢弃过期的响应");
            return;
        }
        feed.in_flight = false;
        match result {
            Ok(page) => {
                feed.items = page.items;
                feed.total = page.total;
                feed.next_page = page.next_page;
                feed.failed = None;
                self.state.set(UiState::Success(feed.snapshot(false)));
            }
            Err(e) => {
                log::warn!("加载游戏列表失败 ({:?}): {}", source, e);
                feed.failed = Some(PendingLoad::Refresh);
                self.state.set(UiState::Error(e.user_message()));
            }
        }
    }

    async fn load_more(&self) {
        let Some(page) = self.feed.lock().next_page else {
            return;
        };
        let Some(guard) = self.begin() else {
            return;
        };
        self.load_page(page, guard).await;
    }

    /// 追加加载指定页
    async fn load_page(&self, page: u32, guard: InFlight<'_>) {
        self.state
            .set(UiState::Success(self.feed.lock().snapshot(true)));

        let source = self.source.lock().clone();
        let result = self.fetch(&source, page).await;

        let mut feed = self.feed.lock();
        let generation = guard.complete();
        if feed.generation != generation {
            log::debug!("数据来源已切换，丢弃过期的响应");
            return;
        }
        feed.in_flight = false;
        match result {
            Ok(next) => {
                feed.items.extend(next.items);
                feed.total = next.total;
                feed.next_page = next.next_page;
                feed.failed = None;
                self.state.set(UiState::Success(feed.snapshot(false)));
            }
            Err(e) => {
                log::warn!("加载第 {} 页失败 ({:?}): {}", page, source, e);
                feed.failed = Some(PendingLoad::More(page));
                self.state.set(UiState::Error(e.user_message()));
            }
        }
    }

    async fn retry(&self) {
        let failed = self.feed.lock().failed;
        match failed {
            Some(PendingLoad::More(page)) => {
                let Some(guard) = self.begin() else {
                    return;
                };
                self.load_page(page, guard).await;
            }
            Some(PendingLoad::Refresh) | None => self.refresh().await,
        }
    }

    fn reset_source(&self, source: FeedSource) {
        *self.source.lock() = source;
        let mut feed = self.feed.lock();
        let generation = feed.generation.wrapping_add(1);
        *feed = FeedData {
            generation,
            ..FeedData::default()
        };
    }
}

/// 在途请求标记
///
/// 请求正常结束时由 `complete` 解除；future 被取消时在 `Drop` 中清除 `in_flight`，
/// 并撤下列表底部的加载指示。
struct InFlight<'a> {
    core: &'a GameListCore,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    /// 调用方需已持有 `feed` 锁并自行更新状态
    fn complete(mut self) -> u64 {
        self.armed = false;
        self.generation
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut feed = self.core.feed.lock();
        if feed.generation != self.generation {
            return;
        }
        feed.in_flight = false;
        log::debug!("列表加载被取消");
        if matches!(self.core.state.current(), UiState::Success(ref f) if f.loading_more) {
            self.core.state.set(UiState::Success(feed.snapshot(false)));
        }
    }
}

pub struct GameListViewModel {
    core: Arc<GameListCore>,
    scope: ViewModelScope,
}

impl GameListViewModel {
    pub fn new(use_cases: UseCases, source: FeedSource, page_size: u32) -> Self {
        Self {
            core: Arc::new(GameListCore {
                use_cases,
                source: Mutex::new(source),
                page_size,
                state: StateHolder::new(),
                feed: Mutex::new(FeedData::default()),
            }),
            scope: ViewModelScope::new(),
        }
    }

    pub fn state(&self) -> UiState<GameFeed> {
        self.core.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<GameFeed>> {
        self.core.state.subscribe()
    }

    pub fn source(&self) -> FeedSource {
        self.core.source.lock().clone()
    }

    /// 已加载的游戏（出错时界面仍可展示）
    pub fn loaded_games(&self) -> Vec<Game> {
        self.core.feed.lock().items.clone()
    }

    /// 重新加载第一页并替换已有数据
    pub async fn refresh(&self) {
        self.core.refresh().await;
    }

    /// 追加下一页；已是最后一页或已有请求在途时不做任何事
    pub async fn load_more(&self) {
        self.core.load_more().await;
    }

    /// 重新发起上一次失败的请求
    pub async fn retry(&self) {
        self.core.retry().await;
    }

    /// 切换数据来源并重新加载，在途的旧请求结果会被丢弃
    pub async fn set_source(&self, source: FeedSource) {
        self.core.reset_source(source);
        self.core.refresh().await;
    }

    pub fn launch_refresh(&self) {
        let core = self.core.clone();
        self.scope.launch(async move { core.refresh().await });
    }

    pub fn launch_load_more(&self) {
        let core = self.core.clone();
        self.scope.launch(async move { core.load_more().await });
    }

    pub fn launch_retry(&self) {
        let core = self.core.clone();
        self.scope.launch(async move { core.retry().await });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::NoopFavoriteStore;
    use crate::error::{CatalogError, ErrorKind};
    use crate::repository::testing::{game_dto, FakeCatalogApi};
    use crate::repository::CatalogRepository;
    use crate::remote::dto::CollectionDto;
    use std::time::Duration;

    fn view_model(api: Arc<FakeCatalogApi>, source: FeedSource) -> GameListViewModel {
        let repo = Arc::new(CatalogRepository::new(api, Arc::new(NoopFavoriteStore)));
        GameListViewModel::new(UseCases::new(repo), source, 10)
    }

    fn loaded(vm: &GameListViewModel) -> GameFeed {
        vm.state().data().cloned().expect("expected success state")
    }

    #[tokio::test]
    async fn starts_loading_then_succeeds() {
        let vm = view_model(
            Arc::new(FakeCatalogApi::with_games(25)),
            FeedSource::All(Ordering::Popular),
        );
        assert!(vm.state().is_loading());

        vm.refresh().await;
        let feed = loaded(&vm);
        assert_eq!(feed.games.len(), 10);
        assert_eq!(feed.total, 25);
        assert!(feed.has_more);
        assert!(!feed.loading_more);
    }

    #[tokio::test]
    async fn load_more_appends_until_last_page() {
        let api = Arc::new(FakeCatalogApi::with_games(25));
        let vm = view_model(api.clone(), FeedSource::All(Ordering::TopRated));

        vm.refresh().await;
        vm.load_more().await;
        vm.load_more().await;
        let feed = loaded(&vm);
        assert_eq!(feed.games.len(), 25);
        assert!(!feed.has_more);
        assert_eq!(feed.games.last().unwrap().id, 25);

        // 最后一页之后不再发请求
        let requests = api.queries.lock().len();
        vm.load_more().await;
        assert_eq!(api.queries.lock().len(), requests);
        assert!(api
            .queries
            .lock()
            .iter()
            .all(|q| q.ordering == Ordering::TopRated));
    }

    #[tokio::test]
    async fn refresh_error_then_retry_recovers() {
        let api = Arc::new(FakeCatalogApi::with_games(5));
        api.fail_next(CatalogError::Http { status: 500 });
        let vm = view_model(api, FeedSource::All(Ordering::Popular));

        vm.refresh().await;
        assert_eq!(vm.state().error(), Some(ErrorKind::Generic.user_message()));

        vm.retry().await;
        assert_eq!(loaded(&vm).games.len(), 5);
    }

    #[tokio::test]
    async fn load_more_error_keeps_items_and_retry_resumes() {
        let api = Arc::new(FakeCatalogApi::with_games(15));
        let vm = view_model(api.clone(), FeedSource::All(Ordering::Popular));

        vm.refresh().await;
        api.fail_next(CatalogError::NotFound);
        vm.load_more().await;

        assert_eq!(vm.state().error(), Some(ErrorKind::NotFound.user_message()));
        assert_eq!(vm.loaded_games().len(), 10);

        vm.retry().await;
        let feed = loaded(&vm);
        assert_eq!(feed.games.len(), 15);
        assert_eq!(api.queries.lock().last().unwrap().page, 2);
    }

    #[tokio::test]
    async fn cancelled_refresh_does_not_block_later_loads() {
        let api = Arc::new(FakeCatalogApi::with_games(5));
        api.delay_next(Duration::from_millis(200));
        let vm = view_model(api.clone(), FeedSource::All(Ordering::Popular));

        let cancelled = tokio::time::timeout(Duration::from_millis(20), vm.refresh()).await;
        assert!(cancelled.is_err());

        vm.refresh().await;
        assert_eq!(api.queries.lock().len(), 2);
        assert_eq!(loaded(&vm).games.len(), 5);
    }

    #[tokio::test]
    async fn cancelled_load_more_clears_indicator() {
        let api = Arc::new(FakeCatalogApi::with_games(15));
        let vm = view_model(api.clone(), FeedSource::All(Ordering::Popular));
        vm.refresh().await;

        api.delay_next(Duration::from_millis(200));
        let cancelled = tokio::time::timeout(Duration::from_millis(20), vm.load_more()).await;
        assert!(cancelled.is_err());
        let feed = loaded(&vm);
        assert!(!feed.loading_more);
        assert_eq!(feed.games.len(), 10);

        vm.load_more().await;
        assert_eq!(loaded(&vm).games.len(), 15);
    }

    #[tokio::test]
    async fn cancelled_scope_releases_the_list() {
        let api = Arc::new(FakeCatalogApi::with_games(5));
        api.delay_next(Duration::from_millis(200));
        let vm = view_model(api, FeedSource::All(Ordering::Popular));

        vm.launch_refresh();
        tokio::time::sleep(Duration::from_millis(20)).await;
        vm.scope.cancel_all();
        tokio::time::sleep(Duration::from_millis(20)).await;

        vm.refresh().await;
        assert_eq!(loaded(&vm).games.len(), 5);
    }

    #[tokio::test]
    async fn genre_and_publisher_sources_set_filters() {
        let api = Arc::new(FakeCatalogApi::with_games(3));
        let vm = view_model(api.clone(), FeedSource::Genre("action".into()));
        vm.refresh().await;
        vm.set_source(FeedSource::Publisher(354)).await;

        let queries = api.queries.lock();
        assert_eq!(queries[0].genres.as_deref(), Some("action"));
        assert_eq!(queries[1].publishers, Some(354));
        assert_eq!(queries[1].genres, None);
    }

    #[tokio::test]
    async fn blank_search_source_surfaces_an_error() {
        let vm = view_model(
            Arc::new(FakeCatalogApi::with_games(3)),
            FeedSource::Search("  ".into()),
        );
        vm.refresh().await;
        assert_eq!(vm.state().error(), Some(ErrorKind::Generic.user_message()));
    }

    #[tokio::test]
    async fn collection_source_loads_collection_games() {
        let mut api = FakeCatalogApi::with_games(4);
        api.collections = vec![CollectionDto {
            id: 1,
            slug: "best".into(),
            ..CollectionDto::default()
        }];
        let vm = view_model(Arc::new(api), FeedSource::Collection("best".into()));
        vm.refresh().await;
        assert_eq!(loaded(&vm).games.len(), 4);
    }

    #[tokio::test]
    async fn set_source_replaces_items() {
        let mut api = FakeCatalogApi::with_games(12);
        api.games.push(game_dto(100));
        let vm = view_model(Arc::new(api), FeedSource::All(Ordering::Popular));
        vm.refresh().await;
        vm.load_more().await;
        assert_eq!(loaded(&vm).games.len(), 13);

        vm.set_source(FeedSource::Search("game 100".into())).await;
        let feed = loaded(&vm);
        assert_eq!(feed.games.len(), 1);
        assert_eq!(feed.games[0].id, 100);
        assert_eq!(vm.source(), FeedSource::Search("game 100".into()));
    }

    #[tokio::test]
    async fn launched_refresh_publishes_to_subscribers() {
        let vm = view_model(
            Arc::new(FakeCatalogApi::with_games(3)),
            FeedSource::All(Ordering::Newest),
        );
        let mut rx = vm.subscribe();
        vm.launch_refresh();

        let state = rx.wait_for(|s| !s.is_loading()).await.unwrap().clone();
        assert_eq!(state.data().unwrap().games.len(), 3);
    }
}

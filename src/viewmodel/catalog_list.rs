//! 类型、发行商、合集列表的视图模型
//!
//! 这些页面只展示一页数据，逻辑完全一致，因此共用一个泛型实现。

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::CatalogResult;
use crate::model::{Collection, Genre, Page, Publisher};
use crate::usecase::UseCases;
use crate::viewmodel::scope::ViewModelScope;
use crate::viewmodel::state::{StateHolder, UiState};

type LoadFuture<T> = Pin<Box<dyn Future<Output = CatalogResult<Page<T>>> + Send>>;
type Loader<T> = Arc<dyn Fn(u32) -> LoadFuture<T> + Send + Sync>;

/// 最近一次请求；`seq` 每次加载递增，只有最新请求的结果会被发布
struct Request {
    page: u32,
    seq: u64,
}

struct ListCore<T> {
    loader: Loader<T>,
    request: parking_lot::Mutex<Request>,
    state: StateHolder<Page<T>>,
}

impl<T: Clone + Send + Sync + 'static> ListCore<T> {
    async fn load(&self, page: u32) {
        let seq = {
            let mut request = self.request.lock();
            request.page = page;
            request.seq = request.seq.wrapping_add(1);
            request.seq
        };
        self.state.set(UiState::Loading);
        let result = (self.loader)(page).await;

        if self.request.lock().seq != seq {
            log::debug!("第 {} 页的响应已过期，丢弃", page);
            return;
        }
        self.state.set(UiState::from(result));
    }
}

pub struct CatalogListViewModel<T> {
    core: Arc<ListCore<T>>,
    scope: ViewModelScope,
}

pub type GenresViewModel = CatalogListViewModel<Genre>;
pub type PublishersViewModel = CatalogListViewModel<Publisher>;
pub type CollectionsViewModel = CatalogListViewModel<Collection>;

impl<T: Clone + Send + Sync + 'static> CatalogListViewModel<T> {
    fn with_loader(loader: Loader<T>) -> Self {
        Self {
            core: Arc::new(ListCore {
                loader,
                request: parking_lot::Mutex::new(Request {
                    page: 1,
                    seq: 0,
                }),
                state: StateHolder::new(),
            }),
            scope: ViewModelScope::new(),
        }
    }

    pub fn state(&self) -> UiState<Page<T>> {
        self.core.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<Page<T>>> {
        self.core.state.subscribe()
    }

    pub fn current_page(&self) -> u32 {
        self.core.request.lock().page
    }

    /// 加载指定页
    pub async fn load(&self, page: u32) {
        self.core.load(page.max(1)).await;
    }

    /// 重新加载当前页
    pub async fn retry(&self) {
        let page = self.current_page();
        self.core.load(page).await;
    }

    pub fn launch_load(&self, page: u32) {
        let core = self.core.clone();
        self.scope
            .launch(async move { core.load(page.max(1)).await });
    }
}

impl GenresViewModel {
    pub fn genres(use_cases: &UseCases, page_size: u32) -> Self {
        let get_genres = use_cases.get_genres.clone();
        Self::with_loader(Arc::new(move |page: u32| -> LoadFuture<Genre> {
            let get_genres = get_genres.clone();
            Box::pin(async move { get_genres.execute(page, page_size).await })
        }))
    }
}

impl PublishersViewModel {
    pub fn publishers(use_cases: &UseCases, page_size: u32) -> Self {
        let get_publishers = use_cases.get_publishers.clone();
        Self::with_loader(Arc::new(move |page: u32| -> LoadFuture<Publisher> {
            let get_publishers = get_publishers.clone();
            Box::pin(async move { get_publishers.execute(page, page_size).await })
        }))
    }
}

impl CollectionsViewModel {
    pub fn collections(use_cases: &UseCases, page_size: u32) -> Self {
        let get_collections = use_cases.get_collections.clone();
        Self::with_loader(Arc::new(move |page: u32| -> LoadFuture<Collection> {
            let get_collections = get_collections.clone();
            Box::pin(async move { get_collections.execute(page, page_size).await })
        }))
    }
}

use std::sync::Arc;
use tokio::sync::watch;

use crate::model::FavoriteGame;
use crate::usecase::UseCases;
use crate::viewmodel::scope::ViewModelScope;
use crate::viewmodel::state::{StateHolder, UiState};

struct FavoritesCore {
    use_cases: UseCases,
    state: StateHolder<Vec<FavoriteGame>>,
}

impl FavoritesCore {
    async fn load(&self) {
        self.state.set(UiState::Loading);
        let result = self.use_cases.get_favorites.execute().await;
        self.state.set(UiState::from(result));
    }
}

/// 本地收藏列表视图模型
pub struct FavoritesViewModel {
    core: Arc<FavoritesCore>,
    scope: ViewModelScope,
}

impl FavoritesViewModel {
    pub fn new(use_cases: UseCases) -> Self {
        Self {
            core: Arc::new(FavoritesCore {
                use_cases,
                state: StateHolder::new(),
            }),
            scope: ViewModelScope::new(),
        }
    }

    pub fn state(&self) -> UiState<Vec<FavoriteGame>> {
        self.core.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<Vec<FavoriteGame>>> {
        self.core.state.subscribe()
    }

    pub async fn load(&self) {
        self.core.load().await;
    }

    pub fn launch_load(&self) {
        let core = self.core.clone();
        self.scope.launch(async move { core.load().await });
    }
}

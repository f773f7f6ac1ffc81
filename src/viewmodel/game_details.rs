//! 游戏详情视图模型

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::model::{GameDetails, Screenshot};
use crate::usecase::UseCases;
use crate::viewmodel::scope::ViewModelScope;
use crate::viewmodel::state::{StateHolder, UiState};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetailsScreen {
    pub details: GameDetails,
    pub screenshots: Vec<Screenshot>,
    pub is_favorite: bool,
}

struct DetailsCore {
    use_cases: UseCases,
    game_id: Mutex<Option<u32>>,
    state: StateHolder<GameDetailsScreen>,
}

impl DetailsCore {
    fn is_current(&self, id: u32) -> bool {
        *self.game_id.lock() == Some(id)
    }

    async fn load(&self, id: u32) {
        *self.game_id.lock() = Some(id);
        self.state.set(UiState::Loading);

        let details = match self.use_cases.get_game_details.execute(id).await {
            Ok(details) => details,
            Err(e) => {
                log::warn!("加载游戏详情失败 ({}): {}", id, e);
                if self.is_current(id) {
                    self.state.set(UiState::Error(e.user_message()));
                }
                return;
            }
        };

        // 截图与收藏状态只是附加信息，失败时不影响详情展示
        let screenshots = match self.use_cases.get_game_screenshots.execute(id, 1).await {
            Ok(page) => page.items,
            Err(e) => {
                log::warn!("加载游戏截图失败 ({}): {}", id, e);
                details.game.screenshots.clone()
            }
        };
        let is_favorite = self
            .use_cases
            .get_favorites
            .contains(id)
            .await
            .unwrap_or_else(|e| {
                log::warn!("读取收藏状态失败 ({}): {}", id, e);
                false
            });

        // 加载期间已切换到其他游戏时丢弃结果
        if !self.is_current(id) {
            return;
        }
        self.state.set(UiState::Success(GameDetailsScreen {
            details,
            screenshots,
            is_favorite,
        }));
    }

    async fn toggle_favorite(&self) -> Result<bool, String> {
        let Some(screen) = self.state.current().data().cloned() else {
            return Err("详情尚未加载完成".to_string());
        };

        match self
            .use_cases
            .toggle_favorite
            .execute(&screen.details.game)
            .await
        {
            Ok(is_favorite) => {
                if self.is_current(screen.details.game.id) {
                    self.state.set(UiState::Success(GameDetailsScreen {
                        is_favorite,
                        ..screen
                    }));
                }
                Ok(is_favorite)
            }
            Err(e) => {
                log::error!("切换收藏状态失败 ({}): {}", screen.details.game.id, e);
                Err(e.user_message())
            }
        }
    }
}

pub struct GameDetailsViewModel {
    core: Arc<DetailsCore>,
    scope: ViewModelScope,
}

impl GameDetailsViewModel {
    pub fn new(use_cases: UseCases) -> Self {
        Self {
            core: Arc::new(DetailsCore {
                use_cases,
                game_id: Mutex::new(None),
                state: StateHolder::new(),
            }),
            scope: ViewModelScope::new(),
        }
    }

    pub fn state(&self) -> UiState<GameDetailsScreen> {
        self.core.state.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<GameDetailsScreen>> {
        self.core.state.subscribe()
    }

    pub async fn load(&self, id: u32) {
        self.core.load(id).await;
    }

    /// 重新加载当前游戏；尚未加载过任何游戏时不做任何事
    pub async fn retry(&self) {
        let id = *self.core.game_id.lock();
        if let Some(id) = id {
            self.core.load(id).await;
        }
    }

    /// 切换收藏状态，返回切换后的状态或错误提示
    pub async fn toggle_favorite(&self) -> Result<bool, String> {
        self.core.toggle_favorite().await
    }

    pub fn launch_load(&self, id: u32) {
        let core = self.core.clone();
        self.scope.launch(async move { core.load(id).await });
    }
}

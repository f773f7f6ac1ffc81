use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::error::CatalogResult;

/// 界面状态：加载中 / 成功 / 失败（附提示文案）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "data", rename_all = "lowercase")]
pub enum UiState<T> {
    Loading,
    Success(T),
    Error(String),
}

impl<T> UiState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            UiState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> From<CatalogResult<T>> for UiState<T> {
    fn from(result: CatalogResult<T>) -> Self {
        match result {
            Ok(data) => UiState::Success(data),
            Err(e) => {
                log::warn!("加载失败: {}", e);
                UiState::Error(e.user_message())
            }
        }
    }
}

/// 状态持有者，界面通过 `subscribe` 订阅变化
pub struct StateHolder<T> {
    tx: watch::Sender<UiState<T>>,
}

impl<T: Clone> StateHolder<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(UiState::Loading);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState<T>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> UiState<T> {
        self.tx.borrow().clone()
    }

    /// 没有订阅者时也要保存最新状态，因此使用 send_replace
    pub fn set(&self, state: UiState<T>) {
        self.tx.send_replace(state);
    }
}

impl<T: Clone> Default for StateHolder<T> {
    fn default() -> Self {
        Self::new()
    }
}

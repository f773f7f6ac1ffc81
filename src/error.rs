//! 错误类型
//!
//! 所有远端/本地错误最终被归入三类（通用、网络、未找到），
//! 界面层只拿到对应的提示文案。

use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 面向界面的错误分类（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Generic,
    Network,
    NotFound,
}

impl ErrorKind {
    /// 界面展示用的提示文案
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Generic => "出了点问题，请稍后重试",
            ErrorKind::Network => "网络连接失败，请检查网络后重试",
            ErrorKind::NotFound => "未找到请求的内容",
        }
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP 请求失败，状态码: {status}")]
    Http { status: u16 },

    #[error("请求的资源不存在")]
    NotFound,

    #[error("网络错误: {0}")]
    Network(#[source] reqwest::Error),

    #[error("响应解析失败: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] DbErr),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("无效的请求: {0}")]
    InvalidRequest(String),

    #[error("本地存储不可用")]
    StorageUnavailable,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// 将错误归入界面可见的三种类别之一
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound => ErrorKind::NotFound,
            CatalogError::Http { status: 404 } => ErrorKind::NotFound,
            CatalogError::Network(_) => ErrorKind::Network,
            CatalogError::Http { .. }
            | CatalogError::Decode(_)
            | CatalogError::Database(_)
            | CatalogError::Config(_)
            | CatalogError::InvalidRequest(_)
            | CatalogError::StorageUnavailable => ErrorKind::Generic,
        }
    }

    pub fn user_message(&self) -> String {
        self.kind().user_message().to_string()
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            if status == reqwest::StatusCode::NOT_FOUND {
                return CatalogError::NotFound;
            }
            return CatalogError::Http {
                status: status.as_u16(),
            };
        }
        if e.is_builder() {
            return CatalogError::InvalidRequest(e.to_string());
        }
        // 连接、超时、请求发送及读取响应体失败均视为网络错误
        CatalogError::Network(e)
    }
}

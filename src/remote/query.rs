//! 请求参数类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 单页最大条目数（RAWG 的上限为 40）
pub const MAX_PAGE_SIZE: u32 = 40;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// 游戏列表排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Ordering {
    #[default]
    #[serde(rename = "-added")]
    Popular,
    #[serde(rename = "-rating")]
    TopRated,
    #[serde(rename = "-released")]
    Newest,
    #[serde(rename = "released")]
    Oldest,
    #[serde(rename = "-metacritic")]
    Metacritic,
    #[serde(rename = "name")]
    NameAsc,
    #[serde(rename = "-name")]
    NameDesc,
}

impl Ordering {
    pub fn as_param(self) -> &'static str {
        match self {
            Ordering::Popular => "-added",
            Ordering::TopRated => "-rating",
            Ordering::Newest => "-released",
            Ordering::Oldest => "released",
            Ordering::Metacritic => "-metacritic",
            Ordering::NameAsc => "name",
            Ordering::NameDesc => "-name",
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for Ordering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "-added" => Ok(Ordering::Popular),
            "-rating" => Ok(Ordering::TopRated),
            "-released" => Ok(Ordering::Newest),
            "released" => Ok(Ordering::Oldest),
            "-metacritic" => Ok(Ordering::Metacritic),
            "name" => Ok(Ordering::NameAsc),
            "-name" => Ok(Ordering::NameDesc),
            other => Err(format!("未知的排序方式: {}", other)),
        }
    }
}

/// 将每页条目数限制在 1..=40
pub fn clamp_page_size(page_size: u32) -> u32 {
    page_size.clamp(1, MAX_PAGE_SIZE)
}

/// 游戏列表查询条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamesQuery {
    pub page: u32,
    pub page_size: u32,
    pub ordering: Ordering,
    pub search: Option<String>,
    /// 类型 slug，多个以逗号分隔
    pub genres: Option<String>,
    /// 发行商 ID
    pub publishers: Option<u32>,
    /// `from,to` 形式的日期区间
    pub dates: Option<String>,
}

impl Default for GamesQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            ordering: Ordering::default(),
            search: None,
            genres: None,
            publishers: None,
            dates: None,
        }
    }
}

impl GamesQuery {
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// 转换为查询参数列表（不含 key）
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("page_size", clamp_page_size(self.page_size).to_string()),
        ];
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match search {
            // 搜索时由服务端按相关度排序
            Some(search) => params.push(("search", search.to_string())),
            None => params.push(("ordering", self.ordering.as_param().to_string())),
        }
        if let Some(genres) = &self.genres {
            params.push(("genres", genres.clone()));
        }
        if let Some(publishers) = self.publishers {
            params.push(("publishers", publishers.to_string()));
        }
        if let Some(dates) = &self.dates {
            params.push(("dates", dates.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parses_and_prints_the_wire_value() {
        for ordering in [
            Ordering::Popular,
            Ordering::TopRated,
            Ordering::Newest,
            Ordering::Oldest,
            Ordering::Metacritic,
            Ordering::NameAsc,
            Ordering::NameDesc,
        ] {
            assert_eq!(ordering.to_string().parse::<Ordering>(), Ok(ordering));
        }
        assert!("popularity".parse::<Ordering>().is_err());
    }

    #[test]
    fn default_query_params() {
        let params = GamesQuery::default().to_params();
        assert_eq!(
            params,
            vec![
                ("page", "1".to_string()),
                ("page_size", "20".to_string()),
                ("ordering", "-added".to_string()),
            ]
        );
    }

    #[test]
    fn page_size_is_clamped() {
        let query = GamesQuery {
            page_size: 100,
            ..Default::default()
        };
        assert!(query.to_params().contains(&("page_size", "40".to_string())));

        let query = GamesQuery {
            page_size: 0,
            page: 0,
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("page_size", "1".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
    }

    #[test]
    fn search_query_drops_ordering_and_keeps_filters() {
        let query = GamesQuery {
            search: Some("  witcher ".into()),
            genres: Some("action".into()),
            publishers: Some(354),
            dates: Some("2015-01-01,2015-12-31".into()),
            ..Default::default()
        };
        let params = query.to_params();
        assert!(!params.iter().any(|(k, _)| *k == "ordering"));
        assert!(params.contains(&("search", "witcher".to_string())));
        assert!(params.contains(&("genres", "action".to_string())));
        assert!(params.contains(&("publishers", "354".to_string())));
        assert!(params.contains(&("dates", "2015-01-01,2015-12-31".to_string())));
    }

    #[test]
    fn blank_search_keeps_ordering() {
        let query = GamesQuery {
            search: Some("   ".into()),
            ordering: Ordering::Metacritic,
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.contains(&("ordering", "-metacritic".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "search"));
    }
}

//! 领域模型
//!
//! 界面使用的不可变记录，由 DTO 经过字段重命名与规范化得到。

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::remote::dto::{
    CollectionDto, GameDetailsDto, GameDto, GenreDto, PagedResponse, PlatformEntryDto,
    PublisherDto, ScreenshotDto,
};
use crate::utils::date::parse_api_date;
use crate::utils::image_url::{normalize_image_url, normalize_optional};

/// 一页数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 服务端记录总数
    pub total: u64,
    /// 下一页页码，None 表示已是最后一页
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// 从分页 DTO 转换，逐项映射
    pub fn from_response<D, F>(response: PagedResponse<D>, map: F) -> Self
    where
        F: FnMut(D) -> T,
    {
        let next_page = response.next.as_deref().and_then(page_param);
        Self {
            items: response.results.into_iter().map(map).collect(),
            total: response.count,
            next_page,
        }
    }
}

/// 从 `next` 链接中提取 page 参数
fn page_param(next: &str) -> Option<u32> {
    let url = Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "page")
        .and_then(|(_, v)| v.parse::<u32>().ok())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub games_count: u32,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u32,
    pub name: String,
    pub slug: String,
    pub games_count: u32,
    pub image_url: Option<String>,
}

/// 开发商与发行商共用同一结构
pub type Developer = Publisher;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: i64,
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub release_date: Option<NaiveDate>,
    pub tba: bool,
    pub image_url: Option<String>,
    pub rating: f64,
    pub rating_top: u32,
    pub ratings_count: u32,
    pub metacritic: Option<u32>,
    /// 平均游玩时长（小时）
    pub playtime_hours: u32,
    pub genres: Vec<Genre>,
    pub platforms: Vec<Platform>,
    pub screenshots: Vec<Screenshot>,
    pub esrb_rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDetails {
    pub game: Game,
    pub description: Option<String>,
    pub website: Option<String>,
    pub reddit_url: Option<String>,
    pub additional_image_url: Option<String>,
    pub publishers: Vec<Publisher>,
    pub developers: Vec<Developer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionCreator {
    pub id: u32,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: u32,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub games_count: u32,
    pub background_url: Option<String>,
    pub dominant_color: Option<String>,
    pub creator: Option<CollectionCreator>,
}

impl Collection {
    pub fn creator_name(&self) -> Option<&str> {
        self.creator.as_ref().map(|c| c.display_name.as_str())
    }
}

/// 本地收藏的游戏快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteGame {
    pub game_id: u32,
    pub slug: String,
    pub name: String,
    pub image_url: Option<String>,
    pub rating: f64,
    pub release_date: Option<NaiveDate>,
    pub added_at: DateTime<Utc>,
}

// ==================== DTO -> 领域模型 ====================

/// 空白字符串视为缺失
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl From<GenreDto> for Genre {
    fn from(dto: GenreDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            slug: dto.slug,
            games_count: dto.games_count,
            image_url: normalize_optional(dto.image_background.as_deref()),
        }
    }
}

impl From<PublisherDto> for Publisher {
    fn from(dto: PublisherDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            slug: dto.slug,
            games_count: dto.games_count,
            image_url: normalize_optional(dto.image_background.as_deref()),
        }
    }
}

impl From<PlatformEntryDto> for Platform {
    fn from(entry: PlatformEntryDto) -> Self {
        Self {
            id: entry.platform.id,
            name: entry.platform.name,
            slug: entry.platform.slug,
        }
    }
}

impl Screenshot {
    /// 地址无法规范化的截图直接丢弃
    pub fn from_dto(dto: ScreenshotDto) -> Option<Self> {
        normalize_image_url(&dto.image).map(|image_url| Self {
            id: dto.id,
            image_url,
        })
    }
}

impl From<GameDto> for Game {
    fn from(dto: GameDto) -> Self {
        Self {
            id: dto.id,
            release_date: parse_api_date(dto.released.as_deref()),
            image_url: normalize_optional(dto.background_image.as_deref()),
            slug: dto.slug,
            name: dto.name,
            tba: dto.tba,
            rating: dto.rating,
            rating_top: dto.rating_top,
            ratings_count: dto.ratings_count,
            metacritic: dto.metacritic,
            playtime_hours: dto.playtime,
            genres: dto.genres.into_iter().map(Genre::from).collect(),
            platforms: dto.platforms.into_iter().map(Platform::from).collect(),
            screenshots: dto
                .short_screenshots
                .into_iter()
                .filter_map(Screenshot::from_dto)
                .collect(),
            esrb_rating: dto.esrb_rating.map(|r| r.name).filter(|n| !n.is_empty()),
        }
    }
}

impl From<GameDetailsDto> for GameDetails {
    fn from(dto: GameDetailsDto) -> Self {
        Self {
            game: Game::from(dto.game),
            description: non_blank(dto.description_raw),
            website: non_blank(dto.website),
            reddit_url: non_blank(dto.reddit_url),
            additional_image_url: normalize_optional(dto.background_image_additional.as_deref()),
            publishers: dto.publishers.into_iter().map(Publisher::from).collect(),
            developers: dto.developers.into_iter().map(Developer::from).collect(),
        }
    }
}

impl From<CollectionDto> for Collection {
    fn from(dto: CollectionDto) -> Self {
        let (background_url, dominant_color) = match dto.game_background {
            Some(bg) => (normalize_image_url(&bg.url), non_blank(bg.dominant_color)),
            None => (None, None),
        };
        let creator = dto.creator.map(|c| CollectionCreator {
            id: c.id,
            display_name: non_blank(c.full_name).unwrap_or(c.username),
            avatar_url: normalize_optional(c.avatar.as_deref()),
        });

        Self {
            id: dto.id,
            slug: dto.slug,
            name: dto.name,
            description: non_blank(dto.description),
            games_count: dto.games_count,
            background_url,
            dominant_color,
            creator,
        }
    }
}

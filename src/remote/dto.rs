//! 数据传输对象 (DTO)
//!
//! 与 RAWG 接口返回的 JSON 结构一一对应，未知字段直接忽略。
//! 接口中大量字段可能缺失或显式为 null，列表字段统一退化为空列表。

use serde::{Deserialize, Deserializer, Serialize};

/// 辅助函数：将显式的 null 视为默认值
/// 用于列表、数值等字段，缺失与 null 一律按默认值处理
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 分页响应
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PagedResponse<T> {
    #[serde(default, deserialize_with = "null_to_default")]
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub results: Vec<T>,
}

/// 游戏列表项
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub tba: bool,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub rating_top: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub ratings_count: u32,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub playtime: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub genres: Vec<GenreDto>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub platforms: Vec<PlatformEntryDto>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub short_screenshots: Vec<ScreenshotDto>,
    #[serde(default)]
    pub esrb_rating: Option<EsrbRatingDto>,
}

/// 游戏详情
///
/// 详情接口返回列表项的全部字段，外加描述、网站及发行商/开发商
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameDetailsDto {
    #[serde(flatten)]
    pub game: GameDto,
    #[serde(default)]
    pub description_raw: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub reddit_url: Option<String>,
    #[serde(default)]
    pub background_image_additional: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub publishers: Vec<PublisherDto>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub developers: Vec<DeveloperDto>,
}

/// 类型
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub games_count: u32,
    #[serde(default)]
    pub image_background: Option<String>,
}

/// 发行商
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PublisherDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub games_count: u32,
    #[serde(default)]
    pub image_background: Option<String>,
}

/// 开发商（结构与发行商一致）
pub type DeveloperDto = PublisherDto;

/// 平台列表项，接口以 `{ "platform": {...} }` 包裹
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlatformEntryDto {
    pub platform: PlatformDto,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlatformDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScreenshotDto {
    pub id: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub image: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EsrbRatingDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
}

/// 合集
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectionDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub games_count: u32,
    #[serde(default)]
    pub game_background: Option<GameBackgroundDto>,
    #[serde(default)]
    pub creator: Option<CollectionCreatorDto>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GameBackgroundDto {
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(default)]
    pub dominant_color: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CollectionCreatorDto {
    pub id: u32,
    #[serde(default, deserialize_with = "null_to_default")]
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

//! RAWG HTTP 客户端
//!
//! 每个接口都是单次 GET 请求，不做重试；失败按状态码/传输错误分类后向上返回。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use crate::config::AppConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::remote::dto::{
    CollectionDto, GameDetailsDto, GameDto, GenreDto, PagedResponse, PublisherDto, ScreenshotDto,
};
use crate::remote::query::{clamp_page_size, GamesQuery};

/// 远端目录服务接口
///
/// 仓库层只依赖这个 trait，测试中可替换为内存实现
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn games(&self, query: &GamesQuery) -> CatalogResult<PagedResponse<GameDto>>;

    async fn game_details(&self, id: u32) -> CatalogResult<GameDetailsDto>;

    async fn game_screenshots(
        &self,
        id: u32,
        page: u32,
    ) -> CatalogResult<PagedResponse<ScreenshotDto>>;

    async fn genres(&self, page: u32, page_size: u32) -> CatalogResult<PagedResponse<GenreDto>>;

    async fn publishers(
        &self,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<PublisherDto>>;

    async fn collections(
        &self,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<CollectionDto>>;

    async fn collection_games(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<GameDto>>;
}

pub struct RawgClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RawgClient {
    pub fn new(config: &AppConfig) -> CatalogResult<Self> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| CatalogError::Config(format!("无效的 API 地址: {}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("game-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CatalogError::Config(format!("无法创建 HTTP 客户端: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    /// 拼接接口地址与查询参数，路径片段会被正确转义
    fn endpoint(&self, segments: &[&str], params: &[(&str, String)]) -> CatalogResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Config(format!("API 地址不能作为基础路径: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        // 没有任何参数时不触碰 query，避免生成结尾的 `?`
        if !self.api_key.is_empty() || !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            if !self.api_key.is_empty() {
                pairs.append_pair("key", &self.api_key);
            }
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> CatalogResult<T> {
        log::debug!("GET {}", url.path());

        let response = self.http.get(url.clone()).send().await.map_err(|e| {
            log::warn!("请求 {} 失败: {}", url.path(), e);
            CatalogError::from(e)
        })?;

        check_status(response.status()).inspect_err(|e| {
            log::warn!("请求 {} 未成功: {}", url.path(), e);
        })?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("解析 {} 的响应失败: {}", url.path(), e);
            CatalogError::from(e)
        })
    }

    fn paging_params(page: u32, page_size: u32) -> Vec<(&'static str, String)> {
        vec![
            ("page", page.max(1).to_string()),
            ("page_size", clamp_page_size(page_size).to_string()),
        ]
    }
}

/// 将非 2xx 状态码映射为错误，404 单独归为 `NotFound`
fn check_status(status: reqwest::StatusCode) -> CatalogResult<()> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(CatalogError::NotFound);
    }
    if !status.is_success() {
        return Err(CatalogError::Http {
            status: status.as_u16(),
        });
    }
    Ok(())
}

#[async_trait]
impl CatalogApi for RawgClient {
    async fn games(&self, query: &GamesQuery) -> CatalogResult<PagedResponse<GameDto>> {
        let url = self.endpoint(&["games"], &query.to_params())?;
        self.get_json(url).await
    }

    async fn game_details(&self, id: u32) -> CatalogResult<GameDetailsDto> {
        let url = self.endpoint(&["games", &id.to_string()], &[])?;
        self.get_json(url).await
    }

    async fn game_screenshots(
        &self,
        id: u32,
        page: u32,
    ) -> CatalogResult<PagedResponse<ScreenshotDto>> {
        let url = self.endpoint(
            &["games", &id.to_string(), "screenshots"],
            &[("page", page.max(1).to_string())],
        )?;
        self.get_json(url).await
    }

    async fn genres(&self, page: u32, page_size: u32) -> CatalogResult<PagedResponse<GenreDto>> {
        let url = self.endpoint(&["genres"], &Self::paging_params(page, page_size))?;
        self.get_json(url).await
    }

    async fn publishers(
        &self,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<PublisherDto>> {
        let url = self.endpoint(&["publishers"], &Self::paging_params(page, page_size))?;
        self.get_json(url).await
    }

    async fn collections(
        &self,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<CollectionDto>> {
        let url = self.endpoint(
            &["collections", "lists", "main"],
            &Self::paging_params(page, page_size),
        )?;
        self.get_json(url).await
    }

    async fn collection_games(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> CatalogResult<PagedResponse<GameDto>> {
        if slug.trim().is_empty() {
            return Err(CatalogError::InvalidRequest("合集 slug 不能为空".to_string()));
        }
        let url = self.endpoint(
            &["collections", slug, "games"],
            &Self::paging_params(page, page_size),
        )?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    /// 在本地端口上应答一次固定的 HTTP 响应，返回基础地址
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let mut request = Vec::new();
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{}/api/", addr)
    }

    fn client(base: &str, key: Option<&str>) -> RawgClient {
        let config = AppConfig {
            api_base_url: base.to_string(),
            api_key: key.map(str::to_string),
            ..AppConfig::default()
        };
        RawgClient::new(&config).unwrap()
    }

    #[test]
    fn endpoint_appends_key_and_params() {
        let c = client("https://api.rawg.io/api/", Some("secret"));
        let url = c
            .endpoint(&["games"], &GamesQuery::default().with_page(3).to_params())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.rawg.io/api/games?key=secret&page=3&page_size=20&ordering=-added"
        );
    }

    #[test]
    fn status_codes_are_classified() {
        use reqwest::StatusCode;
        assert!(check_status(StatusCode::OK).is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND),
            Err(CatalogError::NotFound)
        ));
        assert!(matches!(
            check_status(StatusCode::UNAUTHORIZED),
            Err(CatalogError::Http { status: 401 })
        ));
        assert!(matches!(
            check_status(StatusCode::BAD_GATEWAY),
            Err(CatalogError::Http { status: 502 })
        ));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let c = client("http://127.0.0.1:1/api/", Some("k"));
        let err = c.genres(1, 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::Network(_)));
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn missing_resource_response_is_not_found() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = client(&base, None).game_details(7).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn server_error_and_bad_body_are_generic() {
        let base = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        let err = client(&base, None).genres(1, 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::Http { status: 503 }));
        assert_eq!(err.kind(), ErrorKind::Generic);

        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot json!",
        );
        let err = client(&base, None).genres(1, 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::Decode(_)));
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[tokio::test]
    async fn successful_response_is_decoded() {
        let body = r#"{"count":1,"next":null,"previous":null,"results":[{"id":4,"name":"Action","slug":"action","games_count":10,"image_background":null}]}"#;
        let response: &'static str = Box::leak(
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .into_boxed_str(),
        );
        let page = client(&serve_once(response), None).genres(1, 10).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].name, "Action");
    }

    #[test]
    fn endpoint_without_key_omits_it() {
        let c = client("https://api.rawg.io/api/", None);
        let url = c.endpoint(&["genres"], &RawgClient::paging_params(1, 10)).unwrap();
        assert_eq!(url.as_str(), "https://api.rawg.io/api/genres?page=1&page_size=10");
    }

    #[test]
    fn endpoint_escapes_path_segments() {
        let c = client("https://api.rawg.io/api/", Some("k"));
        let url = c.endpoint(&["collections", "a b/c", "games"], &[]).unwrap();
        assert_eq!(url.path(), "/api/collections/a%20b%2Fc/games");
    }

    #[test]
    fn details_endpoint_uses_numeric_id() {
        let c = client("https://api.rawg.io/api/", Some("k"));
        let url = c.endpoint(&["games", &3498.to_string()], &[]).unwrap();
        assert_eq!(url.as_str(), "https://api.rawg.io/api/games/3498?key=k");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let config = AppConfig {
            api_base_url: "not a url".to_string(),
            ..AppConfig::default()
        };
        let err = RawgClient::new(&config).err().unwrap();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[tokio::test]
    async fn blank_collection_slug_is_rejected_before_sending() {
        let c = client("https://api.rawg.io/api/", Some("k"));
        let err = c.collection_games("  ", 1, 10).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRequest(_)));
    }
}

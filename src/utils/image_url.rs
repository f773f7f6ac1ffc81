//! 图片地址规范化
//!
//! RAWG 返回的图片地址并不统一：多数为完整的 https 地址，
//! 合集接口中存在 `//media.rawg.io/...` 这类协议相对地址，
//! 个别字段甚至只有裸主机名（`media.rawg.io/...`）。

use url::Url;

/// 规范化图片地址，无法得到合法的绝对地址时返回 None
///
/// - 空白 -> None
/// - `//host/path` -> `https://host/path`
/// - `http(s)://...` -> 原样保留
/// - `host/path` -> `https://host/path`
/// - `/path`（缺少主机名）-> None
/// - 其他协议（`ftp://...` 等）-> None
pub fn normalize_image_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if trimmed.starts_with("//") {
        format!("https:{}", trimmed)
    } else if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else if trimmed.starts_with('/') || trimmed.contains("://") {
        log::debug!("忽略无效的图片地址: {}", raw);
        return None;
    } else {
        format!("https://{}", trimmed)
    };

    match Url::parse(&candidate) {
        Ok(url) if url.host_str().is_some_and(|h| !h.is_empty()) => Some(candidate),
        _ => {
            log::debug!("忽略无效的图片地址: {}", raw);
            None
        }
    }
}

/// 对可选字段做规范化
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_image_url)
}

fn has_http_scheme(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("https://") || lower.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_relative_urls_get_https_scheme() {
        assert_eq!(
            normalize_image_url("//media.rawg.io/media/games/abc.jpg").as_deref(),
            Some("https://media.rawg.io/media/games/abc.jpg")
        );
    }

    #[test]
    fn other_schemes_are_rejected() {
        assert_eq!(normalize_image_url("ftp://host/x.jpg"), None);
        assert_eq!(normalize_image_url("file:///etc/passwd"), None);
        assert_eq!(normalize_image_url("s3://bucket/cover.png"), None);
    }

    #[test]
    fn bare_hostnames_get_https_prefix() {
        assert_eq!(
            normalize_image_url("media.rawg.io/media/avatars/x.png").as_deref(),
            Some("https://media.rawg.io/media/avatars/x.png")
        );
    }

    #[test]
    fn absolute_urls_are_kept() {
        let https = "https://media.rawg.io/media/games/456.jpg";
        let http = "http://example.com/a.png";
        assert_eq!(normalize_image_url(https).as_deref(), Some(https));
        assert_eq!(normalize_image_url(http).as_deref(), Some(http));
        assert_eq!(
            normalize_image_url("HTTPS://Example.com/A.png").as_deref(),
            Some("HTTPS://Example.com/A.png")
        );
    }

    #[test]
    fn blank_and_host_less_values_are_dropped() {
        assert_eq!(normalize_image_url(""), None);
        assert_eq!(normalize_image_url("   "), None);
        assert_eq!(normalize_image_url("/media/games/abc.jpg"), None);
        assert_eq!(normalize_image_url("//"), None);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            normalize_image_url("  //cdn.example.com/x.jpg \n").as_deref(),
            Some("https://cdn.example.com/x.jpg")
        );
    }

    #[test]
    fn optional_values() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(
            normalize_optional(Some("//a.b/c")).as_deref(),
            Some("https://a.b/c")
        );
    }
}

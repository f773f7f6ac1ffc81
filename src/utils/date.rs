use chrono::{Datelike, NaiveDate};

/// RAWG 接口中日期字段的格式
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// 解析接口返回的日期字符串，格式不合法时返回 None
pub fn parse_api_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, API_DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::debug!("无法解析日期 {}: {}", raw, e);
            None
        }
    }
}

/// 格式化发售日期，例如 `Sep 17, 2013`
pub fn format_release_date(date: Option<NaiveDate>, tba: bool) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None if tba => "TBA".to_string(),
        None => "Unknown".to_string(),
    }
}

/// 相对今天的年份描述
pub fn format_relative_year(date: NaiveDate, today: NaiveDate) -> String {
    let years = today.year() - date.year();
    match years {
        i32::MIN..=0 => "this year".to_string(),
        1 => "last year".to_string(),
        n => format!("{} years ago", n),
    }
}

/// 构造 `dates` 查询参数（`from,to`）
pub fn format_date_range(from: NaiveDate, to: NaiveDate) -> String {
    format!(
        "{},{}",
        from.format(API_DATE_FORMAT),
        to.format(API_DATE_FORMAT)
    )
}

use chrono::{DateTime, Datelike, FixedOffset};

const MONTHS_PT_BR: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

/// 解析 CMS 日期
///
/// Prismic 使用 `2021-03-15T19:25:28+0000`，其他来源使用 RFC 3339。
pub fn parse_publication_date(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
}

/// 以 `dd MMM yyyy` 格式展示日期，月份为葡萄牙语缩写
pub fn display_date(date: &DateTime<FixedOffset>) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_PT_BR[date.month0() as usize],
        date.year()
    )
}

//! 后端时间字段解析
//!
//! 后端把时间序列化成 `[yyyy, M, d, HH, mm, ss]` 形式的整数数组，缺省的分量按最小值补齐

use chrono::{NaiveDate, NaiveDateTime};

/// 把 `[yyyy, M, d, HH, mm, ss]` 转成本地时间，年份缺失或数值非法时返回 None
pub fn from_parts(parts: &[i32]) -> Option<NaiveDateTime> {
    let year = *parts.first()?;
    let component = |i: usize, default: u32| {
        parts
            .get(i)
            .and_then(|v| u32::try_from(*v).ok())
            .unwrap_or(default)
    };

    NaiveDate::from_ymd_opt(year, component(1, 1), component(2, 1))?.and_hms_opt(
        component(3, 0),
        component(4, 0),
        component(5, 0),
    )
}

/// 展示用文本 `YYYY-MM-DD HH:MM`，不足五个分量时为空串
pub fn display(parts: &[i32]) -> String {
    if parts.len() < 5 {
        return String::new();
    }
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}",
        parts[0], parts[1], parts[2], parts[3], parts[4]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_missing_components() {
        let t = from_parts(&[2025, 3]).unwrap();
        assert_eq!(t.to_string(), "2025-03-01 00:00:00");
    }

    #[test]
    fn rejects_invalid_dates() {
        assert!(from_parts(&[]).is_none());
        assert!(from_parts(&[2025, 13, 1]).is_none());
    }

    #[test]
    fn display_needs_five_parts() {
        assert_eq!(display(&[2025, 8, 7, 9, 5]), "2025-08-07 09:05");
        assert_eq!(display(&[2025, 8, 7]), "");
    }
}

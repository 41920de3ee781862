//! 日期字符串处理模块
//!
//! 后端以 ISO 8601 日期时间串传输日期（如 `2026-09-01T00:00:00.000Z`），
//! 而 `<input type="date">` 只接受 `YYYY-MM-DD`。本模块在两种表示之间
//! 转换，并提供界面展示格式。纯函数实现，宿主机与 wasm32 均可编译。

use chrono::NaiveDate;

/// 取 ISO 日期时间串的日期部分，作为 date input 的值
///
/// 对已经是 `YYYY-MM-DD` 的输入原样返回。
pub fn date_input_value(raw: &str) -> &str {
    raw.split('T').next().unwrap_or(raw)
}

/// 解析日期部分为 `NaiveDate`
///
/// # 返回
/// - `None` 如果字符串为空或不是合法日期
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date_input_value(raw), "%Y-%m-%d").ok()
}

/// 界面展示格式：`DD/MM/YYYY`（原产品的 en-IN 习惯）
///
/// 无法解析时原样返回输入，避免吞掉后端给出的内容。
pub fn format_display(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => raw.to_string(),
    }
}

/// 截止日期是否已过期（严格早于今天）
///
/// `today` 由调用方以 `YYYY-MM-DD` 提供，保持本模块无环境依赖。
pub fn is_overdue(due_date: &str, today: &str) -> bool {
    match (parse_date(due_date), parse_date(today)) {
        (Some(due), Some(now)) => due < now,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cuts_iso_datetime_at_t() {
        assert_eq!(date_input_value("2026-09-01T00:00:00.000Z"), "2026-09-01");
        assert_eq!(date_input_value("2026-09-01"), "2026-09-01");
        assert_eq!(date_input_value(""), "");
    }

    #[test]
    fn display_format_is_en_in() {
        assert_eq!(format_display("2026-09-01T10:30:00Z"), "01/09/2026");
        assert_eq!(format_display("2026-01-15"), "15/01/2026");
        // 不合法输入原样透传
        assert_eq!(format_display("soon"), "soon");
        assert_eq!(format_display(""), "");
    }

    #[test]
    fn overdue_is_strictly_before_today() {
        assert!(is_overdue("2026-08-06", "2026-08-07"));
        assert!(!is_overdue("2026-08-07", "2026-08-07"));
        assert!(!is_overdue("2026-08-08", "2026-08-07"));
        // 任一侧无法解析时不判定为过期
        assert!(!is_overdue("", "2026-08-07"));
        assert!(!is_overdue("2026-08-06", "nope"));
    }
}

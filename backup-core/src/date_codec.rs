//! 备份文件名中内嵌时间戳（`yyyyMMdd_HHmmss`）的解析与格式化

use crate::constants::backup::{TIMESTAMP_LEN, TIMESTAMP_PATTERN};
use chrono::NaiveDateTime;

/// 严格解析时间戳，任何格式偏差都返回 `None`
pub fn parse(text: &str) -> Option<NaiveDateTime> {
    if !has_timestamp_shape(text) {
        return None;
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_PATTERN).ok()
}

/// 格式化为文件名中使用的时间戳
pub fn format(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_PATTERN).to_string()
}

// chrono 的 %Y 接受符号和超长年份，这里先按固定宽度把关
fn has_timestamp_shape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == TIMESTAMP_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            8 => *b == b'_',
            _ => b.is_ascii_digit(),
        })
}

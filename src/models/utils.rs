use serde::{Deserialize, Deserializer};

/// 反序列化可选字符串，将空字符串（或纯空白）转换为None
///
/// # 参数
/// - `deserializer`: 用于反序列化的serde反序列化器
///
/// # 返回值
/// 去除首尾空白后的字符串；为空时返回None
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// 按配置的精度格式化指标值
pub fn format_metric(value: f64, precision: usize) -> String {
    format!("{:.*}", precision, value)
}

use serde::Deserialize;

pub const DEFAULT_FILE_EXTENSION: &str = "csv";
pub const DEFAULT_EXCLUDE_MARKER: &str = "info";
pub const DEFAULT_VAL_COLUMN: &str = "val_auroc";
pub const DEFAULT_TEST_COLUMN: &str = "test_auroc";
pub const DEFAULT_PRECISION: usize = 6;

/// 应用程序配置结构
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub columns: ColumnsConfig,
    pub report: ReportConfig,
}

/// 通用配置：结果文件的筛选方式
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneralConfig {
    pub file_extension: String,
    // 空字符串表示不排除任何文件
    #[serde(deserialize_with = "crate::models::utils::deserialize_optional_string")]
    pub exclude_marker: Option<String>,
    pub sort_entries: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            exclude_marker: Some(DEFAULT_EXCLUDE_MARKER.to_string()),
            sort_entries: true,
        }
    }
}

/// 指标列名配置
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ColumnsConfig {
    pub val_column: String,
    pub test_column: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            val_column: DEFAULT_VAL_COLUMN.to_string(),
            test_column: DEFAULT_TEST_COLUMN.to_string(),
        }
    }
}

/// 报告输出配置
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    pub precision: usize,
    pub show_folders: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            show_folders: true,
        }
    }
}

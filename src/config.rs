use crate::models::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "auroc_explorer.toml";

const DEFAULT_CONFIG_TOML: &str = r#"[general]
file_extension = "csv"
# 文件名包含该标记（大小写不敏感）的表格被视为元数据文件，留空表示不排除
exclude_marker = "info"
# 按名称排序子目录和候选文件，使结果可复现
sort_entries = true

[columns]
val_column = "val_auroc"
test_column = "test_auroc"

[report]
precision = 6
show_folders = true
"#;

/// 加载配置文件
///
/// 未指定路径时尝试默认文件，不存在则使用内置默认值；
/// 显式指定的文件不存在时返回错误。
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if !default_path.exists() {
                debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                return Ok(Config::default());
            }
            default_path
        }
    };

    // 读取配置文件内容
    let config_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // 按扩展名选择解析格式，默认TOML
    let is_yaml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let config: Config = if is_yaml {
        serde_yaml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    } else {
        toml::from_str(&config_content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?
    };

    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// 写出默认配置文件，已存在时报错而不覆盖
pub fn create_default_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        anyhow::bail!("Config file {} already exists", config_path.display());
    }

    fs::write(config_path, DEFAULT_CONFIG_TOML)
        .with_context(|| format!("Failed to create default config file: {}", config_path.display()))?;

    Ok(())
}

//! 命令行参数解析
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use crate::models::Config;

/// 扫描实验结果目录，报告验证指标最佳的一行及其对应的测试指标
///
/// Examples:
///   auroc_explorer lightning_logs/
///   auroc_explorer seed_1/ seed_2/ seed_3/
///   auroc_explorer --multi seed_1/ --val-column val_f1 --test-column test_f1
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// 根目录；多个根目录时计算各目录最佳结果的平均值
    #[arg(value_name = "DIR", required_unless_present = "init_config")]
    pub dirs: Vec<PathBuf>,

    /// 即使只有一个根目录也使用多目录汇总报告
    #[arg(long)]
    pub multi: bool,

    /// 配置文件路径（TOML或YAML）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// 在当前目录生成默认配置文件后退出
    #[arg(long)]
    pub init_config: bool,

    /// 结果文件扩展名
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// 排除文件名包含该标记的表格，传入空字符串表示不排除
    #[arg(long, value_name = "MARKER")]
    pub exclude_marker: Option<String>,

    /// 验证指标列名
    #[arg(long, value_name = "COLUMN")]
    pub val_column: Option<String>,

    /// 测试指标列名
    #[arg(long, value_name = "COLUMN")]
    pub test_column: Option<String>,

    /// 按目录列出顺序扫描，不按名称排序
    #[arg(long)]
    pub no_sort: bool,

    /// 输出的小数位数
    #[arg(long, value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// 输出调试日志
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// 只输出错误日志
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn is_multi(&self) -> bool {
        self.multi || self.dirs.len() > 1
    }

    pub fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            Level::INFO
        }
    }

    /// 用命令行参数覆盖配置文件中的值
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ext) = &self.extension {
            config.general.file_extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(marker) = &self.exclude_marker {
            let marker = marker.trim();
            config.general.exclude_marker = (!marker.is_empty()).then(|| marker.to_string());
        }
        if let Some(column) = &self.val_column {
            config.columns.val_column = column.clone();
        }
        if let Some(column) = &self.test_column {
            config.columns.test_column = column.clone();
        }
        if self.no_sort {
            config.general.sort_entries = false;
        }
        if let Some(precision) = self.precision {
            config.report.precision = precision;
        }
    }
}

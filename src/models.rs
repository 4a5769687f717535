// models.rs - 作为模块目录入口文件（Rust 2018+ 风格）
pub mod config;
pub mod results;
pub mod utils;

pub use config::{ColumnsConfig, Config, GeneralConfig};
pub use results::{DirectorySummary, FolderResult, MetricPair, MinMax, MultiDirectorySummary};
pub use utils::format_metric;

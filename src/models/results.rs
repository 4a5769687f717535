use std::path::PathBuf;

/// 单个结果表中验证指标最大的一行（验证值与同一行的测试值）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPair {
    pub val_auroc: f64,
    pub test_auroc: f64,
}

/// 单个实验文件夹的扫描结果
#[derive(Debug, Clone, PartialEq)]
pub struct FolderResult {
    pub folder_name: String,  // 子目录名
    pub file_name: String,  // 被选中的结果文件名
    pub best_val_auroc: f64,
    pub paired_test_auroc: f64,
}

impl FolderResult {
    pub fn new(folder_name: impl Into<String>, file_name: impl Into<String>, pair: MetricPair) -> Self {
        Self {
            folder_name: folder_name.into(),
            file_name: file_name.into(),
            best_val_auroc: pair.val_auroc,
            paired_test_auroc: pair.test_auroc,
        }
    }
}

/// 单个根目录的汇总：全局最佳文件夹以及所有有效的文件夹结果
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySummary {
    pub root: PathBuf,
    pub overall_best_val_auroc: f64,
    pub overall_best_test_auroc: f64,
    pub best_folder: String,
    pub best_file: String,
    pub all_folder_results: Vec<FolderResult>,
}

/// 一组数值的最小值和最大值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl MinMax {
    /// 空序列返回None
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(MinMax { min: v, max: v }),
            Some(m) => Some(MinMax { min: m.min.min(v), max: m.max.max(v) }),
        })
    }
}

/// 多个根目录的汇总统计
#[derive(Debug, Clone, PartialEq)]
pub struct MultiDirectorySummary {
    pub directories_requested: usize,
    // 只包含产生有效结果的根目录，按输入顺序
    pub directory_summaries: Vec<DirectorySummary>,
    pub avg_val_auroc: f64,
    pub avg_test_auroc: f64,
    pub val_range: MinMax,
    pub test_range: MinMax,
    pub all_results: Vec<FolderResult>,
}

impl MultiDirectorySummary {
    pub fn directories_with_results(&self) -> usize {
        self.directory_summaries.len()
    }
}

// src/aggregator.rs
use std::path::{Path, PathBuf};
use anyhow::Result;
use tracing::{debug, info, warn};
use crate::file_utils::{display_name, find_result_file, list_subdirectories};
use crate::metric_extractor::extract_best_metrics;
use crate::models::{Config, DirectorySummary, FolderResult, MinMax, MultiDirectorySummary};

/// 扫描单个实验文件夹；没有可用结果时返回None（已记录警告）
fn scan_folder(folder: &Path, config: &Config) -> Option<FolderResult> {
    let result_file = match find_result_file(folder, &config.general) {
        Ok(Some(file)) => file,
        Ok(None) => {
            warn!(
                "No .{} file without '{}' found in {}",
                config.general.file_extension,
                config.general.exclude_marker.as_deref().unwrap_or(""),
                folder.display()
            );
            return None;
        }
        Err(e) => {
            warn!("Failed to scan {}: {:#}", folder.display(), e);
            return None;
        }
    };

    match extract_best_metrics(&result_file, &config.columns) {
        Ok(pair) => {
            let result = FolderResult::new(display_name(folder), display_name(&result_file), pair);
            debug!(
                "{}: best {}={} ({}={}) in {}",
                result.folder_name,
                config.columns.val_column,
                result.best_val_auroc,
                config.columns.test_column,
                result.paired_test_auroc,
                result.file_name
            );
            Some(result)
        }
        Err(e) => {
            warn!("Skipping {}: {}", folder.display(), e);
            None
        }
    }
}

/// 从文件夹结果中选出验证指标最大的一个；相同值时保留最先出现的
fn pick_best(results: &[FolderResult]) -> Option<&FolderResult> {
    results.iter().fold(None, |best, r| match best {
        Some(b) if r.best_val_auroc <= b.best_val_auroc => Some(b),
        _ => Some(r),
    })
}

/// 分析根目录下所有子目录，找出全局最佳的验证指标
///
/// 根目录不存在时返回错误；没有任何有效子目录时返回`Ok(None)`。
pub fn analyze_directory(root: &Path, config: &Config) -> Result<Option<DirectorySummary>> {
    let folders = list_subdirectories(root, config.general.sort_entries)?;
    debug!("Found {} subdirectories in {}", folders.len(), root.display());

    let results: Vec<FolderResult> = folders
        .iter()
        .filter_map(|folder| scan_folder(folder, config))
        .collect();

    let Some(best) = pick_best(&results).cloned() else {
        return Ok(None);
    };

    Ok(Some(DirectorySummary {
        root: root.to_path_buf(),
        overall_best_val_auroc: best.best_val_auroc,
        overall_best_test_auroc: best.paired_test_auroc,
        best_folder: best.folder_name,
        best_file: best.file_name,
        all_folder_results: results,
    }))
}

/// 过滤掉不存在的根目录（记录警告），保持输入顺序
pub fn existing_directories(roots: &[PathBuf]) -> Vec<PathBuf> {
    roots
        .iter()
        .filter(|root| {
            let exists = root.exists();
            if !exists {
                warn!("Directory {} does not exist. Skipping.", root.display());
            }
            exists
        })
        .cloned()
        .collect()
}

/// 根据各根目录的汇总计算平均值与最值；没有任何汇总时返回None
pub fn summarize_directories(directories_requested: usize, summaries: Vec<DirectorySummary>) -> Option<MultiDirectorySummary> {
    if summaries.is_empty() {
        return None;
    }

    let count = summaries.len() as f64;
    let avg_val_auroc = summaries.iter().map(|s| s.overall_best_val_auroc).sum::<f64>() / count;
    let avg_test_auroc = summaries.iter().map(|s| s.overall_best_test_auroc).sum::<f64>() / count;
    let val_range = MinMax::from_values(summaries.iter().map(|s| s.overall_best_val_auroc))?;
    let test_range = MinMax::from_values(summaries.iter().map(|s| s.overall_best_test_auroc))?;

    let all_results = summaries
        .iter()
        .flat_map(|s| s.all_folder_results.iter().cloned())
        .collect();

    Some(MultiDirectorySummary {
        directories_requested,
        directory_summaries: summaries,
        avg_val_auroc,
        avg_test_auroc,
        val_range,
        test_range,
        all_results,
    })
}

/// 依次分析多个根目录并计算各目录最佳结果的平均值
///
/// 不存在的根目录或没有有效结果的根目录会被跳过（记录警告）。
pub fn analyze_multiple_directories(roots: &[PathBuf], config: &Config) -> Option<MultiDirectorySummary> {
    let mut summaries = Vec::new();

    for (i, root) in roots.iter().enumerate() {
        info!("[{}/{}] Analyzing directory: {}", i + 1, roots.len(), root.display());

        match analyze_directory(root, config) {
            Ok(Some(summary)) => summaries.push(summary),
            Ok(None) => warn!("No valid results found in {}", root.display()),
            Err(e) => warn!("Skipping {}: {:#}", root.display(), e),
        }
    }

    summarize_directories(roots.len(), summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    // 辅助函数：在根目录下创建一个带结果表的实验文件夹
    fn create_run(root: &Path, folder: &str, rows: &[(f64, f64)]) {
        let dir = root.join(folder);
        fs::create_dir_all(&dir).unwrap();
        let mut contents = String::from("epoch,val_auroc,test_auroc\n");
        for (epoch, (val, test)) in rows.iter().enumerate() {
            contents.push_str(&format!("{},{},{}\n", epoch, val, test));
        }
        fs::write(dir.join("metrics.csv"), contents).unwrap();
        fs::write(dir.join("run_info.csv"), "val_auroc,test_auroc\n0.99,0.99\n").unwrap();
    }

    fn summary(root: &str, val: f64, test: f64) -> DirectorySummary {
        DirectorySummary {
            root: PathBuf::from(root),
            overall_best_val_auroc: val,
            overall_best_test_auroc: test,
            best_folder: "run".to_string(),
            best_file: "metrics.csv".to_string(),
            all_folder_results: vec![FolderResult {
                folder_name: format!("{}-run", root),
                file_name: "metrics.csv".to_string(),
                best_val_auroc: val,
                paired_test_auroc: test,
            }],
        }
    }

    #[test]
    fn test_single_folder_matches_table_maximum() {
        let temp_dir = tempdir().unwrap();
        create_run(temp_dir.path(), "run_a", &[(0.6, 0.55), (0.74, 0.7), (0.71, 0.73)]);

        let summary = analyze_directory(temp_dir.path(), &Config::default()).unwrap().unwrap();
        assert_eq!(summary.overall_best_val_auroc, 0.74);
        assert_eq!(summary.overall_best_test_auroc, 0.7);
        assert_eq!(summary.best_folder, "run_a");
        assert_eq!(summary.best_file, "metrics.csv");
        assert_eq!(summary.all_folder_results.len(), 1);
    }

    #[test]
    fn test_best_folder_across_subdirectories() {
        let temp_dir = tempdir().unwrap();
        create_run(temp_dir.path(), "A", &[(0.7, 0.72), (0.81, 0.79)]);
        create_run(temp_dir.path(), "B", &[(0.85, 0.77), (0.8, 0.8)]);

        let summary = analyze_directory(temp_dir.path(), &Config::default()).unwrap().unwrap();
        assert_eq!(summary.best_folder, "B");
        assert_eq!(summary.overall_best_val_auroc, 0.85);
        assert_eq!(summary.overall_best_test_auroc, 0.77);

        let folders: Vec<&str> = summary.all_folder_results.iter().map(|r| r.folder_name.as_str()).collect();
        assert_eq!(folders, vec!["A", "B"]);
    }

    #[test]
    fn test_folder_tie_keeps_first_in_sorted_order() {
        let temp_dir = tempdir().unwrap();
        create_run(temp_dir.path(), "run_b", &[(0.9, 0.6)]);
        create_run(temp_dir.path(), "run_a", &[(0.9, 0.5)]);

        let summary = analyze_directory(temp_dir.path(), &Config::default()).unwrap().unwrap();
        assert_eq!(summary.best_folder, "run_a");
        assert_eq!(summary.overall_best_test_auroc, 0.5);
    }

    #[test]
    fn test_unsorted_scan_visits_every_folder() {
        let temp_dir = tempdir().unwrap();
        create_run(temp_dir.path(), "run_c", &[(0.7, 0.6)]);
        create_run(temp_dir.path(), "run_a", &[(0.92, 0.81)]);
        create_run(temp_dir.path(), "run_b", &[(0.88, 0.9)]);

        let mut config = Config::default();
        config.general.sort_entries = false;
        let summary = analyze_directory(temp_dir.path(), &config).unwrap().unwrap();

        let mut folders: Vec<&str> = summary.all_folder_results.iter().map(|r| r.folder_name.as_str()).collect();
        folders.sort();
        assert_eq!(folders, vec!["run_a", "run_b", "run_c"]);
        // 没有并列时最佳结果与遍历顺序无关
        assert_eq!(summary.best_folder, "run_a");
        assert_eq!(summary.overall_best_test_auroc, 0.81);
        // info文件在不排序时同样被排除
        assert!(summary.all_folder_results.iter().all(|r| r.file_name == "metrics.csv"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlinks_do_not_abort_scan() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        create_run(root, "run_a", &[(0.8, 0.75)]);
        std::os::unix::fs::symlink(root.join("gone"), root.join("latest")).unwrap();
        std::os::unix::fs::symlink(root.join("missing.ckpt"), root.join("run_a").join("last.ckpt")).unwrap();

        let summary = analyze_directory(root, &Config::default()).unwrap().unwrap();
        assert_eq!(summary.best_folder, "run_a");
        assert_eq!(summary.overall_best_val_auroc, 0.8);
    }

    #[test]
    fn test_no_qualifying_subdirectories() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("loose.csv"), "val_auroc,test_auroc\n0.9,0.9\n").unwrap();
        fs::create_dir(root.join("empty")).unwrap();

        let summary = analyze_directory(root, &Config::default()).unwrap();
        assert!(summary.is_none());
    }

    #[test]
    fn test_info_only_folder_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        create_run(root, "good", &[(0.8, 0.7)]);
        let info_only = root.join("info_only");
        fs::create_dir(&info_only).unwrap();
        fs::write(info_only.join("experiment_INFO.csv"), "val_auroc,test_auroc\n0.99,0.99\n").unwrap();

        let summary = analyze_directory(root, &Config::default()).unwrap().unwrap();
        assert_eq!(summary.best_folder, "good");
        assert_eq!(summary.all_folder_results.len(), 1);
    }

    #[test]
    fn test_malformed_table_is_skipped() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        create_run(root, "good", &[(0.8, 0.7)]);
        let broken = root.join("broken");
        fs::create_dir(&broken).unwrap();
        fs::write(broken.join("metrics.csv"), "val_auroc,loss\n0.95,0.1\n").unwrap();

        let summary = analyze_directory(root, &Config::default()).unwrap().unwrap();
        assert_eq!(summary.best_folder, "good");
        assert_eq!(summary.overall_best_val_auroc, 0.8);
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp_dir = tempdir().unwrap();
        let result = analyze_directory(&temp_dir.path().join("nope"), &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_summarize_directories_average() {
        let multi = summarize_directories(2, vec![summary("r1", 0.8, 0.7), summary("r2", 0.9, 0.6)]).unwrap();

        assert!((multi.avg_val_auroc - 0.85).abs() < 1e-12);
        assert!((multi.avg_test_auroc - 0.65).abs() < 1e-12);
        assert_eq!(multi.val_range, MinMax { min: 0.8, max: 0.9 });
        assert_eq!(multi.test_range, MinMax { min: 0.6, max: 0.7 });
        assert_eq!(multi.directories_with_results(), 2);
        assert_eq!(multi.all_results.len(), 2);
    }

    #[test]
    fn test_summarize_directories_empty() {
        assert!(summarize_directories(3, Vec::new()).is_none());
    }

    #[test]
    fn test_analyze_multiple_directories() {
        let temp_dir = tempdir().unwrap();
        let root1 = temp_dir.path().join("seed_1");
        let root2 = temp_dir.path().join("seed_2");
        let empty_root = temp_dir.path().join("seed_3");
        create_run(&root1, "run_a", &[(0.7, 0.65), (0.8, 0.7)]);
        create_run(&root2, "run_a", &[(0.9, 0.6)]);
        create_run(&root2, "run_b", &[(0.85, 0.9)]);
        fs::create_dir(&empty_root).unwrap();
        let missing_root = temp_dir.path().join("seed_4");

        let roots = vec![root1.clone(), missing_root, empty_root, root2.clone()];
        let multi = analyze_multiple_directories(&roots, &Config::default()).unwrap();

        assert_eq!(multi.directories_requested, 4);
        assert_eq!(multi.directories_with_results(), 2);
        assert_eq!(multi.directory_summaries[0].root, root1);
        assert_eq!(multi.directory_summaries[1].root, root2);
        assert!((multi.avg_val_auroc - 0.85).abs() < 1e-12);
        assert!((multi.avg_test_auroc - 0.65).abs() < 1e-12);
        assert_eq!(multi.all_results.len(), 3);
    }

    #[test]
    fn test_analyze_multiple_directories_no_results() {
        let temp_dir = tempdir().unwrap();
        let roots = vec![temp_dir.path().join("missing"), temp_dir.path().to_path_buf()];
        assert!(analyze_multiple_directories(&roots, &Config::default()).is_none());
    }

    #[test]
    fn test_existing_directories() {
        let temp_dir = tempdir().unwrap();
        let present = temp_dir.path().to_path_buf();
        let absent = temp_dir.path().join("absent");

        let kept = existing_directories(&[absent, present.clone()]);
        assert_eq!(kept, vec![present]);
    }
}

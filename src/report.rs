// src/report.rs
use crate::models::{Config, DirectorySummary, MultiDirectorySummary, format_metric};

const WIDE_RULE: usize = 60;
const RULE: usize = 50;

fn rule(width: usize) -> String {
    format!("{}\n", "=".repeat(width))
}

/// 每个文件夹的最佳结果
fn write_folder_lines(out: &mut String, summary: &DirectorySummary, config: &Config, indent: &str) {
    let p = config.report.precision;
    for result in &summary.all_folder_results {
        out.push_str(&format!("{}Folder: {}\n", indent, result.folder_name));
        out.push_str(&format!("{}  File: {}\n", indent, result.file_name));
        out.push_str(&format!("{}  Best {}: {}\n", indent, config.columns.val_column, format_metric(result.best_val_auroc, p)));
        out.push_str(&format!("{}  Corresponding {}: {}\n", indent, config.columns.test_column, format_metric(result.paired_test_auroc, p)));
    }
}

/// 单根目录报告；summary为None时输出“无结果”
pub fn render_directory_report(summary: Option<&DirectorySummary>, config: &Config) -> String {
    let p = config.report.precision;
    let mut out = String::new();

    if let Some(summary) = summary.filter(|_| config.report.show_folders) {
        write_folder_lines(&mut out, summary, config, "");
        out.push('\n');
    }

    out.push_str(&rule(RULE));
    out.push_str("OVERALL RESULTS\n");
    out.push_str(&rule(RULE));

    match summary {
        Some(summary) => {
            out.push_str(&format!("Overall best {}: {}\n", config.columns.val_column, format_metric(summary.overall_best_val_auroc, p)));
            out.push_str(&format!("Corresponding {}: {}\n", config.columns.test_column, format_metric(summary.overall_best_test_auroc, p)));
            out.push_str(&format!("Found in folder: {}\n", summary.best_folder));
            out.push_str(&format!("From file: {}\n", summary.best_file));
        }
        None => {
            out.push_str("No valid results found.\n");
        }
    }

    out
}

/// 多根目录汇总报告
pub fn render_multi_report(summary: Option<&MultiDirectorySummary>, config: &Config) -> String {
    let p = config.report.precision;
    let val = &config.columns.val_column;
    let test = &config.columns.test_column;
    let mut out = String::new();

    let Some(summary) = summary else {
        out.push_str(&rule(WIDE_RULE));
        out.push_str("No valid results found in any directory.\n");
        return out;
    };

    for dir in &summary.directory_summaries {
        out.push_str(&format!("{}\n", dir.root.display()));
        out.push_str(&format!("{}\n", "-".repeat(40)));
        if config.report.show_folders {
            write_folder_lines(&mut out, dir, config, "  ");
        }
        out.push_str(&format!("  → Best {} for this directory: {}\n", val, format_metric(dir.overall_best_val_auroc, p)));
        out.push_str(&format!("  → Corresponding {}: {}\n", test, format_metric(dir.overall_best_test_auroc, p)));
        out.push('\n');
    }

    out.push_str(&rule(WIDE_RULE));
    out.push_str("OVERALL RESULTS ACROSS ALL DIRECTORIES\n");
    out.push_str(&rule(WIDE_RULE));
    out.push_str(&format!("Number of directories processed: {}\n", summary.directories_requested));
    out.push_str(&format!("Number of directories with valid results: {}\n", summary.directories_with_results()));
    out.push_str(&format!("Number of folders with valid results: {}\n", summary.all_results.len()));
    out.push_str(&format!("Average best {} across directories: {}\n", val, format_metric(summary.avg_val_auroc, p)));
    out.push_str(&format!("Average corresponding {}: {}\n", test, format_metric(summary.avg_test_auroc, p)));

    out.push_str("\nDetailed statistics:\n");
    out.push_str(&format!("  {} - Min: {}, Max: {}\n", val, format_metric(summary.val_range.min, p), format_metric(summary.val_range.max, p)));
    out.push_str(&format!("  {} - Min: {}, Max: {}\n", test, format_metric(summary.test_range.min, p), format_metric(summary.test_range.max, p)));

    out.push_str("\nIndividual directory results:\n");
    for dir in &summary.directory_summaries {
        out.push_str(&format!(
            "  {}: {}={}, {}={} ({}/{})\n",
            dir.root.display(),
            val,
            format_metric(dir.overall_best_val_auroc, p),
            test,
            format_metric(dir.overall_best_test_auroc, p),
            dir.best_folder,
            dir.best_file
        ));
    }

    out.push_str("\nFINAL AVERAGE SCORES:\n");
    out.push_str(&format!("   Average {}: {}\n", val, format_metric(summary.avg_val_auroc, p)));
    out.push_str(&format!("   Average {}: {}\n", test, format_metric(summary.avg_test_auroc, p)));

    out
}

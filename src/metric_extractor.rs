// src/metric_extractor.rs
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use crate::models::{ColumnsConfig, MetricPair};

/// 视为缺失值的单元格内容
const MISSING_VALUES: &[&str] = &["", "nan", "-nan", "null", "none", "na", "n/a"];

/// 提取指标时可能出现的错误，均为可报告、非致命的错误
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },

    #[error("Required columns not found in {}: {}", .path.display(), .columns.join(", "))]
    MissingColumns {
        path: PathBuf,
        columns: Vec<String>,
    },

    #[error("Invalid value '{value}' in column '{column}' at row {row} of {}", .path.display())]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    #[error("No usable '{column}' values in {}", .path.display())]
    NoValidRows {
        path: PathBuf,
        column: String,
    },

    #[error("Missing '{column}' value at row {row} of {}", .path.display())]
    MissingPairedValue {
        path: PathBuf,
        row: usize,
        column: String,
    },
}

/// 根据扩展名选择分隔符，tsv使用制表符
fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

/// 解析单元格；缺失值和NaN返回`Ok(None)`，无法解析的文本返回`Err(())`
fn parse_cell(raw: &str) -> Result<Option<f64>, ()> {
    let trimmed = raw.trim();
    if MISSING_VALUES.iter().any(|m| trimmed.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => Ok(None),
        Ok(v) => Ok(Some(v)),
        Err(_) => Err(()),
    }
}

/// 读取结果表，找出验证指标最大的一行并返回该行的（验证值，测试值）
///
/// 相同最大值时取最先出现的一行；验证值缺失或为NaN的行不参与比较。
pub fn extract_best_metrics(path: &Path, columns: &ColumnsConfig) -> Result<MetricPair, ExtractError> {
    let file = File::open(path).map_err(|source| ExtractError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter_for(path))
        .trim(csv::Trim::Headers)
        .from_reader(BufReader::new(file));

    let csv_error = |source: csv::Error| ExtractError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(csv_error)?.clone();
    let val_idx = headers.iter().position(|h| h == columns.val_column);
    let test_idx = headers.iter().position(|h| h == columns.test_column);

    let (val_idx, test_idx) = match (val_idx, test_idx) {
        (Some(v), Some(t)) => (v, t),
        _ => {
            let mut missing = Vec::new();
            if val_idx.is_none() {
                missing.push(columns.val_column.clone());
            }
            if test_idx.is_none() {
                missing.push(columns.test_column.clone());
            }
            return Err(ExtractError::MissingColumns {
                path: path.to_path_buf(),
                columns: missing,
            });
        }
    };

    // (行号, 验证值, 原始测试值)
    let mut best: Option<(usize, f64, String)> = None;

    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(csv_error)?;
        let row = i + 1;

        let raw_val = record.get(val_idx).unwrap_or("");
        let val = parse_cell(raw_val).map_err(|_| ExtractError::InvalidValue {
            path: path.to_path_buf(),
            row,
            column: columns.val_column.clone(),
            value: raw_val.to_string(),
        })?;

        let Some(val) = val else { continue };

        // 严格大于：相同值保留第一次出现的行
        if best.as_ref().is_none_or(|(_, best_val, _)| val > *best_val) {
            let raw_test = record.get(test_idx).unwrap_or("").to_string();
            best = Some((row, val, raw_test));
        }
    }

    let (row, val_auroc, raw_test) = best.ok_or_else(|| ExtractError::NoValidRows {
        path: path.to_path_buf(),
        column: columns.val_column.clone(),
    })?;

    let test_auroc = parse_cell(&raw_test)
        .map_err(|_| ExtractError::InvalidValue {
            path: path.to_path_buf(),
            row,
            column: columns.test_column.clone(),
            value: raw_test.clone(),
        })?
        .ok_or_else(|| ExtractError::MissingPairedValue {
            path: path.to_path_buf(),
            row,
            column: columns.test_column.clone(),
        })?;

    Ok(MetricPair { val_auroc, test_auroc })
}

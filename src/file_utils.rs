use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};
use anyhow::{Context, Result};
use tracing::{debug, warn};
use crate::models::GeneralConfig;

/// 检查根目录是否存在且为目录
pub fn ensure_root_dir(root: &Path) -> Result<()> {
    if !root.exists() {
        anyhow::bail!("Directory '{}' does not exist", root.display());
    }

    if !root.is_dir() {
        anyhow::bail!("'{}' is not a directory", root.display());
    }

    Ok(())
}

/// 遍历目录的直接子项；无法读取的子项（如失效的符号链接）交给`on_skip`后跳过，
/// 只有目录本身读取失败时才返回错误
fn child_entries(dir: &Path, sort_entries: bool, on_skip: impl Fn(&walkdir::Error)) -> Result<Vec<DirEntry>> {
    let walker = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1);
    let walker = if sort_entries { walker.sort_by_file_name() } else { walker };

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) if e.depth() > 0 => on_skip(&e),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to list directory: {}", dir.display()));
            }
        }
    }

    Ok(entries)
}

/// 列出根目录下的直接子目录（跳过普通文件和无法读取的子项）
pub fn list_subdirectories(root: &Path, sort_entries: bool) -> Result<Vec<PathBuf>> {
    ensure_root_dir(root)?;

    let entries = child_entries(root, sort_entries, |e| warn!("Skipping unreadable entry in {}: {}", root.display(), e))?;

    Ok(entries
        .into_iter()
        .filter(|entry| entry.file_type().is_dir())
        .map(DirEntry::into_path)
        .collect())
}

/// 是否为指定扩展名的非隐藏文件（扩展名区分大小写）
fn is_candidate(entry: &DirEntry, extension: &str) -> bool {
    entry.file_type().is_file()
        && !entry.file_name().to_string_lossy().starts_with('.')
        && entry.path()
            .extension()
            .map(|ext| ext == extension)
            .unwrap_or(false)
}

/// 文件名（小写）中是否包含排除标记
fn is_excluded(file_name: &str, exclude_marker: Option<&str>) -> bool {
    match exclude_marker {
        Some(marker) => file_name.to_lowercase().contains(&marker.to_lowercase()),
        None => false,
    }
}

/// 在文件夹中查找第一个不含排除标记的结果文件
///
/// 没有符合条件的文件时返回`Ok(None)`，这不是错误。
pub fn find_result_file(folder: &Path, general: &GeneralConfig) -> Result<Option<PathBuf>> {
    let entries = child_entries(folder, general.sort_entries, |e| debug!("Ignoring unreadable entry in {}: {}", folder.display(), e))?;

    for entry in entries {
        if !is_candidate(&entry, &general.file_extension) {
            continue;
        }

        let excluded = is_excluded(&entry.file_name().to_string_lossy(), general.exclude_marker.as_deref());
        if !excluded {
            return Ok(Some(entry.into_path()));
        }
    }

    Ok(None)
}

/// 取路径最后一段作为显示名
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

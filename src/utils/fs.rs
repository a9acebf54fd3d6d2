//! # 文件系统工具
//!
//! 写出前备份已有文件，以及 NEB 图像目录的查找。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `walkdir` + `glob` 查找目录

use crate::error::{Result, VasputilError};
use crate::utils::output::print_backup;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// 若文件已存在则改名为 `.bak`，返回是否发生了备份
pub fn backup_existing(path: &Path, verbose: bool) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let target = backup_path(path);
    fs::rename(path, &target).map_err(|e| VasputilError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })?;
    if verbose {
        print_backup(&path.display().to_string(), &target.display().to_string());
    }
    Ok(true)
}

/// 查找 `dir` 下名为两位数字的子目录 (`00`, `01`, ...)，按名称排序
pub fn collect_image_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(VasputilError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let pattern = Pattern::new("[0-9][0-9]")
        .map_err(|e| VasputilError::InvalidArgument(format!("Invalid pattern: {}", e)))?;

    let mut dirs: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .filter(|e| {
            e.file_name()
                .to_str()
                .map(|name| pattern.matches(name))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.cube");

        assert!(!backup_existing(&path, false).unwrap());

        fs::write(&path, "old").unwrap();
        assert!(backup_existing(&path, false).unwrap());
        assert!(!path.exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("out.cube.bak")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_collect_image_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["02", "00", "01", "ini", "100"] {
            fs::create_dir(dir.path().join(name)).unwrap();
        }
        fs::write(dir.path().join("03"), "not a dir").unwrap();

        let dirs = collect_image_dirs(dir.path()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["00", "01", "02"]);
    }

    #[test]
    fn test_collect_image_dirs_missing() {
        assert!(matches!(
            collect_image_dirs(Path::new("/nonexistent/neb")),
            Err(VasputilError::DirectoryNotFound { .. })
        ));
    }
}

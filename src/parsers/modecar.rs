//! # VASP MODECAR 解析器
//!
//! MODECAR 为 dimer 方法的初始模式：每个原子一行笛卡尔位移 (Å)。
//!
//! ## 依赖关系
//! - 被 `commands/modecar.rs` 使用

use crate::error::{Result, VasputilError};
use crate::parsers::poscar::parse_vector;
use std::fs;
use std::path::Path;

/// 读取 MODECAR 位移
pub fn parse_modecar_file(path: &Path) -> Result<Vec<[f64; 3]>> {
    if !path.is_file() {
        return Err(VasputilError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_modecar_content(&content, &path.display().to_string())
}

/// 从字符串内容读取位移，忽略空行
pub fn parse_modecar_content(content: &str, path: &str) -> Result<Vec<[f64; 3]>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            parse_vector(line).ok_or_else(|| VasputilError::ParseError {
                format: "modecar".to_string(),
                path: path.to_string(),
                reason: format!("Invalid displacement at line {}", i + 1),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modecar() {
        let rows = parse_modecar_content("  0.1 0.0 0.0\n\n -0.1 0.0 0.0\n", "MODECAR").unwrap();
        assert_eq!(rows, vec![[0.1, 0.0, 0.0], [-0.1, 0.0, 0.0]]);
    }

    #[test]
    fn test_parse_modecar_invalid() {
        assert!(parse_modecar_content("0.1 x 0.0\n", "MODECAR").is_err());
    }
}

//! # VTST NEB 数据解析器
//!
//! 读取 `nebresults.pl` 生成的 `neb.dat` 与 `spline.dat`。
//!
//! ## 格式说明
//! ```text
//! neb.dat:     image  reaction_coordinate  energy  force  [image]
//! spline.dat:  index  reaction_coordinate  energy  ...
//! ```
//! 能量单位为 eV，力为沿路径方向的投影 (eV/Å)。
//!
//! ## 依赖关系
//! - 被 `commands/neb.rs` 使用

use crate::error::{Result, VasputilError};
use std::fs;
use std::path::Path;

/// neb.dat 中的一个图像点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NebImage {
    pub reaction_coordinate: f64,
    pub energy: f64,
    pub force: f64,
}

/// spline.dat 中的一个插值点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplinePoint {
    pub reaction_coordinate: f64,
    pub energy: f64,
}

/// 读取空白分隔的数值表，跳过空行与 `#` 注释
fn load_table(path: &Path, min_columns: usize) -> Result<Vec<Vec<f64>>> {
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_table(&content, &path.display().to_string(), min_columns)
}

fn parse_table(content: &str, path: &str, min_columns: usize) -> Result<Vec<Vec<f64>>> {
    let mut rows = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let row: Vec<f64> = line
            .split_whitespace()
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| VasputilError::ParseError {
                format: "neb".to_string(),
                path: path.to_string(),
                reason: format!("Non-numeric value at line {}", i + 1),
            })?;
        if row.len() < min_columns {
            return Err(VasputilError::ParseError {
                format: "neb".to_string(),
                path: path.to_string(),
                reason: format!(
                    "Line {} has {} columns, expected at least {}",
                    i + 1,
                    row.len(),
                    min_columns
                ),
            });
        }
        rows.push(row);
    }
    Ok(rows)
}

/// 读取 neb.dat
pub fn load_neb_dat(path: &Path) -> Result<Vec<NebImage>> {
    Ok(load_table(path, 4)?.into_iter().map(neb_row).collect())
}

/// 读取 spline.dat
pub fn load_spline_dat(path: &Path) -> Result<Vec<SplinePoint>> {
    Ok(load_table(path, 3)?.into_iter().map(spline_row).collect())
}

fn neb_row(row: Vec<f64>) -> NebImage {
    NebImage {
        reaction_coordinate: row[1],
        energy: row[2],
        force: row[3],
    }
}

fn spline_row(row: Vec<f64>) -> SplinePoint {
    SplinePoint {
        reaction_coordinate: row[1],
        energy: row[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_neb_table() {
        let content = "  0  0.000  0.000  0.000  0\n  1  0.812  0.431 -0.322  1\n\n  2  1.640  0.120  0.150  2\n";
        let rows = parse_table(content, "neb.dat", 4).unwrap();
        let images: Vec<NebImage> = rows.into_iter().map(neb_row).collect();

        assert_eq!(images.len(), 3);
        assert_eq!(images[1].reaction_coordinate, 0.812);
        assert_eq!(images[1].force, -0.322);
    }

    #[test]
    fn test_parse_table_rejects_short_rows() {
        assert!(parse_table("0 0.0\n", "spline.dat", 3).is_err());
        assert!(parse_table("0 abc 1.0\n", "spline.dat", 3).is_err());
    }
}

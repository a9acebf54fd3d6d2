//! # VASP 体数据解析器
//!
//! 解析 CHGCAR / CHG / PARCHG / ELFCAR 文件。
//!
//! ## 文件格式说明
//! ```text
//! <POSCAR block>
//!                                  # blank line
//!    NX   NY   NZ                  # grid dimensions
//! v1 v2 v3 v4 v5 ...               # NX*NY*NZ values, x fastest
//! augmentation occupancies 1  16   # optional (CHGCAR only)
//! ...
//! m1 m2 ... m_nions                # optional per-ion line (spin case)
//!    NX   NY   NZ                  # second block: magnetization / spin down ELF
//! ...
//! ```
//! 每行数值个数不固定（CHGCAR 为 5，ELFCAR 为 10）。
//!
//! ## 依赖关系
//! - 被 `commands/cube.rs` 使用
//! - 使用 `parsers/poscar.rs` 解析结构头部
//! - 使用 `rayon` 并行解析数值

use crate::error::{Result, VasputilError};
use crate::models::{point_count, Crystal, ScalarGrid, VolumetricData};
use crate::parsers::poscar;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// 解析得到的体数据文件
#[derive(Debug, Clone)]
pub struct VolumetricFile {
    pub structure: Crystal,
    pub data: VolumetricData,
    /// 文件中数据块的个数（1 非自旋，2 自旋极化，4 非共线）
    pub blocks: usize,
}

fn parse_error(path: &str, reason: impl Into<String>) -> VasputilError {
    VasputilError::ParseError {
        format: "chgcar".to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// 解析 CHGCAR/ELFCAR 文件
pub fn parse_volumetric_file(path: &Path) -> Result<VolumetricFile> {
    if !path.is_file() {
        return Err(VasputilError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_volumetric_content(&content, &path.display().to_string())
}

/// 从字符串内容解析体数据
pub fn parse_volumetric_content(content: &str, path: &str) -> Result<VolumetricFile> {
    let lines: Vec<&str> = content.lines().collect();
    let (structure, mut idx) = poscar::parse_poscar_lines(&lines, path)?;

    // 跳过空行，找到网格维度行
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    let shape = lines
        .get(idx)
        .and_then(|l| parse_dimensions(l))
        .ok_or_else(|| parse_error(path, "Missing grid dimension line after structure"))?;
    let n = point_count(shape)
        .ok_or_else(|| parse_error(path, format!("Grid {:?} is too large", shape)))?;
    if n == 0 {
        return Err(parse_error(path, format!("Grid {:?} has no points", shape)));
    }
    idx += 1;

    let mut grids: Vec<ScalarGrid> = Vec::with_capacity(4);
    loop {
        let (values, next) = read_block(&lines, idx, n, path)?;
        grids.push(ScalarGrid::from_fortran_order(shape, values)?);
        idx = next;

        // 跳过 augmentation 与每离子磁矩行，直到再次出现相同的维度行
        match find_dimension_line(&lines, idx, shape) {
            Some(found) if grids.len() < 4 => idx = found + 1,
            _ => break,
        }
    }

    let blocks = grids.len();
    let mut grids = grids.into_iter();
    let primary = grids
        .next()
        .ok_or_else(|| parse_error(path, "No data block"))?;
    // 非共线计算的三个磁化分量不是 up/down 差值，仅保留总密度
    let spin_companion = if blocks == 2 { grids.next() } else { None };

    Ok(VolumetricFile {
        structure,
        data: VolumetricData::new(primary, spin_companion)?,
        blocks,
    })
}

/// 解析 "NX NY NZ" 行
fn parse_dimensions(line: &str) -> Option<[usize; 3]> {
    let parts: Vec<usize> = line
        .split_whitespace()
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    if parts.len() != 3 {
        return None;
    }
    Some([parts[0], parts[1], parts[2]])
}

fn find_dimension_line(lines: &[&str], start: usize, shape: [usize; 3]) -> Option<usize> {
    (start..lines.len()).find(|&i| parse_dimensions(lines[i]) == Some(shape))
}

/// 读取一个数据块，返回 Fortran 顺序的数值与下一行行号
fn read_block(lines: &[&str], start: usize, n: usize, path: &str) -> Result<(Vec<f64>, usize)> {
    let per_row = lines
        .get(start)
        .map(|l| l.split_whitespace().count())
        .filter(|&c| c > 0)
        .ok_or_else(|| parse_error(path, "Data block is empty"))?;
    let rows = n / per_row + usize::from(n % per_row != 0);
    let end = start + rows;
    if end > lines.len() {
        return Err(parse_error(
            path,
            format!("Data block truncated: expected {} values", n),
        ));
    }

    let values: Vec<f64> = lines[start..end]
        .par_iter()
        .flat_map_iter(|l| l.split_whitespace())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| parse_error(path, format!("Invalid value '{}'", s)))
        })
        .collect::<Result<_>>()?;

    if values.len() != n {
        return Err(parse_error(
            path,
            format!("Data block has {} values, expected {}", values.len(), n),
        ));
    }
    Ok((values, end))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 生成一个 2x2x2 的 CHGCAR 文本，可选自旋块
    pub(crate) fn chgcar_text(total: &[f64], diff: Option<&[f64]>) -> String {
        let mut s = String::from(
            "H2 test\n1.0\n2.0 0.0 0.0\n0.0 2.0 0.0\n0.0 0.0 2.0\nH\n2\nDirect\n0.0 0.0 0.0\n0.5 0.5 0.5\n\n   2   2   2\n",
        );
        let push_block = |s: &mut String, values: &[f64]| {
            for chunk in values.chunks(5) {
                let row: Vec<String> = chunk.iter().map(|v| format!("{:.11E}", v)).collect();
                s.push_str(&format!(" {}\n", row.join(" ")));
            }
        };
        push_block(&mut s, total);
        s.push_str("augmentation occupancies   1   2\n  0.1234 0.5678\n");
        s.push_str("augmentation occupancies   2   2\n  0.1234 0.5678\n");
        if let Some(diff) = diff {
            s.push_str(" 0.000E+00 0.000E+00\n   2   2   2\n");
            push_block(&mut s, diff);
            s.push_str("augmentation occupancies   1   2\n  0.0 0.0\n");
        }
        s
    }

    #[test]
    fn test_parse_non_spin_chgcar() {
        let total: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let file = parse_volumetric_content(&chgcar_text(&total, None), "CHGCAR").unwrap();

        assert_eq!(file.blocks, 1);
        assert_eq!(file.structure.atoms.len(), 2);
        assert!(!file.data.is_spin_polarized());
        let grid = &file.data.primary;
        assert_eq!(grid.shape(), [2, 2, 2]);
        // Fortran 第 k 个值位于 x = k % 2, y = (k / 2) % 2, z = k / 4
        assert_eq!(grid.get(1, 0, 0), 1.0);
        assert_eq!(grid.get(0, 1, 0), 2.0);
        assert_eq!(grid.get(0, 0, 1), 4.0);
        assert_eq!(grid.get(1, 1, 1), 7.0);
    }

    #[test]
    fn test_parse_spin_chgcar() {
        let total = vec![8.0; 8];
        let diff = vec![-2.0; 8];
        let file = parse_volumetric_content(&chgcar_text(&total, Some(&diff)), "CHGCAR").unwrap();

        assert_eq!(file.blocks, 2);
        let spin = file.data.spin_companion.as_ref().unwrap();
        assert!(spin.values().iter().all(|v| *v == -2.0));
    }

    #[test]
    fn test_parse_elfcar_ten_per_row() {
        let mut s = String::from(
            "ELF\n1.0\n3.0 0.0 0.0\n0.0 3.0 0.0\n0.0 0.0 3.0\nO\n1\nDirect\n0.0 0.0 0.0\n\n   3   2   2\n",
        );
        let values: Vec<String> = (0..12).map(|i| format!("{:.5}", i as f64 / 12.0)).collect();
        s.push_str(&format!("{}\n{}\n", values[..10].join(" "), values[10..].join(" ")));

        let file = parse_volumetric_content(&s, "ELFCAR").unwrap();
        assert_eq!(file.data.primary.shape(), [3, 2, 2]);
        assert!((file.data.primary.get(2, 1, 1) - 11.0 / 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_truncated_block() {
        let text = "H\n1.0\n2 0 0\n0 2 0\n0 0 2\nH\n1\nDirect\n0 0 0\n\n 2 2 2\n1 2 3 4 5\n";
        assert!(matches!(
            parse_volumetric_content(text, "CHGCAR"),
            Err(VasputilError::ParseError { .. })
        ));
    }

    #[test]
    fn test_missing_dimension_line() {
        let text = "H\n1.0\n2 0 0\n0 2 0\n0 0 2\nH\n1\nDirect\n0 0 0\n";
        assert!(parse_volumetric_content(text, "CHGCAR").is_err());
    }

    #[test]
    fn test_oversized_grid_rejected() {
        let text = "H\n1.0\n2 0 0\n0 2 0\n0 0 2\nH\n1\nDirect\n0 0 0\n\n 4294967296 4294967296 1\n1.0\n";
        let err = parse_volumetric_content(text, "CHGCAR").unwrap_err();
        assert!(matches!(err, VasputilError::ParseError { .. }));
    }
}

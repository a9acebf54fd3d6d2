//! # VASP XDATCAR 轨迹解析器
//!
//! ## 格式说明
//! ```text
//! <POSCAR header without positions>
//! Direct configuration=     1
//! x y z
//! ...
//! Direct configuration=     2
//! ...
//! ```
//! 变胞 (NPT) 轨迹在每一帧之前重复结构头部。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs` 使用
//! - 使用 `parsers/poscar.rs` 的头部解析

use crate::error::{Result, VasputilError};
use crate::models::{Atom, Crystal};
use crate::parsers::poscar::{self, PoscarHeader};
use crate::parsers::xyz::Frame;
use std::fs;
use std::path::Path;

fn parse_error(path: &str, reason: impl Into<String>) -> VasputilError {
    VasputilError::ParseError {
        format: "xdatcar".to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// 解析 XDATCAR 文件
pub fn parse_xdatcar_file(path: &Path) -> Result<Vec<Frame>> {
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_xdatcar_content(&content, &path.display().to_string())
}

fn is_configuration_line(line: &str) -> bool {
    let lower = line.trim_start().to_lowercase();
    lower.contains("configuration")
        && (lower.starts_with('d') || lower.starts_with('c') || lower.starts_with('k'))
}

/// 从字符串内容解析所有帧
pub fn parse_xdatcar_content(content: &str, path: &str) -> Result<Vec<Frame>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut header: PoscarHeader = poscar::parse_header(&lines, path)?;
    let mut idx = header.next_line;
    let mut frames = Vec::new();

    while idx < lines.len() {
        let line = lines[idx];
        if line.trim().is_empty() {
            idx += 1;
            continue;
        }
        if !is_configuration_line(line) {
            // 变胞轨迹：新的结构头部
            header = poscar::parse_header(&lines[idx..], path)?;
            idx += header.next_line;
            continue;
        }

        let cartesian = !line.trim_start().to_lowercase().starts_with('d');
        let species = header.species();
        let first = idx + 1;
        if first + species.len() > lines.len() {
            return Err(parse_error(
                path,
                format!("Configuration at line {} is truncated", idx + 1),
            ));
        }

        let mut atoms = Vec::with_capacity(species.len());
        for (i, elem) in species.into_iter().enumerate() {
            let p = poscar::parse_vector(lines[first + i]).ok_or_else(|| {
                parse_error(path, format!("Invalid position at line {}", first + i + 1))
            })?;
            let p = if cartesian {
                header.lattice.to_fractional(p)
            } else {
                p
            };
            atoms.push(Atom::new(elem, p));
        }
        idx = first + atoms.len();
        frames.push(Frame::new(Crystal::new(
            header.name.clone(),
            header.lattice.clone(),
            atoms,
        )));
    }

    if frames.is_empty() {
        return Err(parse_error(path, "No configurations found"));
    }
    Ok(frames)
}

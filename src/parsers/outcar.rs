//! # VASP OUTCAR 解析器
//!
//! 解析 VASP 计算输出文件 OUTCAR，提取每个离子步的结构、受力、能量，
//! 以及 DFT-D 色散能。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs`, `commands/neb.rs` 使用
//! - 使用 `models/structure.rs`, `parsers/xyz.rs`
//! - 使用 `regex` 匹配关键行

use crate::error::{Result, VasputilError};
use crate::models::{Atom, Crystal, Lattice};
use crate::parsers::poscar::parse_vector;
use crate::parsers::xyz::Frame;
use regex::Regex;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

// "VRHFIN =Fe: d7 s1"
static VRHFIN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"VRHFIN\s*=\s*([A-Za-z]+)").unwrap());

// "  FREE ENERGIE OF THE ION-ELECTRON SYSTEM (eV)"
const CONVERGED_HEADER: &str = "FREE ENERGIE OF THE ION-ELECTRON SYSTEM";

// "free  energy   TOTEN  =       -12.34567890 eV"
static TOTEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"free\s+energy\s+TOTEN\s*=\s*(\S+)\s+eV").unwrap());

// "  Edisp (eV):  -0.12345"
static EDISP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Edisp\s+\(eV\)").unwrap());

fn parse_error(path: &str, reason: impl Into<String>) -> VasputilError {
    VasputilError::ParseError {
        format: "outcar".to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// 解析 OUTCAR 中的所有离子步
pub fn parse_outcar_frames(path: &Path) -> Result<Vec<Frame>> {
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_outcar_content(&content, &path.display().to_string())
}

/// 从字符串内容解析所有离子步
pub fn parse_outcar_content(content: &str, path: &str) -> Result<Vec<Frame>> {
    let lines: Vec<&str> = content.lines().collect();

    let mut elements: Vec<String> = Vec::new();
    let mut counts: Vec<usize> = Vec::new();
    let mut lattice: Option<Lattice> = None;
    let mut frames: Vec<Frame> = Vec::new();
    // 每个 SCF 迭代都会打印 TOTEN，只取收敛块标题后的那一行
    let mut in_converged_block = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        // 元素符号，每种元素出现一次
        if let Some(cap) = VRHFIN.captures(line) {
            elements.push(cap[1].to_string());
        }

        // "   ions per type =               2   4"
        if line.contains("ions per type") {
            if let Some((_, rest)) = line.split_once('=') {
                counts = rest
                    .split_whitespace()
                    .filter_map(|s| s.parse().ok())
                    .collect();
            }
        }

        // 晶格矢量（变胞计算中每步都会重复）
        if line.contains("direct lattice vectors") && i + 3 < lines.len() {
            let mut matrix = [[0.0; 3]; 3];
            for (k, row) in matrix.iter_mut().enumerate() {
                *row = parse_vector(lines[i + 1 + k]).ok_or_else(|| {
                    parse_error(path, format!("Invalid lattice vector at line {}", i + 2 + k))
                })?;
            }
            lattice = Some(Lattice::from_vectors(matrix));
            i += 4;
            continue;
        }

        // " POSITION                                       TOTAL-FORCE (eV/Angst)"
        if line.contains("POSITION") && line.contains("TOTAL-FORCE") {
            let lattice = lattice
                .clone()
                .ok_or_else(|| parse_error(path, "Positions found before lattice vectors"))?;
            if elements.len() != counts.len() {
                return Err(parse_error(
                    path,
                    format!(
                        "{} element symbols but {} ion counts",
                        elements.len(),
                        counts.len()
                    ),
                ));
            }
            let species: Vec<&String> = elements
                .iter()
                .zip(counts.iter())
                .flat_map(|(e, &n)| std::iter::repeat(e).take(n))
                .collect();

            // 跳过标题行与分隔线
            let first = i + 2;
            if first + species.len() > lines.len() {
                return Err(parse_error(path, "Position block truncated"));
            }
            let mut atoms = Vec::with_capacity(species.len());
            let mut forces = Vec::with_capacity(species.len());
            for (k, elem) in species.into_iter().enumerate() {
                let values: Vec<f64> = lines[first + k]
                    .split_whitespace()
                    .filter_map(|s| s.parse().ok())
                    .collect();
                if values.len() < 6 {
                    return Err(parse_error(
                        path,
                        format!("Invalid position/force line {}", first + k + 1),
                    ));
                }
                atoms.push(Atom::new(
                    elem.clone(),
                    lattice.to_fractional([values[0], values[1], values[2]]),
                ));
                forces.push([values[3], values[4], values[5]]);
            }

            let mut frame = Frame::new(Crystal::new(
                format!("step {}", frames.len() + 1),
                lattice,
                atoms,
            ));
            frame.forces = Some(forces);
            frames.push(frame);
            i = first + counts.iter().sum::<usize>();
            continue;
        }

        if line.contains(CONVERGED_HEADER) {
            in_converged_block = true;
        } else if in_converged_block {
            // 能量出现在对应离子步的受力之后
            if let Some(cap) = TOTEN.captures(line) {
                if let (Some(frame), Ok(e)) = (frames.last_mut(), cap[1].parse::<f64>()) {
                    frame.energy = Some(e);
                }
                in_converged_block = false;
            }
        }

        i += 1;
    }

    if frames.is_empty() {
        return Err(parse_error(path, "No ionic steps found"));
    }
    Ok(frames)
}

/// 读取 OUTCAR 中最后一个色散能 `Edisp (eV)`
pub fn last_dispersion_energy(path: &Path) -> Result<f64> {
    let file = File::open(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    let mut last: Option<f64> = None;

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => continue,
        };

        if EDISP.is_match(&line) {
            if let Some(val) = extract_last_number(&line) {
                last = Some(val);
            }
        }
    }

    last.ok_or_else(|| parse_error(&path.display().to_string(), "No 'Edisp (eV)' line found"))
}

/// 提取字符串中最后一个数字
fn extract_last_number(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|w| w.parse::<f64>().ok())
        .last()
}

//! # VASP POSCAR 格式解析器
//!
//! 解析 VASP POSCAR/CONTCAR 文件格式，以及 CHGCAR/ELFCAR/XDATCAR 的结构头部。
//!
//! ## POSCAR 格式说明
//! ```text
//! Comment line (structure name)
//! 1.0                    # scaling factor (negative = target volume)
//! a1 a2 a3               # lattice vector a
//! b1 b2 b3               # lattice vector b
//! c1 c2 c3               # lattice vector c
//! Element1 Element2 ...  # element symbols (VASP 5+)
//! n1 n2 ...              # number of atoms per element
//! Selective dynamics     # optional
//! Direct/Cartesian       # coordinate type
//! x1 y1 z1               # atom positions
//! ...
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `parsers/chgcar.rs`, `parsers/xdatcar.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, VasputilError};
use crate::models::{Atom, Crystal, Lattice};
use std::fs;
use std::path::Path;

/// 结构头部：晶格与元素列表（不含坐标）
#[derive(Debug, Clone)]
pub struct PoscarHeader {
    pub name: String,
    pub lattice: Lattice,
    pub elements: Vec<String>,
    pub counts: Vec<usize>,
    /// 笛卡尔分量的缩放因子
    pub scale: [f64; 3],
    /// 头部之后的下一行行号
    pub next_line: usize,
}

impl PoscarHeader {
    /// 按元素展开的原子符号列表
    pub fn species(&self) -> Vec<String> {
        self.elements
            .iter()
            .zip(self.counts.iter())
            .flat_map(|(e, &n)| std::iter::repeat(e.clone()).take(n))
            .collect()
    }
}

fn parse_error(path: &str, reason: impl Into<String>) -> VasputilError {
    VasputilError::ParseError {
        format: "poscar".to_string(),
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Crystal> {
    if !path.is_file() {
        return Err(VasputilError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = fs::read_to_string(path).map_err(|e| VasputilError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_poscar_content(
        &content,
        path.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown"),
    )
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, default_name: &str) -> Result<Crystal> {
    let lines: Vec<&str> = content.lines().collect();
    parse_poscar_lines(&lines, default_name).map(|(crystal, _)| crystal)
}

/// 从行切片解析 POSCAR，返回结构与已消耗的行数
pub fn parse_poscar_lines(lines: &[&str], default_name: &str) -> Result<(Crystal, usize)> {
    let header = parse_header(lines, default_name)?;
    let name = header.name.clone();

    // Check for "Selective dynamics" line
    let mut coord_line = header.next_line;
    if lines.len() > coord_line
        && lines[coord_line]
            .trim()
            .to_lowercase()
            .starts_with('s')
    {
        coord_line += 1;
    }

    // Coordinate type line
    if lines.len() <= coord_line {
        return Err(parse_error(&name, "Missing coordinate type line"));
    }

    let coord_type = lines[coord_line].trim().to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');

    let species = header.species();
    let first = coord_line + 1;
    if lines.len() < first + species.len() {
        return Err(parse_error(
            &name,
            format!(
                "Expected {} atom positions, file ends after {}",
                species.len(),
                lines.len().saturating_sub(first)
            ),
        ));
    }

    let mut atoms: Vec<Atom> = Vec::with_capacity(species.len());
    for (i, elem) in species.into_iter().enumerate() {
        let position = parse_vector(lines[first + i])
            .ok_or_else(|| parse_error(&name, format!("Invalid position at line {}", first + i + 1)))?;
        let position = if is_cartesian {
            // 笛卡尔坐标同样乘以缩放因子
            let s = header.scale;
            header
                .lattice
                .to_fractional([position[0] * s[0], position[1] * s[1], position[2] * s[2]])
        } else {
            position
        };
        atoms.push(Atom::new(elem, position));
    }

    let consumed = first + atoms.len();
    Ok((Crystal::new(name, header.lattice, atoms), consumed))
}

fn parse_scale(line: &str, name: &str) -> Result<Vec<f64>> {
    let scale: Vec<f64> = line
        .split_whitespace()
        .map(|s| s.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| parse_error(name, "Invalid scaling factor at line 2"))?;
    if scale.len() != 1 && scale.len() != 3 {
        return Err(parse_error(name, "Scaling factor must have 1 or 3 values"));
    }
    Ok(scale)
}

/// 解析前三个浮点数
pub fn parse_vector(line: &str) -> Option<[f64; 3]> {
    let parts: Vec<f64> = line
        .split_whitespace()
        .take(3)
        .map(|s| s.parse().ok())
        .collect::<Option<_>>()?;
    if parts.len() < 3 {
        return None;
    }
    Some([parts[0], parts[1], parts[2]])
}

/// 解析结构头部（注释、缩放、晶格、元素与个数）
pub fn parse_header(lines: &[&str], default_name: &str) -> Result<PoscarHeader> {
    if lines.len() < 7 {
        return Err(parse_error(default_name, "File too short"));
    }

    // Line 0: Comment/name
    let name = lines[0].trim().to_string();
    let name = if name.is_empty() {
        default_name.to_string()
    } else {
        name
    };

    // Line 1: Scaling factor
    let scale = parse_scale(lines[1], &name)?;

    // Lines 2-4: Lattice vectors
    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        matrix[i] = parse_vector(lines[2 + i])
            .ok_or_else(|| parse_error(&name, format!("Invalid lattice vector at line {}", 3 + i)))?;
    }

    // 负缩放因子表示目标体积
    let factors = if scale.len() == 3 {
        [scale[0], scale[1], scale[2]]
    } else if scale[0] < 0.0 {
        let volume = Lattice::from_vectors(matrix).volume();
        [(-scale[0] / volume).cbrt(); 3]
    } else {
        [scale[0]; 3]
    };
    for row in matrix.iter_mut() {
        for (j, v) in row.iter_mut().enumerate() {
            *v *= factors[j];
        }
    }
    let lattice = Lattice::from_vectors(matrix);

    // Line 5: Element symbols (VASP 5+) or atom counts (VASP 4)
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    if line5_parts.is_empty() {
        return Err(parse_error(&name, "Missing element or count line"));
    }
    let (elements, counts, next_line) = if line5_parts[0].parse::<usize>().is_ok() {
        // VASP 4 format: no element line, only counts
        let counts = parse_counts(&line5_parts, &name)?;
        let elements: Vec<String> = (0..counts.len()).map(|i| format!("X{}", i + 1)).collect();
        (elements, counts, 6)
    } else {
        // VASP 5+ format: element symbols on line 5, counts on line 6
        let elements: Vec<String> = line5_parts
            .iter()
            .map(|s| crate::models::elements::normalize_symbol(s).to_string())
            .collect();
        let count_parts: Vec<&str> = lines[6].split_whitespace().collect();
        let counts = parse_counts(&count_parts, &name)?;
        if counts.len() != elements.len() {
            return Err(parse_error(
                &name,
                format!(
                    "{} element symbols but {} atom counts",
                    elements.len(),
                    counts.len()
                ),
            ));
        }
        (elements, counts, 7)
    };

    Ok(PoscarHeader {
        name,
        lattice,
        elements,
        counts,
        scale: factors,
        next_line,
    })
}

fn parse_counts(parts: &[&str], name: &str) -> Result<Vec<usize>> {
    parts
        .iter()
        .map(|s| s.parse::<usize>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| parse_error(name, "Invalid atom counts"))
}

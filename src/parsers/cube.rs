//! # Gaussian cube 格式写出
//!
//! ## Cube 格式说明
//! ```text
//! comment line 1
//! comment line 2
//! natoms  ox oy oz            # origin (Bohr)
//! n1  v1x v1y v1z             # voxel vector along a (Bohr)
//! n2  v2x v2y v2z
//! n3  v3x v3y v3z
//! Z  charge  x y z            # one line per atom (Bohr)
//! ...
//! values                      # x outer, z inner, 6 per line
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/cube.rs` 调用
//! - 使用 `models/`

use crate::error::{Result, VasputilError};
use crate::models::{Crystal, ScalarGrid};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 1 Bohr 对应的 Å
pub const BOHR: f64 = 0.52917721067;

/// 每行写出的数值个数
const VALUES_PER_LINE: usize = 6;

/// 按 Fortran `E13.5` 风格格式化，例如 ` 1.23457E-03`
pub fn format_sci(value: f64) -> String {
    let s = format!("{:.5E}", value);
    let formatted = match s.split_once('E') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(e) => format!(
                "{}E{}{:02}",
                mantissa,
                if e < 0 { '-' } else { '+' },
                e.abs()
            ),
            Err(_) => s.clone(),
        },
        // NaN / inf
        None => s.clone(),
    };
    format!("{:>13}", formatted)
}

/// 写出 cube 到任意 writer
pub fn write_cube<W: Write>(
    writer: &mut W,
    crystal: &Crystal,
    grid: &ScalarGrid,
    origin: [f64; 3],
    comment: &str,
) -> std::io::Result<()> {
    let shape = grid.shape();

    writeln!(writer, "{}", comment)?;
    writeln!(writer, "OUTER LOOP: X, MIDDLE LOOP: Y, INNER LOOP: Z")?;
    writeln!(
        writer,
        "{:5}{:12.6}{:12.6}{:12.6}",
        crystal.atoms.len(),
        origin[0] / BOHR,
        origin[1] / BOHR,
        origin[2] / BOHR
    )?;

    for (i, n) in shape.iter().enumerate() {
        let v = crystal.lattice.matrix[i];
        let d = *n as f64 * BOHR;
        writeln!(
            writer,
            "{:5}{:12.6}{:12.6}{:12.6}",
            n,
            v[0] / d,
            v[1] / d,
            v[2] / d
        )?;
    }

    for (atom, pos) in crystal.atoms.iter().zip(crystal.cartesian_positions()) {
        writeln!(
            writer,
            "{:5}{:12.6}{:12.6}{:12.6}{:12.6}",
            atom.atomic_number(),
            0.0,
            pos[0] / BOHR,
            pos[1] / BOHR,
            pos[2] / BOHR
        )?;
    }

    // 每个 (x, y) 对应一行 z 数据，按 6 个一行折行
    for row in grid.values().chunks(shape[2]) {
        for line in row.chunks(VALUES_PER_LINE) {
            for v in line {
                write!(writer, "{}", format_sci(*v))?;
            }
            writeln!(writer)?;
        }
    }

    Ok(())
}

/// 写出 cube 文件
pub fn write_cube_file(
    path: &Path,
    crystal: &Crystal,
    grid: &ScalarGrid,
    origin: [f64; 3],
    comment: &str,
) -> Result<()> {
    let to_err = |e| VasputilError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };
    let file = File::create(path).map_err(to_err)?;
    let mut writer = BufWriter::new(file);
    write_cube(&mut writer, crystal, grid, origin, comment).map_err(to_err)?;
    writer.flush().map_err(to_err)
}

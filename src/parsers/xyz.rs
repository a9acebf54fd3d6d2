//! # 扩展 XYZ (extxyz) 轨迹写出
//!
//! ## 格式说明
//! ```text
//! N
//! Lattice="ax ay az bx by bz cx cy cz" Properties=species:S:1:pos:R:3 pbc="T T T"
//! El  x  y  z
//! ...
//! ```
//! 含受力时 Properties 追加 `forces:R:3`，含能量时追加 `energy=`。
//!
//! ## 依赖关系
//! - 被 `commands/traj.rs`, `commands/modecar.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{Result, VasputilError};
use crate::models::Crystal;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

/// 轨迹中的一帧
#[derive(Debug, Clone)]
pub struct Frame {
    pub crystal: Crystal,
    /// 总能量 (eV)
    pub energy: Option<f64>,
    /// 每个原子的受力 (eV/Å)
    pub forces: Option<Vec<[f64; 3]>>,
}

impl Frame {
    pub fn new(crystal: Crystal) -> Self {
        Frame {
            crystal,
            energy: None,
            forces: None,
        }
    }
}

/// 将一帧格式化为 extxyz 字符串
pub fn to_extxyz_string(frame: &Frame) -> String {
    let crystal = &frame.crystal;
    let m = crystal.lattice.matrix;
    let forces = frame
        .forces
        .as_ref()
        .filter(|f| f.len() == crystal.atoms.len());

    let mut result = String::new();
    result.push_str(&format!("{}\n", crystal.atoms.len()));

    let lattice = m
        .iter()
        .flat_map(|row| row.iter())
        .map(|v| format!("{:.8}", v))
        .collect::<Vec<_>>()
        .join(" ");
    let mut properties = String::from("species:S:1:pos:R:3");
    if forces.is_some() {
        properties.push_str(":forces:R:3");
    }
    result.push_str(&format!("Lattice=\"{}\" Properties={}", lattice, properties));
    if let Some(e) = frame.energy {
        result.push_str(&format!(" energy={:.8}", e));
    }
    result.push_str(" pbc=\"T T T\"\n");

    for (i, (atom, pos)) in crystal
        .atoms
        .iter()
        .zip(crystal.cartesian_positions())
        .enumerate()
    {
        result.push_str(&format!(
            "{:<2} {:16.8} {:16.8} {:16.8}",
            atom.element, pos[0], pos[1], pos[2]
        ));
        if let Some(f) = forces {
            result.push_str(&format!(" {:16.8} {:16.8} {:16.8}", f[i][0], f[i][1], f[i][2]));
        }
        result.push('\n');
    }

    result
}

/// 把若干帧追加写入文件
pub fn append_frames(path: &Path, frames: &[Frame]) -> Result<()> {
    let to_err = |e| VasputilError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(to_err)?;
    let mut writer = BufWriter::new(file);
    for frame in frames {
        writer
            .write_all(to_extxyz_string(frame).as_bytes())
            .map_err(to_err)?;
    }
    writer.flush().map_err(to_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn frame() -> Frame {
        let lattice = Lattice::from_vectors([[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]);
        Frame::new(Crystal::new(
            "H2",
            lattice,
            vec![Atom::new("H", [0.0, 0.0, 0.0]), Atom::new("H", [0.5, 0.0, 0.0])],
        ))
    }

    #[test]
    fn test_extxyz_plain() {
        let text = to_extxyz_string(&frame());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert!(lines[1].contains("Properties=species:S:1:pos:R:3 "));
        assert!(!lines[1].contains("energy="));
        let x: f64 = lines[3].split_whitespace().nth(1).unwrap().parse().unwrap();
        assert!((x - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_extxyz_energy_forces() {
        let mut f = frame();
        f.energy = Some(-6.5);
        f.forces = Some(vec![[0.1, 0.0, 0.0], [-0.1, 0.0, 0.0]]);
        let text = to_extxyz_string(&f);

        assert!(text.contains("forces:R:3"));
        assert!(text.contains("energy=-6.50000000"));
        assert_eq!(text.lines().nth(2).unwrap().split_whitespace().count(), 7);
    }

    #[test]
    fn test_append_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.xyz");
        append_frames(&path, &[frame()]).unwrap();
        append_frames(&path, &[frame(), frame()]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 12);
    }
}

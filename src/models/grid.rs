//! # 体数据网格模型
//!
//! 三维标量网格 `ScalarGrid` 与带可选自旋通道的 `VolumetricData`。
//! 数据按 x 最慢、z 最快的顺序存储，与 cube 文件的写出顺序一致。
//!
//! ## 依赖关系
//! - 被 `parsers/chgcar.rs`, `parsers/cube.rs`, `density/` 使用
//! - 使用 `rayon` 做逐元素运算

use crate::error::{Result, VasputilError};
use rayon::prelude::*;

/// 三维标量网格
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarGrid {
    shape: [usize; 3],
    values: Vec<f64>,
}

/// 网格点总数，乘积溢出时返回 `None`
pub fn point_count(shape: [usize; 3]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n))
}

impl ScalarGrid {
    /// 从 x 最慢、z 最快顺序的数据创建网格
    pub fn new(shape: [usize; 3], values: Vec<f64>) -> Result<Self> {
        let n = point_count(shape).ok_or_else(|| {
            VasputilError::InvalidFormat(format!("Grid shape {:?} is too large", shape))
        })?;
        if n == 0 {
            return Err(VasputilError::InvalidFormat(format!(
                "Grid shape {:?} has no points",
                shape
            )));
        }
        if values.len() != n {
            return Err(VasputilError::InvalidFormat(format!(
                "Grid shape {:?} needs {} values, got {}",
                shape,
                n,
                values.len()
            )));
        }
        Ok(ScalarGrid { shape, values })
    }

    /// 所有点取同一值
    #[cfg(test)]
    pub fn filled(shape: [usize; 3], value: f64) -> Result<Self> {
        Self::new(shape, vec![value; shape[0] * shape[1] * shape[2]])
    }

    /// 从 VASP 的 Fortran 顺序（x 最快）数据创建网格
    pub fn from_fortran_order(shape: [usize; 3], fortran: Vec<f64>) -> Result<Self> {
        let [nx, ny, nz] = shape;
        if point_count(shape) != Some(fortran.len()) {
            return Self::new(shape, fortran);
        }
        // k = x + nx * (y + ny * z)  ->  (x * ny + y) * nz + z
        let values = (0..fortran.len())
            .into_par_iter()
            .map(|i| {
                let z = i % nz;
                let y = (i / nz) % ny;
                let x = i / (ny * nz);
                fortran[x + nx * (y + ny * z)]
            })
            .collect();
        Self::new(shape, values)
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// 网格点总数 N
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// 取 (x, y, z) 处的值
    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize, z: usize) -> f64 {
        self.values[(x * self.shape[1] + y) * self.shape[2] + z]
    }

    /// 所有值除以 `factor`，返回新网格
    pub fn scaled(&self, factor: f64) -> ScalarGrid {
        ScalarGrid {
            shape: self.shape,
            values: self.values.par_iter().map(|v| v / factor).collect(),
        }
    }

    /// 与同形状网格逐元素组合
    pub fn zip_with<F>(&self, other: &ScalarGrid, f: F) -> Result<ScalarGrid>
    where
        F: Fn(f64, f64) -> f64 + Sync,
    {
        if self.shape != other.shape {
            return Err(VasputilError::ShapeMismatch {
                primary: self.shape,
                companion: other.shape,
            });
        }
        Ok(ScalarGrid {
            shape: self.shape,
            values: self
                .values
                .par_iter()
                .zip(other.values.par_iter())
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    /// 绝对值之和
    pub fn abs_sum(&self) -> f64 {
        self.values.par_iter().map(|v| v.abs()).sum()
    }
}

/// 体数据：主通道加可选的自旋通道
///
/// CHGCAR 中自旋通道为磁化密度 (up - down)；
/// ELFCAR 中主通道为 up，自旋通道为差值通道。
#[derive(Debug, Clone)]
pub struct VolumetricData {
    pub primary: ScalarGrid,
    pub spin_companion: Option<ScalarGrid>,
}

impl VolumetricData {
    pub fn new(primary: ScalarGrid, spin_companion: Option<ScalarGrid>) -> Result<Self> {
        let data = VolumetricData {
            primary,
            spin_companion,
        };
        data.check_shapes()?;
        Ok(data)
    }

    /// 检查自旋通道形状与主通道一致
    pub fn check_shapes(&self) -> Result<()> {
        match &self.spin_companion {
            Some(spin) if spin.shape() != self.primary.shape() => {
                Err(VasputilError::ShapeMismatch {
                    primary: self.primary.shape(),
                    companion: spin.shape(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn is_spin_polarized(&self) -> bool {
        self.spin_companion.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_shape_rejected() {
        assert!(ScalarGrid::new([0, 2, 2], vec![]).is_err());
        assert!(ScalarGrid::new([2, 2, 2], vec![1.0; 7]).is_err());
    }

    #[test]
    fn test_point_count_overflow() {
        assert_eq!(point_count([2, 3, 4]), Some(24));
        assert_eq!(point_count([usize::MAX, 2, 1]), None);
        assert!(ScalarGrid::new([usize::MAX, 2, 1], vec![]).is_err());
        assert!(ScalarGrid::from_fortran_order([usize::MAX, 2, 1], vec![1.0]).is_err());
    }

    #[test]
    fn test_fortran_order_reindex() {
        // 文件中 x 最快：值 = x + 10 y + 100 z
        let shape = [2, 3, 4];
        let mut fortran = Vec::new();
        for z in 0..4 {
            for y in 0..3 {
                for x in 0..2 {
                    fortran.push((x + 10 * y + 100 * z) as f64);
                }
            }
        }
        let grid = ScalarGrid::from_fortran_order(shape, fortran).unwrap();

        assert_eq!(grid.get(1, 2, 3), 321.0);
        assert_eq!(grid.get(0, 1, 2), 210.0);
        // z 最快
        assert_eq!(grid.values()[1], 100.0);
    }

    #[test]
    fn test_zip_with_shape_mismatch() {
        let a = ScalarGrid::filled([2, 2, 2], 1.0).unwrap();
        let b = ScalarGrid::filled([2, 2, 3], 1.0).unwrap();
        match a.zip_with(&b, |x, y| x + y) {
            Err(VasputilError::ShapeMismatch { primary, companion }) => {
                assert_eq!(primary, [2, 2, 2]);
                assert_eq!(companion, [2, 2, 3]);
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_volumetric_data_checks_companion() {
        let a = ScalarGrid::filled([10, 10, 10], 1.0).unwrap();
        let b = ScalarGrid::filled([10, 10, 11], 1.0).unwrap();
        assert!(VolumetricData::new(a.clone(), Some(b)).is_err());
        assert!(!VolumetricData::new(a, None).unwrap().is_spin_polarized());
    }
}

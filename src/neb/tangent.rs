//! # NEB 受力切线
//!
//! 每个图像处按沿路径受力画一段短切线。切线半宽 δ 从 `0.02·max(x)` 开始，
//! 在图像之间延续；若切线的能量跨度超过样条能量范围的 10%，
//! 则按该图像起始 δ 的 10% 逐步缩短，最多 10 次。
//!
//! ## 依赖关系
//! - 被 `neb/mod.rs` 使用

use crate::error::{Result, VasputilError};

/// 初始半宽相对反应坐标最大值的比例
const DELTA_SCALE: f64 = 0.02;

/// 切线跨度上限相对能量范围的比例
const MAX_SPAN_RATIO: f64 = 0.1;

/// 每次缩短的比例
const SHRINK_RATIO: f64 = 0.1;

const MAX_SHRINKS: usize = 10;

/// 一段切线的两个端点
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tangent {
    pub start: (f64, f64),
    pub end: (f64, f64),
}

impl Tangent {
    fn new(x: f64, energy: f64, force: f64, delta: f64) -> Self {
        // neb.dat 中的力为 -dE/ds
        Tangent {
            start: (x - delta, energy + delta * force),
            end: (x + delta, energy - delta * force),
        }
    }

    /// 切线在能量方向上的跨度
    pub fn span(&self) -> f64 {
        (self.start.1 - self.end.1).abs()
    }
}

/// 计算所有图像的切线
///
/// `points` 为 `(反应坐标, 能量, 受力)`，`energy_range` 为样条能量的最大值减最小值。
pub fn force_tangents(points: &[(f64, f64, f64)], energy_range: f64) -> Result<Vec<Tangent>> {
    let max_x = points
        .iter()
        .map(|p| p.0)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut delta = DELTA_SCALE * max_x;
    let limit = MAX_SPAN_RATIO * energy_range;

    let mut tangents = Vec::with_capacity(points.len());
    for (image, &(x, energy, force)) in points.iter().enumerate() {
        let step = SHRINK_RATIO * delta;
        let mut tangent = Tangent::new(x, energy, force, delta);
        let mut shrinks = 0;
        while tangent.span() > limit {
            delta -= step;
            tangent = Tangent::new(x, energy, force, delta);
            shrinks += 1;
            if shrinks >= MAX_SHRINKS {
                return Err(VasputilError::TangentClipping { image });
            }
        }
        tangents.push(tangent);
    }
    Ok(tangents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_forces_keep_initial_delta() {
        let points = [(0.0, 0.0, 0.0), (1.0, 0.5, 0.1), (2.0, 0.0, 0.0)];
        let tangents = force_tangents(&points, 0.5).unwrap();

        assert_eq!(tangents.len(), 3);
        // δ = 0.02 * 2
        assert!((tangents[1].start.0 - 0.96).abs() < 1e-12);
        assert!((tangents[1].start.1 - 0.504).abs() < 1e-12);
        assert!((tangents[1].end.1 - 0.496).abs() < 1e-12);
    }

    #[test]
    fn test_large_force_shrinks_and_carries_over() {
        // δ0 = 0.2；跨度 2·δ·F = 0.4·F，上限 0.1
        let points = [(0.0, 0.0, 0.3), (10.0, 0.0, 0.0)];
        let tangents = force_tangents(&points, 1.0).unwrap();

        // 0.2 -> 0.18 -> 0.16: 跨度 0.096 <= 0.1
        let first_delta = tangents[0].end.0 - 0.0;
        assert!((first_delta - 0.16).abs() < 1e-12);
        assert!(tangents[0].span() <= 0.1);
        // 下一个图像沿用缩短后的 δ
        assert!((tangents[1].end.0 - 10.16).abs() < 1e-12);
    }

    #[test]
    fn test_flat_profile_fails() {
        let points = [(0.0, 0.0, 1.0), (1.0, 0.0, 0.0)];
        assert!(matches!(
            force_tangents(&points, 0.0),
            Err(VasputilError::TangentClipping { image: 0 })
        ));
    }
}

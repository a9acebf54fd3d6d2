//! # NEB 结果处理模块
//!
//! 把 VTST 的 `neb.dat` / `spline.dat` 换算到绘图单位，并计算受力切线。
//!
//! ## 子模块
//! - `units`: 能量单位换算
//! - `tangent`: 受力切线与裁剪
//! - `plot`: 图表生成
//!
//! ## 依赖关系
//! - 被 `commands/neb.rs` 使用
//! - 使用 `parsers/neb.rs` 的数据结构

pub mod plot;
pub mod tangent;
pub mod units;

pub use plot::{generate_neb_plot, PlotStyle};
pub use tangent::{force_tangents, Tangent};

use crate::error::{Result, VasputilError};
use crate::parsers::neb::{NebImage, SplinePoint};
use std::path::{Path, PathBuf};

/// 换算到绘图单位后的 NEB 数据
#[derive(Debug, Clone)]
pub struct NebProfile {
    /// 样条 (反应坐标, 能量)
    pub spline: Vec<(f64, f64)>,
    /// 图像 (反应坐标, 能量, 受力)
    pub images: Vec<(f64, f64, f64)>,
    /// 相对第一个图像的色散能
    pub dispersion: Option<Vec<f64>>,
    pub unit: String,
    /// eV 到 `unit` 的换算因子（除以它）
    pub conv: f64,
}

impl NebProfile {
    pub fn new(images: &[NebImage], spline: &[SplinePoint], unit: &str) -> Result<Self> {
        if images.is_empty() {
            return Err(VasputilError::InvalidFormat(
                "neb.dat contains no images".to_string(),
            ));
        }
        let conv = units::conversion_factor(unit)?;
        Ok(NebProfile {
            spline: spline
                .iter()
                .map(|p| (p.reaction_coordinate, p.energy / conv))
                .collect(),
            images: images
                .iter()
                .map(|p| (p.reaction_coordinate, p.energy / conv, p.force / conv))
                .collect(),
            dispersion: None,
            unit: unit.to_string(),
            conv,
        })
    }

    /// 加入各图像的色散能 (eV)，取相对第一个图像的差值并换算单位
    pub fn with_dispersion(mut self, raw: &[f64]) -> Result<Self> {
        if raw.len() != self.images.len() {
            return Err(VasputilError::CountMismatch {
                inputs: self.images.len(),
                outputs: raw.len(),
            });
        }
        let reference = raw[0];
        self.dispersion = Some(raw.iter().map(|d| (d - reference) / self.conv).collect());
        Ok(self)
    }

    /// 样条能量的最大值减最小值
    pub fn energy_range(&self) -> f64 {
        let (lo, hi) = self
            .spline
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.1), hi.max(p.1))
            });
        if lo.is_finite() {
            hi - lo
        } else {
            0.0
        }
    }

    pub fn tangents(&self) -> Result<Vec<Tangent>> {
        force_tangents(&self.images, self.energy_range())
    }
}

/// 高亮图的文件名：`NEB.png` -> `NEB-03.png`
pub fn highlight_filename(path: &Path, image: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("NEB");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{:02}.{}", stem, image, ext),
        None => format!("{}-{:02}", stem, image),
    };
    path.with_file_name(name)
}

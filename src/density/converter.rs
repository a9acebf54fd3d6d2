//! # 体数据归一化与通道拆分
//!
//! 把 CHGCAR/ELFCAR 读出的网格转换为可写出的 cube 通道。
//!
//! ## 归一化
//! CHGCAR 中存储的是 ρ × N（N 为网格点数），而不是 ρ × V。
//! 除以 N 后，网格平均值乘以晶胞体积即为电子数；
//! `VolumeScaled` 模式再乘以体积，即 ρ × V / N。
//! ELFCAR 的数值本身已是 [0, 1] 范围，不做缩放。
//!
//! ## 依赖关系
//! - 被 `commands/cube.rs` 调用
//! - 使用 `models/grid.rs`, `models/structure.rs`

use crate::error::{Result, VasputilError};
use crate::models::{Crystal, ScalarGrid, VolumetricData};

/// 体数据来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// CHGCAR / CHG / PARCHG
    ChargeDensity,
    /// ELFCAR
    Localization,
}

/// 归一化方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionMode {
    /// 除以网格点数 N
    Plain,
    /// 除以 N / V
    VolumeScaled,
}

/// 输出通道标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLabel {
    Total,
    TotalMag,
    Up,
    Down,
    Diff,
}

impl ChannelLabel {
    /// 输出文件名后缀（`total` 不加后缀）
    pub fn file_suffix(&self) -> &'static str {
        match self {
            ChannelLabel::Total => "",
            ChannelLabel::TotalMag => "_mag",
            ChannelLabel::Up => "_up",
            ChannelLabel::Down => "_down",
            ChannelLabel::Diff => "_diff",
        }
    }
}

impl std::fmt::Display for ChannelLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelLabel::Total => write!(f, "total"),
            ChannelLabel::TotalMag => write!(f, "total_mag"),
            ChannelLabel::Up => write!(f, "up"),
            ChannelLabel::Down => write!(f, "down"),
            ChannelLabel::Diff => write!(f, "diff"),
        }
    }
}

/// 一个带标签的输出网格
#[derive(Debug, Clone)]
pub struct Channel {
    pub label: ChannelLabel,
    pub grid: ScalarGrid,
}

impl Channel {
    fn new(label: ChannelLabel, grid: ScalarGrid) -> Self {
        Channel { label, grid }
    }
}

/// 网格的平均绝对值
pub fn integral(grid: &ScalarGrid) -> f64 {
    grid.abs_sum() / grid.len() as f64
}

/// 计算归一化因子 F
pub fn normalization_factor(points: usize, structure: &Crystal, mode: ConversionMode) -> Result<f64> {
    let n = points as f64;
    match mode {
        ConversionMode::Plain => Ok(n),
        ConversionMode::VolumeScaled => {
            let volume = structure.lattice.volume();
            if !volume.is_finite() || volume <= 0.0 {
                return Err(VasputilError::InvalidVolume(volume));
            }
            Ok(n / volume)
        }
    }
}

/// 把体数据转换为一组输出通道
///
/// `combine_spin` 为真时需要自旋通道，否则返回 `MissingSpinData`。
/// `path` 仅用于错误信息。
pub fn convert(
    data: &VolumetricData,
    structure: &Crystal,
    kind: SourceKind,
    mode: ConversionMode,
    combine_spin: bool,
    path: &str,
) -> Result<Vec<Channel>> {
    data.check_shapes()?;

    let spin = match (&data.spin_companion, combine_spin) {
        (Some(spin), true) => Some(spin),
        (None, true) => {
            return Err(VasputilError::MissingSpinData {
                path: path.to_string(),
            })
        }
        (_, false) => None,
    };

    match kind {
        SourceKind::ChargeDensity => {
            let factor = normalization_factor(data.primary.len(), structure, mode)?;
            let mut channels = vec![Channel::new(ChannelLabel::Total, data.primary.scaled(factor))];
            if let Some(spin) = spin {
                channels.push(Channel::new(ChannelLabel::TotalMag, spin.scaled(factor)));
            }
            Ok(channels)
        }
        SourceKind::Localization => match spin {
            None => Ok(vec![Channel::new(ChannelLabel::Total, data.primary.clone())]),
            Some(spin) => {
                let down = data.primary.zip_with(spin, |up, diff| up - diff)?;
                Ok(vec![
                    Channel::new(ChannelLabel::Up, data.primary.clone()),
                    Channel::new(ChannelLabel::Down, down),
                    Channel::new(ChannelLabel::Diff, spin.clone()),
                ])
            }
        },
    }
}

/// 单个文件的积分诊断
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegralReport {
    pub primary: f64,
    pub spin: Option<f64>,
}

impl IntegralReport {
    /// 由转换结果计算：主通道取第一个通道，
    /// 自旋取 `total_mag`（电荷）或 `down`（ELF）
    pub fn from_channels(channels: &[Channel]) -> Option<Self> {
        let primary = integral(&channels.first()?.grid);
        let spin = channels
            .iter()
            .find(|c| matches!(c.label, ChannelLabel::TotalMag | ChannelLabel::Down))
            .map(|c| integral(&c.grid));
        Some(IntegralReport { primary, spin })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Atom, Lattice};

    fn structure(a: f64) -> Crystal {
        let lattice = Lattice::from_vectors([[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]);
        Crystal::new("test", lattice, vec![Atom::new("H", [0.0, 0.0, 0.0])])
    }

    fn ramp(shape: [usize; 3], offset: f64) -> ScalarGrid {
        let n = shape[0] * shape[1] * shape[2];
        ScalarGrid::new(shape, (0..n).map(|i| i as f64 * 0.5 - offset).collect()).unwrap()
    }

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < tol, "{} != {}", x, y);
        }
    }

    #[test]
    fn test_plain_end_to_end() {
        let grid = ScalarGrid::filled([2, 2, 2], 8.0).unwrap();
        let data = VolumetricData::new(grid, None).unwrap();
        let channels = convert(
            &data,
            &structure(3.0),
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            false,
            "CHGCAR",
        )
        .unwrap();

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].label, ChannelLabel::Total);
        assert!(channels[0].grid.values().iter().all(|v| (v - 1.0).abs() < 1e-12));
        assert!((integral(&channels[0].grid) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_plain_round_trip() {
        let grid = ramp([3, 4, 5], 7.0);
        let data = VolumetricData::new(grid.clone(), None).unwrap();
        let channels = convert(
            &data,
            &structure(2.0),
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            false,
            "CHGCAR",
        )
        .unwrap();

        let restored: Vec<f64> = channels[0].grid.values().iter().map(|v| v * 60.0).collect();
        assert_close(&restored, grid.values(), 1e-9);
        assert_eq!(channels[0].grid.shape(), [3, 4, 5]);
    }

    #[test]
    fn test_volume_scaled_round_trip() {
        let grid = ramp([2, 3, 4], 1.0);
        let data = VolumetricData::new(grid.clone(), None).unwrap();
        let crystal = structure(2.5);
        let volume = crystal.lattice.volume();
        let channels = convert(
            &data,
            &crystal,
            SourceKind::ChargeDensity,
            ConversionMode::VolumeScaled,
            false,
            "CHGCAR",
        )
        .unwrap();

        let restored: Vec<f64> = channels[0]
            .grid
            .values()
            .iter()
            .map(|v| v * 24.0 / volume)
            .collect();
        assert_close(&restored, grid.values(), 1e-9);
    }

    #[test]
    fn test_spin_density_channels_share_factor() {
        let total = ramp([2, 2, 3], 0.0);
        let diff = ramp([2, 2, 3], 2.0);
        let data = VolumetricData::new(total.clone(), Some(diff.clone())).unwrap();
        let channels = convert(
            &data,
            &structure(4.0),
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            true,
            "CHGCAR",
        )
        .unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].label, ChannelLabel::Total);
        assert_eq!(channels[1].label, ChannelLabel::TotalMag);
        let expected_total: Vec<f64> = total.values().iter().map(|v| v / 12.0).collect();
        let expected_mag: Vec<f64> = diff.values().iter().map(|v| v / 12.0).collect();
        assert_close(channels[0].grid.values(), &expected_total, 1e-12);
        assert_close(channels[1].grid.values(), &expected_mag, 1e-12);
    }

    #[test]
    fn test_localization_spin_channels() {
        let up = ramp([2, 2, 2], 0.0);
        let diff = ramp([2, 2, 2], -1.0);
        let data = VolumetricData::new(up.clone(), Some(diff.clone())).unwrap();
        let channels = convert(
            &data,
            &structure(4.0),
            SourceKind::Localization,
            ConversionMode::VolumeScaled,
            true,
            "ELFCAR",
        )
        .unwrap();

        let labels: Vec<ChannelLabel> = channels.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![ChannelLabel::Up, ChannelLabel::Down, ChannelLabel::Diff]);
        assert_eq!(channels[0].grid.values(), up.values());
        assert_eq!(channels[2].grid.values(), diff.values());
        let expected_down: Vec<f64> = up
            .values()
            .iter()
            .zip(diff.values())
            .map(|(u, d)| u - d)
            .collect();
        assert_eq!(channels[1].grid.values(), expected_down.as_slice());
    }

    #[test]
    fn test_localization_is_not_rescaled() {
        let grid = ramp([2, 2, 2], 0.0);
        let data = VolumetricData::new(grid.clone(), None).unwrap();
        let channels = convert(
            &data,
            &structure(4.0),
            SourceKind::Localization,
            ConversionMode::Plain,
            false,
            "ELFCAR",
        )
        .unwrap();

        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].grid, grid);
    }

    #[test]
    fn test_missing_spin_data() {
        let data = VolumetricData::new(ScalarGrid::filled([2, 2, 2], 1.0).unwrap(), None).unwrap();
        for kind in [SourceKind::ChargeDensity, SourceKind::Localization] {
            let result = convert(&data, &structure(1.0), kind, ConversionMode::Plain, true, "CHGCAR");
            assert!(matches!(result, Err(VasputilError::MissingSpinData { .. })));
        }
    }

    #[test]
    fn test_shape_mismatch() {
        // 绕过构造检查，模拟外部读取器给出的不一致数据
        let data = VolumetricData {
            primary: ScalarGrid::filled([10, 10, 10], 1.0).unwrap(),
            spin_companion: Some(ScalarGrid::filled([10, 10, 11], 1.0).unwrap()),
        };
        let result = convert(
            &data,
            &structure(1.0),
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            true,
            "CHGCAR",
        );
        assert!(matches!(result, Err(VasputilError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_invalid_volume() {
        let data = VolumetricData::new(ScalarGrid::filled([2, 2, 2], 1.0).unwrap(), None).unwrap();
        let flat = Crystal::new(
            "flat",
            Lattice::from_vectors([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]]),
            vec![],
        );
        let result = convert(
            &data,
            &flat,
            SourceKind::ChargeDensity,
            ConversionMode::VolumeScaled,
            false,
            "CHGCAR",
        );
        assert!(matches!(result, Err(VasputilError::InvalidVolume(_))));

        // Plain 模式不需要体积
        assert!(convert(
            &data,
            &flat,
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            false,
            "CHGCAR"
        )
        .is_ok());
    }

    #[test]
    fn test_integral_report() {
        let total = ScalarGrid::filled([2, 2, 2], 16.0).unwrap();
        let diff = ScalarGrid::filled([2, 2, 2], -4.0).unwrap();
        let data = VolumetricData::new(total, Some(diff)).unwrap();
        let channels = convert(
            &data,
            &structure(1.0),
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            true,
            "CHGCAR",
        )
        .unwrap();

        let report = IntegralReport::from_channels(&channels).unwrap();
        assert!((report.primary - 2.0).abs() < 1e-12);
        assert!((report.spin.unwrap() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_integral_report_localization() {
        // ELF: up = U, down = U - D，自旋积分取 down 通道
        let total = ScalarGrid::filled([2, 2, 2], 0.8).unwrap();
        let diff = ScalarGrid::filled([2, 2, 2], 0.2).unwrap();
        let data = VolumetricData::new(total, Some(diff)).unwrap();
        let channels = convert(&data, &structure(1.0), SourceKind::Localization, ConversionMode::Plain, true, "ELFCAR").unwrap();
        let report = IntegralReport::from_channels(&channels).unwrap();
        assert!((report.primary - 0.8).abs() < 1e-12);
        assert!((report.spin.unwrap() - 0.6).abs() < 1e-12);
    }
}

//! # NEB 能量曲线绘图
//!
//! 使用 `plotters` 绘制 NEB 反应路径：样条曲线、图像能量点、受力切线，
//! 以及可选的高亮图像与色散能。
//!
//! ## 依赖关系
//! - 被 `commands/neb.rs` 调用
//! - 使用 `neb/mod.rs` 的 NebProfile 与 `neb/tangent.rs` 的 Tangent
//! - 使用 `plotters` 渲染图表

use crate::error::{Result, VasputilError};
use crate::neb::tangent::Tangent;
use crate::neb::NebProfile;

use plotters::prelude::*;
use std::path::Path;

/// 线宽、点大小与字号
#[derive(Debug, Clone, Copy)]
pub struct PlotStyle {
    pub line_width: u32,
    pub marker_size: i32,
    pub font_size: i32,
    pub width: u32,
    pub height: u32,
}

impl PlotStyle {
    pub fn standard() -> Self {
        PlotStyle {
            line_width: 3,
            marker_size: 7,
            font_size: 18,
            width: 800,
            height: 600,
        }
    }

    /// 演示模式：更粗的线与更大的字
    pub fn presentation() -> Self {
        PlotStyle {
            line_width: 5,
            marker_size: 9,
            font_size: 26,
            ..Self::standard()
        }
    }
}

fn plot_error<E: std::fmt::Debug>(e: E) -> VasputilError {
    VasputilError::PlotError(format!("{:?}", e))
}

/// 生成 NEB 图，扩展名为 `.svg` 时输出 SVG，否则输出 PNG
pub fn generate_neb_plot(
    profile: &NebProfile,
    tangents: &[Tangent],
    highlight: Option<usize>,
    output_path: &Path,
    style: &PlotStyle,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (style.width, style.height)).into_drawing_area();
        draw_neb_chart(&root, profile, tangents, highlight, style)?;
        root.present().map_err(plot_error)?;
    } else {
        let root =
            BitMapBackend::new(output_path, (style.width, style.height)).into_drawing_area();
        draw_neb_chart(&root, profile, tangents, highlight, style)?;
        root.present().map_err(plot_error)?;
    }
    Ok(())
}

/// 数值序列的范围，带 10% 边距
fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let margin = if hi > lo { (hi - lo) * 0.1 } else { 1.0 };
    (lo - margin, hi + margin)
}

/// 所有绘制点的坐标范围
fn axis_ranges(profile: &NebProfile, tangents: &[Tangent]) -> ((f64, f64), (f64, f64)) {
    let xs = profile
        .spline
        .iter()
        .map(|p| p.0)
        .chain(profile.images.iter().map(|p| p.0))
        .chain(tangents.iter().flat_map(|t| [t.start.0, t.end.0]));
    let ys = profile
        .spline
        .iter()
        .map(|p| p.1)
        .chain(profile.images.iter().map(|p| p.1))
        .chain(tangents.iter().flat_map(|t| [t.start.1, t.end.1]))
        .chain(profile.dispersion.iter().flatten().copied());

    (padded_bounds(xs), padded_bounds(ys))
}

/// 绘制 NEB 图的核心逻辑
fn draw_neb_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    profile: &NebProfile,
    tangents: &[Tangent],
    highlight: Option<usize>,
    style: &PlotStyle,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE).map_err(plot_error)?;

    let ((x_min, x_max), (y_min, y_max)) = axis_ranges(profile, tangents);
    let lw = style.line_width;
    let ms = style.marker_size;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(plot_error)?;

    // 反应坐标只表示顺序，不标数值
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc("Reaction Coordinate")
        .y_desc(format!("ΔE [{}]", profile.unit))
        .x_label_formatter(&|_| String::new())
        .y_label_style(("sans-serif", style.font_size))
        .axis_desc_style(("sans-serif", style.font_size))
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            profile.spline.iter().copied(),
            BLACK.stroke_width(lw),
        ))
        .map_err(plot_error)?
        .label("Cubic Spline")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(lw)));

    chart
        .draw_series(
            profile
                .images
                .iter()
                .map(|&(x, e, _)| Cross::new((x, e), ms, RED.stroke_width(lw))),
        )
        .map_err(plot_error)?
        .label("NEB Energy")
        .legend(move |(x, y)| Cross::new((x + 10, y), ms, RED.stroke_width(lw)));

    chart
        .draw_series(
            tangents
                .iter()
                .map(|t| PathElement::new(vec![t.start, t.end], GREEN.stroke_width(lw))),
        )
        .map_err(plot_error)?
        .label("NEB Force")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN.stroke_width(lw)));

    if let Some(i) = highlight {
        if let Some(&(x, e, _)) = profile.images.get(i) {
            let orange = RGBColor(255, 165, 0);
            chart
                .draw_series(std::iter::once(Circle::new(
                    (x, e),
                    ms * 3,
                    orange.stroke_width(lw + 2),
                )))
                .map_err(plot_error)?;
        }
    }

    // 色散能相对第一个图像，第一个点恒为 0，不画
    if let Some(dispersion) = &profile.dispersion {
        let brown = RGBColor(165, 42, 42);
        chart
            .draw_series(
                profile
                    .images
                    .iter()
                    .zip(dispersion.iter())
                    .skip(1)
                    .map(move |(&(x, _, _), &d)| Circle::new((x, d), ms, brown.filled())),
            )
            .map_err(plot_error)?
            .label("Dispersion")
            .legend(move |(x, y)| Circle::new((x + 10, y), ms, brown.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font(("sans-serif", style.font_size))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;

    Ok(())
}

//! # plot-neb / neb2movie 命令实现
//!
//! ## 功能
//! - `plot-neb`: 读取 `neb.dat`/`spline.dat`，换算单位后绘制能量曲线与受力切线，
//!   可选高亮图像、逐图像高亮输出与色散能
//! - `neb2movie`: 把 `00`, `01`, ... 目录中的结构串成 extxyz 轨迹
//!
//! ## 依赖关系
//! - 使用 `cli/neb.rs` 定义的参数
//! - 使用 `neb/`, `parsers/neb.rs`, `parsers/outcar.rs`, `parsers/poscar.rs`, `parsers/xyz.rs`
//! - 使用 `utils/`

use crate::cli::neb::{ImageSource, Neb2movieArgs, PlotNebArgs};
use crate::error::{Result, VasputilError};
use crate::neb::{self, NebProfile, PlotStyle};
use crate::parsers::xyz::{self, Frame};
use crate::parsers::{neb as nebdat, outcar, poscar};
use crate::utils::{fs as fsutil, output, progress};

use std::path::{Path, PathBuf};

fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(VasputilError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// 执行 plot-neb 命令
pub fn execute_plot(args: PlotNebArgs) -> Result<()> {
    output::print_header("Plotting NEB results");

    let conv = neb::units::conversion_factor(&args.unit)?;
    output::print_info(&format!(
        "Unit conversion factor from eV to {}: {}",
        args.unit, conv
    ));

    let spline_path = args.workdir.join("spline.dat");
    let neb_path = args.workdir.join("neb.dat");
    require_file(&spline_path)?;
    require_file(&neb_path)?;
    let spline = nebdat::load_spline_dat(&spline_path)?;
    let images = nebdat::load_neb_dat(&neb_path)?;
    output::print_info(&format!(
        "{} spline points, {} images loaded",
        spline.len(),
        images.len()
    ));

    if let Some(h) = args.highlight {
        if h >= images.len() {
            return Err(VasputilError::InvalidArgument(format!(
                "--highlight {} is out of range (0..{})",
                h,
                images.len()
            )));
        }
    }

    let mut profile = NebProfile::new(&images, &spline, &args.unit)?;
    if args.plot_dispersion {
        output::print_info("Collecting dispersion energies from OUTCARs");
        let raw = collect_dispersion(&args.workdir, images.len())?;
        profile = profile.with_dispersion(&raw)?;
    }

    let tangents = profile.tangents()?;
    let style = if args.presentation {
        PlotStyle::presentation()
    } else {
        PlotStyle::standard()
    };

    neb::generate_neb_plot(&profile, &tangents, args.highlight, &args.file, &style)?;
    output::print_conversion(&neb_path.display().to_string(), &args.file.display().to_string());

    if args.plot_all {
        let pb = progress::create_progress_bar(images.len() as u64, "Plotting");
        for i in 0..images.len() {
            let path = neb::highlight_filename(&args.file, i);
            neb::generate_neb_plot(&profile, &tangents, Some(i), &path, &style)?;
            pb.inc(1);
        }
        pb.finish_with_message("Done");
    }

    output::print_done("NEB plot finished");
    Ok(())
}

/// 读取每个图像目录 `NN/OUTCAR` 中最后的色散能 (eV)
fn collect_dispersion(workdir: &Path, n_images: usize) -> Result<Vec<f64>> {
    (0..n_images)
        .map(|i| {
            let dir = workdir.join(format!("{:02}", i));
            if !dir.is_dir() {
                return Err(VasputilError::DirectoryNotFound {
                    path: dir.display().to_string(),
                });
            }
            let path = dir.join("OUTCAR");
            require_file(&path)?;
            outcar::last_dispersion_energy(&path)
        })
        .collect()
}

/// 执行 neb2movie 命令
pub fn execute_movie(args: Neb2movieArgs) -> Result<()> {
    output::print_header("Converting NEB images to extxyz");

    let dirs = fsutil::collect_image_dirs(&args.workdir)?;
    if dirs.is_empty() {
        return Err(VasputilError::InvalidArgument(format!(
            "No NEB image folders (00, 01, ...) found in {}",
            args.workdir.display()
        )));
    }
    output::print_info(&format!("Found {} NEB subdirs", dirs.len()));

    let source = resolve_source(&args.workdir, args.source)?;
    output::print_info(&format!("Using {} files", source.file_name()));

    let frames = load_images(&dirs, source, args.wrap)?;

    fsutil::backup_existing(&args.output, true)?;
    xyz::append_frames(&args.output, &frames)?;

    output::print_done(&format!(
        "Wrote {} frames to {}",
        frames.len(),
        args.output.display()
    ));
    Ok(())
}

/// 未显式指定时：`01/CONTCAR` 存在则用 CONTCAR，否则用 POSCAR
fn resolve_source(workdir: &Path, explicit: Option<ImageSource>) -> Result<ImageSource> {
    if let Some(source) = explicit {
        return Ok(source);
    }
    let first = workdir.join("01");
    if first.join("CONTCAR").is_file() {
        Ok(ImageSource::Contcar)
    } else if first.join("POSCAR").is_file() {
        Ok(ImageSource::Poscar)
    } else {
        Err(VasputilError::FileNotFound {
            path: first.join("CONTCAR").display().to_string(),
        })
    }
}

/// 首尾图像固定读取 POSCAR，中间图像读取 `source`
fn load_images(dirs: &[PathBuf], source: ImageSource, wrap: bool) -> Result<Vec<Frame>> {
    let last = dirs.len() - 1;
    dirs.iter()
        .enumerate()
        .map(|(i, dir)| {
            let name = if i == 0 || i == last {
                "POSCAR"
            } else {
                source.file_name()
            };
            let mut crystal = poscar::parse_poscar_file(&dir.join(name))?;
            if wrap {
                crystal.wrap_centered();
            }
            Ok(Frame::new(crystal))
        })
        .collect()
}

//! # plot-neb / neb2movie 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/neb.rs`

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// plot-neb 子命令参数
#[derive(Args, Debug)]
pub struct PlotNebArgs {
    /// Plot file name (.png or .svg)
    #[arg(short, long, default_value = "NEB.png")]
    pub file: PathBuf,

    /// NEB directory containing neb.dat and spline.dat
    #[arg(short = 'i', long, default_value = ".")]
    pub workdir: PathBuf,

    /// Energy unit, e.g. eV, meV, kJ/mol, kcal/mol, Hartree
    #[arg(short, long, default_value = "kJ/mol")]
    pub unit: String,

    /// Circle image N
    #[arg(long)]
    pub highlight: Option<usize>,

    /// Also write one plot per image with that image highlighted
    #[arg(long, default_value_t = false)]
    pub plot_all: bool,

    /// Include dispersion energies read from NN/OUTCAR
    #[arg(long, default_value_t = false)]
    pub plot_dispersion: bool,

    /// Presentation mode (thicker lines, larger fonts)
    #[arg(long, default_value_t = false)]
    pub presentation: bool,
}

/// 中间图像使用的结构文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImageSource {
    /// POSCAR
    #[value(name = "0")]
    Poscar,
    /// CONTCAR
    #[value(name = "1")]
    Contcar,
}

impl ImageSource {
    pub fn file_name(&self) -> &'static str {
        match self {
            ImageSource::Poscar => "POSCAR",
            ImageSource::Contcar => "CONTCAR",
        }
    }
}

/// neb2movie 子命令参数
#[derive(Args, Debug)]
pub struct Neb2movieArgs {
    /// Use 1: CONTCAR or 0: POSCAR (default: CONTCAR if 01/CONTCAR exists)
    #[arg(value_enum)]
    pub source: Option<ImageSource>,

    /// Output extxyz file
    #[arg(short, long, default_value = "movie.xyz")]
    pub output: PathBuf,

    /// NEB directory containing the 00, 01, ... folders
    #[arg(short = 'i', long, default_value = ".")]
    pub workdir: PathBuf,

    /// Wrap atoms into the cell centred on the origin
    #[arg(short, long, default_value_t = false)]
    pub wrap: bool,
}

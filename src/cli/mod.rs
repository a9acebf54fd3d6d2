//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `chgcar2cube`: CHGCAR/CHG/PARCHG -> cube
//! - `elf2cube`: ELFCAR -> cube
//! - `plot-neb`: VTST NEB 结果绘图
//! - `neb2movie`: NEB 图像目录 -> extxyz 轨迹
//! - `vasp2traj`: XDATCAR/OUTCAR -> extxyz 轨迹
//! - `add-modecar`: POSCAR + MODECAR -> 两帧 extxyz
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: cube, neb, traj

pub mod cube;
pub mod neb;
pub mod traj;

use clap::{Parser, Subcommand};

/// vasputil - VASP 后处理工具箱
#[derive(Parser)]
#[command(name = "vasputil")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "A toolkit for post-processing VASP calculations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, global = true, default_value_t = 0)]
    pub jobs: usize,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    // ─────────────────────────────────────────────────────────────
    // 体数据
    // ─────────────────────────────────────────────────────────────
    /// Convert CHGCAR-like charge density files to Gaussian cube
    Chgcar2cube(cube::Chgcar2cubeArgs),

    /// Convert ELFCAR electron localization files to Gaussian cube
    Elf2cube(cube::Elf2cubeArgs),

    // ─────────────────────────────────────────────────────────────
    // NEB
    // ─────────────────────────────────────────────────────────────
    /// Plot VASP+VTST NEB results (neb.dat / spline.dat)
    PlotNeb(neb::PlotNebArgs),

    /// Convert NEB image folders to an extxyz trajectory
    Neb2movie(neb::Neb2movieArgs),

    // ─────────────────────────────────────────────────────────────
    // 轨迹
    // ─────────────────────────────────────────────────────────────
    /// Convert XDATCAR or OUTCAR files to an extxyz trajectory
    Vasp2traj(traj::Vasp2trajArgs),

    /// Write POSCAR and POSCAR displaced by MODECAR as a two-frame extxyz
    AddModecar(traj::AddModecarArgs),
}

//! # add-modecar 命令实现
//!
//! 写出两帧 extxyz：原始结构，以及按 MODECAR 位移后的结构，便于查看 dimer 初始模式。
//!
//! ## 依赖关系
//! - 使用 `cli/traj.rs` 定义的参数
//! - 使用 `parsers/poscar.rs`, `parsers/modecar.rs`, `parsers/xyz.rs`

use crate::cli::traj::AddModecarArgs;
use crate::error::{Result, VasputilError};
use crate::parsers::xyz::{self, Frame};
use crate::parsers::{modecar, poscar};
use crate::utils::{fs as fsutil, output};

/// 执行 add-modecar 命令
pub fn execute(args: AddModecarArgs) -> Result<()> {
    let crystal = poscar::parse_poscar_file(&args.poscar)?;
    let displacements = modecar::parse_modecar_file(&args.modecar)?;
    if displacements.len() != crystal.atoms.len() {
        return Err(VasputilError::CountMismatch {
            inputs: crystal.atoms.len(),
            outputs: displacements.len(),
        });
    }

    let mut displaced = crystal.clone();
    displaced.displace(&displacements);

    fsutil::backup_existing(&args.output, true)?;
    xyz::append_frames(&args.output, &[Frame::new(crystal), Frame::new(displaced)])?;

    output::print_conversion(
        &format!("{} + {}", args.poscar.display(), args.modecar.display()),
        &args.output.display().to_string(),
    );
    Ok(())
}

//! # vasp2traj 命令实现
//!
//! 把 XDATCAR 或 OUTCAR 中的每个离子步写成 extxyz 帧，多个输入依次追加到同一输出。
//!
//! ## 依赖关系
//! - 使用 `cli/traj.rs` 定义的参数
//! - 使用 `parsers/mod.rs` 的格式推断, `parsers/xyz.rs`
//! - 使用 `utils/`

use crate::cli::traj::Vasp2trajArgs;
use crate::error::{Result, VasputilError};
use crate::parsers::{self, xyz};
use crate::utils::{fs as fsutil, output, progress};

/// 执行 vasp2traj 命令
pub fn execute(args: Vasp2trajArgs) -> Result<()> {
    output::print_header("Converting VASP output to extxyz");

    // 先检查全部输入，避免备份后才发现缺文件
    for input in &args.inputs {
        if !input.is_file() {
            return Err(VasputilError::FileNotFound {
                path: input.display().to_string(),
            });
        }
    }

    fsutil::backup_existing(&args.output, true)?;

    let mut total = 0;
    for input in &args.inputs {
        let spinner = progress::create_spinner(&format!("Reading {}", input.display()));
        let parsed = parsers::parse_trajectory_file(input);
        spinner.finish_and_clear();

        let mut frames = parsed?;
        if args.wrap {
            for frame in &mut frames {
                frame.crystal.wrap_centered();
            }
        }
        xyz::append_frames(&args.output, &frames)?;
        output::print_conversion(
            &format!("{} ({} frames)", input.display(), frames.len()),
            &args.output.display().to_string(),
        );
        total += frames.len();
    }

    output::print_done(&format!(
        "Wrote {} frames to {}",
        total,
        args.output.display()
    ));
    Ok(())
}

//! # chgcar2cube / elf2cube 命令实现
//!
//! 逐个读取 CHGCAR/ELFCAR，归一化并拆分通道后写出 cube 文件。
//!
//! ## 功能
//! - 输出名由 `-o` 指定，缺省时以输入路径为基名
//! - 已存在的输出先改名为 `.bak`
//! - 单个文件失败不会中断批处理，结束时返回失败计数
//! - 可选积分汇总表 (`--integral`) 与 CSV 报告 (`--report`)
//!
//! ## 依赖关系
//! - 使用 `cli/cube.rs` 定义的参数
//! - 使用 `parsers/chgcar.rs`, `parsers/cube.rs`, `density/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`, `utils/fs.rs`

use crate::cli::cube::{Chgcar2cubeArgs, CubeArgs, Elf2cubeArgs};
use crate::density::{self, Channel, ConversionMode, IntegralReport, SourceKind};
use crate::error::{Result, VasputilError};
use crate::parsers::{chgcar, cube};
use crate::utils::{fs as fsutil, output, progress};

use indicatif::ProgressBar;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 执行 chgcar2cube 命令
pub fn execute_chgcar(args: Chgcar2cubeArgs) -> Result<()> {
    let mode = if args.volume {
        ConversionMode::VolumeScaled
    } else {
        ConversionMode::Plain
    };
    run_batch(&args.common, SourceKind::ChargeDensity, mode)
}

/// 执行 elf2cube 命令
pub fn execute_elf(args: Elf2cubeArgs) -> Result<()> {
    run_batch(&args.common, SourceKind::Localization, ConversionMode::Plain)
}

/// 单个文件的积分记录
#[derive(Debug, Clone, Serialize)]
struct IntegralRecord {
    file: String,
    kind: &'static str,
    total: f64,
    spin: Option<f64>,
}

#[derive(Tabled)]
struct IntegralRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Integral (total)")]
    total: String,
    #[tabled(rename = "Integral (spin)")]
    spin: String,
}

impl From<&IntegralRecord> for IntegralRow {
    fn from(r: &IntegralRecord) -> Self {
        IntegralRow {
            file: r.file.clone(),
            total: format!("{:.6}", r.total),
            spin: r
                .spin
                .map(|s| format!("{:.6}", s))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn kind_name(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::ChargeDensity => "charge",
        SourceKind::Localization => "elf",
    }
}

fn run_batch(args: &CubeArgs, kind: SourceKind, mode: ConversionMode) -> Result<()> {
    let bases = output_bases(&args.inputs, &args.output)?;

    output::print_header(&format!(
        "Converting {} file(s) to cube ({})",
        args.inputs.len(),
        kind_name(kind)
    ));

    let pb = progress::batch_progress(args.inputs.len(), "Converting");
    let mut records = Vec::with_capacity(args.inputs.len());
    let mut failed = 0;

    for (input, base) in args.inputs.iter().zip(bases.iter()) {
        pb.set_message(input.display().to_string());
        match convert_file(input, base, kind, mode, args, &pb) {
            Ok(report) => records.push(IntegralRecord {
                file: input.display().to_string(),
                kind: kind_name(kind),
                total: report.primary,
                spin: report.spin,
            }),
            Err(e) => {
                failed += 1;
                pb.suspend(|| output::print_error(&format!("{}: {}", input.display(), e)));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if args.integral && !records.is_empty() {
        let rows: Vec<IntegralRow> = records.iter().map(IntegralRow::from).collect();
        println!("\n{}", Table::new(rows));
    }

    if let Some(report_path) = &args.report {
        write_report(report_path, &records)?;
        output::print_info(&format!("Integral report written to {}", report_path.display()));
    }

    if failed > 0 {
        return Err(VasputilError::BatchFailed {
            failed,
            total: args.inputs.len(),
        });
    }

    output::print_done(&format!("Converted {} file(s)", records.len()));
    Ok(())
}

/// 输出基名：与输入一一对应，缺省时使用输入路径本身
fn output_bases(inputs: &[PathBuf], outputs: &[String]) -> Result<Vec<String>> {
    if outputs.is_empty() {
        return Ok(inputs.iter().map(|p| p.display().to_string()).collect());
    }
    if outputs.len() != inputs.len() {
        return Err(VasputilError::CountMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    Ok(outputs.to_vec())
}

/// `<base><suffix>.cube`
fn channel_path(base: &str, channel: &Channel) -> PathBuf {
    PathBuf::from(format!("{}{}.cube", base, channel.label.file_suffix()))
}

/// 转换单个文件，所有通道计算完成后才开始写出
fn convert_file(
    input: &Path,
    base: &str,
    kind: SourceKind,
    mode: ConversionMode,
    args: &CubeArgs,
    pb: &ProgressBar,
) -> Result<IntegralReport> {
    let verbose = args.verbose;
    if verbose {
        pb.suspend(|| output::print_info(&format!("Reading {}", input.display())));
    }

    let file = chgcar::parse_volumetric_file(input)?;
    if file.blocks == 4 {
        pb.suspend(|| {
            output::print_warning(&format!(
                "{}: non-collinear data, only the total density is converted",
                input.display()
            ))
        });
    }

    let combine_spin = args.spin || file.data.is_spin_polarized();
    let channels = density::convert(
        &file.data,
        &file.structure,
        kind,
        mode,
        combine_spin,
        &input.display().to_string(),
    )?;
    let report = IntegralReport::from_channels(&channels).ok_or_else(|| {
        VasputilError::InvalidFormat(format!("{}: no channels produced", input.display()))
    })?;

    if verbose {
        let shape = file.data.primary.shape();
        pb.suspend(|| {
            output::print_detail(
                "Shape of data",
                &format!("{} x {} x {}", shape[0], shape[1], shape[2]),
            );
            output::print_detail("Total number of datapoints", &file.data.primary.len().to_string());
            for channel in &channels {
                output::print_detail(
                    &format!("Integral of {} data", channel.label),
                    &format!("{:.6}", density::integral(&channel.grid)),
                );
            }
        });
    }

    let comment = format!("{} ({})", file.structure.name, file.structure.formula());
    for channel in &channels {
        let path = channel_path(base, channel);
        pb.suspend(|| fsutil::backup_existing(&path, verbose))?;
        cube::write_cube_file(&path, &file.structure, &channel.grid, [0.0; 3], &comment)?;
        pb.suspend(|| {
            output::print_conversion(&input.display().to_string(), &path.display().to_string())
        });
    }

    Ok(report)
}

/// 写出 CSV 积分报告
fn write_report(path: &Path, records: &[IntegralRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush().map_err(|e| VasputilError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::chgcar::tests::chgcar_text;
    use std::fs;

    fn args(inputs: Vec<PathBuf>, output: Vec<String>) -> CubeArgs {
        CubeArgs {
            inputs,
            output,
            verbose: false,
            spin: false,
            integral: false,
            report: None,
        }
    }

    #[test]
    fn test_output_bases_default_and_mismatch() {
        let inputs = vec![PathBuf::from("a/CHGCAR"), PathBuf::from("CHG")];
        assert_eq!(
            output_bases(&inputs, &[]).unwrap(),
            vec!["a/CHGCAR".to_string(), "CHG".to_string()]
        );
        assert!(matches!(
            output_bases(&inputs, &["x".to_string()]),
            Err(VasputilError::CountMismatch {
                inputs: 2,
                outputs: 1
            })
        ));
    }

    #[test]
    fn test_convert_spin_chgcar_writes_two_cubes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CHGCAR");
        fs::write(&input, chgcar_text(&[8.0; 8], Some(&[4.0; 8]))).unwrap();
        let base = dir.path().join("out").display().to_string();

        let a = args(vec![input.clone()], vec![base.clone()]);
        let report = convert_file(
            &input,
            &base,
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            &a,
            &ProgressBar::hidden(),
        )
        .unwrap();

        assert!((report.primary - 1.0).abs() < 1e-12);
        assert!((report.spin.unwrap() - 0.5).abs() < 1e-12);
        assert!(dir.path().join("out.cube").is_file());
        assert!(dir.path().join("out_mag.cube").is_file());
    }

    #[test]
    fn test_convert_elf_spin_channels_and_backup() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("ELFCAR");
        fs::write(&input, chgcar_text(&[0.8; 8], Some(&[0.2; 8]))).unwrap();
        let base = dir.path().join("elf").display().to_string();
        fs::write(dir.path().join("elf_up.cube"), "old").unwrap();

        let a = args(vec![input.clone()], vec![base.clone()]);
        convert_file(
            &input,
            &base,
            SourceKind::Localization,
            ConversionMode::Plain,
            &a,
            &ProgressBar::hidden(),
        )
        .unwrap();

        for name in ["elf_up.cube", "elf_down.cube", "elf_diff.cube", "elf_up.cube.bak"] {
            assert!(dir.path().join(name).is_file(), "{} missing", name);
        }
        // down = up - diff = 0.6
        let text = fs::read_to_string(dir.path().join("elf_down.cube")).unwrap();
        assert!(text.lines().last().unwrap().contains("6.00000E-01"));
    }

    #[test]
    fn test_spin_flag_on_non_spin_file_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("CHGCAR");
        fs::write(&input, chgcar_text(&[8.0; 8], None)).unwrap();
        let base = dir.path().join("out").display().to_string();

        let mut a = args(vec![input.clone()], vec![base.clone()]);
        a.spin = true;
        let result = convert_file(
            &input,
            &base,
            SourceKind::ChargeDensity,
            ConversionMode::Plain,
            &a,
            &ProgressBar::hidden(),
        );

        assert!(matches!(result, Err(VasputilError::MissingSpinData { .. })));
        assert!(!dir.path().join("out.cube").exists());
    }

    #[test]
    fn test_batch_continues_after_failure_and_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("CHGCAR");
        fs::write(&good, chgcar_text(&[8.0; 8], None)).unwrap();
        let missing = dir.path().join("missing");
        let report = dir.path().join("integrals.csv");

        let mut a = args(
            vec![missing, good],
            vec![
                dir.path().join("m").display().to_string(),
                dir.path().join("g").display().to_string(),
            ],
        );
        a.report = Some(report.clone());

        let result = run_batch(&a, SourceKind::ChargeDensity, ConversionMode::Plain);
        assert!(matches!(
            result,
            Err(VasputilError::BatchFailed {
                failed: 1,
                total: 2
            })
        ));
        assert!(dir.path().join("g.cube").is_file());

        let csv = fs::read_to_string(&report).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "file,kind,total,spin");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(",charge,1.0,"));
    }
}

//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责协调图像文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::capacity::capacity_bits;
use crate::cli::{CapacityArgs, HideArgs, MergeArgs, RevealArgs, SplitArgs};
use crate::constants::{MAX_BITS_PER_CHANNEL, QUADRANT_COUNT, RECORD_HEADER_BITS};
use crate::steganography::{EmbeddingParameters, embed, extract};
use crate::tiling::{merge_quadrants, split_quadrants};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{ImageFormat, RgbImage};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 读取图像文件并转换为 8 位 RGB (丢弃 alpha 通道)。
fn load_rgb(path: &Path) -> Result<RgbImage> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    debug!(
        "loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// 检查输出路径：未指定 `force` 时拒绝覆盖已有文件，且只接受无损格式。
fn check_output(path: &Path, force: bool) -> Result<ImageFormat> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );

    let format = ImageFormat::from_path(path).ok();
    match format {
        Some(f @ (ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::Qoi)) => {
            Ok(f)
        }
        _ => anyhow::bail!(
            "Unsupported output format for {}. \nOnly lossless formats (png, bmp, tiff, qoi) keep the hidden bits intact.",
            path.to_string_lossy().red().bold()
        ),
    }
}

fn save(image: &RgbImage, path: &Path, format: ImageFormat) -> Result<()> {
    image.save_with_format(path, format).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 输入文件所在目录；文件名不带目录时为当前目录。
fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn create_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| {
        format!(
            "Unable to create output directory: {}",
            dir.to_string_lossy().red().bold()
        )
    })
}

/// 载体未指定输出路径时的默认隐写图像路径：`<载体目录>/stego_<载体名>.png`。
fn default_stego_path(cover: &Path) -> PathBuf {
    let stem = cover
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_string());
    parent_dir(cover).join(format!("stego_{stem}.png"))
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 读取载体和全部秘密图像，调用核心嵌入函数 (内部先做容量检查)，
/// 最后将隐写图像写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取载体或任意一张秘密图像。
/// * 载体没有足够的空间容纳全部秘密图像。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_stego_path(&args.cover));
    let format = check_output(&dest, args.force)?;

    let cover = load_rgb(&args.cover)?;
    let secrets = args
        .secrets
        .iter()
        .map(|path| load_rgb(path))
        .collect::<Result<Vec<_>>>()?;

    let params = EmbeddingParameters::new(args.bits, secrets.len())
        .context("Invalid embedding parameters")?;

    let stego = embed(&cover, &secrets, &params).with_context(|| {
        format!(
            "Not enough space or invalid input while hiding {} image(s) in {}",
            secrets.len().to_string().red().bold(),
            args.cover.to_string_lossy().red().bold()
        )
    })?;

    save(&stego, &dest, format)?;

    println!(
        "{} secret image(s) have been successfully hidden and saved: {}",
        secrets.len().to_string().green().bold(),
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Reveal' 命令的执行逻辑。
///
/// 读取隐写图像，按给定的 `k` 和 `N` 提取秘密图像，
/// 并依次保存为输出目录下的 `extracted1.png`、`extracted2.png` ……
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取隐写图像，或请求的数量超过图像能容纳的记录头数。
/// * 无法创建输出目录，或任意输出文件已存在且未指定 `--force`。
/// * 位流被截断 (通常是 `k`/`N` 与隐藏时不一致，或图像被有损压缩过)。
/// * 无法写入任意一个输出文件。
pub fn handle_reveal(args: RevealArgs) -> Result<()> {
    let params =
        EmbeddingParameters::new(args.bits, args.count).context("Invalid extraction parameters")?;

    let stego = load_rgb(&args.image)?;
    let max_count = capacity_bits(&stego, args.bits) / RECORD_HEADER_BITS as u64;
    anyhow::ensure!(
        args.count as u64 <= max_count,
        "Cannot recover {} image(s): {} holds at most {} at {} bit(s) per channel.",
        args.count.to_string().red().bold(),
        args.image.to_string_lossy().red().bold(),
        max_count.to_string().green().bold(),
        args.bits
    );

    let dir = args.output.clone().unwrap_or_else(|| parent_dir(&args.image));
    create_output_dir(&dir)?;
    let targets = (1..=args.count)
        .map(|i| {
            let path = dir.join(format!("extracted{i}.png"));
            check_output(&path, args.force).map(|format| (path, format))
        })
        .collect::<Result<Vec<_>>>()?;

    let secrets = extract(&stego, &params).with_context(|| {
        format!(
            "Failed to recover {} image(s) from '{}'. \nThe image may use a different bit depth or image count, or it is corrupted.",
            args.count.to_string().red().bold(),
            args.image.to_string_lossy().red().bold()
        )
    })?;

    for (secret, (path, format)) in secrets.iter().zip(&targets) {
        save(secret, path, *format)?;
        println!(
            "Extracted image ({}x{}) saved: {}",
            secret.width(),
            secret.height(),
            path.to_string_lossy().green().bold()
        );
    }
    Ok(())
}

/// 处理 'Capacity' 命令：打印载体在给定 `k` 下可承载的位数和字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    anyhow::ensure!(
        (1..=MAX_BITS_PER_CHANNEL).contains(&args.bits),
        "Bits per channel must be between 1 and {MAX_BITS_PER_CHANNEL}, got {}",
        args.bits.to_string().red().bold()
    );

    let cover = load_rgb(&args.cover)?;
    let bits = capacity_bits(&cover, args.bits);

    println!(
        "Capacity of {} at {} bit(s) per channel: {} bits ({} bytes)",
        args.cover.to_string_lossy().green().bold(),
        args.bits,
        bits.to_string().green().bold(),
        (bits / 8).to_string().green().bold()
    );
    Ok(())
}

/// 处理 'Split' 命令：将图像切分为 `part1.png`..`part4.png`。
pub fn handle_split(args: SplitArgs) -> Result<()> {
    let dir = args.output.clone().unwrap_or_else(|| parent_dir(&args.image));
    create_output_dir(&dir)?;
    let targets = (1..=QUADRANT_COUNT)
        .map(|i| {
            let path = dir.join(format!("part{i}.png"));
            check_output(&path, args.force).map(|format| (path, format))
        })
        .collect::<Result<Vec<_>>>()?;

    let image = load_rgb(&args.image)?;
    let parts = split_quadrants(&image).with_context(|| {
        format!(
            "Unable to split {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    for (part, (path, format)) in parts.iter().zip(&targets) {
        save(part, path, *format)?;
    }

    println!(
        "The image has been split into {} parts in: {}",
        QUADRANT_COUNT,
        dir.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Merge' 命令：将四个象限拼回一张图像。
pub fn handle_merge(args: MergeArgs) -> Result<()> {
    anyhow::ensure!(
        args.parts.len() == QUADRANT_COUNT,
        "Exactly {QUADRANT_COUNT} parts are required, got {}",
        args.parts.len().to_string().red().bold()
    );
    let format = check_output(&args.dest, args.force)?;

    let parts: [RgbImage; QUADRANT_COUNT] = args
        .parts
        .iter()
        .map(|path| load_rgb(path))
        .collect::<Result<Vec<_>>>()?
        .try_into()
        .map_err(|_| anyhow::anyhow!("Exactly {QUADRANT_COUNT} parts are required"))?;

    let merged = merge_quadrants(&parts).context("Unable to merge the parts")?;
    save(&merged, &args.dest, format)?;

    println!(
        "The image has been merged successfully: {}",
        args.dest.to_string_lossy().green().bold()
    );
    Ok(())
}

//! # 命令处理逻辑模块
//!
//! 包含嵌入、恢复与容量查询三种模式的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用 BMP 编解码与隐写核心函数，并向用户报告结果。

use crate::bitmap::{self, DecodedImage, PixelDepth};
use crate::bits::BitsPerChannel;
use crate::capacity::capacity;
use crate::cli::{EmbedArgs, RecoverArgs, SizeArgs};
use crate::steganography::{embed, extract};
use anyhow::{Context, Result};
use colored::Colorize;
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// 读取并解码 BMP 图像文件。
fn read_image(path: &Path) -> Result<DecodedImage> {
    let raw = fs::read(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    debug!("read {} bytes from {}", raw.len(), path.display());

    bitmap::decode(&raw).with_context(|| {
        format!(
            "Unable to decode image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// 在未指定 `--force` 时拒绝覆盖已存在的输出文件。
fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理嵌入模式的执行逻辑。
///
/// 读取图像与数据文件、解码图像、嵌入数据并把数据长度记录在头部的保留字段中，
/// 最后重新编码并写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `force`。
/// * 无法读取输入的图像或数据文件，或图像不是受支持的 BMP。
/// * 数据超过图像在当前位数设置下的容量。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let bits = BitsPerChannel::new(args.bits)?;
    ensure_writable(&args.dest, args.force)?;

    let data = fs::read(&args.data).with_context(|| {
        format!(
            "Unable to read data file: {}",
            args.data.to_string_lossy().red().bold()
        )
    })?;
    let mut image = read_image(&args.image)?;

    let data_len = u32::try_from(data.len())
        .context("The data file is too large to record its length in the bitmap header")?;

    embed(&mut image, &data, bits)?;
    image.reserved = data_len;

    if image.depth != PixelDepth::Rgb24 {
        warn!(
            "{}-bit pixels do not keep their low channel bits when re-encoded; the data may not be recoverable from {}",
            image.depth.bits(),
            args.dest.display()
        );
    }

    let encoded = bitmap::encode(&image).context("Unable to encode the modified image")?;

    fs::write(&args.dest, encoded).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            args.dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The file has been successfully embedded and saved: {}",
        args.dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理恢复模式的执行逻辑。
///
/// 读取并解码图像，根据头部保留字段记录的长度提取数据，并写入目标文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `force`。
/// * 无法读取或解码输入的图像文件。
/// * 记录的长度与图像容量不符 (图像未经本工具嵌入，或位数设置不一致)。
/// * 无法写入到目标文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let bits = BitsPerChannel::new(args.bits)?;
    ensure_writable(&args.dest, args.force)?;

    let image = read_image(&args.image)?;
    let data = extract(&image, bits)?;

    fs::write(&args.dest, &data).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            args.dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} bytes have been successfully recovered and saved: {}",
        data.len().to_string().green(),
        args.dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理容量查询的执行逻辑，返回可嵌入的字节数。
///
/// 容量为 0 时仅向标准错误输出提示，不视为失败。
///
/// # Errors
///
/// 无法读取或解码图像文件时返回错误。
pub fn handle_size(args: SizeArgs) -> Result<u64> {
    let bits = BitsPerChannel::new(args.bits)?;
    let image = read_image(&args.image)?;
    let available = capacity(&image, bits);

    if available == 0 {
        eprintln!(
            "The image encoding would not support bit amounts of {} without severely damaging the image content",
            bits.get().to_string().red().bold()
        );
    } else {
        println!(
            "The image can store {} bytes using the {} least significant bit(s)",
            available.to_string().green().bold(),
            bits.get().to_string().green().bold()
        );
    }

    Ok(available)
}

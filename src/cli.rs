//! # 命令行接口模块
//!
//! 使用 `clap` 定义程序的命令行参数，并将解析结果转换为具体的执行模式 [`Action`]。

use crate::constants::{DEFAULT_BITS_PER_CHANNEL, DEFAULT_EMBED_OUTPUT, DEFAULT_RECOVER_OUTPUT};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复任意文件。\n支持 16、24 与 32 位像素深度。"
)]
pub struct Cli {
    /// 要嵌入数据、提取数据或查询容量的 BMP 图像文件路径。
    #[arg(short, long, value_name = "IMAGEFILE")]
    pub image_file: PathBuf,

    /// 要隐藏的数据文件路径，嵌入模式下必填。
    #[arg(
        short,
        long,
        value_name = "DATAFILE",
        required_unless_present_any = ["reverse", "max_size"]
    )]
    pub data_file: Option<PathBuf>,

    /// 输出文件路径。嵌入时默认为 `out.bmp`，提取时默认为 `out.bin`。
    #[arg(short, long, value_name = "OUTFILE")]
    pub out_file: Option<PathBuf>,

    /// 显示图像在当前位数设置下最多能嵌入的字节数。
    #[arg(short = 's', long, conflicts_with = "reverse")]
    pub max_size: bool,

    /// 从图像中恢复之前嵌入的文件。
    #[arg(short, long)]
    pub reverse: bool,

    /// 每个颜色通道用于嵌入的最低有效位数。
    #[arg(
        short,
        long,
        value_name = "BITNUM",
        default_value_t = DEFAULT_BITS_PER_CHANNEL,
        value_parser = clap::value_parser!(u8).range(1..=8)
    )]
    pub bit_number: u8,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 由命令行参数决定的执行模式。
#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    /// 将数据文件嵌入图像。
    Embed(EmbedArgs),

    /// 从图像中恢复数据文件。
    Recover(RecoverArgs),

    /// 查询图像容量。
    Size(SizeArgs),
}

/// 嵌入模式所需的参数。
#[derive(Debug, PartialEq, Eq)]
pub struct EmbedArgs {
    pub image: PathBuf,
    pub data: PathBuf,
    pub dest: PathBuf,
    pub bits: u8,
    pub force: bool,
}

/// 恢复模式所需的参数。
#[derive(Debug, PartialEq, Eq)]
pub struct RecoverArgs {
    pub image: PathBuf,
    pub dest: PathBuf,
    pub bits: u8,
    pub force: bool,
}

/// 容量查询所需的参数。
#[derive(Debug, PartialEq, Eq)]
pub struct SizeArgs {
    pub image: PathBuf,
    pub bits: u8,
}

impl Cli {
    /// 将解析后的参数转换为 [`Action`]，并填充默认输出路径。
    ///
    /// # Errors
    ///
    /// 嵌入模式下缺少数据文件时返回错误。
    pub fn into_action(self) -> Result<Action> {
        if self.max_size {
            return Ok(Action::Size(SizeArgs {
                image: self.image_file,
                bits: self.bit_number,
            }));
        }

        if self.reverse {
            return Ok(Action::Recover(RecoverArgs {
                image: self.image_file,
                dest: self
                    .out_file
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_RECOVER_OUTPUT)),
                bits: self.bit_number,
                force: self.force,
            }));
        }

        let data = self
            .data_file
            .context("The argument DATAFILE is required when embedding a file")?;

        Ok(Action::Embed(EmbedArgs {
            image: self.image_file,
            data,
            dest: self
                .out_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EMBED_OUTPUT)),
            bits: self.bit_number,
            force: self.force,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Action> {
        let cli = Cli::try_parse_from(std::iter::once("bmp_hider").chain(args.iter().copied()))?;
        cli.into_action()
    }

    #[test]
    fn embed_uses_defaults() {
        let action = parse(&["-i", "cover.bmp", "-d", "secret.bin"]).unwrap();
        assert_eq!(
            action,
            Action::Embed(EmbedArgs {
                image: "cover.bmp".into(),
                data: "secret.bin".into(),
                dest: DEFAULT_EMBED_OUTPUT.into(),
                bits: DEFAULT_BITS_PER_CHANNEL,
                force: false,
            })
        );
    }

    #[test]
    fn embed_requires_data_file() {
        assert!(parse(&["-i", "cover.bmp"]).is_err());
    }

    #[test]
    fn reverse_mode_needs_no_data_file() {
        let action = parse(&["--image-file", "doctored.bmp", "-r", "-b", "3", "-o", "x.txt"]).unwrap();
        assert_eq!(
            action,
            Action::Recover(RecoverArgs {
                image: "doctored.bmp".into(),
                dest: "x.txt".into(),
                bits: 3,
                force: false,
            })
        );

        let action = parse(&["-i", "doctored.bmp", "--reverse"]).unwrap();
        assert!(matches!(action, Action::Recover(args) if args.dest == PathBuf::from(DEFAULT_RECOVER_OUTPUT)));
    }

    #[test]
    fn max_size_mode() {
        let action = parse(&["-i", "cover.bmp", "-s", "--bit-number", "4"]).unwrap();
        assert_eq!(
            action,
            Action::Size(SizeArgs {
                image: "cover.bmp".into(),
                bits: 4,
            })
        );
    }

    #[test]
    fn max_size_conflicts_with_reverse() {
        assert!(parse(&["-i", "cover.bmp", "-s", "-r"]).is_err());
    }

    #[test]
    fn bit_number_must_be_in_range() {
        assert!(parse(&["-i", "cover.bmp", "-s", "-b", "0"]).is_err());
        assert!(parse(&["-i", "cover.bmp", "-s", "-b", "9"]).is_err());
        assert!(parse(&["-i", "cover.bmp", "-s", "-b", "8"]).is_ok());
    }
}

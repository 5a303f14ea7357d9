//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_BITS_PER_CHANNEL, DEFAULT_IMAGE_COUNT, QUADRANT_COUNT};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复整张图像。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在无损格式图像 (如 PNG, BMP) 中隐藏或恢复一张或多张秘密图像。"
)]
pub struct Cli {
    /// 提高日志详细程度 (-v 为 info，-vv 为 debug，-vvv 为 trace)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将一张或多张秘密图像隐藏到载体图像中。
    Hide(HideArgs),

    /// 从隐写图像中恢复秘密图像。
    Reveal(RevealArgs),

    /// 计算载体图像的隐写容量。
    Capacity(CapacityArgs),

    /// 将一张图像切分为四个象限。
    Split(SplitArgs),

    /// 将四个象限拼回一张图像。
    Merge(MergeArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的载体图像文件路径 (如 PNG, BMP)。
    #[arg(short, long)]
    pub cover: PathBuf,

    /// 要隐藏的秘密图像，按给出的顺序依次写入。
    #[arg(short, long, num_args = 1.., required = true)]
    pub secrets: Vec<PathBuf>,

    /// 隐写完成后保存结果图像的输出路径，默认为载体所在目录下的 `stego_<载体名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的低位数 (1-8)。
    #[arg(short = 'k', long, default_value_t = DEFAULT_BITS_PER_CHANNEL)]
    pub bits: u8,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'reveal' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RevealArgs {
    /// 已隐藏秘密图像的隐写图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 隐藏的秘密图像数量，必须与隐藏时一致。
    #[arg(short = 'n', long, default_value_t = DEFAULT_IMAGE_COUNT)]
    pub count: usize,

    /// 每个颜色通道使用的低位数 (1-8)，必须与隐藏时一致。
    #[arg(short = 'k', long, default_value_t = DEFAULT_BITS_PER_CHANNEL)]
    pub bits: u8,

    /// 保存 `extracted<序号>.png` 的目录，默认为隐写图像所在目录。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 载体图像文件路径。
    #[arg(short, long)]
    pub cover: PathBuf,

    /// 每个颜色通道使用的低位数 (1-8)。
    #[arg(short = 'k', long, default_value_t = DEFAULT_BITS_PER_CHANNEL)]
    pub bits: u8,
}

/// 'split' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct SplitArgs {
    /// 要切分的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 保存 `part1.png`..`part4.png` 的目录，默认为输入图像所在目录。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'merge' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct MergeArgs {
    /// 四个象限图像，顺序为左上、右上、左下、右下。
    #[arg(short, long, num_args = QUADRANT_COUNT, required = true)]
    pub parts: Vec<PathBuf>,

    /// 合并结果的输出路径。
    #[arg(short, long)]
    pub dest: PathBuf,

    /// 目标文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

//! # lsb_vault 库
//!
//! 本库包含多图 LSB 隐写工具的核心逻辑：
//! 将一张或多张秘密图像打包成位流，写入载体图像各颜色通道的低位，
//! 并能从隐写图像中无损还原。

// 声明库包含的所有模块。

pub mod bitstream;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod payload;
pub mod steganography;
pub mod tiling;

pub use error::{Result, StegoError};
pub use steganography::{EmbeddingParameters, embed, extract};

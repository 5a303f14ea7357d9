//! # 错误类型模块
//!
//! 隐写编解码核心的全部失败模式。编解码是确定性的位运算，
//! 因此所有错误都直接返回给调用者，内部从不重试。

use thiserror::Error;

/// 隐写核心操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 嵌入或提取过程中可能出现的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载体图像容量不足，在修改任何像素之前返回。
    #[error("Not enough capacity in the cover image: required {required} bits, available {available} bits")]
    CapacityExceeded { required: u64, available: u64 },

    /// 提取到的位流比声明的记录更短。
    #[error(
        "Truncated stream while reading image {image}: needed {needed} bits, only {remaining} bits remain"
    )]
    TruncatedStream {
        image: usize,
        needed: u64,
        remaining: u64,
    },

    /// 参数不合法 (k 超出范围、图像数量为零、图像尺寸为零等)。
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

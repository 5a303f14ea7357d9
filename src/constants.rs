/// 每个秘密图像记录头中宽度/高度字段的位宽。
pub const DIMENSION_BITS: usize = 32;

/// 单个秘密图像记录头的总位数 (宽度 32 位 + 高度 32 位)。
pub const RECORD_HEADER_BITS: usize = DIMENSION_BITS * 2;

/// 单个颜色通道的位宽。
pub const CHANNEL_BITS: usize = 8;

/// 每个像素参与隐写的颜色通道数 (R, G, B)。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 秘密图像中每个像素占用的位数 (3 个 8 位通道)。
pub const BITS_PER_SECRET_PIXEL: usize = CHANNEL_BITS * CHANNELS_PER_PIXEL;

/// 默认每个通道替换的低位数。
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 2;

/// 每个通道允许替换的最大低位数。
pub const MAX_BITS_PER_CHANNEL: u8 = 8;

/// 恢复时默认的秘密图像数量，与四图隐写工具生成的文件保持兼容。
pub const DEFAULT_IMAGE_COUNT: usize = 4;

/// 分块/合并操作的块数 (左上、右上、左下、右下)。
pub const QUADRANT_COUNT: usize = 4;

//! # 隐写核心模块
//!
//! 嵌入器与提取器。两者互不调用，只通过隐写图像和共享的位序约定相连：
//! 像素按行优先顺序遍历，每个像素内按 R、G、B 顺序，每个通道固定占用 `k` 位。

use crate::bitstream::BitStream;
use crate::capacity::{capacity_bits, ensure_capacity};
use crate::constants::{DEFAULT_BITS_PER_CHANNEL, DEFAULT_IMAGE_COUNT, MAX_BITS_PER_CHANNEL};
use crate::error::{Result, StegoError};
use crate::payload::{SecretRecord, pack, unpack};
use image::RgbImage;
use log::{debug, info};

/// 一次嵌入或提取使用的参数。嵌入端与提取端必须一致，否则提取结果无意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmbeddingParameters {
    /// 每个颜色通道替换的低位数 `k`，取值 `1..=8`。
    pub bits_per_channel: u8,
    /// 秘密图像数量 `N`。
    pub image_count: usize,
}

impl Default for EmbeddingParameters {
    fn default() -> Self {
        Self {
            bits_per_channel: DEFAULT_BITS_PER_CHANNEL,
            image_count: DEFAULT_IMAGE_COUNT,
        }
    }
}

impl EmbeddingParameters {
    pub fn new(bits_per_channel: u8, image_count: usize) -> Result<Self> {
        let params = Self {
            bits_per_channel,
            image_count,
        };
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_BITS_PER_CHANNEL).contains(&self.bits_per_channel) {
            return Err(StegoError::InvalidArgument(format!(
                "bits per channel must be between 1 and {MAX_BITS_PER_CHANNEL}, got {}",
                self.bits_per_channel
            )));
        }
        if self.image_count == 0 {
            return Err(StegoError::InvalidArgument(
                "image count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn low_mask(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

/// 用 `bits` 替换 `channel` 的低 `k` 位，高 `8 - k` 位保持不变。
pub fn modify(channel: u8, bits: u8, k: u8) -> u8 {
    let mask = low_mask(k);
    (channel & !mask) | (bits & mask)
}

/// 取出 `channel` 的低 `k` 位。
pub fn recover(channel: u8, k: u8) -> u8 {
    channel & low_mask(k)
}

/// 从 `cursor` 开始取下一组 `k` 位。
///
/// 剩余不足 `k` 位时，已有的位占据高位，其余低位补零；
/// 游标已经越过位流末尾时返回 `None`，此时通道保持原值。
fn next_bits(stream: &BitStream, cursor: usize, k: u8) -> Option<u8> {
    let k = usize::from(k);
    if cursor >= stream.len() {
        return None;
    }
    let available = (stream.len() - cursor).min(k);
    let bits = stream.read_uint(cursor, available)? as u8;
    Some(bits << (k - available))
}

/// 将 `secrets` 依次隐藏进 `cover` 的低位，返回新的隐写图像。
///
/// 容量检查在任何像素被修改之前完成；`cover` 本身从不被修改。
///
/// # Errors
///
/// * [`StegoError::InvalidArgument`]：参数非法，或 `secrets.len()` 与
///   `params.image_count` 不一致，或存在空尺寸图像。
/// * [`StegoError::CapacityExceeded`]：载体容量不足。
pub fn embed(
    cover: &RgbImage,
    secrets: &[RgbImage],
    params: &EmbeddingParameters,
) -> Result<RgbImage> {
    params.validate()?;
    if secrets.len() != params.image_count {
        return Err(StegoError::InvalidArgument(format!(
            "expected {} secret image(s), got {}",
            params.image_count,
            secrets.len()
        )));
    }

    let k = params.bits_per_channel;
    let required = ensure_capacity(cover, secrets, k)?;
    let stream = pack(secrets)?;
    debug_assert_eq!(stream.len() as u64, required);

    let mut stego = cover.clone();
    let mut cursor = 0usize;
    'walk: for pixel in stego.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            match next_bits(&stream, cursor, k) {
                Some(bits) => *channel = modify(*channel, bits, k),
                None => break 'walk,
            }
            cursor += usize::from(k);
        }
    }

    info!(
        "embedded {} secret image(s), {} bits into {}x{} cover at {} bit(s) per channel",
        secrets.len(),
        stream.len(),
        cover.width(),
        cover.height(),
        k
    );
    Ok(stego)
}

/// 从隐写图像中提取 `params.image_count` 张秘密图像。
///
/// 先完整收集整张图像所有通道的低位，再交给解包器，
/// 因为在读出记录头之前无法知道载荷的真实长度。
///
/// # Errors
///
/// * [`StegoError::InvalidArgument`]：参数非法。
/// * [`StegoError::TruncatedStream`]：位流不足以还原声明的图像，
///   通常意味着 `k`/`N` 与嵌入时不一致或图像已被有损压缩。
pub fn extract(stego: &RgbImage, params: &EmbeddingParameters) -> Result<Vec<SecretRecord>> {
    params.validate()?;
    let k = params.bits_per_channel;

    let harvest = usize::try_from(capacity_bits(stego, k)).map_err(|_| {
        StegoError::InvalidArgument("stego image is too large to harvest".to_string())
    })?;
    let mut stream = BitStream::with_capacity(harvest);
    for pixel in stego.pixels() {
        for &channel in pixel.0.iter() {
            stream.push_uint(u32::from(recover(channel, k)), usize::from(k))?;
        }
    }
    debug!("harvested {} bits from {}x{} image", stream.len(), stego.width(), stego.height());

    let secrets = unpack(&stream, params.image_count)?;
    info!("extracted {} secret image(s)", secrets.len());
    Ok(secrets)
}

//! # 容量计算模块
//!
//! 在嵌入器修改任何像素之前，完整计算所有秘密图像所需的位数并与载体容量比较，
//! 保证写入路径"要么全部成功，要么完全不动"。

use crate::constants::{BITS_PER_SECRET_PIXEL, CHANNELS_PER_PIXEL, RECORD_HEADER_BITS};
use crate::error::{Result, StegoError};
use image::RgbImage;
use log::debug;

/// 载体图像在每通道 `bits_per_channel` 位时可承载的总位数。
pub fn capacity_bits(cover: &RgbImage, bits_per_channel: u8) -> u64 {
    let (width, height) = cover.dimensions();
    u64::from(width)
        * u64::from(height)
        * u64::from(bits_per_channel)
        * CHANNELS_PER_PIXEL as u64
}

/// 打包全部秘密图像所需的总位数：`N * 64 + Σ(w * h * 24)`。
///
/// # Errors
///
/// * `secrets` 为空。
/// * 任意一张图像的宽或高为零。
pub fn required_bits(secrets: &[RgbImage]) -> Result<u64> {
    if secrets.is_empty() {
        return Err(StegoError::InvalidArgument(
            "at least one secret image is required".to_string(),
        ));
    }

    secrets
        .iter()
        .enumerate()
        .try_fold(0u64, |total, (i, secret)| {
            let (width, height) = secret.dimensions();
            if width == 0 || height == 0 {
                return Err(StegoError::InvalidArgument(format!(
                    "secret image {} has an empty size {width}x{height}",
                    i + 1
                )));
            }
            let pixel_bits = u64::from(width) * u64::from(height) * BITS_PER_SECRET_PIXEL as u64;
            Ok(total + RECORD_HEADER_BITS as u64 + pixel_bits)
        })
}

/// 检查载体是否足以容纳全部秘密图像，成功时返回所需位数。
///
/// # Errors
///
/// * [`StegoError::CapacityExceeded`]：所需位数超过载体容量。
/// * [`StegoError::InvalidArgument`]：见 [`required_bits`]。
pub fn ensure_capacity(cover: &RgbImage, secrets: &[RgbImage], bits_per_channel: u8) -> Result<u64> {
    let required = required_bits(secrets)?;
    let available = capacity_bits(cover, bits_per_channel);
    debug!("capacity check: required {required} bits, available {available} bits");

    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }
    Ok(required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_scales_with_bits_per_channel() {
        let cover = RgbImage::new(8, 8);
        assert_eq!(capacity_bits(&cover, 1), 192);
        assert_eq!(capacity_bits(&cover, 2), 384);
        assert_eq!(capacity_bits(&cover, 8), 1536);
    }

    #[test]
    fn required_bits_sums_headers_and_pixels() {
        let secrets = [RgbImage::new(2, 2), RgbImage::new(3, 5)];
        assert_eq!(required_bits(&secrets).unwrap(), 2 * 64 + 4 * 24 + 15 * 24);
    }

    #[test]
    fn small_cover_is_rejected() {
        let cover = RgbImage::new(4, 4);
        let secret = RgbImage::new(2, 2);

        assert_eq!(
            ensure_capacity(&cover, &[secret], 2),
            Err(StegoError::CapacityExceeded {
                required: 160,
                available: 96
            })
        );
    }

    #[test]
    fn boundary_is_exact() {
        // 2x2 秘密图像需要 160 位；k=1 时 53x1 载体只有 159 位，54x1 有 162 位
        let secret = RgbImage::new(2, 2);
        assert!(matches!(
            ensure_capacity(&RgbImage::new(53, 1), &[secret.clone()], 1),
            Err(StegoError::CapacityExceeded { required: 160, available: 159 })
        ));
        assert_eq!(ensure_capacity(&RgbImage::new(54, 1), &[secret], 1), Ok(160));
    }
}

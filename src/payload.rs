//! # 载荷打包模块
//!
//! 将 N 张秘密图像序列化为一条位流，以及从位流中按相同格式还原。
//!
//! 每张图像对应一条记录，记录之间首尾相接、没有分隔：
//!
//! ```text
//! width:32 | height:32 | (R:8 G:8 B:8) × width·height
//! ```
//!
//! 像素按行优先顺序排列 (自上而下，每行自左向右)。

use crate::bitstream::BitStream;
use crate::capacity::required_bits;
use crate::constants::{BITS_PER_SECRET_PIXEL, DIMENSION_BITS, RECORD_HEADER_BITS};
use crate::error::{Result, StegoError};
use image::RgbImage;
use log::debug;

/// 从位流中解出的一张秘密图像。
pub type SecretRecord = RgbImage;

/// 按调用者给定的顺序将所有秘密图像打包为一条位流。
///
/// # Errors
///
/// * `secrets` 为空。
/// * 任意一张图像的宽或高为零。
pub fn pack(secrets: &[RgbImage]) -> Result<BitStream> {
    let total = required_bits(secrets)?;
    let mut stream = BitStream::with_capacity(usize::try_from(total).map_err(|_| {
        StegoError::InvalidArgument(format!("payload of {total} bits is too large"))
    })?);

    for secret in secrets {
        let (width, height) = secret.dimensions();
        stream.push_uint(width, DIMENSION_BITS)?;
        stream.push_uint(height, DIMENSION_BITS)?;

        // `pixels()` 本身就是行优先顺序
        for pixel in secret.pixels() {
            let [r, g, b] = pixel.0;
            stream.push_u8(r);
            stream.push_u8(g);
            stream.push_u8(b);
        }
    }

    debug!("packed {} secret image(s) into {} bits", secrets.len(), stream.len());
    Ok(stream)
}

/// 从位流开头依次解出 `count` 张秘密图像。
///
/// 解包是纯顺序消费：读完一条记录后游标恰好停在下一条记录的起点，
/// 最后一条记录之后的位 (包括嵌入时的补零位) 永远不会被读取。
///
/// # Errors
///
/// * `count` 为零。
/// * 剩余位数不足以读出记录头，或不足以读出记录头声明的全部像素。
/// * 记录头声明的宽或高为零。
pub fn unpack(stream: &BitStream, count: usize) -> Result<Vec<SecretRecord>> {
    if count == 0 {
        return Err(StegoError::InvalidArgument(
            "at least one secret image must be requested".to_string(),
        ));
    }

    let mut reader = stream.reader();
    // 每条记录至少占一个记录头，预分配不超过位流能容纳的记录数
    let mut secrets = Vec::with_capacity(count.min(stream.len() / RECORD_HEADER_BITS));

    for index in 1..=count {
        let truncated = |needed: u64, remaining: usize| StegoError::TruncatedStream {
            image: index,
            needed,
            remaining: remaining as u64,
        };

        if reader.remaining() < RECORD_HEADER_BITS {
            return Err(truncated(RECORD_HEADER_BITS as u64, reader.remaining()));
        }
        let width = reader
            .read_uint(DIMENSION_BITS)
            .ok_or_else(|| truncated(RECORD_HEADER_BITS as u64, reader.remaining()))?;
        let height = reader
            .read_uint(DIMENSION_BITS)
            .ok_or_else(|| truncated(DIMENSION_BITS as u64, reader.remaining()))?;

        let needed = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(BITS_PER_SECRET_PIXEL as u64))
            .unwrap_or(u64::MAX);
        if needed > reader.remaining() as u64 {
            return Err(truncated(needed, reader.remaining()));
        }
        if width == 0 || height == 0 {
            return Err(StegoError::InvalidArgument(format!(
                "image {index} declares an empty size {width}x{height}"
            )));
        }

        debug!(
            "unpacking image {index}: {width}x{height} at bit {}",
            reader.position()
        );

        // 上面的检查保证每次读取都不会越界
        let mut secret = RgbImage::new(width, height);
        for pixel in secret.pixels_mut() {
            for channel in pixel.0.iter_mut() {
                *channel = reader
                    .read_u8()
                    .ok_or_else(|| truncated(needed, reader.remaining()))?;
            }
        }
        secrets.push(secret);
    }

    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample_secret() -> RgbImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 255]));
        img
    }

    #[test]
    fn pack_writes_header_then_raster_ordered_pixels() {
        let stream = pack(&[sample_secret()]).unwrap();

        assert_eq!(stream.len(), 64 + 2 * 2 * 24);
        assert_eq!(stream.read_uint(0, 32), Some(2));
        assert_eq!(stream.read_uint(32, 32), Some(2));
        // 第二个像素 (1, 0) 是绿色
        assert_eq!(stream.read_uint(64 + 24, 8), Some(0));
        assert_eq!(stream.read_uint(64 + 32, 8), Some(255));
        assert_eq!(stream.read_uint(64 + 40, 8), Some(0));
    }

    #[test]
    fn header_of_each_record_sits_at_its_offset() {
        let first = RgbImage::new(3, 1);
        let second = RgbImage::new(1, 5);
        let stream = pack(&[first, second]).unwrap();

        let second_offset = 64 + 3 * 24;
        assert_eq!(stream.read_uint(second_offset, 32), Some(1));
        assert_eq!(stream.read_uint(second_offset + 32, 32), Some(5));
        assert_eq!(stream.len(), second_offset + 64 + 5 * 24);
    }

    #[test]
    fn unpack_recovers_multiple_images_in_order() {
        let mut wide = RgbImage::new(4, 1);
        wide.put_pixel(3, 0, Rgb([1, 2, 3]));
        let secrets = vec![sample_secret(), wide];

        let stream = pack(&secrets).unwrap();
        let unpacked = unpack(&stream, 2).unwrap();

        assert_eq!(unpacked, secrets);
    }

    #[test]
    fn unpack_ignores_trailing_bits() {
        let mut stream = pack(&[sample_secret()]).unwrap();
        stream.push_uint(0b11, 2).unwrap();

        let unpacked = unpack(&stream, 1).unwrap();
        assert_eq!(unpacked, vec![sample_secret()]);
    }

    #[test]
    fn unpack_reports_missing_header() {
        let stream = pack(&[sample_secret()]).unwrap();

        let err = unpack(&stream, 2).unwrap_err();
        assert_eq!(
            err,
            StegoError::TruncatedStream {
                image: 2,
                needed: 64,
                remaining: 0
            }
        );
    }

    #[test]
    fn unpack_reports_short_pixel_data() {
        let mut stream = BitStream::new();
        stream.push_uint(10, 32).unwrap();
        stream.push_uint(10, 32).unwrap();
        stream.push_u8(7);

        let err = unpack(&stream, 1).unwrap_err();
        assert_eq!(
            err,
            StegoError::TruncatedStream {
                image: 1,
                needed: 2400,
                remaining: 8
            }
        );
    }

    #[test]
    fn unpack_with_huge_count_reports_missing_header() {
        let stream = pack(&[sample_secret()]).unwrap();

        assert!(matches!(
            unpack(&stream, usize::MAX),
            Err(StegoError::TruncatedStream { image: 2, .. })
        ));
    }

    #[test]
    fn unpack_rejects_zero_count() {
        let stream = pack(&[sample_secret()]).unwrap();
        assert!(matches!(
            unpack(&stream, 0),
            Err(StegoError::InvalidArgument(_))
        ));
    }

    #[test]
    fn pack_rejects_empty_images() {
        assert!(matches!(
            pack(&[RgbImage::new(0, 3)]),
            Err(StegoError::InvalidArgument(_))
        ));
        assert!(matches!(pack(&[]), Err(StegoError::InvalidArgument(_))));
    }
}

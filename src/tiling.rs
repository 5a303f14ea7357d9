//! # 分块模块
//!
//! 将一张图像切分为四个象限，或把四个象限拼回一张图像。
//! 纯几何操作，与隐写位序没有任何耦合。

use crate::constants::QUADRANT_COUNT;
use crate::error::{Result, StegoError};
use image::{GenericImage, RgbImage, imageops};

/// 按左上、右上、左下、右下的顺序切分图像。
///
/// 左/上半部分的尺寸为 `width / 2`、`height / 2`；
/// 尺寸为奇数时，多出的列和行归入右/下半部分。
pub fn split_quadrants(image: &RgbImage) -> Result<[RgbImage; QUADRANT_COUNT]> {
    let (width, height) = image.dimensions();
    if width < 2 || height < 2 {
        return Err(StegoError::InvalidArgument(format!(
            "image must be at least 2x2 to split, got {width}x{height}"
        )));
    }

    let (left, top) = (width / 2, height / 2);
    let (right, bottom) = (width - left, height - top);

    Ok([
        imageops::crop_imm(image, 0, 0, left, top).to_image(),
        imageops::crop_imm(image, left, 0, right, top).to_image(),
        imageops::crop_imm(image, 0, top, left, bottom).to_image(),
        imageops::crop_imm(image, left, top, right, bottom).to_image(),
    ])
}

/// 将四个象限 (左上、右上、左下、右下) 拼回一张图像。
///
/// 同一行的象限高度必须相同，同一列的象限宽度必须相同。
/// 四块尺寸相同时结果的宽高恰好翻倍。
pub fn merge_quadrants(parts: &[RgbImage; QUADRANT_COUNT]) -> Result<RgbImage> {
    let [top_left, top_right, bottom_left, bottom_right] = parts;

    let aligned = top_left.height() == top_right.height()
        && bottom_left.height() == bottom_right.height()
        && top_left.width() == bottom_left.width()
        && top_right.width() == bottom_right.width();
    if !aligned {
        return Err(StegoError::InvalidArgument(format!(
            "quadrants do not line up: {:?} {:?} {:?} {:?}",
            top_left.dimensions(),
            top_right.dimensions(),
            bottom_left.dimensions(),
            bottom_right.dimensions()
        )));
    }

    let (left, top) = top_left.dimensions();
    let width = left + top_right.width();
    let height = top + bottom_left.height();

    let mut merged = RgbImage::new(width, height);
    let placements = [(0, 0), (left, 0), (0, top), (left, top)];
    for (part, (x, y)) in parts.iter().zip(placements) {
        merged
            .copy_from(part, x, y)
            .map_err(|e| StegoError::InvalidArgument(e.to_string()))?;
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn numbered(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, (x ^ y) as u8]))
    }

    #[test]
    fn split_even_image_into_equal_quadrants() {
        let image = numbered(6, 4);
        let [tl, tr, bl, br] = split_quadrants(&image).unwrap();

        for part in [&tl, &tr, &bl, &br] {
            assert_eq!(part.dimensions(), (3, 2));
        }
        assert_eq!(tl.get_pixel(0, 0), image.get_pixel(0, 0));
        assert_eq!(tr.get_pixel(0, 0), image.get_pixel(3, 0));
        assert_eq!(bl.get_pixel(0, 0), image.get_pixel(0, 2));
        assert_eq!(br.get_pixel(2, 1), image.get_pixel(5, 3));
    }

    #[test]
    fn odd_remainder_goes_right_and_bottom() {
        let image = numbered(5, 3);
        let [tl, tr, bl, br] = split_quadrants(&image).unwrap();

        assert_eq!(tl.dimensions(), (2, 1));
        assert_eq!(tr.dimensions(), (3, 1));
        assert_eq!(bl.dimensions(), (2, 2));
        assert_eq!(br.dimensions(), (3, 2));
    }

    #[test]
    fn merge_reverses_split() {
        for (w, h) in [(8, 8), (7, 5), (2, 9)] {
            let image = numbered(w, h);
            let parts = split_quadrants(&image).unwrap();
            assert_eq!(merge_quadrants(&parts).unwrap(), image);
        }
    }

    #[test]
    fn merge_equal_quadrants_doubles_size() {
        let part = numbered(3, 4);
        let merged = merge_quadrants(&[part.clone(), part.clone(), part.clone(), part]).unwrap();
        assert_eq!(merged.dimensions(), (6, 8));
    }

    #[test]
    fn rejects_degenerate_inputs() {
        assert!(split_quadrants(&numbered(1, 5)).is_err());

        let parts = [numbered(2, 2), numbered(2, 3), numbered(2, 2), numbered(2, 2)];
        assert!(matches!(
            merge_quadrants(&parts),
            Err(StegoError::InvalidArgument(_))
        ));
    }
}

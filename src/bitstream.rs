//! # 位流模块
//!
//! 紧凑存储的只追加位序列。位在每个字节内按最高位优先 (MSB-first) 排列，
//! 因此位流中第 `i` 位位于 `bytes[i / 8]` 的第 `7 - i % 8` 位。
//!
//! 打包器、嵌入器、提取器和解包器都依赖同一套位序约定：
//! 整数按固定位宽、高位在前写入，不足位宽时左侧补零。

use crate::error::{Result, StegoError};

/// 按位寻址的只追加位序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: usize,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先为 `bits` 个位分配存储空间。
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// 位流中的总位数。
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 追加单个位。
    pub fn push_bit(&mut self, bit: bool) {
        let shift = self.len % 8;
        if shift == 0 {
            self.bytes.push(0);
        }
        if bit {
            // 刚刚 push 过或者上一字节尚未写满，末尾字节必然存在
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> shift;
            }
        }
        self.len += 1;
    }

    /// 以 `width` 位、高位在前的形式追加 `value`。
    ///
    /// # Errors
    ///
    /// * `width` 不在 `1..=32` 范围内。
    /// * `value` 无法用 `width` 位表示。
    pub fn push_uint(&mut self, value: u32, width: usize) -> Result<()> {
        if !(1..=32).contains(&width) {
            return Err(StegoError::InvalidArgument(format!(
                "bit width must be between 1 and 32, got {width}"
            )));
        }
        if width < 32 && value >> width != 0 {
            return Err(StegoError::InvalidArgument(format!(
                "value {value} does not fit in {width} bits"
            )));
        }

        for i in (0..width).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// 追加一个 8 位通道值。
    pub fn push_u8(&mut self, value: u8) {
        for i in (0..8).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
    }

    /// 读取第 `index` 位，越界时返回 `None`。
    pub fn bit(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// 从 `offset` 开始读取 `width` 位并按高位在前还原为整数。
    ///
    /// 与 [`BitStream::push_uint`] 互逆，必须使用相同的位宽。
    /// 当 `width` 不在 `1..=32` 或剩余位数不足时返回 `None`。
    pub fn read_uint(&self, offset: usize, width: usize) -> Option<u32> {
        if !(1..=32).contains(&width) || offset.checked_add(width)? > self.len {
            return None;
        }

        let value = (offset..offset + width).fold(0u32, |acc, i| {
            // 上面已经检查过边界
            let bit = self.bytes[i / 8] & (0x80 >> (i % 8)) != 0;
            (acc << 1) | u32::from(bit)
        });
        Some(value)
    }

    /// 从起点开始的顺序读取游标。
    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            stream: self,
            pos: 0,
        }
    }
}

/// [`BitStream`] 上的单向读取游标，只前进、不回退。
#[derive(Debug)]
pub struct BitReader<'a> {
    stream: &'a BitStream,
    pos: usize,
}

impl BitReader<'_> {
    /// 已经消费的位数。
    pub fn position(&self) -> usize {
        self.pos
    }

    /// 尚未消费的位数。
    pub fn remaining(&self) -> usize {
        self.stream.len() - self.pos
    }

    /// 读取 `width` 位并前进游标；剩余位数不足时游标保持不动并返回 `None`。
    pub fn read_uint(&mut self, width: usize) -> Option<u32> {
        let value = self.stream.read_uint(self.pos, width)?;
        self.pos += width;
        Some(value)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.read_uint(8).map(|v| v as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_uint_is_msb_first_and_zero_padded() {
        let mut stream = BitStream::new();
        stream.push_uint(5, 4).unwrap();

        let bits: Vec<bool> = (0..stream.len()).map(|i| stream.bit(i).unwrap()).collect();
        assert_eq!(bits, vec![false, true, false, true]);
    }

    #[test]
    fn read_uint_across_byte_boundaries() {
        let mut stream = BitStream::new();
        stream.push_uint(0b101, 3).unwrap();
        stream.push_uint(0xDEAD_BEEF, 32).unwrap();
        stream.push_u8(0x7F);

        assert_eq!(stream.len(), 43);
        assert_eq!(stream.read_uint(0, 3), Some(0b101));
        assert_eq!(stream.read_uint(3, 32), Some(0xDEAD_BEEF));
        assert_eq!(stream.read_uint(35, 8), Some(0x7F));
    }

    #[test]
    fn push_uint_rejects_values_wider_than_width() {
        let mut stream = BitStream::new();
        assert!(matches!(
            stream.push_uint(256, 8),
            Err(StegoError::InvalidArgument(_))
        ));
        assert!(matches!(
            stream.push_uint(1, 33),
            Err(StegoError::InvalidArgument(_))
        ));
        assert!(stream.is_empty());
    }

    #[test]
    fn out_of_range_reads_return_none() {
        let mut stream = BitStream::new();
        stream.push_u8(0xAA);

        assert_eq!(stream.bit(8), None);
        assert_eq!(stream.read_uint(1, 8), None);
        assert_eq!(stream.read_uint(usize::MAX, 2), None);
    }

    #[test]
    fn reader_consumes_sequentially() {
        let mut stream = BitStream::with_capacity(40);
        stream.push_uint(640, 32).unwrap();
        stream.push_u8(200);

        let mut reader = stream.reader();
        assert_eq!(reader.read_uint(32), Some(640));
        assert_eq!(reader.position(), 32);
        assert_eq!(reader.remaining(), 8);
        assert_eq!(reader.read_uint(16), None);
        assert_eq!(reader.position(), 32);
        assert_eq!(reader.read_u8(), Some(200));
        assert_eq!(reader.remaining(), 0);
    }
}

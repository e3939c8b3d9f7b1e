//! # 位游标模块
//!
//! 以 `(字节索引, 位偏移)` 为游标，在字节流中按任意位数 (1–8) 读写数据，
//! 当请求的位跨越字节边界时自动拆分到相邻两个字节。

use crate::error::StegoError;

/// 每个颜色通道用于承载数据的最低有效位数，取值范围 1..=8。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitsPerChannel(u8);

impl BitsPerChannel {
    /// 校验并构造位数设置。
    ///
    /// # Errors
    ///
    /// 当 `bits` 为 0 或大于 8 时返回 [`StegoError::InvalidBitsPerChannel`]。
    pub fn new(bits: u8) -> Result<Self, StegoError> {
        if (1..=8).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(StegoError::InvalidBitsPerChannel(bits))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// 低 `bits` 位全为 1 的掩码。
    pub fn low_mask(self) -> u8 {
        0xFF >> (8 - self.0)
    }
}

impl TryFrom<u8> for BitsPerChannel {
    type Error = StegoError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

/// 字节流中的位置，`bit` 始终位于 `[0, 8)`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitCursor {
    pub byte: usize,
    pub bit: u8,
}

impl BitCursor {
    /// 将游标向前移动 `bits` 位。
    pub fn advance(&mut self, bits: BitsPerChannel) {
        let end = self.bit + bits.get();
        if end >= 8 {
            self.byte += 1;
        }
        self.bit = end % 8;
    }
}

/// 从 `buffer` 的 `(byte, bit)` 处读取 `bits` 位，结果位于返回值的低位。
///
/// 跨字节读取时，若第二个字节超出缓冲区则按 0 处理。
///
/// # Panics
///
/// 当 `byte` 本身越界时会 panic，调用方需保证游标尚未越过数据末尾。
pub fn read_bits(buffer: &[u8], byte: usize, bit: u8, bits: BitsPerChannel) -> u8 {
    let count = bits.get();
    if bit + count <= 8 {
        return (buffer[byte] >> bit) & bits.low_mask();
    }

    let bits_in_first = 8 - bit;
    let bits_in_second = count - bits_in_first;

    let first = buffer[byte] >> bit;
    let second = buffer.get(byte + 1).copied().unwrap_or(0) & (0xFF >> (8 - bits_in_second));

    first | (second << bits_in_first)
}

/// 将 `data` 的低 `bits` 位按位或写入 `buffer` 的 `(byte, bit)` 处。
///
/// 写入是叠加的 (OR)，不会清除目标位；`data` 中高于 `bits - 1` 的位必须为 0。
/// 跨字节写入时，若第二个字节超出缓冲区则丢弃溢出部分。
pub fn write_bits(buffer: &mut [u8], byte: usize, bit: u8, bits: BitsPerChannel, data: u8) {
    buffer[byte] |= data << bit;

    if bit + bits.get() > 8 {
        let bits_in_first = 8 - bit;
        if let Some(next) = buffer.get_mut(byte + 1) {
            *next |= data >> bits_in_first;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 2] = [0b0010_1111, 0b1001_1011];

    fn bits(n: u8) -> BitsPerChannel {
        BitsPerChannel::new(n).unwrap()
    }

    #[test]
    fn rejects_out_of_range_bit_counts() {
        assert_eq!(
            BitsPerChannel::new(0),
            Err(StegoError::InvalidBitsPerChannel(0))
        );
        assert_eq!(
            BitsPerChannel::try_from(9u8),
            Err(StegoError::InvalidBitsPerChannel(9))
        );
        assert_eq!(bits(8).low_mask(), 0xFF);
        assert_eq!(bits(3).low_mask(), 0b111);
    }

    #[test]
    fn read_within_single_byte() {
        assert_eq!(read_bits(&SAMPLE, 0, 3, bits(3)), 0b101);
        assert_eq!(read_bits(&SAMPLE, 1, 0, bits(2)), 0b011);
        assert_eq!(read_bits(&SAMPLE, 1, 1, bits(3)), 0b101);
    }

    #[test]
    fn read_across_byte_boundary() {
        assert_eq!(read_bits(&SAMPLE, 0, 7, bits(3)), 0b110);
    }

    #[test]
    fn read_past_end_yields_zero_bits() {
        // 最后一个字节的高位之后没有数据
        assert_eq!(read_bits(&[0b1100_0000], 0, 6, bits(4)), 0b0011);
    }

    #[test]
    fn write_within_single_byte() {
        let mut buf = [0u8; 2];
        write_bits(&mut buf, 0, 3, bits(3), 0b111);
        assert_eq!(buf, [0b0011_1000, 0]);
    }

    #[test]
    fn write_across_byte_boundary() {
        let mut buf = [0u8; 2];
        write_bits(&mut buf, 0, 6, bits(3), 0b101);
        assert_eq!(buf, [0b0100_0000, 0b0000_0001]);

        let mut buf = [0u8; 2];
        write_bits(&mut buf, 0, 7, bits(3), 0b101);
        assert_eq!(buf, [0b1000_0000, 0b0000_0010]);
    }

    #[test]
    fn write_is_additive() {
        let mut buf = [0b0000_0001u8];
        write_bits(&mut buf, 0, 2, bits(2), 0b11);
        assert_eq!(buf, [0b0000_1101]);
    }

    #[test]
    fn write_past_end_is_dropped() {
        let mut buf = [0u8; 1];
        write_bits(&mut buf, 0, 7, bits(3), 0b111);
        assert_eq!(buf, [0b1000_0000]);
    }

    #[test]
    fn cursor_advances_across_bytes() {
        let mut cursor = BitCursor::default();
        cursor.advance(bits(3));
        cursor.advance(bits(3));
        assert_eq!(cursor, BitCursor { byte: 0, bit: 6 });
        cursor.advance(bits(3));
        assert_eq!(cursor, BitCursor { byte: 1, bit: 1 });
        cursor.advance(bits(8));
        assert_eq!(cursor, BitCursor { byte: 2, bit: 1 });
    }
}

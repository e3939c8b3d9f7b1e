//! # 隐写核心模块
//!
//! 按光栅顺序遍历像素，并在每个像素内按 R、G、B、(A) 的固定顺序，
//! 用数据位替换各通道的最低 `bits` 位 ([`embed`])，或把它们取回 ([`extract`])。
//! 两个方向共享同一个位游标，处理完数据长度后立即停止，
//! 因此剩余像素保持不变。

use crate::bitmap::DecodedImage;
use crate::bits::{BitCursor, BitsPerChannel, read_bits, write_bits};
use crate::capacity::capacity;
use crate::error::StegoError;
use log::debug;

/// 将 `payload` 写入 `image` 各通道的最低有效位。
///
/// 调用方需要在编码前将 `image.reserved` 设为 `payload.len()`，
/// 这是之后提取时唯一的长度记录。
///
/// # Errors
///
/// 当数据长度超过 [`capacity`] 时返回 [`StegoError::CapacityExceeded`]，此时图像不会被修改。
pub fn embed(
    image: &mut DecodedImage,
    payload: &[u8],
    bits: BitsPerChannel,
) -> Result<(), StegoError> {
    let available = capacity(image, bits);
    if payload.len() as u64 > available {
        return Err(StegoError::CapacityExceeded {
            payload: payload.len(),
            capacity: available,
        });
    }

    // 掩码按 8 位截断，超过第 8 位的通道位也会被清除
    let keep = u16::from((0xFF_u16 << bits.get()) as u8);
    let depth = image.depth;
    let mut cursor = BitCursor::default();

    'pixels: for pixel in image.pixels.iter_mut() {
        for channel in pixel.channels_mut(depth) {
            if cursor.byte >= payload.len() {
                break 'pixels;
            }
            let data = read_bits(payload, cursor.byte, cursor.bit, bits);
            *channel = (*channel & keep) | u16::from(data);
            cursor.advance(bits);
        }
    }

    debug!(
        "embedded {} bytes into a {}-pixel image",
        payload.len(),
        image.pixel_count()
    );
    Ok(())
}

/// 从 `image` 中取回长度为 `image.reserved` 的数据。
///
/// # Errors
///
/// 当记录的长度超过 [`capacity`] 时返回 [`StegoError::CorruptPayload`]，
/// 这通常意味着图像从未嵌入过数据，或嵌入时使用了不同的位数设置。
pub fn extract(image: &DecodedImage, bits: BitsPerChannel) -> Result<Vec<u8>, StegoError> {
    let available = capacity(image, bits);
    if u64::from(image.reserved) > available {
        return Err(StegoError::CorruptPayload {
            declared: image.reserved,
            capacity: available,
        });
    }

    let mut payload = vec![0u8; image.reserved as usize];
    let mask = u16::from(bits.low_mask());
    let depth = image.depth;
    let mut cursor = BitCursor::default();

    'pixels: for pixel in &image.pixels {
        for channel in pixel.channels(depth) {
            if cursor.byte >= payload.len() {
                break 'pixels;
            }
            write_bits(&mut payload, cursor.byte, cursor.bit, bits, (channel & mask) as u8);
            cursor.advance(bits);
        }
    }

    debug!("extracted {} bytes", payload.len());
    Ok(payload)
}

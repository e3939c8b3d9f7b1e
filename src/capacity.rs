//! # 容量计算模块
//!
//! 计算在给定位数设置下，一张图像最多能嵌入多少字节的数据。

use crate::bitmap::{DecodedImage, PixelDepth};
use crate::bits::BitsPerChannel;
use log::debug;

/// 可用于隐写的通道数。
///
/// 位数过高时对图像内容的破坏被认为不可接受，此时返回 0，容量随之归零。
pub fn usable_channels(depth: PixelDepth, bits: BitsPerChannel) -> u8 {
    match depth {
        PixelDepth::Rgba16 if bits.get() < 3 => 4,
        PixelDepth::Rgb24 if bits.get() < 5 => 3,
        PixelDepth::Rgba32 if bits.get() < 5 => 4,
        _ => 0,
    }
}

/// 返回图像在 `bits` 设置下可容纳的最大字节数，即
/// `floor(通道数 * bits * width * height / 8)`。
pub fn capacity(image: &DecodedImage, bits: BitsPerChannel) -> u64 {
    let factor = usable_channels(image.depth, bits);
    let total_bits = u128::from(factor)
        * u128::from(bits.get())
        * u128::from(image.width)
        * u128::from(image.height);
    let bytes = u64::try_from(total_bits / 8).unwrap_or(u64::MAX);

    debug!(
        "capacity of {}x{} {:?} image at {} bit(s) per channel: {bytes} bytes",
        image.width,
        image.height,
        image.depth,
        bits.get()
    );
    bytes
}

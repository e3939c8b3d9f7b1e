//! # 错误类型模块
//!
//! 使用 `thiserror` 定义核心库的两类错误：
//! 解码阶段的 [`ParseError`] 与隐写阶段的 [`StegoError`]。
//! 所有错误都以值的形式返回，调用方 (`handler`) 负责向用户报告。

/// 解码 BMP 字节流时可能出现的结构性错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 缓冲区长度不足以容纳头部或声明的像素数组。
    #[error("The image file does not have the correct format (invalid length)")]
    InvalidLength,

    /// 前两个字节不是 "BM"。
    #[error("The image file does not have the correct format (invalid magic number)")]
    InvalidMagicNumber,

    #[error("This tool does not support compressed bitmap files")]
    CompressionNotSupported,

    /// 像素深度低于 16 位，或不是 16/24/32 之一。
    #[error("This tool does not support pixel encodings with less than 16 bits in total")]
    MinimumPixelDepth16,
}

/// 嵌入与提取过程中的错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StegoError {
    #[error("The bit number must be between 1 and 8, got {0}")]
    InvalidBitsPerChannel(u8),

    #[error(
        "The file is too large to embed into the image with the current bit setting (required: {payload} bytes, available: {capacity} bytes)"
    )]
    CapacityExceeded { payload: usize, capacity: u64 },

    /// 头部记录的长度超过了图像在当前位数设置下的容量。
    #[error(
        "The file was incorrectly encoded (declared length {declared} exceeds capacity {capacity})"
    )]
    CorruptPayload { declared: u32, capacity: u64 },
}

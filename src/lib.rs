//! # bmp_hider 库
//!
//! 本库包含 BMP 编解码、容量计算以及 LSB 隐写的核心逻辑。

// 声明库包含的所有模块。

pub mod bitmap;
pub mod bits;
pub mod capacity;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

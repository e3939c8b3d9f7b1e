//! # BMP 编解码模块
//!
//! 将未压缩的 BMP 字节流解码为 [`DecodedImage`]，并能将其重新编码为字节流。
//!
//! 所有多字节头部字段均以小端序显式读写，与主机字节序及内存对齐无关。
//! 行填充按 `4 - (行字节数 % 4)` 计算，行已对齐时填充为 4 而不是 0，
//! 这一行为与既有文件格式保持一致，解码与编码两侧都遵循它。

use crate::constants::*;
use crate::error::ParseError;
use log::debug;

/// 解码结果。
pub type ParseOutcome = Result<DecodedImage, ParseError>;

/// 支持的像素深度，决定通道数以及每个像素的提取/打包方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelDepth {
    Rgba16,
    Rgb24,
    Rgba32,
}

impl PixelDepth {
    /// 每像素位数。
    pub fn bits(self) -> u16 {
        match self {
            PixelDepth::Rgba16 => 16,
            PixelDepth::Rgb24 => 24,
            PixelDepth::Rgba32 => 32,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        usize::from(self.bits() / 8)
    }

    /// 颜色通道数 (含 alpha)。
    pub fn channel_count(self) -> usize {
        match self {
            PixelDepth::Rgb24 => 3,
            PixelDepth::Rgba16 | PixelDepth::Rgba32 => 4,
        }
    }

    /// 从一个像素的原始字节中提取各通道值。
    ///
    /// 16 位时 green 与 alpha 保持在高半字节的位置上，不做移位；
    /// 32 位时各通道是跨越相邻字节、宽度为 9/9/8/5 位的重叠窗口。
    fn extract(self, raw: &[u8]) -> Pixel {
        match self {
            PixelDepth::Rgba16 => Pixel {
                blue: u16::from(raw[0] & 0x0F),
                green: u16::from(raw[0] & 0xF0),
                red: u16::from(raw[1] & 0x0F),
                alpha: u16::from(raw[1] & 0xF0),
            },
            PixelDepth::Rgb24 => Pixel {
                blue: u16::from(raw[0]),
                green: u16::from(raw[1]),
                red: u16::from(raw[2]),
                alpha: 0,
            },
            PixelDepth::Rgba32 => Pixel {
                blue: (u16::from(raw[0]) + (u16::from(raw[1]) << 8)) & 0x1FF,
                green: (u16::from(raw[1]) + (u16::from(raw[2]) << 8)) & 0x1FE,
                red: u16::from(raw[2] & 0xFE),
                alpha: u16::from(raw[3] & 0x1F),
            },
        }
    }

    /// 将通道值打包写入一个像素的原始字节，`out` 须预先清零。
    ///
    /// 32 位的打包公式第二次使用了 blue 而不是 red，并非 [`Self::extract`] 的逆运算。
    fn pack(self, pixel: &Pixel, out: &mut [u8]) {
        match self {
            PixelDepth::Rgba16 => {
                out[0] = (pixel.blue as u8) | ((pixel.green as u8) << 4);
                out[1] = (pixel.red as u8) | ((pixel.alpha as u8) << 4);
            }
            PixelDepth::Rgb24 => {
                out[0] = pixel.blue as u8;
                out[1] = pixel.green as u8;
                out[2] = pixel.red as u8;
            }
            PixelDepth::Rgba32 => {
                let word = u32::from(pixel.blue as u8)
                    | (u32::from(pixel.green) << 9)
                    | (u32::from(pixel.blue) << 17)
                    | (u32::from(pixel.alpha) << 24);
                out[..4].copy_from_slice(&word.to_le_bytes());
            }
        }
    }
}

impl TryFrom<u16> for PixelDepth {
    type Error = ParseError;

    fn try_from(bits: u16) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(PixelDepth::Rgba16),
            24 => Ok(PixelDepth::Rgb24),
            32 => Ok(PixelDepth::Rgba32),
            _ => Err(ParseError::MinimumPixelDepth16),
        }
    }
}

/// 单个像素的通道值。
///
/// 通道宽度并不固定为 8 位 (参见 [`PixelDepth`] 的提取规则)，因此使用 `u16` 存储。
/// 对于 [`PixelDepth::Rgb24`]，`alpha` 始终为 0 且不参与任何运算。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pixel {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
    pub alpha: u16,
}

impl Pixel {
    /// 按 R、G、B、(A) 的固定顺序遍历该深度下参与隐写的通道。
    pub fn channels(&self, depth: PixelDepth) -> impl Iterator<Item = u16> {
        [self.red, self.green, self.blue, self.alpha]
            .into_iter()
            .take(depth.channel_count())
    }

    /// [`Self::channels`] 的可变版本。
    pub fn channels_mut(&mut self, depth: PixelDepth) -> impl Iterator<Item = &mut u16> {
        [
            &mut self.red,
            &mut self.green,
            &mut self.blue,
            &mut self.alpha,
        ]
        .into_iter()
        .take(depth.channel_count())
    }
}

/// 解码后的图像。
///
/// `reserved` 字段在本工具中用于记录已嵌入数据的字节数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub depth: PixelDepth,
    pub width: u32,
    pub height: u32,
    /// 按存储顺序排列的像素，长度为 `width * height`。
    pub pixels: Vec<Pixel>,
    pub horizontal_resolution: i32,
    pub vertical_resolution: i32,
    pub reserved: u32,
}

impl DecodedImage {
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}

fn read_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let field = bytes.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([field[0], field[1]]))
}

fn read_u32(bytes: &[u8], offset: usize) -> Option<u32> {
    let field = bytes.get(offset..offset + 4)?;
    Some(u32::from_le_bytes([field[0], field[1], field[2], field[3]]))
}

fn read_i32(bytes: &[u8], offset: usize) -> Option<i32> {
    read_u32(bytes, offset).map(|value| value as i32)
}

fn write_u16(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn write_u32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// 每行末尾的填充字节数。行已对齐到 4 字节时结果为 4。
fn row_padding(width: u64, depth: u64) -> u64 {
    4 - ((width * depth / 8) % 4)
}

/// 第 `index` 个像素在像素数组中的字节偏移 (不含像素数组起始偏移)。
fn pixel_offset(index: usize, width: usize, bytes_per_pixel: usize, padding: usize) -> usize {
    index * bytes_per_pixel + (index / width) * padding
}

/// 将 BMP 字节流解码为 [`DecodedImage`]。
///
/// 校验顺序：长度至少 34 字节、魔数 "BM"、未压缩、深度不低于 16 位、
/// 缓冲区足以容纳声明的像素数组。像素数组起始偏移只使用其最低字节。
///
/// # Errors
///
/// 返回对应的 [`ParseError`]。
pub fn decode(bytes: &[u8]) -> ParseOutcome {
    if bytes.len() < MIN_FILE_LENGTH {
        return Err(ParseError::InvalidLength);
    }
    if bytes[..2] != MAGIC {
        return Err(ParseError::InvalidMagicNumber);
    }

    let field = |value: Option<u32>| value.ok_or(ParseError::InvalidLength);
    let reserved = field(read_u32(bytes, OFFSET_RESERVED))?;
    let data_start = u64::from(field(read_u32(bytes, OFFSET_DATA_START))? as u8);
    let width = field(read_u32(bytes, OFFSET_WIDTH))?;
    let height = field(read_u32(bytes, OFFSET_HEIGHT))?;
    let depth_bits = read_u16(bytes, OFFSET_DEPTH).ok_or(ParseError::InvalidLength)?;
    let compression = field(read_u32(bytes, OFFSET_COMPRESSION))?;

    let padding = row_padding(u64::from(width), u64::from(depth_bits));
    let row_size = u128::from(width) * u128::from(height) * u128::from(depth_bits) / 8
        + u128::from(height) * u128::from(padding);

    if compression != 0 {
        return Err(ParseError::CompressionNotSupported);
    }
    if depth_bits < 16 {
        return Err(ParseError::MinimumPixelDepth16);
    }
    if (bytes.len() as u128) < u128::from(data_start) + row_size {
        return Err(ParseError::InvalidLength);
    }
    let depth = PixelDepth::try_from(depth_bits)?;

    let horizontal_resolution =
        read_i32(bytes, OFFSET_RES_HORIZONTAL).ok_or(ParseError::InvalidLength)?;
    let vertical_resolution =
        read_i32(bytes, OFFSET_RES_VERTICAL).ok_or(ParseError::InvalidLength)?;

    debug!(
        "decoded BMP header: {width}x{height}, {depth_bits} bpp, data at {data_start}, padding {padding}, reserved {reserved}"
    );

    // 经过上面的长度校验，这些值都能放入 usize
    let count = usize::try_from(u64::from(width) * u64::from(height))
        .map_err(|_| ParseError::InvalidLength)?;
    let data_start = data_start as usize;
    let padding = padding as usize;
    let width_px = width as usize;
    let bpp = depth.bytes_per_pixel();

    let pixels = (0..count)
        .map(|i| {
            let index = data_start + pixel_offset(i, width_px, bpp, padding);
            depth.extract(&bytes[index..index + bpp])
        })
        .collect();

    Ok(DecodedImage {
        depth,
        width,
        height,
        pixels,
        horizontal_resolution,
        vertical_resolution,
        reserved,
    })
}

/// 将 [`DecodedImage`] 编码为 BMP 字节流，像素数组紧跟在 54 字节头部之后。
///
/// 当像素数量与 `width * height` 不符，或文件大小无法用 32 位头部字段表示时返回 `None`。
pub fn encode(image: &DecodedImage) -> Option<Vec<u8>> {
    let depth = image.depth;
    let width = u64::from(image.width);
    let height = u64::from(image.height);
    if image.pixels.len() as u64 != width * height {
        return None;
    }

    let padding = row_padding(width, u64::from(depth.bits()));
    let pixel_bytes = u128::from(height) * u128::from(width) * u128::from(depth.bits()) / 8;
    let image_size = pixel_bytes + u128::from(height) * u128::from(padding);
    let file_size = u32::try_from(image_size + BMP_HEADER_SIZE as u128).ok()?;
    let pixel_bytes = u32::try_from(pixel_bytes).ok()?;

    let mut buffer = vec![0u8; file_size as usize];

    buffer[..2].copy_from_slice(&MAGIC);
    write_u32(&mut buffer, OFFSET_FILE_SIZE, file_size);
    write_u32(&mut buffer, OFFSET_RESERVED, image.reserved);
    write_u32(&mut buffer, OFFSET_DATA_START, BMP_HEADER_SIZE as u32);

    write_u32(&mut buffer, OFFSET_INFO_HEADER_SIZE, INFO_HEADER_SIZE);
    write_u32(&mut buffer, OFFSET_WIDTH, image.width);
    write_u32(&mut buffer, OFFSET_HEIGHT, image.height);
    write_u16(&mut buffer, OFFSET_COLOR_PLANES, 1);
    write_u16(&mut buffer, OFFSET_DEPTH, depth.bits());
    write_u32(&mut buffer, OFFSET_COMPRESSION, 0);
    write_u32(&mut buffer, OFFSET_IMAGE_SIZE, pixel_bytes);
    write_u32(&mut buffer, OFFSET_RES_HORIZONTAL, image.horizontal_resolution as u32);
    write_u32(&mut buffer, OFFSET_RES_VERTICAL, image.vertical_resolution as u32);
    write_u32(&mut buffer, OFFSET_PALETTE, 0);
    write_u32(&mut buffer, OFFSET_IMPORTANT_COLORS, 0);

    let width_px = image.width as usize;
    let padding = padding as usize;
    let bpp = depth.bytes_per_pixel();
    for (i, pixel) in image.pixels.iter().enumerate() {
        let index = BMP_HEADER_SIZE + pixel_offset(i, width_px, bpp, padding);
        depth.pack(pixel, &mut buffer[index..index + bpp]);
    }

    debug!(
        "encoded {}x{} {} bpp image into {file_size} bytes",
        image.width,
        image.height,
        depth.bits()
    );

    Some(buffer)
}

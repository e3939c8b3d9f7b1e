/// 编码输出时写入的 BMP 头部总大小 (字节)，也是像素数组的起始偏移。
pub const BMP_HEADER_SIZE: usize = 54;

/// 解码所需的最小字节数，刚好覆盖到压缩方式字段的末尾。
pub const MIN_FILE_LENGTH: usize = 34;

/// BITMAPINFOHEADER 的大小，写入偏移 14 处。
pub const INFO_HEADER_SIZE: u32 = 40;

/// 文件头部的魔数 "BM"。
pub const MAGIC: [u8; 2] = *b"BM";

// 头部各字段的字节偏移，全部为小端序。
pub const OFFSET_FILE_SIZE: usize = 2;
pub const OFFSET_RESERVED: usize = 6;
pub const OFFSET_DATA_START: usize = 10;
pub const OFFSET_INFO_HEADER_SIZE: usize = 14;
pub const OFFSET_WIDTH: usize = 18;
pub const OFFSET_HEIGHT: usize = 22;
pub const OFFSET_COLOR_PLANES: usize = 26;
pub const OFFSET_DEPTH: usize = 28;
pub const OFFSET_COMPRESSION: usize = 30;
pub const OFFSET_IMAGE_SIZE: usize = 34;
pub const OFFSET_RES_HORIZONTAL: usize = 38;
pub const OFFSET_RES_VERTICAL: usize = 42;
pub const OFFSET_PALETTE: usize = 46;
pub const OFFSET_IMPORTANT_COLORS: usize = 50;

/// 未指定 `--bit-number` 时每个通道使用的最低有效位数。
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 2;

/// 嵌入模式下未指定输出路径时使用的文件名。
pub const DEFAULT_EMBED_OUTPUT: &str = "out.bmp";

/// 提取模式下未指定输出路径时使用的文件名。
pub const DEFAULT_RECOVER_OUTPUT: &str = "out.bin";

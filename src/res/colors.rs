pub const EMBED_COLOR_SUCCESS: u32 = 0x00ff00;
pub const EMBED_COLOR_WARNING: u32 = 0xff9900;
pub const EMBED_COLOR_ERROR: u32 = 0xff0000;

pub const EMBED_COLOR_CELEBRATION: u32 = 0xff1493;
pub const EMBED_COLOR_LIST: u32 = 0xff69b4;
pub const EMBED_COLOR_NEXT: u32 = 0xffd700;
pub const EMBED_COLOR_HELP: u32 = 0x5865f2;

// src/constants.rs

/// Written after the current directory on every prompt.
pub const PROMPT_DELIMITER: &str = "# ";

/// Longest command line accepted from a client, newline excluded.
pub const MAX_LINE_LENGTH: usize = 4096;

// Transfer frame tags. A tag is only ever read at a chunk boundary.
pub const FRAME_DATA: u8 = 0x01;
pub const FRAME_END: u8 = 0xDA;
pub const FRAME_ABORT: u8 = 0x15;

pub const DEFAULT_CHUNK_SIZE: usize = 1024;
pub const MAX_CHUNK_SIZE: usize = u16::MAX as usize;

pub const DEFAULT_LISTEN_ADDRESS: &str = "127.0.0.1:9091";
pub const DEFAULT_ROOT: &str = ".";

pub const UNKNOWN_COMMAND: &str = "unknown command\n";

pub mod codec;
pub mod error;
pub mod transfer;

pub use codec::{read_chunk, write_abort, write_data, write_end, Chunk};
pub use error::TransferError;
pub use transfer::{drain_frame, receive_file, send_file, TransferDirection};

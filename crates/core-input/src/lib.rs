//! Key decoding: turns the raw terminal byte stream into `KeyEvent`s.

mod decoder;

pub use decoder::{ByteSource, KeyDecoder};

//! This crate implements an encoder and decoder for the
//! [QOI image format](https://qoiformat.org).
//!
//! The primary exports are the `decode`/`encode` functions, which work on
//! in-memory buffers, and `decode_image`/`encode_image`, which accept a
//! generic trait bound of `std::io::Read` for the image source and
//! `std::io::Write` for the image destination. `read_file` and `write_file`
//! wrap them for images on disk.
//!
//! Decoded pixel data is always tightly packed, row-major, top-to-bottom RGB
//! or RGBA with 8 bits per channel, as described by the image's
//! [ImageMeta]. To keep this crate simple, it does not support decoding other
//! image formats. To encode an image, it will first need to be decoded using
//! another method. From there, the decoded pixel data can then be encoded.
//!
//! Encoding and decoding keep no state between calls, so separate images can
//! be processed on separate threads without synchronization.
//!
//! # In-memory encode example
//!
//! ```rust
//! use qolqoi::{encode, Channels, Colorspace, ImageMeta};
//!
//! // A 1x1 representation of an image's pixel data.
//! let pixels = [10, 20, 30, 255];
//!
//! // Metadata describing the image to be encoded.
//! let meta = ImageMeta {
//!   width: 1,
//!   height: 1,
//!   channels: Channels::Rgba,
//!   colorspace: Colorspace::Srgb,
//! };
//!
//! let encoded = encode(&pixels, &meta).expect("Failed to encode image");
//!
//! // Header, one `QOI_OP_RGB` op, end marker.
//! assert_eq!(encoded.len(), 14 + 4 + 8);
//! assert_eq!(&encoded[14..18], &[0xfe, 10, 20, 30]);
//! ```
//!
//! # Decode example
//!
//! ```rust
//! use std::io::sink;
//! use qolqoi::{decode_image, Error};
//!
//! // Something that isn't a QOI image.
//! let source = b"\x89PNG\r\n\x1a\n\0\0\0\0\0\0";
//!
//! // For example purposes, write decoded bytes into the void.
//! match decode_image(source.as_slice(), sink()) {
//!   Err(Error::InvalidMagic(magic)) => assert_eq!(&magic, b"\x89PNG"),
//!   other => panic!("unexpected result {:?}", other),
//! }
//! ```
//!
//! # Logging
//!
//! Header and summary information is emitted through the `log` facade at
//! `debug` level, run flushes at `trace` level. Nothing is printed unless the
//! application installs a logger.

pub use crate::decode::{decode, decode_image};
pub use crate::encode::{encode, encode_image};
pub use crate::error::Error;
pub use crate::file::{read_file, write_file};
pub use crate::meta::{
  read_header, write_header, Channels, Colorspace, ImageMeta, QOI_BYTES_END, QOI_BYTES_MAGIC,
  QOI_HEADER_LEN, QOI_MAX_RUN,
};

mod cache;
mod decode;
mod encode;
mod error;
mod file;
mod meta;
mod op;
mod pixel;
mod state;

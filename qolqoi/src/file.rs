use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::decode::decode;
use crate::encode::encode_image;
use crate::error::Error;
use crate::meta::ImageMeta;

/// Reads and decodes the QOI image at `path`. The whole file is read into
/// memory before decoding starts.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<(ImageMeta, Vec<u8>), Error> {
  let path = path.as_ref();
  let data = fs::read(path)?;

  log::debug!("read {} bytes from {}", data.len(), path.display());

  decode(&data)
}

/// Encodes `pixels` as described by `meta` and writes the QOI image to
/// `path`, replacing any existing file.
///
/// The pixel buffer's size is checked before the file is created.
pub fn write_file<P: AsRef<Path>>(path: P, meta: &ImageMeta, pixels: &[u8]) -> Result<(), Error> {
  let path = path.as_ref();
  let expected = meta.buffer_len()?;

  if pixels.len() != expected {
    return Err(Error::BufferSizeMismatch { expected, actual: pixels.len() });
  }

  let writer = BufWriter::new(File::create(path)?);
  encode_image(pixels, writer, meta)?;

  log::debug!("wrote {}", path.display());

  Ok(())
}

use std::io;

use crate::error::Error;
use crate::meta::{read_header, ImageMeta, QOI_HEADER_LEN, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Decodes a QOI encoded image. The decoded pixel data is written to the
/// provided `writer`, and upon success, the image's `ImageMeta` data is
/// returned.
///
/// Exactly `width * height` pixels are written, each as `channels` bytes
/// (RGB or RGBA) in row-major order. Bytes following the last pixel's op,
/// such as the end marker, are left unread.
///
/// Note that this function performs frequent reads and writes, so it's
/// recommended to provide a buffered IO implementation such as
/// `std::io::BufReader` and `std::io::BufWriter` when working with files.
pub fn decode_image<R: io::Read, W: io::Write>(
  mut reader: R,
  mut writer: W,
) -> Result<ImageMeta, Error> {
  let meta = read_header(&mut reader)?;
  decode_pixels(&meta, reader, &mut writer)?;
  writer.flush()?;

  Ok(meta)
}

/// Decodes a complete in-memory QOI image, returning its `ImageMeta` and a
/// pixel buffer of exactly `width * height * channels` bytes.
///
/// The header is validated before any pixel memory is allocated.
pub fn decode(data: &[u8]) -> Result<(ImageMeta, Vec<u8>), Error> {
  let meta = read_header(data)?;
  let buffer_len = meta.buffer_len()?;
  let ops = data.get(QOI_HEADER_LEN..).unwrap_or_default();

  // A lying header must not be able to request more memory than the op
  // stream could ever expand to; every op yields at most `QOI_MAX_RUN`
  // pixels.
  let max_len = ops
    .len()
    .saturating_mul(QOI_MAX_RUN as usize)
    .saturating_mul(meta.channels.count());
  let mut pixels = Vec::with_capacity(buffer_len.min(max_len));

  decode_pixels(&meta, ops, &mut pixels)?;

  Ok((meta, pixels))
}

// Decodes the op stream following the header, writing `meta.num_pixels()`
// pixels to `writer`.
fn decode_pixels<R: io::Read, W: io::Write>(
  meta: &ImageMeta,
  reader: R,
  mut writer: W,
) -> Result<(), Error> {
  let channels = meta.channels.count();
  let mut state = State::new();
  let mut bytes = reader.bytes();

  for _ in 0..meta.num_pixels() {
    let pixel = decode_pixel(&mut state, &mut bytes)?;
    state.prev_pixel = pixel;
    writer.write_all(&pixel.to_array()[..channels])?;
  }

  log::debug!("decoded {} pixels ({})", meta.num_pixels(), meta);

  Ok(())
}

// Attempts to decode a single "next" pixel from the provided decoding `state`
// and encoded `bytes`. Pending run repeats are served without reading.
fn decode_pixel<I: Iterator<Item = Result<u8, io::Error>>>(
  state: &mut State,
  bytes: &mut I,
) -> Result<Pixel, Error> {
  if state.run_count > 0 {
    state.run_count -= 1;
    return Ok(state.prev_pixel);
  }

  let pixel = match Op::read_from(bytes)? {
    Op::Index(index) => {
      return Ok(state.cache.get(index));
    }
    Op::Run(run_length) => {
      // This pixel is the first of the run.
      state.run_count = run_length - 1;
      return Ok(state.prev_pixel);
    }
    Op::Diff(diff_r, diff_g, diff_b) => {
      Pixel::from_diff(PixelDiff::Diff(diff_r, diff_g, diff_b), &state.prev_pixel)
    }
    Op::Luma(luma_g, luma_rg, luma_bg) => {
      Pixel::from_diff(PixelDiff::Luma(luma_g, luma_rg, luma_bg), &state.prev_pixel)
    }
    Op::Rgb(r, g, b) => {
      Pixel { r, g, b, a: state.prev_pixel.a }
    }
    Op::Rgba(r, g, b, a) => {
      Pixel { r, g, b, a }
    }
  };

  state.cache.insert(pixel);

  Ok(pixel)
}

use std::io;

use crate::error::Error;
use crate::meta::{write_header, ImageMeta, QOI_BYTES_END, QOI_HEADER_LEN, QOI_MAX_RUN};
use crate::op::Op;
use crate::pixel::{Pixel, PixelDiff};
use crate::state::State;

/// Encodes an image's raw pixel data and `ImageMeta` data into a QOI encoded
/// image.
///
/// `reader` must yield `width * height` pixels of `channels` bytes each, in
/// row-major order; running out early is an `Error::UnexpectedEof`. RGB
/// pixels are encoded as fully opaque.
///
/// Note that this function performs frequent reads and writes, so it's
/// recommended to provide a buffered IO implementation such as
/// `std::io::BufReader` and `std::io::BufWriter` when working with files.
pub fn encode_image<R: io::Read, W: io::Write>(
  mut reader: R,
  mut writer: W,
  meta: &ImageMeta,
) -> Result<(), Error> {
  write_header(meta, &mut writer)?;

  let mut state = State::new();
  let mut pixel_buf = [0; 4];
  let pixel_buf = &mut pixel_buf[..meta.channels.count()];

  for _ in 0..meta.num_pixels() {
    reader.read_exact(pixel_buf)?;

    let pixel = Pixel::from_channels(pixel_buf, meta.channels);

    encode_pixel(&mut state, pixel, &mut writer)?;
    state.prev_pixel = pixel;
  }

  if state.run_count > 0 {
    flush_run(&mut state, &mut writer)?;
  }

  writer.write_all(&QOI_BYTES_END)?;
  writer.flush()?;

  log::debug!("encoded {} pixels ({})", meta.num_pixels(), meta);

  Ok(())
}

/// Encodes an in-memory pixel buffer, returning the complete QOI image.
///
/// `pixels` must hold exactly `width * height * channels` bytes, otherwise
/// `Error::BufferSizeMismatch` is returned and nothing is encoded.
pub fn encode(pixels: &[u8], meta: &ImageMeta) -> Result<Vec<u8>, Error> {
  let expected = meta.buffer_len()?;

  if pixels.len() != expected {
    return Err(Error::BufferSizeMismatch { expected, actual: pixels.len() });
  }

  // Most images shrink, so reserve for the header plus a guess at the ops.
  let mut dest = Vec::with_capacity(QOI_HEADER_LEN + expected / 2 + QOI_BYTES_END.len());
  encode_image(pixels, &mut dest, meta)?;

  Ok(dest)
}

// Attempts to encode and write the provided pixel using the QOI OP encoding
// scheme and provided `state`. Identical pixels are only counted here, and
// written once the run ends or reaches `QOI_MAX_RUN`.
fn encode_pixel<W: io::Write>(
  state: &mut State,
  pixel: Pixel,
  mut writer: W,
) -> Result<(), Error> {
  if pixel == state.prev_pixel {
    state.run_count += 1;

    if state.run_count == QOI_MAX_RUN {
      flush_run(state, &mut writer)?;
    }

    return Ok(());
  }

  if state.run_count > 0 {
    flush_run(state, &mut writer)?;
  }

  if let Some(index) = state.cache.lookup(&pixel) {
    Op::Index(index).write_to(&mut writer)?;
    return Ok(());
  }

  state.cache.insert(pixel);

  if let Some(diff) = pixel.diff(&state.prev_pixel) {
    match diff {
      PixelDiff::Diff(diff_r, diff_g, diff_b) => {
        Op::Diff(diff_r, diff_g, diff_b).write_to(&mut writer)?;
      }
      PixelDiff::Luma(luma_g, luma_rg, luma_bg) => {
        Op::Luma(luma_g, luma_rg, luma_bg).write_to(&mut writer)?;
      }
    }

    return Ok(());
  }

  if pixel.a == state.prev_pixel.a {
    Op::Rgb(pixel.r, pixel.g, pixel.b).write_to(&mut writer)?;
    return Ok(());
  }

  Op::Rgba(pixel.r, pixel.g, pixel.b, pixel.a).write_to(&mut writer)?;
  Ok(())
}

fn flush_run<W: io::Write>(state: &mut State, writer: W) -> Result<(), Error> {
  log::trace!("run of {} x {:?}", state.run_count, state.prev_pixel);

  Op::Run(state.run_count).write_to(writer)?;
  state.run_count = 0;

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::qoi_hash;
  use crate::meta::{Channels, Colorspace};

  #[test]
  fn test_encoding_rgb_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 255 };

    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(
      dest,
      vec![
        // Op::Rgb(101, 102, 103)
        0xfe, 101, 102, 103,
      ]
    );
  }

  #[test]
  fn test_encoding_rgba_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(
      dest,
      vec![
        // Op::Rgba(101, 102, 103, 104)
        0xff, 101, 102, 103, 104,
      ]
    );
  }

  #[test]
  fn test_encoding_alpha_change_beats_diff() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel = Pixel { r: 0, g: 0, b: 0, a: 254 };

    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest, vec![0xff, 0, 0, 0, 254]);
  }

  #[test]
  fn test_encoding_run_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let mut pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    state.prev_pixel = pixel;
    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest.len(), 0);

    pixel.a = 0;
    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest[0], 0xc0);
  }

  #[test]
  fn test_encoding_trailing_run_op() {
    let source = [101, 102, 103, 101, 102, 103];
    let mut dest = Vec::new();

    assert_eq!(
      encode_image(
        source.as_slice(),
        &mut dest,
        &ImageMeta { width: 2, height: 1, channels: Channels::Rgb, colorspace: Colorspace::Srgb },
      ),
      Ok(())
    );

    let range_start = QOI_HEADER_LEN + 4; // Header length + Op::Rgb(101, 102, 103)
    let range_end = range_start + 1; // Op::Run(1)
    assert_eq!(&dest[range_start..range_end], &[0xc0]); // Op::Run(1)
    assert_eq!(&dest[range_end..], &QOI_BYTES_END);
  }

  #[test]
  fn test_encoding_max_run_ops() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    state.prev_pixel = pixel;
    state.run_count = 61;
    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest, vec![0xc0 | 61]); // Op::Run(62)
    assert_eq!(state.run_count, 0);

    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest.len(), 1);
    assert_eq!(state.run_count, 1);
  }

  #[test]
  fn test_encoding_index_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel = Pixel { r: 101, g: 102, b: 103, a: 104 };

    state.cache.insert(pixel);
    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest, vec![54]); // Op::Index(qoi_hash(pixel) = 54)
  }

  #[test]
  fn test_encoding_hash_collision_falls_through() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let cached = Pixel { r: 101, g: 102, b: 103, a: 104 };
    // +64 on red keeps the hash: 64 * 3 = 192 = 3 * 64.
    let pixel = Pixel { r: 165, g: 102, b: 103, a: 104 };

    assert_eq!(qoi_hash(&cached), qoi_hash(&pixel));

    state.cache.insert(cached);
    state.prev_pixel = cached;
    encode_pixel(&mut state, pixel, &mut dest).expect("Failed to encode pixel");

    // dr = 64 is out of every diff range, alpha is unchanged.
    assert_eq!(dest, vec![0xfe, 165, 102, 103]);
    assert_eq!(state.cache.lookup(&pixel), Some(54));
    assert_eq!(state.cache.lookup(&cached), None);
  }

  #[test]
  fn test_encoding_diff_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel_a = Pixel { r: 100, g: 100, b: 100, a: 255 };
    let pixel_b = Pixel { r: 101, g: 101, b: 101, a: 255 };
    let pixel_c = Pixel { r: 99, g: 99, b: 99, a: 255 };

    state.prev_pixel = pixel_a;
    encode_pixel(&mut state, pixel_b, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest, vec![0x40 | 3 << 4 | 3 << 2 | 3]); // (101 - 100) + 2 = 3 = Op::Diff(3, 3, 3)

    state.prev_pixel = pixel_b;
    encode_pixel(&mut state, pixel_c, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest[1], 0x40); // (99 - 101) + 2 = 0 = Op::Diff(0, 0, 0)
  }

  #[test]
  fn test_encoding_out_of_diff_range() {
    let mut dest = Vec::new();
    let mut state = State::new();

    state.prev_pixel = Pixel { r: 100, g: 100, b: 100, a: 255 };
    encode_pixel(&mut state, Pixel { r: 102, g: 100, b: 100, a: 255 }, &mut dest)
      .expect("Failed to encode pixel");

    // dr = +2 needs the two byte luma op.
    assert_eq!(dest, vec![0x80 | 32, 10 << 4 | 8]);
  }

  #[test]
  fn test_encoding_luma_op() {
    let mut dest = Vec::new();
    let mut state = State::new();
    let pixel_a = Pixel { r: 100, g: 100, b: 100, a: 255 };
    let pixel_b = Pixel { r: 100, g: 108, b: 100, a: 255 };
    let pixel_c = Pixel { r: 99, g: 100, b: 99, a: 255 };

    state.prev_pixel = pixel_a;
    encode_pixel(&mut state, pixel_b, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest, vec![0x80 | 40, 0]); // Op::Luma(40, 0, 0)

    state.prev_pixel = pixel_b;
    encode_pixel(&mut state, pixel_c, &mut dest).expect("Failed to encode pixel");
    assert_eq!(dest[2..], [0x80 | 24, 15 << 4 | 15]); // Op::Luma(24, 15, 15)
  }

  #[test]
  fn test_encoding_buffer_size_mismatch() {
    let meta = ImageMeta { width: 2, height: 2, channels: Channels::Rgba, colorspace: Colorspace::Srgb };

    assert_eq!(
      encode(&[0; 15], &meta),
      Err(Error::BufferSizeMismatch { expected: 16, actual: 15 })
    );
    assert_eq!(
      encode(&[0; 17], &meta),
      Err(Error::BufferSizeMismatch { expected: 16, actual: 17 })
    );
  }
}

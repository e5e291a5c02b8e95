use std::fmt;
use std::io;

use crate::error::Error;

pub const QOI_BYTES_END: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const QOI_BYTES_MAGIC: &[u8; 4] = b"qoif";
pub const QOI_MAX_RUN: u8 = 62;
pub const QOI_HEADER_LEN: usize = 14;

/// Metadata describing an Image. This is the content of a QOI file's 14 byte
/// header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageMeta {
  /// The number of color channels the image's pixels contain, see
  /// [Channels]. Color channels are assumed to not be pre-multiplied with the
  /// alpha channel ("un-premultiplied alpha").
  pub channels: Channels,
  /// The image's colorspace, see [Colorspace].
  pub colorspace: Colorspace,
  /// The image's height.
  pub height: u32,
  /// The image's width.
  pub width: u32,
}

impl ImageMeta {
  /// Returns the total number of pixels that make up the image.
  pub fn num_pixels(&self) -> u64 {
    self.width as u64 * self.height as u64
  }

  /// Returns the size in bytes of the image's tightly packed, row-major pixel
  /// data, or `Error::InvalidDimensions` if that size isn't addressable on
  /// this platform.
  pub fn buffer_len(&self) -> Result<usize, Error> {
    self
      .num_pixels()
      .checked_mul(self.channels.count() as u64)
      .and_then(|len| usize::try_from(len).ok())
      .ok_or(Error::InvalidDimensions { width: self.width, height: self.height })
  }
}

/// The number of bytes each pixel occupies in a decoded pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
  Rgb = 3,
  Rgba = 4,
}

impl Channels {
  pub fn count(self) -> usize {
    self as usize
  }
}

/// `3` maps to `Channels::Rgb`, and `4` maps to `Channels::Rgba`. All other
/// `u8` values are unsupported.
impl TryFrom<u8> for Channels {
  type Error = Error;

  fn try_from(byte: u8) -> Result<Self, Self::Error> {
    match byte {
      3 => Ok(Channels::Rgb),
      4 => Ok(Channels::Rgba),
      _ => Err(Error::UnsupportedChannelCount(byte)),
    }
  }
}

impl From<Channels> for u8 {
  fn from(channels: Channels) -> Self {
    channels as u8
  }
}

/// The colorspace byte of a QOI header. It is purely informative and doesn't
/// change how pixels are encoded, so values other than the two defined ones
/// are carried through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Colorspace {
  /// sRGB with linear alpha, `0`.
  Srgb,
  /// All channels linear, `1`.
  Linear,
  /// Any other byte.
  Other(u8),
}

impl From<u8> for Colorspace {
  fn from(byte: u8) -> Self {
    match byte {
      0 => Colorspace::Srgb,
      1 => Colorspace::Linear,
      other => Colorspace::Other(other),
    }
  }
}

impl From<Colorspace> for u8 {
  fn from(colorspace: Colorspace) -> Self {
    match colorspace {
      Colorspace::Srgb => 0,
      Colorspace::Linear => 1,
      Colorspace::Other(byte) => byte,
    }
  }
}

impl fmt::Display for ImageMeta {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}x{} {:?} ({:?})",
      self.width, self.height, self.channels, self.colorspace
    )
  }
}

/// Reads a QOI header from `reader`, consuming exactly `QOI_HEADER_LEN`
/// bytes.
///
/// Fails with `Error::InvalidMagic` if the stream doesn't begin with `qoif`,
/// and with `Error::UnsupportedChannelCount` if the channel byte isn't 3 or
/// 4. The colorspace byte is not validated.
pub fn read_header<R: io::Read>(mut reader: R) -> Result<ImageMeta, Error> {
  let mut header_buf = [0; QOI_HEADER_LEN];
  reader.read_exact(&mut header_buf)?;

  let magic = [header_buf[0], header_buf[1], header_buf[2], header_buf[3]];

  if &magic != QOI_BYTES_MAGIC {
    return Err(Error::InvalidMagic(magic));
  }

  let meta = ImageMeta {
    width: be_u32([header_buf[4], header_buf[5], header_buf[6], header_buf[7]]),
    height: be_u32([header_buf[8], header_buf[9], header_buf[10], header_buf[11]]),
    channels: Channels::try_from(header_buf[12])?,
    colorspace: Colorspace::from(header_buf[13]),
  };

  log::debug!("read QOI header: {}", meta);

  Ok(meta)
}

/// Writes `meta` as a QOI header to `writer`: the magic bytes, width and
/// height as big-endian 32-bit integers, then the channel and colorspace
/// bytes.
pub fn write_header<W: io::Write>(meta: &ImageMeta, mut writer: W) -> Result<(), Error> {
  let mut header_buf = [0; QOI_HEADER_LEN];

  header_buf[..4].copy_from_slice(QOI_BYTES_MAGIC);
  header_buf[4..8].copy_from_slice(&u32_be(meta.width));
  header_buf[8..12].copy_from_slice(&u32_be(meta.height));
  header_buf[12] = meta.channels.into();
  header_buf[13] = meta.colorspace.into();

  writer.write_all(&header_buf)?;

  log::debug!("wrote QOI header: {}", meta);

  Ok(())
}

// Most significant byte first, independent of the host's byte order.
fn be_u32(bytes: [u8; 4]) -> u32 {
  (bytes[0] as u32) << 24 | (bytes[1] as u32) << 16 | (bytes[2] as u32) << 8 | bytes[3] as u32
}

fn u32_be(value: u32) -> [u8; 4] {
  [(value >> 24) as u8, (value >> 16) as u8, (value >> 8) as u8, value as u8]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_reading_image_header() {
    let mut header = Vec::new();

    header.extend_from_slice(QOI_BYTES_MAGIC);
    header.extend_from_slice(&0x0102_0304u32.to_be_bytes());
    header.extend_from_slice(&0x0000_0100u32.to_be_bytes());
    header.extend_from_slice(&[4, 0]);

    assert_eq!(
      read_header(header.as_slice()),
      Ok(ImageMeta {
        width: 0x0102_0304,
        height: 256,
        channels: Channels::Rgba,
        colorspace: Colorspace::Srgb,
      })
    );
  }

  #[test]
  fn test_reading_invalid_magic() {
    let mut header = Vec::new();

    header.extend_from_slice(&[b'q', b'q', b'q', b'q']);
    header.extend_from_slice(&0u32.to_be_bytes());
    header.extend_from_slice(&0u32.to_be_bytes());
    header.extend_from_slice(&[4, 0]);

    assert_eq!(read_header(header.as_slice()), Err(Error::InvalidMagic(*b"qqqq")));
  }

  #[test]
  fn test_reading_unsupported_channels() {
    let mut header = Vec::new();

    header.extend_from_slice(QOI_BYTES_MAGIC);
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&1u32.to_be_bytes());
    header.extend_from_slice(&[5, 0]);

    assert_eq!(read_header(header.as_slice()), Err(Error::UnsupportedChannelCount(5)));
  }

  #[test]
  fn test_reading_truncated_header() {
    assert_eq!(read_header(&b"qoif\0\0"[..]), Err(Error::UnexpectedEof));
  }

  #[test]
  fn test_writing_image_header() {
    let mut dest = Vec::new();
    let meta = ImageMeta {
      width: 0xdead_beef,
      height: 3,
      channels: Channels::Rgb,
      colorspace: Colorspace::Linear,
    };

    write_header(&meta, &mut dest).expect("Failed to write header");

    assert_eq!(
      dest,
      vec![b'q', b'o', b'i', b'f', 0xde, 0xad, 0xbe, 0xef, 0, 0, 0, 3, 3, 1]
    );
  }

  #[test]
  fn test_header_round_trip() {
    let metas = [
      ImageMeta { width: 0, height: 0, channels: Channels::Rgb, colorspace: Colorspace::Srgb },
      ImageMeta { width: 1, height: u32::MAX, channels: Channels::Rgba, colorspace: Colorspace::Linear },
      ImageMeta { width: 640, height: 480, channels: Channels::Rgba, colorspace: Colorspace::Other(7) },
    ];

    for meta in metas {
      let mut dest = Vec::new();
      write_header(&meta, &mut dest).expect("Failed to write header");

      assert_eq!(dest.len(), QOI_HEADER_LEN);
      assert_eq!(read_header(dest.as_slice()), Ok(meta));
    }
  }

  #[test]
  fn test_colorspace_is_passed_through() {
    for byte in 0..=u8::MAX {
      assert_eq!(u8::from(Colorspace::from(byte)), byte);
    }
  }

  #[test]
  fn test_buffer_len() {
    let meta = ImageMeta { width: 3, height: 2, channels: Channels::Rgb, colorspace: Colorspace::Srgb };
    assert_eq!(meta.buffer_len(), Ok(18));

    let huge = ImageMeta { width: u32::MAX, height: u32::MAX, channels: Channels::Rgba, ..meta };
    assert_eq!(
      huge.buffer_len(),
      Err(Error::InvalidDimensions { width: u32::MAX, height: u32::MAX })
    );
  }
}

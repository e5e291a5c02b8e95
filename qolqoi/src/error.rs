use std::io;

/// An enumeration of all error values this crate may produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The first four bytes of the stream were not the `qoif` signature.
  #[error("invalid magic bytes {0:?}, expected `qoif`")]
  InvalidMagic([u8; 4]),
  /// The header declared a channel count other than 3 (RGB) or 4 (RGBA).
  #[error("unsupported channel count {0}, expected 3 for RGB or 4 for RGBA")]
  UnsupportedChannelCount(u8),
  /// The image's pixel buffer would not fit into addressable memory.
  #[error("image dimensions {width}x{height} are too large")]
  InvalidDimensions { width: u32, height: u32 },
  /// A pixel buffer handed to the encoder did not match the size described
  /// by its `ImageMeta`.
  #[error("pixel buffer holds {actual} bytes, but the image requires {expected}")]
  BufferSizeMismatch { expected: usize, actual: usize },
  /// Unexpectedly reached the end of an image source before decoding or
  /// encoding was completed.
  #[error("unexpectedly reached end of file before decoding or encoding was completed")]
  UnexpectedEof,
  /// Any other `std::io::Error` that occurs during decoding or encoding.
  /// Typically these arise from problems with reading an image source or
  /// writing to an image destination.
  #[error(transparent)]
  IoError(io::Error),
}

// Truncation is reported as `UnexpectedEof` no matter which layer notices
// it first, `read_exact` or the op-code reader.
impl From<io::Error> for Error {
  fn from(io_err: io::Error) -> Self {
    match io_err.kind() {
      io::ErrorKind::UnexpectedEof => Error::UnexpectedEof,
      _ => Error::IoError(io_err),
    }
  }
}

#[cfg(test)]
impl PartialEq for Error {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Error::InvalidMagic(a), Error::InvalidMagic(b)) => a == b,
      (Error::UnsupportedChannelCount(a), Error::UnsupportedChannelCount(b)) => a == b,
      (
        Error::InvalidDimensions { width: wa, height: ha },
        Error::InvalidDimensions { width: wb, height: hb },
      ) => wa == wb && ha == hb,
      (
        Error::BufferSizeMismatch { expected: ea, actual: aa },
        Error::BufferSizeMismatch { expected: eb, actual: ab },
      ) => ea == eb && aa == ab,
      (Error::UnexpectedEof, Error::UnexpectedEof) => true,
      (Error::IoError(a), Error::IoError(b)) => a.kind() == b.kind(),
      _ => false,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_eof_io_error_becomes_unexpected_eof() {
    let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "short read");
    assert_eq!(Error::from(io_err), Error::UnexpectedEof);
  }

  #[test]
  fn test_other_io_errors_are_wrapped() {
    let err = Error::from(io::Error::new(io::ErrorKind::PermissionDenied, "nope"));

    assert!(matches!(err, Error::IoError(_)));
    assert_eq!(err.to_string(), "nope");
  }

  #[test]
  fn test_error_messages() {
    assert_eq!(
      Error::InvalidMagic(*b"qoix").to_string(),
      "invalid magic bytes [113, 111, 105, 120], expected `qoif`"
    );
    assert_eq!(
      Error::UnsupportedChannelCount(5).to_string(),
      "unsupported channel count 5, expected 3 for RGB or 4 for RGBA"
    );
  }
}

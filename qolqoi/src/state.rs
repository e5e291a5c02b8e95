use crate::cache::PixelCache;
use crate::pixel::Pixel;

// A collection of stateful properties maintained during decoding or encoding
// of a single image. A fresh `State` is created for every call.
pub struct State {
  // A cache of previously seen pixels, indexed by their hash value % 64.
  pub cache: PixelCache,
  // The previously decoded/encoded pixel.
  pub prev_pixel: Pixel,
  // Decoding: repeats of `prev_pixel` still owed by the last `Op::Run`.
  // Encoding: repeats of `prev_pixel` seen but not yet written.
  pub run_count: u8,
}

impl State {
  pub fn new() -> Self {
    Self {
      cache: PixelCache::new(),
      prev_pixel: Pixel::default(),
      run_count: 0,
    }
  }
}

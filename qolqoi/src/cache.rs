use crate::pixel::Pixel;

pub const QOI_CACHE_LEN: usize = 64;

// QOI color hash function, not implemented via the `Hash` trait to keep
// things simple. Always a valid slot index.
pub fn qoi_hash(pixel: &Pixel) -> usize {
  let r = pixel.r as usize;
  let g = pixel.g as usize;
  let b = pixel.b as usize;
  let a = pixel.a as usize;

  (r * 3 + g * 5 + b * 7 + a * 11) % QOI_CACHE_LEN
}

// A direct-mapped table of previously seen pixels, indexed by `qoi_hash`.
// Colliding pixels overwrite each other; nothing is ever chained.
pub struct PixelCache {
  slots: [Option<Pixel>; QOI_CACHE_LEN],
}

impl PixelCache {
  pub fn new() -> Self {
    Self { slots: [None; QOI_CACHE_LEN] }
  }

  // Inserts the given pixel into the cache. Overwrites any pixel that was
  // previously cached at the computed index.
  pub fn insert(&mut self, pixel: Pixel) {
    self.slots[qoi_hash(&pixel)] = Some(pixel);
  }

  // Returns the pixel cached at `index`. Slots that were never written read
  // as `Pixel::ZERO`, matching encoders that keep a zero-filled table.
  pub fn get(&self, index: u8) -> Pixel {
    self.slots[index as usize % QOI_CACHE_LEN].unwrap_or(Pixel::ZERO)
  }

  // Returns the pixel's slot index if that slot currently holds exactly this
  // pixel. An empty slot or a different pixel with the same hash is a miss.
  pub fn lookup(&self, pixel: &Pixel) -> Option<u8> {
    let index = qoi_hash(pixel);

    match self.slots[index] {
      Some(cached) if cached == *pixel => Some(index as u8),
      _ => None,
    }
  }
}

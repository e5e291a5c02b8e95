use std::path::Path;

use anyhow::Result;
use image::{ColorType, ImageFormat};
use qolqoi::{Channels, Colorspace, ImageMeta};

// Reads any PNG as a flat, row-major RGBA8 buffer. Palette, grayscale and
// 16-bit images are expanded or truncated to 8 bits per channel by `image`.
pub fn read_png(path: &Path) -> Result<(ImageMeta, Vec<u8>)> {
  let image = image::open(path)?.into_rgba8();

  let meta = ImageMeta {
    width: image.width(),
    height: image.height(),
    channels: Channels::Rgba,
    colorspace: Colorspace::Srgb,
  };

  log::debug!("read {} from {}", meta, path.display());

  Ok((meta, image.into_raw()))
}

// Writes a flat, row-major RGB8 or RGBA8 buffer as a PNG.
pub fn write_png(path: &Path, meta: &ImageMeta, pixels: &[u8]) -> Result<()> {
  let color_type = match meta.channels {
    Channels::Rgb => ColorType::Rgb8,
    Channels::Rgba => ColorType::Rgba8,
  };

  image::save_buffer_with_format(
    path,
    pixels,
    meta.width,
    meta.height,
    color_type,
    ImageFormat::Png,
  )?;

  log::debug!("wrote {} to {}", meta, path.display());

  Ok(())
}

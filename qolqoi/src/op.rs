use std::io;

use crate::error::Error;

// An enumeration of each possible QOI encoding "chunk", or Op.
#[derive(Debug, PartialEq)]
pub enum Op {
  // `QOI_OP_DIFF`, contains the red, green, and blue color difference from the
  // previous pixel with a bias of +2.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 1 |  dr |  dg |  db  |
  //
  Diff(u8, u8, u8),

  // `QOI_OP_INDEX`, index into the state's pixel cache.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 0 0 |      index       |
  //
  Index(u8),

  // `QOI_OP_LUMA`, contains the red, green, and blue luma difference from the
  // previous pixel. The green difference has a bias of +32, the red-green, and
  // blue-green difference has a bias of +8.
  //
  // | 7 6   5  4  3  2  1  0 | 7  6  5  4   3  2  1  0 |
  // |------------------------|-------------------------|
  // | 1 0 |       dg         |   dr - dg  |   db - dg  |
  //
  Luma(u8, u8, u8),

  // `QOI_OP_RGB`, contains the red, green, and blue values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|
  // | 1  1  1  1  1  1  1  0 |   r  |   g  |   b  |
  //
  Rgb(u8, u8, u8),

  // `QOI_OP_RGBA`, contains the red, green, blue, and alpha values of a pixel.
  //
  // | 7  6  5  4  3  2  1  0 | 7..0 | 7..0 | 7..0 | 7..0 |
  // |------------------------|------|------|------|------|
  // | 1  1  1  1  1  1  1  1 |   r  |   g  |   b  |   a  |
  //
  Rgba(u8, u8, u8, u8),

  // `QOI_OP_RUN`, contains the length of the run, 1..=62. Stored on the wire
  // with a bias of -1; 63 and 64 would collide with the RGB and RGBA tags.
  //
  // | 7 6   5  4  3  2  1  0 |
  // |------------------------|
  // | 1 1 |      run         |
  Run(u8),
}

impl Op {
  const MASK_DIFF: u8 = 0x03;
  const MASK_INDEX: u8 = 0x3f;
  const MASK_LUMA_1: u8 = 0x3f;
  const MASK_LUMA_2: u8 = 0x0f;
  const MASK_RUN: u8 = 0x3f;
  const MASK_TAG: u8 = 0xc0;

  const TAG_DIFF: u8 = 0x40;
  const TAG_INDEX: u8 = 0x00;
  const TAG_LUMA: u8 = 0x80;
  const TAG_RGB: u8 = 0xfe;
  const TAG_RGBA: u8 = 0xff;
  const TAG_RUN: u8 = 0xc0;

  // Encodes the `Op` and writes it as bytes into the given writer.
  pub fn write_to<W: io::Write>(self, mut writer: W) -> Result<(), io::Error> {
    match self {
      Op::Diff(diff_r, diff_g, diff_b) => {
        writer.write_all(&[Op::TAG_DIFF | (diff_r << 4) | (diff_g << 2) | diff_b])?;
      }
      Op::Index(index) => {
        writer.write_all(&[Op::TAG_INDEX | (index & Op::MASK_INDEX)])?;
      }
      Op::Luma(luma_g, luma_rg, luma_bg) => {
        writer.write_all(&[Op::TAG_LUMA | luma_g, (luma_rg << 4) | luma_bg])?;
      }
      Op::Rgb(r, g, b) => {
        writer.write_all(&[Op::TAG_RGB, r, g, b])?;
      }
      Op::Rgba(r, g, b, a) => {
        writer.write_all(&[Op::TAG_RGBA, r, g, b, a])?;
      }
      Op::Run(run_length) => {
        writer.write_all(&[Op::TAG_RUN | (run_length - 1)])?;
      }
    }

    Ok(())
  }

  // Attempts to decode an `Op` from the given bytes, consuming the tag byte
  // and exactly as many operand bytes as the tag requires.
  pub fn read_from<I>(bytes: &mut I) -> Result<Self, Error>
  where
    I: Iterator<Item = Result<u8, io::Error>>,
  {
    let byte = next_byte(bytes)?;

    // The two full-byte tags share their leading bits with `QOI_OP_RUN`, so
    // they must be matched first.
    if byte == Op::TAG_RGB {
      return Ok(Op::Rgb(next_byte(bytes)?, next_byte(bytes)?, next_byte(bytes)?));
    }

    if byte == Op::TAG_RGBA {
      return Ok(Op::Rgba(
        next_byte(bytes)?,
        next_byte(bytes)?,
        next_byte(bytes)?,
        next_byte(bytes)?,
      ));
    }

    let op = match byte & Op::MASK_TAG {
      Op::TAG_INDEX => Op::Index(byte & Op::MASK_INDEX),
      Op::TAG_DIFF => Op::Diff(
        byte >> 4 & Op::MASK_DIFF,
        byte >> 2 & Op::MASK_DIFF,
        byte & Op::MASK_DIFF,
      ),
      Op::TAG_LUMA => {
        let second = next_byte(bytes)?;

        Op::Luma(
          byte & Op::MASK_LUMA_1,
          second >> 4 & Op::MASK_LUMA_2,
          second & Op::MASK_LUMA_2,
        )
      }
      _ => Op::Run((byte & Op::MASK_RUN) + 1),
    };

    Ok(op)
  }
}

fn next_byte<I>(bytes: &mut I) -> Result<u8, Error>
where
  I: Iterator<Item = Result<u8, io::Error>>,
{
  Ok(bytes.next().ok_or(Error::UnexpectedEof)??)
}

//! Converts images between PNG and QOI.
//!
//! # Usage
//!
//! ```sh
//! qoiconv input.png output.qoi
//! ```
//!
//! Decodes `input.png` and encodes it as an sRGB, four channel QOI image.
//!
//! ```sh
//! qoiconv input.qoi output.png
//! ```
//!
//! Decodes `input.qoi` and writes it as an RGB or RGBA PNG, depending on the
//! QOI image's channel count.
//!
//! The conversion direction is picked from the file name extensions alone,
//! so both must be present and spelled in lower case. Set `RUST_LOG=debug`
//! for details about the decoded and encoded images.

use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};

mod png;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Conversion {
  PngToQoi,
  QoiToPng,
}

impl Conversion {
  // Picks the conversion from the input and output file names, matching the
  // trailing extensions exactly.
  fn from_file_names(input: &str, output: &str) -> Option<Self> {
    if input.ends_with(".qoi") && output.ends_with(".png") {
      Some(Conversion::QoiToPng)
    } else if input.ends_with(".png") && output.ends_with(".qoi") {
      Some(Conversion::PngToQoi)
    } else {
      None
    }
  }

  fn run(self, input: &Path, output: &Path) -> Result<()> {
    match self {
      Conversion::QoiToPng => {
        log::info!("decoding QOI image {}", input.display());

        let (meta, pixels) = qolqoi::read_file(input)
          .with_context(|| format!("failed to decode qoi file {}", input.display()))?;

        log::info!("writing {} PNG image {}", meta, output.display());

        png::write_png(output, &meta, &pixels)
          .with_context(|| format!("failed to encode png file {}", output.display()))?;
      }
      Conversion::PngToQoi => {
        log::info!("decoding PNG image {}", input.display());

        let (meta, pixels) = png::read_png(input)
          .with_context(|| format!("failed to decode png file {}", input.display()))?;

        log::info!("writing {} QOI image {}", meta, output.display());

        qolqoi::write_file(output, &meta, &pixels)
          .with_context(|| format!("failed to encode qoi file {}", output.display()))?;
      }
    }

    Ok(())
  }
}

fn print_usage(program: &str) {
  eprintln!(
    "usage: {} [input png file or qoi file] [output qoi file or png file]\n\
     NOTE: Files must have proper filename extensions!",
    program
  );
}

fn main() -> ExitCode {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  let args: Vec<String> = env::args().collect();
  let program = args.first().map(String::as_str).unwrap_or("qoiconv");

  let (input, output) = match args.as_slice() {
    [_, input, output] => (input, output),
    _ => {
      print_usage(program);
      return ExitCode::FAILURE;
    }
  };

  let conversion = match Conversion::from_file_names(input, output) {
    Some(conversion) => conversion,
    None => {
      print_usage(program);
      return ExitCode::FAILURE;
    }
  };

  match conversion.run(Path::new(input), Path::new(output)) {
    Ok(()) => {
      println!("successfully converted file {} to {}", input, output);
      ExitCode::SUCCESS
    }
    Err(e) => {
      eprintln!("error: {:#}", e);
      ExitCode::FAILURE
    }
  }
}

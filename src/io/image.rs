use crate::core::framebuffer::FrameBuffer;
use crate::error::Result;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ExtendedColorType, ImageEncoder};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Saves the framebuffer's color plane.
///
/// A `.ppm` path produces a plain-text `P3` file; any other extension is encoded
/// in the format it names.
pub fn save_framebuffer<P: AsRef<Path>>(framebuffer: &FrameBuffer, path: P) -> Result<()> {
    let path = path.as_ref();
    let bytes = framebuffer.to_rgb8();
    let (width, height) = (framebuffer.width as u32, framebuffer.height as u32);

    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let writer = BufWriter::new(File::create(path)?);
        PnmEncoder::new(writer)
            .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Ascii))
            .write_image(&bytes, width, height, ExtendedColorType::Rgb8)?;
    } else {
        image::save_buffer(path, &bytes, width, height, ExtendedColorType::Rgb8)?;
    }

    info!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}

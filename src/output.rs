//! Saving rendered frames.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::debug;

use crate::colors::Color;
use crate::error::OutputError;
use crate::texture::Texture2D;

/// Write the top mip level of `surface` as an 8-bit RGB PNG. Alpha is dropped.
pub fn save_png<P: AsRef<Path>>(surface: &Texture2D<Color>, path: P) -> Result<(), OutputError> {
    if surface.num_pixels() == 0 {
        return Err(OutputError::EmptySurface);
    }

    let image = RgbImage::from_fn(surface.width(), surface.height(), |x, y| {
        let c = surface.get(x as i32, y as i32);
        Rgb([c.r(), c.g(), c.b()])
    });

    let path = path.as_ref();
    image.save_with_format(path, ImageFormat::Png)?;
    debug!(path = %path.display(), width = surface.width(), height = surface.height(), "saved png");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trips_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");

        let mut surface = Texture2D::filled(3, 2, Color::BLACK);
        surface.set(0, 0, Color::RED);
        surface.set(2, 1, Color::from_rgba(10, 20, 30, 0));

        save_png(&surface, &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(loaded.get_pixel(1, 0), &Rgb([0, 0, 0]));
        assert_eq!(loaded.get_pixel(2, 1), &Rgb([10, 20, 30]));
    }

    #[test]
    fn empty_surface_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let surface: Texture2D<Color> = Texture2D::new(0, 0);
        let err = save_png(&surface, dir.path().join("empty.png")).unwrap_err();
        assert!(matches!(err, OutputError::EmptySurface));
    }

    #[test]
    fn missing_directory_is_an_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let surface = Texture2D::filled(1, 1, Color::WHITE);
        let err = save_png(&surface, dir.path().join("missing").join("x.png")).unwrap_err();
        assert!(matches!(err, OutputError::Encode(_)));
    }
}

//! Image-derived material tints.
//!
//! The castle stone can take its colour from a photo or texture: the image's
//! mean colour becomes the stone appearance. Loading never blocks the scene.
//! Any failure is logged and the built-in appearance is used instead.
//!
//! ```ignore
//! let stone = textures::appearance_or(Some(Path::new("assets/stone.png")), style.stone);
//! ```
//!
//! # Supported Formats
//!
//! - PNG
//! - JPEG

use glam::Vec3;
use image::RgbaImage;
use log::{info, warn};
use std::path::Path;

use crate::error::TextureError;
use crate::part::Appearance;

/// Mean RGB of the opaque-weighted pixels, 0.0-1.0.
///
/// Fully transparent pixels do not contribute.
pub fn mean_color(image: &RgbaImage) -> Result<Vec3, TextureError> {
    let mut sum = Vec3::ZERO;
    let mut weight = 0.0f32;

    for pixel in image.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        sum += Vec3::new(r as f32, g as f32, b as f32) / 255.0 * alpha;
        weight += alpha;
    }

    if weight <= 0.0 {
        return Err(TextureError::Empty);
    }
    Ok(sum / weight)
}

/// Load an image file and return its mean colour.
pub fn load_tint(path: impl AsRef<Path>) -> Result<Vec3, TextureError> {
    let image = image::open(path.as_ref())?.to_rgba8();
    mean_color(&image)
}

/// `fallback` recoloured by the image at `path`, or `fallback` unchanged
/// when there is no path or the image cannot be used.
pub fn appearance_or(path: Option<&Path>, fallback: Appearance) -> Appearance {
    let Some(path) = path else {
        return fallback;
    };

    match load_tint(path) {
        Ok(color) => {
            info!("stone tint {:.3?} from {}", color.to_array(), path.display());
            Appearance { color, ..fallback }
        }
        Err(e) => {
            warn!("using default stone colour, {}: {}", path.display(), e);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_mean_color() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 0, 255, 255]));

        let color = mean_color(&image).unwrap();
        assert!((color - Vec3::new(0.5, 0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_transparent_pixels_ignored() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(1, 0, Rgba([255, 255, 255, 0]));

        let color = mean_color(&image).unwrap();
        assert!((color - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_empty_image_is_error() {
        assert!(matches!(mean_color(&RgbaImage::new(0, 0)), Err(TextureError::Empty)));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let fallback = Appearance::from_hex(0xc8c8c8, 0.8, 0.1);
        let path = Path::new("definitely/not/here.png");
        assert!(load_tint(path).is_err());
        assert_eq!(appearance_or(Some(path), fallback), fallback);
        assert_eq!(appearance_or(None, fallback), fallback);
    }
}

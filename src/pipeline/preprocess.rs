use image::DynamicImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use thiserror::Error;

use crate::model::StyleTensor;

pub const STYLE_HEIGHT: u32 = 64;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("style image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("target height must be positive")]
    ZeroHeight,
}

/// Width that keeps the aspect ratio at `target_height`, truncated, at least 1.
pub fn target_width(width: u32, height: u32, target_height: u32) -> u32 {
    let scaled = u64::from(target_height) * u64::from(width) / u64::from(height);
    scaled.clamp(1, u64::from(u32::MAX)) as u32
}

/// Resizes to `target_height` with Lanczos3 and maps RGB to `[1, 3, H, W]` in `[-1, 1]`.
pub fn preprocess_style(
    img: &DynamicImage,
    target_height: u32,
) -> Result<StyleTensor, PreprocessError> {
    if target_height == 0 {
        return Err(PreprocessError::ZeroHeight);
    }
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(PreprocessError::EmptyImage { width, height });
    }

    let new_width = target_width(width, height, target_height);
    let resized = imageops::resize(&rgb, new_width, target_height, FilterType::Lanczos3);

    let mut tensor = Array4::<f32>::zeros((1, 3, target_height as usize, new_width as usize));
    for (x, y, px) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = normalize(px[c]);
        }
    }
    Ok(tensor)
}

// mean 0.5, std 0.5 on the [0, 1] scale
fn normalize(v: u8) -> f32 {
    (v as f32 / 255.0 - 0.5) / 0.5
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/preprocess.rs"]
mod tests;

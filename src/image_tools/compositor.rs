use crate::errors::AppError;
use crate::AppResult;
use image::imageops;
use image::{DynamicImage, RgbImage, Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Stacks page images top to bottom on a white canvas, centering narrower pages.
///
/// The canvas is as wide as the widest page and exactly as tall as all pages together,
/// so nothing is cropped or scaled. Transparent pixels are flattened onto the white
/// background, the result carries no alpha channel.
pub fn compose_vertically(images: &[DynamicImage]) -> AppResult<RgbImage> {
    if images.is_empty() {
        return Err(AppError::EmptyInput {
            message: "no page images to combine".to_string(),
        });
    }

    let max_width = images.iter().map(|image| image.width()).max().unwrap_or(0);
    let total_height = images.iter().map(|image| image.height()).sum::<u32>();

    let mut canvas = RgbaImage::from_pixel(max_width, total_height, BACKGROUND);
    let mut y_offset = 0;
    for image in images {
        let x_offset = (max_width - image.width()) / 2;
        imageops::overlay(
            &mut canvas,
            &image.to_rgba8(),
            i64::from(x_offset),
            i64::from(y_offset),
        );
        y_offset += image.height();
    }
    Ok(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

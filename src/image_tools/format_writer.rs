use crate::errors::AppError;
use crate::AppResult;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Tiff,
    Bmp,
    Gif,
}

impl OutputFormat {
    pub const SUPPORTED: [OutputFormat; 5] = [
        OutputFormat::Png,
        OutputFormat::Jpeg,
        OutputFormat::Tiff,
        OutputFormat::Bmp,
        OutputFormat::Gif,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Tiff => "tiff",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Tiff => ImageFormat::Tiff,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Gif => ImageFormat::Gif,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PNG" => Ok(OutputFormat::Png),
            "JPEG" | "JPG" => Ok(OutputFormat::Jpeg),
            "TIFF" => Ok(OutputFormat::Tiff),
            "BMP" => Ok(OutputFormat::Bmp),
            "GIF" => Ok(OutputFormat::Gif),
            _ => Err(AppError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Png => write!(f, "PNG"),
            OutputFormat::Jpeg => write!(f, "JPEG"),
            OutputFormat::Tiff => write!(f, "TIFF"),
            OutputFormat::Bmp => write!(f, "BMP"),
            OutputFormat::Gif => write!(f, "GIF"),
        }
    }
}

/// Writes `image` to `path`, parsing `format` first so an unknown format never creates a file.
pub fn write_image(image: &DynamicImage, path: &Path, format: &str) -> AppResult<()> {
    let output_format: OutputFormat = format.parse()?;
    write_image_with_format(image, path, output_format)
}

pub fn write_image_with_format(
    image: &DynamicImage,
    path: &Path,
    output_format: OutputFormat,
) -> AppResult<()> {
    match output_format {
        OutputFormat::Jpeg => {
            let image = to_jpeg_compatible(image);
            let mut writer = BufWriter::new(File::create(path)?);
            let encoder = JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
            image.write_with_encoder(encoder)?;
            writer.flush()?;
            Ok(())
        }
        OutputFormat::Gif => {
            let image = to_gif_compatible(image);
            Ok(image.save_with_format(path, ImageFormat::Gif)?)
        }
        other => Ok(image.save_with_format(path, other.image_format())?),
    }
}

// JPEG carries 8-bit gray or RGB only.
fn to_jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

// The GIF encoder takes 8-bit RGB or RGBA only.
fn to_gif_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, GrayImage, ImageBuffer, Luma, Rgb, Rgba, RgbaImage};

    fn transparent_image() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 8, Rgba([10, 200, 30, 64])))
    }

    #[test]
    fn test_parse_formats() -> AppResult<()> {
        assert_eq!("png".parse::<OutputFormat>()?, OutputFormat::Png);
        assert_eq!("JPG".parse::<OutputFormat>()?, OutputFormat::Jpeg);
        assert_eq!("Tiff".parse::<OutputFormat>()?, OutputFormat::Tiff);
        assert!(matches!(
            "webp".parse::<OutputFormat>(),
            Err(AppError::UnsupportedFormat { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_jpeg_drops_alpha() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("format_writer_tests_jpeg")?;
        let path = temp_dir.path().join("page.jpeg");
        write_image(&transparent_image(), &path, "JPEG")?;

        let decoded = image::open(&path)?;
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.dimensions(), (16, 8));
        Ok(())
    }

    #[test]
    fn test_lossless_formats_keep_image() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("format_writer_tests_lossless")?;
        for format in [OutputFormat::Png, OutputFormat::Tiff, OutputFormat::Bmp] {
            let path = temp_dir.path().join(format!("page.{}", format.extension()));
            write_image_with_format(&transparent_image(), &path, format)?;
            let decoded = image::open(&path)?;
            assert_eq!(decoded.dimensions(), (16, 8), "{}", format);
        }
        let png = image::open(temp_dir.path().join("page.png"))?;
        assert!(png.color().has_alpha());
        Ok(())
    }

    #[test]
    fn test_gif_accepts_any_color_type() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("format_writer_tests_gif")?;
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 8, Luma([90])));
        let deep = DynamicImage::ImageRgb16(ImageBuffer::from_pixel(16, 8, Rgb([300u16; 3])));
        let images = [
            ("rgba8", transparent_image()),
            ("luma8", gray),
            ("rgb16", deep),
        ];
        for (name, source) in images {
            let path = temp_dir.path().join(format!("{}.gif", name));
            write_image(&source, &path, "GIF")?;
            let decoded = image::open(&path)?;
            assert_eq!(decoded.dimensions(), (16, 8), "{}", name);
        }
        Ok(())
    }

    #[test]
    fn test_unsupported_format_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("format_writer_tests_unsupported")?;
        let path = temp_dir.path().join("page.webp");
        let result = write_image(&transparent_image(), &path, "WEBP");
        assert!(matches!(result, Err(AppError::UnsupportedFormat { .. })));
        assert!(!path.exists());
        Ok(())
    }
}

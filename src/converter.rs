use crate::errors::AppError;
use crate::file_converters::pdf::{PdfDocumentPages, PdfInfo, PdfToImage};
use crate::image_tools::{compose_vertically, write_image_with_format, OutputFormat};
use crate::page_range::PageRange;
use crate::reporter::AppReporter;
use crate::AppResult;
use image::DynamicImage;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "converted_images";
pub const DEFAULT_DPI: u32 = 200;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub format: OutputFormat,
    pub dpi: u32,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
    pub single_image: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            format: OutputFormat::Png,
            dpi: DEFAULT_DPI,
            first_page: None,
            last_page: None,
            single_image: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConversionResult {
    Pages(Vec<PathBuf>),
    Combined(PathBuf),
}

impl ConversionResult {
    pub fn files_written(&self) -> usize {
        match self {
            ConversionResult::Pages(files) => files.len(),
            ConversionResult::Combined(_) => 1,
        }
    }
}

pub fn page_file_name(stem: &str, page_number: usize, format: OutputFormat) -> String {
    format!("{}_page_{:03}.{}", stem, page_number, format.extension())
}

pub fn combined_file_name(stem: &str, format: OutputFormat) -> String {
    format!("{}_combined.{}", stem, format.extension())
}

fn open_pdf<'a>(
    pdf_to_image: &'a dyn PdfToImage,
    pdf_path: &Path,
) -> AppResult<Box<dyn PdfDocumentPages + 'a>> {
    if !pdf_path.is_file() {
        return Err(AppError::FileNotFound {
            path: pdf_path.to_string_lossy().to_string(),
        });
    }
    pdf_to_image.open_document(pdf_path)
}

pub fn read_pdf_info(pdf_to_image: &dyn PdfToImage, pdf_path: &Path) -> AppResult<PdfInfo> {
    open_pdf(pdf_to_image, pdf_path)?.info()
}

/// Converts single PDF files into images inside one output directory.
pub struct PdfConverter<'a> {
    pdf_to_image: &'a dyn PdfToImage,
    output_dir: PathBuf,
    reporter: &'a AppReporter,
}

impl<'a> PdfConverter<'a> {
    pub fn new(
        pdf_to_image: &'a dyn PdfToImage,
        output_dir: &Path,
        reporter: &'a AppReporter,
    ) -> AppResult<Self> {
        std::fs::create_dir_all(output_dir)?;
        Ok(PdfConverter {
            pdf_to_image,
            output_dir: output_dir.to_path_buf(),
            reporter,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn supported_formats() -> &'static [OutputFormat] {
        &OutputFormat::SUPPORTED
    }

    pub fn convert(
        &self,
        pdf_path: &Path,
        options: &ConvertOptions,
    ) -> AppResult<ConversionResult> {
        let result = if options.single_image {
            ConversionResult::Combined(self.convert_pdf_to_single_image(pdf_path, options)?)
        } else {
            ConversionResult::Pages(self.convert_pdf_to_images(pdf_path, options)?)
        };
        Ok(result)
    }

    /// Writes every selected page as `{stem}_page_{NNN}.{ext}`.
    ///
    /// Pages already written stay on disk when a later page fails.
    pub fn convert_pdf_to_images(
        &self,
        pdf_path: &Path,
        options: &ConvertOptions,
    ) -> AppResult<Vec<PathBuf>> {
        let stem = Self::file_stem(pdf_path)?;
        let document = self.open(pdf_path)?;
        let range =
            PageRange::resolve(options.first_page, options.last_page, document.page_count());
        self.reporter.debug(format!(
            "{}: {} pages, converting {:?}",
            pdf_path.to_string_lossy(),
            document.page_count(),
            range
        ));

        let mut saved_files = Vec::with_capacity(range.len());
        for (page_index, page_number) in range.indices().zip(range.page_numbers()) {
            let image = document.render_page(page_index, options.dpi)?;
            let output_path = self
                .output_dir
                .join(page_file_name(&stem, page_number, options.format));
            write_image_with_format(&image, &output_path, options.format)?;
            self.reporter.debug(format!(
                "Page {} saved: {}",
                page_number,
                output_path.to_string_lossy()
            ));
            saved_files.push(output_path);
        }
        Ok(saved_files)
    }

    /// Stacks every selected page into `{stem}_combined.{ext}`.
    pub fn convert_pdf_to_single_image(
        &self,
        pdf_path: &Path,
        options: &ConvertOptions,
    ) -> AppResult<PathBuf> {
        let stem = Self::file_stem(pdf_path)?;
        let pages = {
            let document = self.open(pdf_path)?;
            let range =
                PageRange::resolve(options.first_page, options.last_page, document.page_count());
            range
                .indices()
                .map(|page_index| document.render_page(page_index, options.dpi))
                .collect::<AppResult<Vec<DynamicImage>>>()?
        };
        if pages.is_empty() {
            return Err(AppError::EmptyInput {
                message: format!("no pages selected in {}", pdf_path.to_string_lossy()),
            });
        }

        let combined = DynamicImage::ImageRgb8(compose_vertically(&pages)?);
        drop(pages);
        let output_path = self
            .output_dir
            .join(combined_file_name(&stem, options.format));
        write_image_with_format(&combined, &output_path, options.format)?;
        self.reporter.debug(format!(
            "Combined image saved: {} ({}x{})",
            output_path.to_string_lossy(),
            combined.width(),
            combined.height()
        ));
        Ok(output_path)
    }

    /// Removes the regular files directly inside the output directory.
    pub fn cleanup_output_dir(&self) -> AppResult<usize> {
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.output_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        self.reporter.debug(format!(
            "Removed {} files from {}",
            removed,
            self.output_dir.to_string_lossy()
        ));
        Ok(removed)
    }

    fn open(&self, pdf_path: &Path) -> AppResult<Box<dyn PdfDocumentPages + 'a>> {
        open_pdf(self.pdf_to_image, pdf_path)
    }

    fn file_stem(pdf_path: &Path) -> AppResult<String> {
        pdf_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .ok_or_else(|| AppError::FileNotFound {
                path: pdf_path.to_string_lossy().to_string(),
            })
    }
}

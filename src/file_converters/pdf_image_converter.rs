use crate::errors::AppError;
use crate::file_converters::pdf::{PdfDocumentPages, PdfInfo, PdfToImage};
use crate::AppResult;
use pdfium_render::prelude::*;
use std::path::Path;

/// PDF engines work in points, 72 per inch.
const PDF_POINTS_PER_INCH: f32 = 72.0;

fn dpi_scale_factor(dpi: u32) -> f32 {
    dpi as f32 / PDF_POINTS_PER_INCH
}

/// Embedded PDFium engine, bound to a library next to the executable or on the system.
pub struct PdfImageConverter {
    pdfium: Pdfium,
}

impl PdfImageConverter {
    pub fn new() -> AppResult<Self> {
        let executable = std::env::current_exe()?;
        let current_dir = executable
            .parent()
            .ok_or(AppError::SystemError {
                message: "No parent directory for executable".to_string(),
            })?
            .to_path_buf();

        let bindings = Pdfium::bind_to_library(
            // Attempt to bind to a pdfium library in the current working directory...
            Pdfium::pdfium_platform_library_name_at_path("./"),
        )
        .or_else(|_| Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./lib")))
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                &current_dir
                    .parent()
                    .map(|p| p.join("lib"))
                    .unwrap_or(current_dir.clone()),
            ))
        })
        .or_else(|_| {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&current_dir))
        })
        .or_else(|_| Pdfium::bind_to_system_library())?;

        let pdfium = Pdfium::new(bindings);
        Ok(Self { pdfium })
    }
}

impl PdfToImage for PdfImageConverter {
    fn open_document<'a>(&'a self, pdf_path: &Path) -> AppResult<Box<dyn PdfDocumentPages + 'a>> {
        let document = self.pdfium.load_pdf_from_file(pdf_path, None)?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl PdfiumDocument<'_> {
    fn metadata_value(&self, tag_type: PdfDocumentMetadataTagType) -> Option<String> {
        self.document
            .metadata()
            .get(tag_type)
            .map(|tag| tag.value().trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl PdfDocumentPages for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn info(&self) -> AppResult<PdfInfo> {
        Ok(PdfInfo {
            page_count: self.page_count(),
            title: self.metadata_value(PdfDocumentMetadataTagType::Title),
            author: self.metadata_value(PdfDocumentMetadataTagType::Author),
            subject: self.metadata_value(PdfDocumentMetadataTagType::Subject),
            creator: self.metadata_value(PdfDocumentMetadataTagType::Creator),
        })
    }

    fn render_page(&self, page_index: usize, dpi: u32) -> AppResult<image::DynamicImage> {
        let index = PdfPageIndex::try_from(page_index).map_err(|_| AppError::ConversionError {
            message: format!("Page index {} is out of range for PDFium", page_index),
        })?;
        let page = self.document.pages().get(index)?;
        let scale = dpi_scale_factor(dpi);
        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page.render_with_config(&render_config)?;
        Ok(bitmap.as_image())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpi_scale_factor() {
        assert_eq!(dpi_scale_factor(72), 1.0);
        assert_eq!(dpi_scale_factor(144), 2.0);
        assert!((dpi_scale_factor(200) - 2.777_778).abs() < 1e-5);
    }

    #[test]
    #[cfg_attr(not(feature = "ci-pdfium"), ignore)]
    fn test_render_blank_page() -> AppResult<()> {
        let converter = PdfImageConverter::new()?;
        let mut document = converter.pdfium.create_new_pdf()?;
        document
            .pages_mut()
            .create_page_at_start(PdfPagePaperSize::a4())?;
        let temp_dir = tempfile::TempDir::with_prefix("pdfium_tests_render")?;
        let pdf_path = temp_dir.path().join("blank.pdf");
        document.save_to_file(&pdf_path)?;

        let opened = converter.open_document(&pdf_path)?;
        assert_eq!(opened.page_count(), 1);
        let at_72 = opened.render_page(0, 72)?;
        let at_144 = opened.render_page(0, 144)?;
        assert!(at_144.width() >= at_72.width() * 2 - 1);
        assert!(at_144.height() >= at_72.height() * 2 - 1);
        Ok(())
    }
}

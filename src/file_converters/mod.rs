use crate::file_converters::pdf::PdfToImage;
use crate::AppResult;
use std::fmt::Display;

pub mod pdf;

#[cfg(feature = "pdf-render")]
mod pdf_image_converter;

mod pdftoppm_converter;

#[cfg(test)]
pub mod fake_converter;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererBackend {
    /// Embedded PDFium engine
    Pdfium,
    /// poppler-utils binaries (pdfinfo, pdftoppm)
    Poppler,
}

impl Default for RendererBackend {
    fn default() -> Self {
        if cfg!(feature = "pdf-render") {
            RendererBackend::Pdfium
        } else {
            RendererBackend::Poppler
        }
    }
}

impl Display for RendererBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererBackend::Pdfium => write!(f, "pdfium"),
            RendererBackend::Poppler => write!(f, "poppler"),
        }
    }
}

pub struct FileConverters;

impl FileConverters {
    pub fn new_pdf_converter(backend: RendererBackend) -> AppResult<Box<dyn PdfToImage + 'static>> {
        match backend {
            RendererBackend::Pdfium => {
                #[cfg(feature = "pdf-render")]
                {
                    Ok(Box::new(pdf_image_converter::PdfImageConverter::new()?))
                }
                #[cfg(not(feature = "pdf-render"))]
                {
                    Err(crate::errors::AppError::SystemError {
                        message: "PDFium support is not compiled in".to_string(),
                    })
                }
            }
            RendererBackend::Poppler => Ok(Box::new(pdftoppm_converter::PdftoppmConverter::new()?)),
        }
    }
}

use crate::errors::AppError;
use crate::file_converters::pdf::{PdfDocumentPages, PdfInfo, PdfToImage};
use crate::AppResult;
use image::{DynamicImage, Rgba, RgbaImage};
use std::cell::Cell;
use std::path::Path;

/// Test double that reads a `pages:N` file instead of a PDF.
///
/// Page `i` renders as a `(10 + 2 * i) x 5` image scaled by `dpi / 72`, so tests can
/// tell pages apart by width. Anything else in the file is treated as a corrupt PDF.
#[derive(Default)]
pub struct FakePdfConverter {
    pub opened: Cell<usize>,
    pub released: std::rc::Rc<Cell<usize>>,
}

impl PdfToImage for FakePdfConverter {
    fn open_document<'a>(&'a self, pdf_path: &Path) -> AppResult<Box<dyn PdfDocumentPages + 'a>> {
        let content = std::fs::read_to_string(pdf_path)?;
        let page_count = content
            .trim()
            .strip_prefix("pages:")
            .and_then(|pages| pages.parse::<usize>().ok())
            .ok_or_else(|| AppError::ConversionError {
                message: format!("{} is not a valid PDF", pdf_path.to_string_lossy()),
            })?;
        self.opened.set(self.opened.get() + 1);
        Ok(Box::new(FakeDocument {
            page_count,
            released: self.released.clone(),
        }))
    }
}

struct FakeDocument {
    page_count: usize,
    released: std::rc::Rc<Cell<usize>>,
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

impl PdfDocumentPages for FakeDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn info(&self) -> AppResult<PdfInfo> {
        Ok(PdfInfo {
            page_count: self.page_count,
            title: Some("Fake document".to_string()),
            ..PdfInfo::default()
        })
    }

    fn render_page(&self, page_index: usize, dpi: u32) -> AppResult<DynamicImage> {
        let scale = dpi / 72;
        let width = (10 + 2 * page_index as u32) * scale;
        let page = RgbaImage::from_pixel(width, 5 * scale, Rgba([0, 0, 0, 255]));
        Ok(DynamicImage::ImageRgba8(page))
    }
}

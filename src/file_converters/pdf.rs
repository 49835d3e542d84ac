use crate::AppResult;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdfInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

/// An opened PDF. Dropping it releases whatever the backend holds for the document.
pub trait PdfDocumentPages {
    fn page_count(&self) -> usize;

    fn info(&self) -> AppResult<PdfInfo>;

    /// Renders the page at the 0-based `page_index`.
    fn render_page(&self, page_index: usize, dpi: u32) -> AppResult<image::DynamicImage>;
}

pub trait PdfToImage {
    fn open_document<'a>(&'a self, pdf_path: &Path) -> AppResult<Box<dyn PdfDocumentPages + 'a>>;
}

use indicatif::style::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("PDF file not found: {path}")]
    FileNotFound { path: String },
    #[error("Unsupported image format: {format}. Supported formats: PNG, JPEG, TIFF, BMP, GIF")]
    UnsupportedFormat { format: String },
    #[error("Nothing to combine: {message}")]
    EmptyInput { message: String },
    #[error("PDF conversion error: {message}")]
    ConversionError { message: String },
    #[error("'{path}' is not a valid directory")]
    InvalidInputDirectory { path: String },
    #[error("Input/output error: {0}")]
    InputOutputError(#[from] std::io::Error),
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[error("Filename filter error: {0}")]
    GlobError(#[from] globset::Error),
    #[cfg(feature = "pdf-render")]
    #[error("PDF conversion error: {0}")]
    PdfiumError(#[from] pdfium_render::prelude::PdfiumError),
    #[error("Image conversion error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("Conversion task failed: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),
    #[error("Interrupted by user")]
    Interrupted,
    #[error("System error: {message}")]
    SystemError { message: String },
}

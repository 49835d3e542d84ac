use crate::errors::AppError;
use crate::file_converters::pdf::{PdfDocumentPages, PdfInfo, PdfToImage};
use crate::AppResult;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const PDFINFO_BIN: &str = "pdfinfo";
const PDFTOPPM_BIN: &str = "pdftoppm";

/// Renders through the poppler-utils binaries (`pdfinfo` and `pdftoppm`) found on `PATH`.
pub struct PdftoppmConverter;

impl PdftoppmConverter {
    pub fn new() -> AppResult<Self> {
        for binary in [PDFINFO_BIN, PDFTOPPM_BIN] {
            // Older poppler releases exit with a non-zero status on `-v`, spawning is enough.
            Command::new(binary)
                .arg("-v")
                .output()
                .map_err(|e| AppError::SystemError {
                    message: format!(
                        "{} is not available, is poppler-utils installed? {}",
                        binary, e
                    ),
                })?;
        }
        Ok(Self)
    }

    fn open(&self, pdf_path: &Path) -> AppResult<PdftoppmDocument> {
        let output = run_tool(
            Command::new(PDFINFO_BIN)
                .arg("-enc")
                .arg("UTF-8")
                .arg(pdf_path),
        )?;
        let info = parse_pdfinfo(&String::from_utf8_lossy(&output.stdout))?;
        Ok(PdftoppmDocument {
            pdf_path: pdf_path.to_path_buf(),
            info,
            work_dir: TempDir::with_prefix("pdf2images")?,
        })
    }
}

impl PdfToImage for PdftoppmConverter {
    fn open_document<'a>(&'a self, pdf_path: &Path) -> AppResult<Box<dyn PdfDocumentPages + 'a>> {
        Ok(Box::new(self.open(pdf_path)?))
    }
}

struct PdftoppmDocument {
    pdf_path: PathBuf,
    info: PdfInfo,
    // Removed with everything rendered into it when the document is dropped.
    work_dir: TempDir,
}

impl PdfDocumentPages for PdftoppmDocument {
    fn page_count(&self) -> usize {
        self.info.page_count
    }

    fn info(&self) -> AppResult<PdfInfo> {
        Ok(self.info.clone())
    }

    fn render_page(&self, page_index: usize, dpi: u32) -> AppResult<image::DynamicImage> {
        if page_index >= self.info.page_count {
            return Err(AppError::ConversionError {
                message: format!(
                    "Page index {} is out of range, document has {} pages",
                    page_index, self.info.page_count
                ),
            });
        }
        let page_number = (page_index + 1).to_string();
        let output_prefix = self.work_dir.path().join(format!("page-{}", page_number));
        run_tool(
            Command::new(PDFTOPPM_BIN)
                .arg("-png")
                .arg("-singlefile")
                .arg("-r")
                .arg(dpi.to_string())
                .arg("-f")
                .arg(&page_number)
                .arg("-l")
                .arg(&page_number)
                .arg(&self.pdf_path)
                .arg(&output_prefix),
        )?;

        let rendered_path = output_prefix.with_extension("png");
        let image = image::open(&rendered_path)?;
        std::fs::remove_file(&rendered_path)?;
        Ok(image)
    }
}

fn run_tool(command: &mut Command) -> AppResult<Output> {
    let program = command.get_program().to_string_lossy().to_string();
    let output = command.output().map_err(|e| AppError::ConversionError {
        message: format!("Failed to run {}: {}", program, e),
    })?;
    if !output.status.success() {
        return Err(AppError::ConversionError {
            message: format!(
                "{} failed with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(output)
}

fn parse_pdfinfo(output: &str) -> AppResult<PdfInfo> {
    let mut info = PdfInfo::default();
    let mut pages_found = false;
    for line in output.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        let text = (!value.is_empty()).then(|| value.to_string());
        match key.trim() {
            "Pages" => {
                info.page_count = value.parse().map_err(|_| AppError::ConversionError {
                    message: format!("Unexpected page count in pdfinfo output: {}", value),
                })?;
                pages_found = true;
            }
            "Title" => info.title = text,
            "Author" => info.author = text,
            "Subject" => info.subject = text,
            "Creator" => info.creator = text,
            _ => {}
        }
    }
    if !pages_found {
        return Err(AppError::ConversionError {
            message: "pdfinfo output has no page count".to_string(),
        });
    }
    Ok(info)
}

use crate::converter::{ConvertOptions, PdfConverter};
use crate::errors::AppError;
use crate::file_converters::{FileConverters, RendererBackend};
use crate::file_tools::{FileMatcher, PdfFileRef, PdfFinder};
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{Style, Term};
use indicatif::*;
use rvstruct::ValueStruct;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct ConvertCommandResult {
    pub files_found: usize,
    pub files_skipped: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub failures: Vec<FailedFile>,
}

impl ConvertCommandResult {
    /// Non-zero as soon as a single file failed, an empty batch still succeeds.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.failure_count > 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedFile {
    pub file_name: String,
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ConvertCommandOptions {
    pub output_dir: PathBuf,
    pub recursive: bool,
    pub file_matcher: FileMatcher,
    pub backend: RendererBackend,
    pub clean_output: bool,
    pub convert_options: ConvertOptions,
}

pub async fn command_convert(
    term: &Term,
    input_dir: &str,
    options: ConvertCommandOptions,
) -> AppResult<ConvertCommandResult> {
    let bold_style = Style::new().bold();
    term.write_line(
        format!(
            "Converting PDF files from {} to {}.\nFormat: {}. DPI: {}. Backend: {}.{}",
            bold_style.clone().white().apply_to(input_dir),
            bold_style
                .clone()
                .yellow()
                .apply_to(options.output_dir.to_string_lossy()),
            bold_style.apply_to(options.convert_options.format),
            bold_style.apply_to(options.convert_options.dpi),
            bold_style.apply_to(options.backend),
            if options.convert_options.single_image {
                " All pages combined into a single image."
            } else {
                ""
            }
        )
        .as_str(),
    )?;

    let term_reporter = AppReporter::from(term);
    let finder = PdfFinder::new(input_dir, options.recursive, &term_reporter)
        .await?;
    let list_files_result = finder.list_files(&options.file_matcher).await?;
    let source_files = list_files_result.files;
    if source_files.is_empty() {
        term_reporter.report(format!(
            "{}: no PDF files found in '{}'",
            Style::new().yellow().apply_to("Warning"),
            input_dir
        ))?;
        return Ok(ConvertCommandResult {
            files_skipped: list_files_result.skipped,
            ..ConvertCommandResult::default()
        });
    }

    let files_total_size: u64 = source_files
        .iter()
        .map(|file| file.file_size.unwrap_or(0))
        .sum();
    term_reporter.report(format!(
        "Found {} PDF files. Total size: {}",
        bold_style.apply_to(source_files.len()),
        bold_style.apply_to(HumanBytes(files_total_size))
    ))?;

    let bar = ProgressBar::new(source_files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("◉>◯"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    let bar_reporter = AppReporter::from(&bar);

    let files_found = source_files.len();
    let files_skipped = list_files_result.skipped;
    let blocking_bar = bar.clone();
    let conversion = tokio::task::spawn_blocking(move || -> AppResult<ConvertCommandResult> {
        let pdf_to_image = FileConverters::new_pdf_converter(options.backend)?;
        let converter =
            PdfConverter::new(pdf_to_image.as_ref(), &options.output_dir, &bar_reporter)?;
        if options.clean_output {
            clean_output_dir(&converter, &bar_reporter)?;
        }
        Ok(convert_all(
            &converter,
            &source_files,
            &options.convert_options,
            &bar_reporter,
            &blocking_bar,
        ))
    });

    let mut result = tokio::select! {
        joined = conversion => joined??,
        _ = tokio::signal::ctrl_c() => {
            bar.abandon();
            return Err(AppError::Interrupted);
        }
    };
    bar.finish_and_clear();
    result.files_found = files_found;
    result.files_skipped = files_skipped;
    Ok(result)
}

fn clean_output_dir(converter: &PdfConverter, reporter: &AppReporter) -> AppResult<()> {
    match converter.cleanup_output_dir() {
        Ok(removed) => reporter.report(format!(
            "Cleaned output directory {}: {} files removed",
            converter.output_dir().to_string_lossy(),
            removed
        )),
        Err(err) => reporter.report_error(format!(
            "{} {}: {}",
            Style::new().bold().red().apply_to("Failed to clean"),
            converter.output_dir().to_string_lossy(),
            err
        )),
    }
}

/// Converts `files` one after another in path order.
///
/// A failing file is recorded and the batch moves on to the next one.
pub fn convert_all(
    converter: &PdfConverter,
    files: &[PdfFileRef],
    options: &ConvertOptions,
    reporter: &AppReporter,
    bar: &ProgressBar,
) -> ConvertCommandResult {
    let bold_style = Style::new().bold().white();
    let mut sorted_files: Vec<&PdfFileRef> = files.iter().collect();
    sorted_files.sort_by(|left, right| left.file_path.cmp(&right.file_path));

    let mut result = ConvertCommandResult {
        files_found: files.len(),
        ..ConvertCommandResult::default()
    };
    let files_total = sorted_files.len();
    for (index, file_ref) in sorted_files.into_iter().enumerate() {
        let file_name = display_name(file_ref);
        let _ = reporter.report(format!(
            "[{}/{}] Converting {}",
            index + 1,
            files_total,
            bold_style.apply_to(file_ref.relative_path.value())
        ));
        match converter.convert(&file_ref.file_path, options) {
            Ok(conversion_result) => {
                result.success_count += 1;
                let _ = reporter.report(format!(
                    "{} {}: {} image files written",
                    Style::new().green().apply_to("✓"),
                    file_name,
                    conversion_result.files_written()
                ));
            }
            Err(err) => {
                result.failure_count += 1;
                let _ = reporter.report_error(format!(
                    "{} {}: {}",
                    Style::new().red().apply_to("✗"),
                    file_name,
                    err
                ));
                result.failures.push(FailedFile {
                    file_name,
                    error: err.to_string(),
                });
            }
        }
        bar.inc(1);
    }
    result
}

fn display_name(file_ref: &PdfFileRef) -> String {
    Path::new(file_ref.relative_path.value())
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file_ref.relative_path.filename())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_converters::fake_converter::FakePdfConverter;
    use crate::file_tools::RelativeFilePath;

    fn file_ref(dir: &Path, name: &str) -> PdfFileRef {
        PdfFileRef {
            relative_path: RelativeFilePath(name.to_string()),
            file_path: dir.join(name),
            file_size: None,
        }
    }

    #[test]
    fn test_convert_all_continues_after_failures() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("convert_command_tests_batch")?;
        let input_dir = temp_dir.path();
        std::fs::write(input_dir.join("b_valid.pdf"), "pages:2")?;
        std::fs::write(input_dir.join("c_corrupt.pdf"), "not a pdf")?;

        let fake = FakePdfConverter::default();
        let reporter = AppReporter::silent();
        let converter = PdfConverter::new(&fake, &input_dir.join("out"), &reporter)?;
        let files = vec![
            file_ref(input_dir, "c_corrupt.pdf"),
            file_ref(input_dir, "a_missing.pdf"),
            file_ref(input_dir, "b_valid.pdf"),
        ];

        let bar = ProgressBar::hidden();
        let result = convert_all(
            &converter,
            &files,
            &ConvertOptions::default(),
            &reporter,
            &bar,
        );

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 2);
        let failed_names: Vec<&str> = result
            .failures
            .iter()
            .map(|failed| failed.file_name.as_str())
            .collect();
        assert_eq!(failed_names, vec!["a_missing.pdf", "c_corrupt.pdf"]);
        assert!(result.failures[0].error.contains("a_missing.pdf"));
        assert_eq!(bar.position(), 3);
        assert!(input_dir.join("out").join("b_valid_page_001.png").is_file());
        assert!(input_dir.join("out").join("b_valid_page_002.png").is_file());
        assert_eq!(fake.released.get(), 1);
        Ok(())
    }

    #[test]
    fn test_convert_all_single_image() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("convert_command_tests_single")?;
        let input_dir = temp_dir.path();
        std::fs::write(input_dir.join("one.pdf"), "pages:3")?;
        std::fs::write(input_dir.join("empty.pdf"), "pages:0")?;

        let fake = FakePdfConverter::default();
        let reporter = AppReporter::silent();
        let converter = PdfConverter::new(&fake, &input_dir.join("out"), &reporter)?;
        let options = ConvertOptions {
            single_image: true,
            ..ConvertOptions::default()
        };
        let files = vec![
            file_ref(input_dir, "one.pdf"),
            file_ref(input_dir, "empty.pdf"),
        ];
        let bar = ProgressBar::hidden();
        let result = convert_all(&converter, &files, &options, &reporter, &bar);

        assert_eq!(result.success_count, 1);
        assert_eq!(result.failure_count, 1);
        assert_eq!(result.failures[0].file_name, "empty.pdf");
        assert!(input_dir.join("out").join("one_combined.png").is_file());
        assert_eq!(fake.opened.get(), 2);
        assert_eq!(fake.released.get(), 2);
        Ok(())
    }

    fn command_options(output_dir: &Path) -> AppResult<ConvertCommandOptions> {
        Ok(ConvertCommandOptions {
            output_dir: output_dir.to_path_buf(),
            recursive: false,
            file_matcher: FileMatcher::from_filter(None)?,
            backend: RendererBackend::Poppler,
            clean_output: false,
            convert_options: ConvertOptions::default(),
        })
    }

    #[test]
    fn test_exit_code() {
        let all_converted = ConvertCommandResult {
            files_found: 2,
            success_count: 2,
            ..ConvertCommandResult::default()
        };
        assert_eq!(all_converted.exit_code(), 0);

        let one_failed = ConvertCommandResult {
            files_found: 2,
            success_count: 1,
            failure_count: 1,
            ..ConvertCommandResult::default()
        };
        assert_eq!(one_failed.exit_code(), 1);
        assert_eq!(ConvertCommandResult::default().exit_code(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_dir_succeeds() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("convert_command_tests_empty")?;
        std::fs::write(temp_dir.path().join("notes.txt"), "not a pdf")?;
        let input_dir = temp_dir.path().to_string_lossy().to_string();
        let options = command_options(&temp_dir.path().join("out"))?;

        let term = Term::stdout();
        let result = command_convert(&term, &input_dir, options).await?;
        assert_eq!(result.files_found, 0);
        assert_eq!(result.files_skipped, 1);
        assert_eq!(result.exit_code(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_input_dir_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = tempfile::TempDir::with_prefix("convert_command_tests_missing")?;
        let missing_dir = temp_dir.path().join("missing");
        let input_dir = missing_dir.to_string_lossy().to_string();
        let options = command_options(&temp_dir.path().join("out"))?;

        let term = Term::stdout();
        let result = command_convert(&term, &input_dir, options).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidInputDirectory { .. })
        ));
        Ok(())
    }
}

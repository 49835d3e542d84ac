use crate::converter::{read_pdf_info, PdfConverter};
use crate::file_converters::pdf::PdfInfo;
use crate::file_converters::{FileConverters, RendererBackend};
use crate::file_tools::{FileMatcher, PdfFileRef, PdfFinder};
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{pad_str, Alignment, Style, Term};
use indicatif::{HumanBytes, TermLike};
use rvstruct::ValueStruct;

#[derive(Debug, Clone)]
pub struct InfoCommandOptions {
    pub recursive: bool,
    pub file_matcher: FileMatcher,
    pub backend: RendererBackend,
}

pub async fn command_info(
    term: &Term,
    input_dir: &str,
    options: InfoCommandOptions,
) -> AppResult<()> {
    let bold_style = Style::new().bold();
    let highlighted = bold_style.clone().white();
    let dimmed_style = Style::new().dim();
    term.write_line(format!("Listing PDF files in {}.", bold_style.apply_to(input_dir)).as_str())?;
    let app_reporter = AppReporter::from(term);
    let finder = PdfFinder::new(input_dir, options.recursive, &app_reporter)
        .await?;
    let list_files_result = finder.list_files(&options.file_matcher).await?;
    let files = list_files_result.files;
    let total_size: u64 = files.iter().map(|f| f.file_size.unwrap_or(0)).sum();

    let backend = options.backend;
    let infos: Vec<(PdfFileRef, AppResult<PdfInfo>)> = tokio::task::spawn_blocking(move || {
        let pdf_to_image = FileConverters::new_pdf_converter(backend)?;
        Ok::<_, crate::errors::AppError>(
            files
                .into_iter()
                .map(|file| {
                    let info = read_pdf_info(pdf_to_image.as_ref(), &file.file_path);
                    (file, info)
                })
                .collect(),
        )
    })
    .await??;

    if !infos.is_empty() {
        let max_filename_width = std::cmp::min(
            infos
                .iter()
                .map(|(f, _)| f.relative_path.value().len())
                .max()
                .unwrap_or(25)
                + 5,
            (term.width() / 2) as usize,
        );
        term.write_line(
            format!(
                "\n  {} {} {} {}",
                dimmed_style.apply_to(pad_str(
                    "Filename",
                    max_filename_width,
                    Alignment::Left,
                    None
                )),
                dimmed_style.apply_to(pad_str("Pages", 8, Alignment::Left, None)),
                dimmed_style.apply_to(pad_str("Size", 12, Alignment::Left, None)),
                dimmed_style.apply_to("Title / Author")
            )
            .as_str(),
        )?;

        for (file, info) in &infos {
            let (pages, details) = match info {
                Ok(info) => (
                    highlighted.apply_to(info.page_count.to_string()),
                    describe(info),
                ),
                Err(err) => (
                    Style::new().red().apply_to("error".to_string()),
                    Style::new().red().apply_to(err.to_string()).to_string(),
                ),
            };
            term.write_line(
                format!(
                    "- {} {} {} {}",
                    highlighted.apply_to(pad_str(
                        file.relative_path.value(),
                        max_filename_width,
                        Alignment::Left,
                        Some("...")
                    )),
                    pad_str(&pages.to_string(), 8, Alignment::Left, None),
                    pad_str(
                        format!("{}", HumanBytes(file.file_size.unwrap_or(0))).as_str(),
                        12,
                        Alignment::Left,
                        None
                    ),
                    details
                )
                .as_str(),
            )?;
        }
        term.write_line("")?;
    }

    let total_pages: usize = infos
        .iter()
        .filter_map(|(_, info)| info.as_ref().ok())
        .map(|info| info.page_count)
        .sum();
    term.write_line(
        format!(
            "{} PDF files found, {} pages. Total size: {}",
            highlighted.apply_to(infos.len()),
            highlighted.apply_to(total_pages),
            highlighted.apply_to(HumanBytes(total_size))
        )
        .as_str(),
    )?;
    term.write_line(
        format!(
            "{} files skipped/filtered out.",
            dimmed_style.apply_to(list_files_result.skipped.to_string())
        )
        .as_str(),
    )?;
    term.write_line(
        format!(
            "Supported output formats: {}",
            PdfConverter::supported_formats()
                .iter()
                .map(|format| format.to_string())
                .collect::<Vec<String>>()
                .join(", ")
        )
        .as_str(),
    )?;
    Ok(())
}

fn describe(info: &PdfInfo) -> String {
    let parts: Vec<&str> = [&info.title, &info.author, &info.subject, &info.creator]
        .into_iter()
        .filter_map(|value| value.as_deref())
        .collect();
    parts.join(" / ")
}

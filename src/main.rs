use clap::Parser;
use console::{Style, Term};

use std::error::Error;
use std::path::Path;

mod args;
use crate::commands::*;
use crate::errors::AppError;
use args::*;

mod reporter;

mod errors;

mod commands;

mod converter;

mod file_converters;

mod file_tools;

mod image_tools;

mod logging;

mod page_range;

pub type AppResult<T> = Result<T, AppError>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let term = Term::stdout();
    let bold_style = Style::new().bold();

    term.write_line(
        format!(
            "{} v{}",
            bold_style.clone().green().apply_to("pdf2images"),
            bold_style.apply_to(env!("CARGO_PKG_VERSION"))
        )
        .as_str(),
    )?;

    let cli = CliArgs::parse();
    if let Err(err) = logging::init_logging(Path::new(logging::LOG_FILE_NAME), cli.verbose) {
        term.write_line(
            format!("{}: {}", Style::new().yellow().apply_to("Warning"), err).as_str(),
        )?;
    }

    let exit_code = match handle_args(cli, &term).await {
        Ok(exit_code) => exit_code,
        Err(AppError::Interrupted) => {
            tracing::warn!("Interrupted by user");
            term.write_line(
                format!(
                    "\n{}",
                    bold_style.clone().yellow().apply_to("Interrupted by user")
                )
                .as_str(),
            )?;
            1
        }
        Err(err) => {
            tracing::error!("{}", err);
            term.write_line(
                format!(
                    "{}: {}\nDetails: {:?}",
                    bold_style.clone().red().apply_to("Error"),
                    err,
                    err.source()
                )
                .as_str(),
            )?;
            1
        }
    };

    // Exiting here does not wait for a conversion that is still running after an interrupt.
    std::process::exit(exit_code)
}

async fn handle_args(cli: CliArgs, term: &Term) -> AppResult<i32> {
    let bold_style = Style::new().bold();

    if cli.info {
        let options: InfoCommandOptions = (&cli).try_into()?;
        command_info(term, &cli.input_dir, options).await?;
        return Ok(0);
    }

    let options: ConvertCommandOptions = (&cli).try_into()?;
    let convert_result = command_convert(term, &cli.input_dir, options).await?;
    tracing::info!(
        success = convert_result.success_count,
        failed = convert_result.failure_count,
        "Batch conversion finished"
    );
    term.write_line(
        format!(
            "{} -> {}\n{} files converted.\n{} files failed.\n{} files skipped.",
            cli.input_dir,
            cli.output_dir.to_string_lossy(),
            bold_style
                .clone()
                .green()
                .apply_to(convert_result.success_count),
            bold_style
                .clone()
                .red()
                .apply_to(convert_result.failure_count),
            Style::new().yellow().apply_to(convert_result.files_skipped)
        )
        .as_str(),
    )?;
    if !convert_result.failures.is_empty() {
        term.write_line("Failed files:")?;
        for failed in &convert_result.failures {
            term.write_line(
                format!(
                    "  - {}: {}",
                    bold_style.apply_to(&failed.file_name),
                    failed.error
                )
                .as_str(),
            )?;
        }
    }

    Ok(convert_result.exit_code())
}

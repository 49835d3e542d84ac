use crate::commands::{ConvertCommandOptions, InfoCommandOptions};
use crate::converter::{ConvertOptions, DEFAULT_DPI, DEFAULT_OUTPUT_DIR};
use crate::errors::AppError;
use crate::file_converters::RendererBackend;
use crate::file_tools::FileMatcher;
use crate::image_tools::OutputFormat;
use clap::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    #[arg(help = "Input directory with PDF files to convert")]
    pub input_dir: String,

    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_DIR,
        help = "Output directory for the images"
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 'f',
        long,
        default_value = "PNG",
        help = "Output image format: PNG, JPEG, TIFF, BMP or GIF"
    )]
    pub format: OutputFormat,

    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_DPI,
        value_parser = value_parser!(u32).range(1..),
        help = "Image resolution in dots per inch"
    )]
    pub dpi: u32,

    #[arg(short = 'r', long, help = "Search sub-directories recursively")]
    pub recursive: bool,

    #[arg(long, help = "First page to convert (1-based)")]
    pub first_page: Option<u32>,

    #[arg(long, help = "Last page to convert (inclusive)")]
    pub last_page: Option<u32>,

    #[arg(long, help = "Combine all pages of each PDF into a single image")]
    pub single_image: bool,

    #[arg(short = 'v', long, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(
        short = 'b',
        long,
        value_enum,
        default_value_t = RendererBackend::default(),
        help = "PDF rendering backend"
    )]
    pub backend: RendererBackend,

    #[arg(
        long,
        help = "Filter by name using glob patterns such as report_*.pdf (default is *.pdf)"
    )]
    pub filename_filter: Option<globset::Glob>,

    #[arg(long, help = "Remove files in the output directory before converting")]
    pub clean_output: bool,

    #[arg(
        long,
        help = "List PDF files with page count and metadata instead of converting"
    )]
    pub info: bool,
}

impl TryInto<ConvertCommandOptions> for &CliArgs {
    type Error = AppError;

    fn try_into(self) -> Result<ConvertCommandOptions, Self::Error> {
        Ok(ConvertCommandOptions {
            output_dir: self.output_dir.clone(),
            recursive: self.recursive,
            file_matcher: FileMatcher::from_filter(self.filename_filter.as_ref())?,
            backend: self.backend,
            clean_output: self.clean_output,
            convert_options: ConvertOptions {
                format: self.format,
                dpi: self.dpi,
                first_page: self.first_page,
                last_page: self.last_page,
                single_image: self.single_image,
            },
        })
    }
}

impl TryInto<InfoCommandOptions> for &CliArgs {
    type Error = AppError;

    fn try_into(self) -> Result<InfoCommandOptions, Self::Error> {
        Ok(InfoCommandOptions {
            recursive: self.recursive,
            file_matcher: FileMatcher::from_filter(self.filename_filter.as_ref())?,
            backend: self.backend,
        })
    }
}

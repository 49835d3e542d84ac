use crate::errors::AppError;
use crate::file_tools::{FileMatcher, FileMatcherResult};
use crate::reporter::AppReporter;
use crate::AppResult;
use rvstruct::ValueStruct;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, ValueStruct)]
pub struct RelativeFilePath(pub String);

impl RelativeFilePath {
    pub fn filename(&self) -> String {
        self.value()
            .split('/')
            .next_back()
            .map(|s| s.to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PdfFileRef {
    pub relative_path: RelativeFilePath,
    pub file_path: PathBuf,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ListFilesResult {
    pub files: Vec<PdfFileRef>,
    pub skipped: usize,
}

pub struct PdfFinder<'a> {
    root_path: PathBuf,
    recursive: bool,
    reporter: &'a AppReporter,
}

impl<'a> PdfFinder<'a> {
    pub async fn new(
        root_path: &str,
        recursive: bool,
        reporter: &'a AppReporter,
    ) -> AppResult<Self> {
        let root_path = PathBuf::from(root_path);
        let is_dir = tokio::fs::metadata(&root_path)
            .await
            .map(|metadata| metadata.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(AppError::InvalidInputDirectory {
                path: root_path.to_string_lossy().to_string(),
            });
        }
        Ok(PdfFinder {
            root_path,
            recursive,
            reporter,
        })
    }

    /// Lists matching files sorted by path, so batches always run in the same order.
    pub async fn list_files(&self, file_matcher: &FileMatcher) -> AppResult<ListFilesResult> {
        self.reporter.report(format!(
            "Listing files in dir: {}{}",
            self.root_path.to_string_lossy(),
            if self.recursive { " (recursive)" } else { "" }
        ))?;
        let mut result = self
            .list_files_recursive(self.root_path.clone(), file_matcher)
            .await?;
        result
            .files
            .sort_by(|left, right| left.file_path.cmp(&right.file_path));
        Ok(result)
    }

    #[async_recursion::async_recursion]
    async fn list_files_recursive(
        &self,
        dir_path: PathBuf,
        file_matcher: &FileMatcher,
    ) -> AppResult<ListFilesResult> {
        let mut entries = tokio::fs::read_dir(&dir_path).await?;
        let mut files = Vec::new();
        let mut skipped: usize = 0;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            if file_type.is_file() {
                let file_ref = PdfFileRef {
                    relative_path: self.relative_path(&entry.path()),
                    file_path: entry.path(),
                    file_size: Some(entry.metadata().await?.len()),
                };
                match file_matcher.matches(&file_ref) {
                    FileMatcherResult::Matched => files.push(file_ref),
                    FileMatcherResult::SkippedDueToName => skipped += 1,
                }
            } else if file_type.is_dir() && self.recursive {
                let sub_dir = entry.path();
                let dir_files = self.list_files_recursive(sub_dir, file_matcher).await?;
                skipped += dir_files.skipped;
                files.extend(dir_files.files);
            }
        }
        Ok(ListFilesResult { files, skipped })
    }

    fn relative_path(&self, path: &Path) -> RelativeFilePath {
        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);
        RelativeFilePath(
            relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy().to_string())
                .collect::<Vec<String>>()
                .join("/"),
        )
    }
}

use crate::file_tools::PdfFileRef;
use crate::AppResult;
use rvstruct::ValueStruct;

pub const DEFAULT_PDF_FILTER: &str = "*.pdf";

#[derive(Debug, Clone)]
pub struct FileMatcher {
    pub filename_matcher: globset::GlobMatcher,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileMatcherResult {
    Matched,
    SkippedDueToName,
}

impl FileMatcher {
    pub fn new(filename_matcher: globset::GlobMatcher) -> Self {
        FileMatcher { filename_matcher }
    }

    pub fn from_filter(filename_filter: Option<&globset::Glob>) -> AppResult<Self> {
        let glob = match filename_filter {
            Some(glob) => glob.clone(),
            None => globset::Glob::new(DEFAULT_PDF_FILTER)?,
        };
        Ok(FileMatcher::new(glob.compile_matcher()))
    }

    pub fn matches(&self, file_ref: &PdfFileRef) -> FileMatcherResult {
        if self
            .filename_matcher
            .is_match(file_ref.relative_path.value().as_str())
        {
            FileMatcherResult::Matched
        } else {
            FileMatcherResult::SkippedDueToName
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_tools::RelativeFilePath;
    use std::path::PathBuf;

    fn file_ref(relative_path: &str) -> PdfFileRef {
        PdfFileRef {
            relative_path: RelativeFilePath(relative_path.to_string()),
            file_path: PathBuf::from("/tmp").join(relative_path),
            file_size: Some(50),
        }
    }

    #[test]
    fn test_file_matcher() -> AppResult<()> {
        let file_matcher = FileMatcher::from_filter(None)?;

        assert_eq!(
            file_matcher.matches(&file_ref("report.pdf")),
            FileMatcherResult::Matched
        );
        assert_eq!(
            file_matcher.matches(&file_ref("nested/report.pdf")),
            FileMatcherResult::Matched
        );
        assert_eq!(
            file_matcher.matches(&file_ref("notes.txt")),
            FileMatcherResult::SkippedDueToName
        );

        let custom = globset::Glob::new("invoice_*.pdf")?;
        let file_matcher = FileMatcher::from_filter(Some(&custom))?;
        assert_eq!(
            file_matcher.matches(&file_ref("invoice_01.pdf")),
            FileMatcherResult::Matched
        );
        assert_eq!(
            file_matcher.matches(&file_ref("report.pdf")),
            FileMatcherResult::SkippedDueToName
        );
        Ok(())
    }
}

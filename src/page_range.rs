/// Half-open, 0-based span of pages selected for conversion.
///
/// Always satisfies `start <= end <= page_count` for the page count it was
/// resolved against, so iterating it never touches a page outside the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: usize,
    pub end: usize,
}

impl PageRange {
    /// Resolves 1-based, inclusive user bounds against the document page count.
    ///
    /// Missing bounds select the whole document. Bounds outside the document are
    /// clamped, and a range that ends before it starts selects no pages.
    pub fn resolve(first_page: Option<u32>, last_page: Option<u32>, page_count: usize) -> Self {
        let first_page = first_page.map(|p| p as usize).unwrap_or(1);
        let last_page = last_page.map(|p| p as usize).unwrap_or(page_count);

        let end = last_page.min(page_count);
        let start = first_page.saturating_sub(1).min(end);
        PageRange { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// 1-based page numbers, as used in output file names.
    pub fn page_numbers(&self) -> impl Iterator<Item = usize> {
        (self.start + 1)..=self.end
    }
}

mod file_matcher;
pub use file_matcher::*;

mod pdf_finder;
pub use pdf_finder::*;

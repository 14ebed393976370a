//! PDF processing module.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
///
/// Pages are numbered from 1.
pub trait PdfProcessor {
    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the native text layer of a specific page.
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract the native text layer of the whole document, in page order.
    fn extract_text(&self) -> Result<String> {
        let mut pages = Vec::with_capacity(self.page_count() as usize);
        for page in 1..=self.page_count() {
            pages.push(self.extract_page_text(page)?);
        }
        Ok(join_pages(&pages))
    }

    /// Render a page as an image. `dpi` sizes pages without an embedded scan.
    fn render_page(&self, page: u32, dpi: u32) -> Result<DynamicImage>;
}

/// Concatenate page texts in order.
///
/// A newline is inserted only where a page boundary would otherwise join two
/// non-whitespace characters.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    let mut text = String::new();
    for page in pages {
        let page = page.as_ref();
        let glued = text.ends_with(|c: char| !c.is_whitespace())
            && page.starts_with(|c: char| !c.is_whitespace());
        if glued {
            text.push('\n');
        }
        text.push_str(page);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_join_pages_keeps_natural_breaks() {
        assert_eq!(join_pages(&["a\n", "b\n"]), "a\nb\n");
        assert_eq!(join_pages(&["a", "b"]), "a\nb");
        assert_eq!(join_pages(&["a", "", " b"]), "a b");
        assert_eq!(join_pages::<&str>(&[]), "");
    }
}

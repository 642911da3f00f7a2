//! Text-layout reconstruction from positioned fragments.
//!
//! PDF text extraction yields an unordered bag of positioned text runs per
//! page. This module rebuilds row-major reading order:
//!
//! ```text
//! fragments → sort (y desc, x asc) → group rows by Y proximity → text blob
//! ```
//!
//! Rows are serialized by joining fragments with [`COLUMN_SEPARATOR`] and
//! joining rows with newlines, producing one blob per page for the parser.

/// A short text run plus its position on a page.
///
/// Coordinates are PDF points with y increasing upward, so larger `y` means
/// closer to the top of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self { text: text.into(), x, y }
    }
}

/// Maximum Y distance (PDF points) between fragments of the same row.
/// Roughly half a 10 pt line height; tuned against portal schedule exports.
pub const ROW_TOLERANCE: f32 = 5.0;

/// Separator between columns of a reconstructed row. Tab never appears in
/// extracted fragment text, so it is safe as a column boundary.
pub const COLUMN_SEPARATOR: char = '\t';

/// One page's tabular content in approximate reading order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconstructedPage {
    /// Rows top-to-bottom, each a left-to-right sequence of trimmed,
    /// non-empty fragment strings.
    pub rows: Vec<Vec<String>>,
}

impl ReconstructedPage {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize rows into a single text blob: columns joined by
    /// [`COLUMN_SEPARATOR`], rows joined by newlines.
    pub fn to_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.join(&COLUMN_SEPARATOR.to_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Reconstruct row-major reading order for one page of fragments.
///
/// 1. Drop fragments whose trimmed text is empty.
/// 2. Sort by Y descending (top of page first), then X ascending.
/// 3. Start a new row whenever the Y gap to the previous fragment exceeds
///    [`ROW_TOLERANCE`].
///
/// A single fragment forms its own single-fragment row; zero usable
/// fragments yield an empty page.
pub fn reconstruct_page(fragments: &[TextFragment]) -> ReconstructedPage {
    let mut usable: Vec<&TextFragment> = fragments
        .iter()
        .filter(|f| !f.text.trim().is_empty())
        .collect();

    if usable.is_empty() {
        return ReconstructedPage::default();
    }

    usable.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut current: Vec<String> = vec![usable[0].text.trim().to_string()];
    let mut row_y = usable[0].y;

    for frag in usable.iter().skip(1) {
        if (frag.y - row_y).abs() < ROW_TOLERANCE {
            current.push(frag.text.trim().to_string());
        } else {
            rows.push(std::mem::take(&mut current));
            current.push(frag.text.trim().to_string());
            row_y = frag.y;
        }
    }
    rows.push(current);

    ReconstructedPage { rows }
}

/// Reconstruct every page and concatenate the per-page blobs with newlines.
/// Pages without extractable text contribute nothing.
pub fn reconstruct_document(pages: &[Vec<TextFragment>]) -> String {
    pages
        .iter()
        .map(|frags| reconstruct_page(frags))
        .filter(|page| !page.is_empty())
        .map(|page| page.to_text())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y)
    }

    #[test]
    fn empty_page_yields_no_rows() {
        let page = reconstruct_page(&[]);
        assert!(page.is_empty());
        assert_eq!(page.to_text(), "");
    }

    #[test]
    fn single_fragment_forms_own_row() {
        let page = reconstruct_page(&[frag("BUAD 123", 10.0, 700.0)]);
        assert_eq!(page.rows, vec![vec!["BUAD 123".to_string()]]);
    }

    #[test]
    fn whitespace_fragments_dropped_before_grouping() {
        let page = reconstruct_page(&[
            frag("   ", 10.0, 700.0),
            frag("MATH 201", 10.0, 680.0),
            frag("", 50.0, 680.0),
        ]);
        assert_eq!(page.rows, vec![vec!["MATH 201".to_string()]]);
    }

    #[test]
    fn rows_ordered_top_to_bottom_left_to_right() {
        let page = reconstruct_page(&[
            frag("9:30AM", 120.0, 680.0),
            frag("BUAD 123", 10.0, 700.0),
            frag("MWF", 60.0, 680.0),
            frag("Business Fundamentals", 90.0, 700.0),
        ]);
        assert_eq!(
            page.rows,
            vec![
                vec!["BUAD 123".to_string(), "Business Fundamentals".to_string()],
                vec!["MWF".to_string(), "9:30AM".to_string()],
            ]
        );
    }

    #[test]
    fn nearby_y_values_share_a_row() {
        // Superscripts and baseline jitter land within ROW_TOLERANCE.
        let page = reconstruct_page(&[
            frag("HAL", 10.0, 500.0),
            frag("101", 40.0, 500.0 + ROW_TOLERANCE - 0.5),
        ]);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.to_text(), "101\tHAL");
    }

    #[test]
    fn y_gap_beyond_tolerance_starts_new_row() {
        let page = reconstruct_page(&[
            frag("A", 10.0, 500.0),
            frag("B", 10.0, 500.0 - ROW_TOLERANCE - 1.0),
        ]);
        assert_eq!(page.rows.len(), 2);
    }

    #[test]
    fn reconstruction_is_idempotent_for_ordered_input() {
        // Already row-major-ordered fragments reproduce the same rows.
        let fragments = vec![
            frag("BUAD 123", 10.0, 700.0),
            frag("Business Fundamentals", 90.0, 700.0),
            frag("MWF", 10.0, 680.0),
            frag("HAL 101", 10.0, 660.0),
        ];
        let first = reconstruct_page(&fragments);

        let reordered: Vec<TextFragment> = first
            .rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().map(move |(c, text)| {
                    frag(text, c as f32 * 100.0, 700.0 - r as f32 * 20.0)
                })
            })
            .collect();
        let second = reconstruct_page(&reordered);

        assert_eq!(first.rows, second.rows);
    }

    #[test]
    fn document_skips_empty_pages() {
        let pages = vec![
            vec![frag("BUAD 123", 10.0, 700.0)],
            vec![],
            vec![frag("MATH 201", 10.0, 700.0)],
        ];
        assert_eq!(reconstruct_document(&pages), "BUAD 123\nMATH 201");
    }
}

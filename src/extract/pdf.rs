//! PDF positioned-fragment extraction via pdfium.
//!
//! Uses `pdfium-render` (Chromium's PDF library) to walk character
//! positions per page, then groups consecutive characters into short
//! [`TextFragment`] runs for the layout reconstructor. Only PDFs with an
//! embedded text layer are supported; scanned/image-only pages yield no
//! fragments.
//!
//! The pdfium binding is loaded once per session on first use and cached
//! for the process lifetime. The pipeline is single-threaded and
//! UI-event-driven, so the cache is a thread-local rather than a shared
//! static.

use std::cell::OnceCell;

use anyhow::{anyhow, Context, Result};
use pdfium_render::prelude::*;

use super::layout::TextFragment;

/// Y distance (PDF points) beyond which consecutive characters start a new
/// fragment. Matches the row grouping tolerance downstream.
const BASELINE_TOLERANCE: f32 = 5.0;

/// A horizontal gap wider than this many average character widths splits
/// a fragment (column boundary); narrower gaps become a space inside the
/// fragment (word boundary).
const COLUMN_GAP_FACTOR: f32 = 3.0;
const SPACE_GAP_FACTOR: f32 = 0.3;

/// A positioned character as reported by pdfium.
#[derive(Debug, Clone)]
struct PdfChar {
    ch: char,
    /// Left edge in PDF points (1pt = 1/72 inch).
    x: f32,
    /// Baseline Y position (bottom-up coordinate system).
    y: f32,
    width: f32,
}

thread_local! {
    static PDFIUM: OnceCell<Pdfium> = const { OnceCell::new() };
}

/// Run `f` against the cached pdfium binding, initializing it on first use.
/// Binding failure surfaces as a recoverable error; the caller directs the
/// user to the paste path.
fn with_pdfium<T>(f: impl FnOnce(&Pdfium) -> Result<T>) -> Result<T> {
    PDFIUM.with(|cell| {
        if cell.get().is_none() {
            let bindings = Pdfium::bind_to_system_library()
                .map_err(|e| anyhow!("pdfium library unavailable: {e}"))?;
            let _ = cell.set(Pdfium::new(bindings));
        }
        f(cell.get().expect("pdfium binding initialized above"))
    })
}

/// Extract positioned text fragments, one `Vec` per page.
///
/// Pages without extractable text yield empty vectors, which the
/// reconstructor skips.
#[allow(deprecated)] // PdfRect field access deprecated in 0.8.28, removed in 0.9.0
pub fn extract_fragments(bytes: &[u8]) -> Result<Vec<Vec<TextFragment>>> {
    with_pdfium(|pdfium| {
        let doc = pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .context("failed to parse PDF")?;

        let mut pages = Vec::with_capacity(doc.pages().len() as usize);
        for page in doc.pages().iter() {
            let text = page.text().context("failed to extract text from page")?;
            let mut chars = Vec::new();
            for ch in text.chars().iter() {
                if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
                    chars.push(PdfChar {
                        ch: unicode_ch,
                        x: rect.left.value,
                        y: rect.bottom.value,
                        width: (rect.right.value - rect.left.value).abs(),
                    });
                }
            }
            pages.push(fragments_from_chars(&chars));
        }

        Ok(pages)
    })
}

/// Group consecutive positioned characters into text fragments.
///
/// Characters stay in one fragment while they share a baseline and sit
/// close horizontally; a baseline shift or a column-sized gap starts a new
/// fragment. Word-sized gaps become spaces inside the fragment.
fn fragments_from_chars(chars: &[PdfChar]) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut run: Vec<&PdfChar> = Vec::new();

    let flush = |run: &mut Vec<&PdfChar>, fragments: &mut Vec<TextFragment>| {
        if run.is_empty() {
            return;
        }
        let avg_width = run.iter().map(|c| c.width).sum::<f32>() / run.len() as f32;
        let space_gap = avg_width * SPACE_GAP_FACTOR;

        let mut text = String::new();
        for (i, ch) in run.iter().enumerate() {
            if i > 0 {
                let prev = run[i - 1];
                if ch.x - (prev.x + prev.width) > space_gap {
                    text.push(' ');
                }
            }
            text.push(ch.ch);
        }
        fragments.push(TextFragment::new(text, run[0].x, run[0].y));
        run.clear();
    };

    for ch in chars {
        if let Some(prev) = run.last() {
            let column_gap = prev.width.max(1.0) * COLUMN_GAP_FACTOR;
            let new_row = (ch.y - prev.y).abs() >= BASELINE_TOLERANCE;
            let new_column = ch.x - (prev.x + prev.width) > column_gap || ch.x < prev.x;
            if new_row || new_column {
                flush(&mut run, &mut fragments);
            }
        }
        run.push(ch);
    }
    flush(&mut run, &mut fragments);

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char, x: f32, y: f32) -> PdfChar {
        PdfChar { ch: c, x, y, width: 6.0 }
    }

    #[test]
    fn empty_page_yields_no_fragments() {
        assert!(fragments_from_chars(&[]).is_empty());
    }

    #[test]
    fn adjacent_chars_form_one_fragment() {
        let chars = vec![ch('H', 10.0, 700.0), ch('A', 16.0, 700.0), ch('L', 22.0, 700.0)];
        let frags = fragments_from_chars(&chars);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "HAL");
        assert_eq!(frags[0].x, 10.0);
    }

    #[test]
    fn word_gap_becomes_space_inside_fragment() {
        // 4pt gap: wider than the space threshold, narrower than a column.
        let chars = vec![ch('H', 10.0, 700.0), ch('1', 20.0, 700.0)];
        let frags = fragments_from_chars(&chars);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].text, "H 1");
    }

    #[test]
    fn column_gap_splits_fragments() {
        // 30pt gap: beyond COLUMN_GAP_FACTOR * width.
        let chars = vec![ch('A', 10.0, 700.0), ch('B', 46.0, 700.0)];
        let frags = fragments_from_chars(&chars);
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn baseline_shift_splits_fragments() {
        let chars = vec![ch('A', 10.0, 700.0), ch('B', 16.0, 680.0)];
        let frags = fragments_from_chars(&chars);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[1].y, 680.0);
    }

    #[test]
    fn leftward_jump_starts_new_fragment() {
        // Extraction order occasionally backtracks; never glue across it.
        let chars = vec![ch('A', 100.0, 700.0), ch('B', 10.0, 700.0)];
        let frags = fragments_from_chars(&chars);
        assert_eq!(frags.len(), 2);
    }
}

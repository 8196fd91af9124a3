//! Fixed-pitch pagination of plain text.
//!
//! Lines are cut by character count, not by rendered width, so long words
//! may be split mid-word. The cursor starts at `page_height - margin_top`,
//! drops by `line_pitch` after every drawn chunk, and a new page begins as
//! soon as it falls below `margin_bottom`.

use crate::config::PageGeometry;
use crate::segment::segment;

/// One chunk of text at its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

/// Lines placed on a single page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Split a line into chunks of at most `width` characters.
///
/// Yields `ceil(len / width)` chunks; an empty line yields one empty chunk
/// so it still occupies a row.
pub fn chunk_line(line: &str, width: usize) -> Vec<&str> {
    if line.is_empty() {
        return vec![""];
    }

    let width = width.max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in line.char_indices() {
        if count == width {
            chunks.push(&line[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }
    chunks.push(&line[start..]);

    chunks
}

/// Lay out `text` onto pages.
///
/// An empty trailing page is never emitted; empty text still produces one
/// blank page so the exported document is valid.
pub fn paginate(text: &str, geometry: &PageGeometry) -> Vec<Page> {
    let top = geometry.top_cursor();
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut y = top;

    for line in segment(text) {
        for chunk in chunk_line(line, geometry.max_line_chars) {
            current.lines.push(PlacedLine {
                x: geometry.margin_left,
                y,
                text: chunk.to_string(),
            });

            y -= geometry.line_pitch;
            if y < geometry.margin_bottom {
                pages.push(std::mem::take(&mut current));
                y = top;
            }
        }
    }

    if !current.lines.is_empty() || pages.is_empty() {
        pages.push(current);
    }

    pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> String {
        (1..=n).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_chunk_200_chars_at_85() {
        let line = "x".repeat(200);
        let chunks = chunk_line(&line, 85);
        let lens: Vec<_> = chunks.iter().map(|c| c.chars().count()).collect();
        assert_eq!(lens, vec![85, 85, 30]);
    }

    #[test]
    fn test_chunk_exact_multiple() {
        let line = "y".repeat(170);
        assert_eq!(chunk_line(&line, 85).len(), 2);
        assert_eq!(chunk_line(&"z".repeat(85), 85).len(), 1);
    }

    #[test]
    fn test_chunk_counts_characters_not_bytes() {
        let line = "ä".repeat(10);
        let chunks = chunk_line(&line, 4);
        assert_eq!(chunks, vec!["ääää", "ääää", "ää"]);
    }

    #[test]
    fn test_chunk_empty_line_is_one_row() {
        assert_eq!(chunk_line("", 85), vec![""]);
    }

    #[test]
    fn test_chunk_count_is_ceil() {
        for len in [1_usize, 84, 85, 86, 169, 170, 171, 500] {
            let line = "a".repeat(len);
            let chunks = chunk_line(&line, 85);
            assert_eq!(chunks.len(), len.div_ceil(85), "len {len}");
            assert!(chunks.iter().all(|c| c.len() <= 85));
            assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == 85));
        }
    }

    #[test]
    fn test_cursor_positions() {
        let geometry = PageGeometry::default();
        let pages = paginate("a\nb", &geometry);
        assert_eq!(pages.len(), 1);

        let ys: Vec<_> = pages[0].lines.iter().map(|l| l.y).collect();
        assert_eq!(ys, vec![720.0, 708.0]);
        assert!(pages[0].lines.iter().all(|l| (l.x - 72.0).abs() < f32::EPSILON));
    }

    #[test]
    fn test_full_page_does_not_leave_empty_trailer() {
        let geometry = PageGeometry::default();
        let per_page = geometry.lines_per_page();
        assert_eq!(per_page, 55);

        let pages = paginate(&lines(per_page), &geometry);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 55);
        assert!((pages[0].lines[54].y - 72.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overflow_starts_new_page_at_top() {
        let geometry = PageGeometry::default();
        let pages = paginate(&lines(56), &geometry);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 55);
        assert_eq!(pages[1].lines.len(), 1);
        assert_eq!(pages[1].lines[0].text, "line 56");
        assert!((pages[1].lines[0].y - 720.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_lines_per_page_formula_for_custom_geometry() {
        let geometry = PageGeometry {
            page_height: 400.0,
            margin_top: 50.0,
            margin_bottom: 50.0,
            line_pitch: 20.0,
            ..Default::default()
        };
        // floor((400 - 50 - 50) / 20) + 1
        assert_eq!(geometry.lines_per_page(), 16);

        let pages = paginate(&lines(40), &geometry);
        let counts: Vec<_> = pages.iter().map(|p| p.lines.len()).collect();
        assert_eq!(counts, vec![16, 16, 8]);
    }

    #[test]
    fn test_long_line_wraps_across_page_break() {
        let geometry = PageGeometry::default();
        let text = format!("{}\n{}", lines(54), "w".repeat(100));
        let pages = paginate(&text, &geometry);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines[54].text.len(), 85);
        assert_eq!(pages[1].lines[0].text.len(), 15);
    }

    #[test]
    fn test_empty_text_yields_blank_page() {
        let pages = paginate("", &PageGeometry::default());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 1);
        assert_eq!(pages[0].lines[0].text, "");
    }
}

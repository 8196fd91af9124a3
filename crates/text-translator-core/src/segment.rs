//! Paragraph segmentation, translation and reassembly.
//!
//! Text is split on line breaks; every line with at least one
//! non-whitespace character is a translatable unit. Translated units are
//! joined back with a single `\n` in source order. Blank lines are dropped
//! unless [`BlankLines::Preserve`] is requested.

use tracing::debug;

use crate::config::{BlankLines, LanguagePair};
use crate::error::Result;
use crate::translator::Translator;

/// Lazy iterator over the raw lines of a text.
///
/// Borrows the text, so calling [`segment`] again starts over; a clone
/// continues from the current position.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    inner: std::str::Split<'a, char>,
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }
}

/// Split text into newline-delimited units, in original order.
///
/// `"a\n\nb"` yields `"a"`, `""`, `"b"`. A trailing `\r` (CRLF input) is
/// not part of the unit.
pub fn segment(text: &str) -> Segments<'_> {
    Segments {
        inner: text.split('\n'),
    }
}

/// True iff the unit contains at least one non-whitespace character.
pub fn translatable(unit: &str) -> bool {
    !unit.trim().is_empty()
}

/// Join units with a single line break.
pub fn reassemble<I, S>(units: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for (i, unit) in units.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(unit.as_ref());
    }
    out
}

/// Number of units `translate_text` will send to the translator.
pub fn count_translatable(text: &str) -> usize {
    segment(text).filter(|u| translatable(u)).count()
}

/// Progress callback: `(translated_so_far, total_translatable)`.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

/// Translate `text` paragraph by paragraph.
///
/// Stops at the first translator error; nothing partial is returned.
pub async fn translate_text(
    text: &str,
    translator: &dyn Translator,
    pair: &LanguagePair,
    blank_lines: BlankLines,
    progress: Option<ProgressFn<'_>>,
) -> Result<String> {
    let total = count_translatable(text);
    let mut done = 0;
    let mut out: Vec<String> = Vec::new();

    if let Some(report) = progress {
        report(done, total);
    }

    for unit in segment(text) {
        if !translatable(unit) {
            if blank_lines == BlankLines::Preserve {
                out.push(String::new());
            }
            continue;
        }

        debug!("Translating paragraph {}/{} ({} chars)", done + 1, total, unit.chars().count());
        let translated = translator
            .translate(unit, &pair.source, &pair.target)
            .await?;
        out.push(translated);
        done += 1;

        if let Some(report) = progress {
            report(done, total);
        }
    }

    Ok(reassemble(out))
}

//! Per-page text cleaning.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use super::line::classify_line;
use super::page::is_empty_page;

/// Text substituted for pages detected as empty.
pub const EMPTY_PAGE_SENTINEL: &str = "[EMPTY PAGE - FILTERED]";

/// Marker of fenced code blocks, which OCR models emit around noise.
const CODE_FENCE: &str = "```";

static BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-run pattern is a valid regex"));

/// Options for text cleaning.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    /// Keep blank-line runs untouched (otherwise 3+ newlines become 2)
    pub preserve_structure: bool,

    /// Normalize Unicode to NFC before cleaning
    pub normalize_unicode: bool,
}

impl CleanOptions {
    /// Create new clean options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep or collapse blank-line runs.
    pub fn with_preserve_structure(mut self, preserve: bool) -> Self {
        self.preserve_structure = preserve;
        self
    }

    /// Enable or disable NFC normalization.
    pub fn with_unicode_normalization(mut self, normalize: bool) -> Self {
        self.normalize_unicode = normalize;
        self
    }
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            preserve_structure: true,
            normalize_unicode: false,
        }
    }
}

/// Cleaned text together with before/after character counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedText {
    /// The cleaned text
    pub text: String,

    /// Characters in the trimmed input
    pub original_characters: usize,

    /// Characters in the cleaned text
    pub cleaned_characters: usize,
}

impl CleanedText {
    /// Check if the page was replaced by the empty-page sentinel.
    pub fn is_empty_page(&self) -> bool {
        self.text == EMPTY_PAGE_SENTINEL
    }
}

/// Removes scan artifacts from OCR page text.
#[derive(Debug, Clone, Default)]
pub struct TextCleaner {
    options: CleanOptions,
}

impl TextCleaner {
    /// Create a new cleaner with the given options.
    pub fn new(options: CleanOptions) -> Self {
        Self { options }
    }

    /// Get the cleaner options.
    pub fn options(&self) -> &CleanOptions {
        &self.options
    }

    /// Clean one page of OCR text.
    pub fn clean(&self, text: &str) -> String {
        self.clean_content(&self.prepare(text))
    }

    /// Clean one page of OCR text and report character counts.
    ///
    /// Both counts are taken on the same (normalized, if enabled) text.
    pub fn clean_with_stats(&self, text: &str) -> CleanedText {
        let prepared = self.prepare(text);
        let cleaned = self.clean_content(&prepared);
        let original_characters = prepared.trim().chars().count();
        let cleaned_characters = cleaned.chars().count();

        CleanedText {
            text: cleaned,
            original_characters,
            cleaned_characters,
        }
    }

    fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.options.normalize_unicode {
            Cow::Owned(text.nfc().collect())
        } else {
            Cow::Borrowed(text)
        }
    }

    fn clean_content(&self, text: &str) -> String {
        if is_empty_page(text) {
            log::debug!("Page filtered as empty ({} characters)", text.chars().count());
            return EMPTY_PAGE_SENTINEL.to_string();
        }

        let kept: Vec<&str> = text
            .split('\n')
            .filter(|line| {
                let verdict = classify_line(line);
                if let Some(reason) = verdict.reason {
                    log::debug!("Dropping artifact line {:?} ({})", line.trim(), reason);
                    return false;
                }
                !line.trim().starts_with(CODE_FENCE)
            })
            .collect();

        let mut result = kept.join("\n");

        if !self.options.preserve_structure {
            result = BLANK_RUNS.replace_all(&result, "\n\n").into_owned();
        }

        result.trim().to_string()
    }
}

/// Clean one page of OCR text with default options.
///
/// # Example
///
/// ```
/// use metsocr::clean_text;
///
/// let cleaned = clean_text("Farbkarte #13\n\nB.I.G.\n\n", true);
/// assert_eq!(cleaned, metsocr::filter::EMPTY_PAGE_SENTINEL);
/// ```
pub fn clean_text(text: &str, preserve_structure: bool) -> String {
    TextCleaner::new(CleanOptions::new().with_preserve_structure(preserve_structure)).clean(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::is_artifact_line;

    const LETTER: &str = "Inches

Centimetres

Farbkarte #13

B.I.G.

Blue

Cyan

Green

Ihr freundliches Schreiben erreicht mich leider in einer Zeit,

da mir aus personlichen Gründen eine wirklich eingehende

Beantwortung nicht möglich wird.

Grauskala #13

A

2

3

M

8
";

    #[test]
    fn test_empty_input_yields_sentinel() {
        assert_eq!(clean_text("", true), EMPTY_PAGE_SENTINEL);
        assert_eq!(clean_text("", false), EMPTY_PAGE_SENTINEL);
    }

    #[test]
    fn test_end_to_end_prose_survives() {
        let raw = "Farbkarte #13\n\nB.I.G.\n\nHallo Welt, dies ist echter Text mit genügend Buchstaben für die Seite.";
        assert_eq!(
            clean_text(raw, true),
            "Hallo Welt, dies ist echter Text mit genügend Buchstaben für die Seite."
        );
    }

    #[test]
    fn test_color_chart_letter_preserve_structure() {
        let cleaned = clean_text(LETTER, true);
        let expected = "Ihr freundliches Schreiben erreicht mich leider in einer Zeit,

da mir aus personlichen Gründen eine wirklich eingehende

Beantwortung nicht möglich wird.";
        assert_eq!(cleaned, expected);
    }

    #[test]
    fn test_collapse_blank_runs() {
        let body = "Erster Absatz mit ausreichend vielen Buchstaben für eine echte Seite.";
        let raw = format!("{body}\n\n\n\n\nZweiter Absatz folgt hier.");

        let collapsed = clean_text(&raw, false);
        assert_eq!(collapsed, format!("{body}\n\nZweiter Absatz folgt hier."));

        let preserved = clean_text(&raw, true);
        assert_eq!(preserved, raw);
    }

    #[test]
    fn test_artifact_lines_leave_blank_runs() {
        let raw = "Langer Text über die Flechten Tirols, ihre Arten und die Fundorte.\n\nBlue\n\nZweiter Absatz.";
        assert_eq!(
            clean_text(raw, true),
            "Langer Text über die Flechten Tirols, ihre Arten und die Fundorte.\n\n\nZweiter Absatz."
        );
        assert_eq!(
            clean_text(raw, false),
            "Langer Text über die Flechten Tirols, ihre Arten und die Fundorte.\n\nZweiter Absatz."
        );
    }

    #[test]
    fn test_code_fence_lines_dropped() {
        let raw = "```\nDie Seite enthält einen längeren Absatz mit genug Buchstaben darin.\n```text";
        assert_eq!(
            clean_text(raw, true),
            "Die Seite enthält einen längeren Absatz mit genug Buchstaben darin."
        );
    }

    #[test]
    fn test_survivors_are_not_artifacts() {
        let cleaned = clean_text(LETTER, true);
        assert!(cleaned.split('\n').all(|line| !is_artifact_line(line)));
    }

    #[test]
    fn test_clean_with_stats() {
        let cleaner = TextCleaner::default();
        let result = cleaner.clean_with_stats(LETTER);

        assert_eq!(result.original_characters, LETTER.trim().chars().count());
        assert_eq!(result.cleaned_characters, result.text.chars().count());
        assert!(result.original_characters > result.cleaned_characters);
        assert!(!result.is_empty_page());
    }

    #[test]
    fn test_clean_with_stats_empty_page() {
        let result = TextCleaner::default().clean_with_stats("  A  \n 2 \n");
        assert!(result.is_empty_page());
        assert_eq!(result.original_characters, 6);
        assert_eq!(result.cleaned_characters, EMPTY_PAGE_SENTINEL.chars().count());
    }

    #[test]
    fn test_unicode_normalization() {
        // "u" followed by a combining diaeresis is not a counted letter until composed
        let decomposed = "Gru\u{0308}ße aus der Stadt, wo die Bu\u{0308}cher auf den Regalen stehen und auf ihre Leser warten.";
        let cleaner = TextCleaner::new(CleanOptions::new().with_unicode_normalization(true));
        let cleaned = cleaner.clean(decomposed);
        assert!(cleaned.contains("Grüße"));
        assert!(cleaned.contains("Bücher"));
    }

    #[test]
    fn test_unicode_normalization_counts() {
        let decomposed = "Gru\u{0308}ße aus der Stadt, wo die Bu\u{0308}cher auf den Regalen stehen und auf ihre Leser warten.";
        let cleaner = TextCleaner::new(CleanOptions::new().with_unicode_normalization(true));
        let result = cleaner.clean_with_stats(decomposed);

        assert_eq!(result.original_characters, result.cleaned_characters);
        assert_eq!(result.original_characters, decomposed.chars().count() - 2);
    }
}

//! Page-level emptiness detection.

/// Pages with fewer letters than this hold no real content.
pub const MIN_PAGE_LETTERS: usize = 50;

/// Pages whose letters make up less than this share of all characters are noise.
pub const MIN_LETTER_RATIO: f64 = 0.05;

/// ASCII letters plus the German umlauts and sharp s.
fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, 'ä' | 'ö' | 'ü' | 'Ä' | 'Ö' | 'Ü' | 'ß')
}

/// Count letters in a text, ignoring whitespace.
pub fn letter_count(text: &str) -> usize {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .filter(|c| is_letter(*c))
        .count()
}

/// Check if a page's text is wholly non-content.
///
/// The ratio uses the character count of the original text, whitespace
/// included, as denominator.
pub fn is_empty_page(text: &str) -> bool {
    let letters = letter_count(text);

    if letters < MIN_PAGE_LETTERS {
        return true;
    }

    let total = text.chars().count();
    let ratio = if total > 0 {
        letters as f64 / total as f64
    } else {
        0.0
    };

    ratio < MIN_LETTER_RATIO
}

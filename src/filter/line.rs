//! Line-level artifact classification.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Lowercase keywords whose presence anywhere in a line marks it as scan noise.
///
/// Color and gray-scale reference charts, ruler units and the
/// "B.I.G." calibration stamp.
pub const ARTIFACT_KEYWORDS: &[&str] = &[
    // reference charts
    "farbkarte",
    "grauskala",
    "color chart",
    "gray scale",
    "b.i.g.",
    "b.i.g",
    "big",
    // color patches
    "blue",
    "cyan",
    "green",
    "yellow",
    "red",
    "magenta",
    "white",
    "black",
    // ruler units
    "inches",
    "centimetres",
    "centimeters",
    "cm",
    "mm",
    // chart labels
    "color",
    "3/color",
    "grayscale",
    "colour",
];

/// Shape patterns matched against the trimmed line, in evaluation order.
pub const ARTIFACT_PATTERNS: &[&str] = &[
    r"^[A-Z]$",                        // single capital (A, B, M)
    r"^\d{1,2}$",                      // patch numbers (1-19)
    r"^#\d+$",                         // chart numbers (#13, #14)
    r"^[A-Z]\.\s?[A-Z]\.\s?[A-Z]\.$",  // B.I.G.
    r"^\d+/\w+$",                      // 3/Color
];

/// Lines at most this long made only of alphanumerics are noise.
const MAX_SHORT_TOKEN_LEN: usize = 3;

static COMPILED_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ARTIFACT_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("artifact pattern is a valid regex"))
        .collect()
});

/// Why a line was classified as an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactReason {
    /// Contains one of [`ARTIFACT_KEYWORDS`]
    Keyword(&'static str),
    /// Matches the pattern at this index of [`ARTIFACT_PATTERNS`]
    Pattern(usize),
    /// Very short alphanumeric token
    ShortToken,
}

impl fmt::Display for ArtifactReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactReason::Keyword(k) => write!(f, "keyword {:?}", k),
            ArtifactReason::Pattern(i) => write!(f, "pattern {}", ARTIFACT_PATTERNS[*i]),
            ArtifactReason::ShortToken => write!(f, "short token"),
        }
    }
}

/// Classification result for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineVerdict {
    /// Whether the line is scan noise
    pub is_artifact: bool,

    /// The rule that fired (None for content lines)
    pub reason: Option<ArtifactReason>,
}

impl LineVerdict {
    const CONTENT: LineVerdict = LineVerdict {
        is_artifact: false,
        reason: None,
    };

    fn artifact(reason: ArtifactReason) -> Self {
        Self {
            is_artifact: true,
            reason: Some(reason),
        }
    }
}

/// Classify a single line of OCR output.
///
/// Rules are evaluated in order and the first match wins. Blank lines are
/// always content so paragraph boundaries survive cleaning.
pub fn classify_line(line: &str) -> LineVerdict {
    let stripped = line.trim();

    if stripped.is_empty() {
        return LineVerdict::CONTENT;
    }

    let lower = stripped.to_lowercase();
    if let Some(keyword) = ARTIFACT_KEYWORDS.iter().find(|k| lower.contains(*k)) {
        return LineVerdict::artifact(ArtifactReason::Keyword(*keyword));
    }

    if let Some(index) = COMPILED_PATTERNS.iter().position(|re| re.is_match(stripped)) {
        return LineVerdict::artifact(ArtifactReason::Pattern(index));
    }

    if stripped.chars().count() <= MAX_SHORT_TOKEN_LEN && stripped.chars().all(char::is_alphanumeric)
    {
        return LineVerdict::artifact(ArtifactReason::ShortToken);
    }

    LineVerdict::CONTENT
}

/// Check if a line is scan noise.
pub fn is_artifact_line(line: &str) -> bool {
    classify_line(line).is_artifact
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines_are_content() {
        assert!(!is_artifact_line(""));
        assert!(!is_artifact_line("   "));
        assert!(!is_artifact_line("\t\r"));
    }

    #[test]
    fn test_keywords_case_insensitive() {
        for line in ["Farbkarte #13", "GRAUSKALA", "Inches", "Centimetres", "Blue", "a Color Chart b"] {
            let verdict = classify_line(line);
            assert!(verdict.is_artifact, "{line:?} should be an artifact");
            assert!(matches!(verdict.reason, Some(ArtifactReason::Keyword(_))));
        }
    }

    #[test]
    fn test_every_keyword_is_detected() {
        for keyword in ARTIFACT_KEYWORDS {
            let line = format!("xx {} yy", keyword.to_uppercase());
            assert!(is_artifact_line(&line), "{line:?} should be an artifact");
        }
    }

    #[test]
    fn test_keyword_substring_match() {
        // "red" and "mm" inside longer words still count
        assert!(is_artifact_line("Ihr Kredit ist erschöpft."));
        assert!(is_artifact_line("Wir kommen im Sommer."));
    }

    #[test]
    fn test_shape_patterns() {
        assert_eq!(classify_line("A").reason, Some(ArtifactReason::Pattern(0)));
        assert_eq!(classify_line(" 19 ").reason, Some(ArtifactReason::Pattern(1)));
        assert_eq!(classify_line("#142").reason, Some(ArtifactReason::Pattern(2)));
        assert_eq!(classify_line("X. Y. Z.").reason, Some(ArtifactReason::Pattern(3)));
        assert_eq!(classify_line("12/Farben").reason, Some(ArtifactReason::Pattern(4)));
    }

    #[test]
    fn test_short_tokens() {
        assert_eq!(classify_line("abc").reason, Some(ArtifactReason::ShortToken));
        assert_eq!(classify_line("a1").reason, Some(ArtifactReason::ShortToken));
        assert_eq!(classify_line("ßüö").reason, Some(ArtifactReason::ShortToken));
        // punctuation is not alphanumeric
        assert!(!is_artifact_line("a."));
        assert!(!is_artifact_line("..."));
        // four characters is too long
        assert!(!is_artifact_line("Haus"));
    }

    #[test]
    fn test_prose_is_content() {
        let verdict = classify_line("Ihr freundliches Schreiben erreicht mich leider in einer Zeit,");
        assert_eq!(verdict, LineVerdict::CONTENT);
        assert!(!is_artifact_line("Beantwortung nicht möglich wird."));
    }

    #[test]
    fn test_non_latin_scripts() {
        assert!(!is_artifact_line("Дорогой друг, спасибо за письмо."));
        assert!(is_artifact_line("日本"));
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(ArtifactReason::Keyword("cm").to_string(), "keyword \"cm\"");
        assert_eq!(ArtifactReason::ShortToken.to_string(), "short token");
        assert_eq!(ArtifactReason::Pattern(2).to_string(), r"pattern ^#\d+$");
    }
}

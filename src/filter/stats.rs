//! Before/after statistics for a cleaning pass.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Line and character counts of a text before and after cleaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStats {
    /// Lines in the original text
    pub original_lines: usize,

    /// Lines in the cleaned text
    pub cleaned_lines: usize,

    /// Characters in the original text
    pub original_chars: usize,

    /// Characters in the cleaned text
    pub cleaned_chars: usize,
}

impl FilterStats {
    /// Compare an original text with its cleaned form.
    pub fn compute(original: &str, cleaned: &str) -> Self {
        Self {
            original_lines: original.split('\n').count(),
            cleaned_lines: cleaned.split('\n').count(),
            original_chars: original.chars().count(),
            cleaned_chars: cleaned.chars().count(),
        }
    }

    /// Lines removed by cleaning.
    pub fn removed_lines(&self) -> i64 {
        self.original_lines as i64 - self.cleaned_lines as i64
    }

    /// Characters removed by cleaning.
    pub fn removed_chars(&self) -> i64 {
        self.original_chars as i64 - self.cleaned_chars as i64
    }

    /// Share of characters removed, in percent.
    pub fn removed_percent(&self) -> f64 {
        if self.original_chars == 0 {
            return 0.0;
        }
        self.removed_chars() as f64 / self.original_chars as f64 * 100.0
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &FilterStats) {
        self.original_lines += other.original_lines;
        self.cleaned_lines += other.cleaned_lines;
        self.original_chars += other.original_chars;
        self.cleaned_chars += other.cleaned_chars;
    }
}

impl fmt::Display for FilterStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original lines:  {}", self.original_lines)?;
        writeln!(f, "Cleaned lines:   {}", self.cleaned_lines)?;
        writeln!(f, "Removed lines:   {}", self.removed_lines())?;
        writeln!(f, "Original chars:  {}", self.original_chars)?;
        writeln!(f, "Cleaned chars:   {}", self.cleaned_chars)?;
        write!(f, "Removed chars:   {}", self.removed_chars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute() {
        let stats = FilterStats::compute("Blue\n\nEchter Text\n", "Echter Text");
        assert_eq!(stats.original_lines, 4);
        assert_eq!(stats.cleaned_lines, 1);
        assert_eq!(stats.removed_lines(), 3);
        assert_eq!(stats.original_chars, 18);
        assert_eq!(stats.cleaned_chars, 11);
        assert_eq!(stats.removed_chars(), 7);
    }

    #[test]
    fn test_removed_percent() {
        let stats = FilterStats::compute("abcdefghij", "abcde");
        assert_eq!(stats.removed_percent(), 50.0);
        assert_eq!(FilterStats::default().removed_percent(), 0.0);
    }

    #[test]
    fn test_merge() {
        let mut total = FilterStats::compute("a\nb", "a");
        total.merge(&FilterStats::compute("c\nd\ne", "c\nd"));
        assert_eq!(total.original_lines, 5);
        assert_eq!(total.cleaned_lines, 3);
    }

    #[test]
    fn test_display() {
        let text = FilterStats::compute("ab\ncd", "ab").to_string();
        assert!(text.contains("Removed lines:   1"));
        assert!(text.ends_with("Removed chars:   3"));
    }
}

//! Glob-style file name patterns.

use regex::Regex;

use crate::error::{Error, Result};

/// A compiled file name pattern supporting `*`, `?` and `{a,b}` groups.
#[derive(Debug, Clone)]
pub struct FilePattern {
    source: String,
    regex: Regex,
}

impl FilePattern {
    /// Compile a pattern such as `*.pdf` or `report-??.{pdf,png}`.
    ///
    /// Matching is case-insensitive and applies to the file name only.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut expr = String::from("(?i)^");
        let mut in_group = false;

        for c in pattern.chars() {
            match c {
                '*' => expr.push_str("[^/]*"),
                '?' => expr.push_str("[^/]"),
                '{' if !in_group => {
                    in_group = true;
                    expr.push_str("(?:");
                }
                '}' if in_group => {
                    in_group = false;
                    expr.push(')');
                }
                ',' if in_group => expr.push('|'),
                '/' => {
                    return Err(Error::InvalidPattern(format!(
                        "{}: patterns match file names, not paths",
                        pattern
                    )))
                }
                other => expr.push_str(&regex::escape(&other.to_string())),
            }
        }

        if in_group {
            return Err(Error::InvalidPattern(format!("{}: unclosed '{{'", pattern)));
        }
        expr.push('$');

        Ok(Self {
            source: pattern.to_string(),
            regex: Regex::new(&expr)?,
        })
    }

    /// A pattern that matches every file.
    pub fn any() -> Self {
        Self {
            source: "*".to_string(),
            regex: Regex::new("^.*$").unwrap(),
        }
    }

    /// Check a file name against the pattern.
    pub fn matches(&self, file_name: &str) -> bool {
        self.regex.is_match(file_name)
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_pattern() {
        let p = FilePattern::new("*.pdf").unwrap();
        assert!(p.matches("a.pdf"));
        assert!(p.matches("Annual Report.PDF"));
        assert!(!p.matches("a.pdf.parsed.json"));
        assert!(!p.matches("a.png"));
    }

    #[test]
    fn test_question_and_groups() {
        let p = FilePattern::new("report-??.{pdf,png}").unwrap();
        assert!(p.matches("report-01.pdf"));
        assert!(p.matches("report-ab.png"));
        assert!(!p.matches("report-1.pdf"));
        assert!(!p.matches("report-01.jpg"));
    }

    #[test]
    fn test_literal_metacharacters() {
        let p = FilePattern::new("a+b (1).pdf").unwrap();
        assert!(p.matches("a+b (1).pdf"));
        assert!(!p.matches("aab (1).pdf"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            FilePattern::new("*.{pdf"),
            Err(Error::InvalidPattern(_))
        ));
        assert!(matches!(
            FilePattern::new("dir/*.pdf"),
            Err(Error::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_any() {
        assert!(FilePattern::any().matches("anything.bin"));
        assert_eq!(FilePattern::any().as_str(), "*");
    }
}

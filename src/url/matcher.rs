use crate::ConfigError;
use regex::Regex;
use std::fmt;

/// The kind of an exclude pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Shell-style wildcard (`*`, `?`, `[...]`)
    Glob,
    /// Regular expression
    Regex,
}

/// A rule suppressing matching sitemaps and URLs from acceptance
///
/// Both kinds are compiled into a [`Regex`] once, at construction time.
/// Globs are anchored over the whole candidate; regular expressions match
/// anywhere unless they anchor themselves.
#[derive(Clone)]
pub struct ExcludePattern {
    kind: PatternKind,
    source: String,
    regex: Regex,
}

impl ExcludePattern {
    /// Creates a wildcard pattern
    ///
    /// # Examples
    ///
    /// ```
    /// use cache_warmer::url::ExcludePattern;
    ///
    /// let pattern = ExcludePattern::glob("*/foo").unwrap();
    /// assert!(pattern.matches("https://example.com/foo"));
    /// assert!(!pattern.matches("https://example.com/foo/bar"));
    /// ```
    pub fn glob(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid glob '{}': {}", pattern, e))
        })?;

        Ok(Self {
            kind: PatternKind::Glob,
            source: pattern.to_string(),
            regex,
        })
    }

    /// Creates a regular expression pattern
    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| {
            ConfigError::InvalidPattern(format!("Invalid regex '{}': {}", pattern, e))
        })?;

        Ok(Self {
            kind: PatternKind::Regex,
            source: pattern.to_string(),
            regex,
        })
    }

    /// Parses the textual pattern syntax used in configuration files and
    /// on the command line
    ///
    /// A pattern wrapped in `#` delimiters (`#\.pdf$#`) is a regular
    /// expression, anything else is a glob.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::InvalidPattern(
                "Exclude pattern cannot be empty".to_string(),
            ));
        }

        match pattern
            .strip_prefix('#')
            .and_then(|rest| rest.strip_suffix('#'))
        {
            Some(inner) => Self::regex(inner),
            None => Self::glob(pattern),
        }
    }

    /// Checks whether a candidate (normalized URI) matches this pattern
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    /// The pattern as it was written
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for ExcludePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExcludePattern")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ExcludePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            PatternKind::Glob => f.write_str(&self.source),
            PatternKind::Regex => write!(f, "#{}#", self.source),
        }
    }
}

/// Returns true if any of the patterns matches the candidate
pub fn matches_any(patterns: &[ExcludePattern], candidate: &str) -> bool {
    patterns.iter().any(|pattern| pattern.matches(candidate))
}

/// Translates a shell-style wildcard into an anchored regular expression
///
/// `*` matches any run of characters (slashes included), `?` a single
/// character, and `[...]` / `[!...]` a character class. An unterminated
/// `[` is taken literally.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut regex = String::with_capacity(glob.len() * 2 + 2);
    regex.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    regex.push('[');
                    let mut j = i + 1;
                    if chars[j] == '!' || chars[j] == '^' {
                        regex.push('^');
                        j += 1;
                    }
                    for &c in &chars[j..end] {
                        if matches!(c, '\\' | '[' | ']' | '&' | '~') {
                            regex.push('\\');
                        }
                        regex.push(c);
                    }
                    regex.push(']');
                    i = end;
                }
                None => regex.push_str("\\["),
            },
            c => regex.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }

    regex.push('$');
    regex
}

/// Finds the closing bracket of a character class opened at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if j < chars.len() && (chars[j] == '!' || chars[j] == '^') {
        j += 1;
    }
    // A leading `]` is part of the class
    if j < chars.len() && chars[j] == ']' {
        j += 1;
    }
    chars[j.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

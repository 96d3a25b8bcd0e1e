//! Filename glob matching
//!
//! Patterns are shell-style (`*`, `?`, `[...]`, `[^...]`, `[!...]`, `\` escapes)
//! and are evaluated against the last path segment only. The empty pattern
//! and the bare `*` match everything without going through the glob engine.

use crate::error::EngineError;
use glob::{MatchOptions, Pattern};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A validated filename pattern
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    source: String,
    compiled: Option<Pattern>,
}

impl PatternMatcher {
    /// Validate and compile `pattern`
    pub fn new(pattern: &str) -> Result<Self, EngineError> {
        if is_match_all(pattern) {
            return Ok(Self {
                source: pattern.to_string(),
                compiled: None,
            });
        }

        let translated = translate(pattern)?;
        let compiled = Pattern::new(&translated).map_err(|e| EngineError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.msg.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            compiled: Some(compiled),
        })
    }

    /// The pattern as the user wrote it
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match_all(&self) -> bool {
        self.compiled.is_none()
    }

    /// Evaluate against a base filename (never a full path)
    pub fn matches(&self, filename: &str) -> bool {
        match &self.compiled {
            None => true,
            Some(pattern) => pattern.matches_with(filename, MATCH_OPTIONS),
        }
    }
}

/// One-shot form: validate `pattern` and evaluate it against `filename`
pub fn matches(filename: &str, pattern: &str) -> Result<bool, EngineError> {
    Ok(PatternMatcher::new(pattern)?.matches(filename))
}

fn is_match_all(pattern: &str) -> bool {
    pattern.is_empty() || pattern == "*"
}

/// Rewrite shell glob syntax into the dialect the `glob` crate understands.
///
/// - `[^...]` becomes `[!...]`; a leading `!` in a class is a plain member
/// - `\c` outside a class becomes `[c]`
/// - runs of `*` collapse to one (`**` is only legal as a whole path component there)
fn translate(pattern: &str) -> Result<String, EngineError> {
    let invalid = |message: &str| EngineError::InvalidPattern {
        pattern: pattern.to_string(),
        message: message.to_string(),
    };

    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' => {
                let Some(&escaped) = chars.get(i + 1) else {
                    return Err(invalid("trailing backslash escape"));
                };
                match escaped {
                    '[' | ']' | '*' | '?' => {
                        out.push('[');
                        out.push(escaped);
                        out.push(']');
                    }
                    other => out.push(other),
                }
                i += 2;
            }
            '*' => {
                out.push('*');
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                i += 1;
            }
            '[' => {
                let mut j = i + 1;
                let negated = chars.get(j) == Some(&'^');
                if negated {
                    j += 1;
                }
                // A ']' right after the opener is a literal member.
                let start = j;
                if chars.get(j) == Some(&']') {
                    j += 1;
                }
                while chars.get(j).is_some_and(|&c| c != ']') {
                    j += 1;
                }
                if j >= chars.len() {
                    return Err(invalid("unterminated character class"));
                }
                push_class(&mut out, negated, &chars[start..j]);
                i = j + 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Emit one bracket class. `glob` reads a leading `!` as negation, so a
/// literal leading `!` is moved to the end of the class.
fn push_class(out: &mut String, negated: bool, members: &[char]) {
    let mut members = members.to_vec();
    let mut trailing_bang = false;
    if !negated {
        while members.first() == Some(&'!') {
            trailing_bang = true;
            if members.get(1) == Some(&'-') && members.len() > 2 {
                // Range starting at '!': begin one past it and add '!' on its own.
                members[0] = '"';
                break;
            }
            members.remove(0);
        }
        if members.is_empty() {
            out.push('!');
            return;
        }
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    out.extend(members);
    if trailing_bang {
        out.push('!');
    }
    out.push(']');
}

//! Comment removal ahead of scanning.
//!
//! Removed block comments keep their newlines so that line numbers reported
//! by the scanner still match the file. Quoted text on a single line is
//! copied through untouched: `"http://host"` is a string, not a comment.

/// Source text with comments removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrippedSource {
    pub text: String,
    pub line_comments: usize,
    pub block_comments: usize,
}

impl StrippedSource {
    pub fn comment_count(&self) -> usize {
        self.line_comments + self.block_comments
    }
}

/// Strip `//` and `/* */` comments.
///
/// A `/*` with no matching `*/` is left in place and scans as `/` and `*`.
pub fn strip_comments(source: &str) -> StrippedSource {
    let chars: Vec<char> = source.chars().collect();
    let mut stripped = StrippedSource {
        text: String::with_capacity(source.len()),
        ..Default::default()
    };

    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();

        match (c, next) {
            ('/', Some('/')) => {
                stripped.line_comments += 1;
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            ('/', Some('*')) => match block_end(&chars, i) {
                Some(end) => {
                    let newlines = chars[i..end].iter().filter(|&&c| c == '\n').count();
                    stripped.text.extend(std::iter::repeat('\n').take(newlines));
                    stripped.block_comments += 1;
                    i = end;
                }
                // No closing `*/`: the slash is ordinary text
                None => {
                    stripped.text.push(c);
                    i += 1;
                }
            },
            ('"', _) => {
                let end = quoted_end(&chars, i, '"');
                stripped.text.extend(&chars[i..end]);
                i = end;
            }
            ('\'', _) => {
                let end = char_literal_end(&chars, i);
                stripped.text.extend(&chars[i..end]);
                i = end;
            }
            _ => {
                stripped.text.push(c);
                i += 1;
            }
        }
    }

    stripped
}

/// End (exclusive) of the block comment opened at `open`
fn block_end(chars: &[char], open: usize) -> Option<usize> {
    (open + 2..chars.len().saturating_sub(1))
        .find(|&j| chars[j] == '*' && chars[j + 1] == '/')
        .map(|j| j + 2)
}

/// End (exclusive) of a quoted run closed on the same line; a lone quote
/// covers only itself
fn quoted_end(chars: &[char], open: usize, quote: char) -> usize {
    for (offset, &c) in chars[open + 1..].iter().enumerate() {
        if c == quote {
            return open + offset + 2;
        }
        if c == '\n' {
            break;
        }
    }
    open + 1
}

fn char_literal_end(chars: &[char], open: usize) -> usize {
    match (chars.get(open + 1), chars.get(open + 2)) {
        (Some(&c), Some(&'\'')) if c != '\'' && c != '\n' => open + 3,
        _ => open + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_removed() {
        let stripped = strip_comments("whole x -> 1; // note\nsay x;");
        assert_eq!(stripped.text, "whole x -> 1; \nsay x;");
        assert_eq!(stripped.line_comments, 1);
    }

    #[test]
    fn test_block_comment_keeps_newlines() {
        let stripped = strip_comments("a /* one\ntwo\n*/ b");
        assert_eq!(stripped.text, "a \n\n b");
        assert_eq!(stripped.block_comments, 1);
        assert_eq!(stripped.comment_count(), 1);
    }

    #[test]
    fn test_block_comment_is_non_greedy() {
        let stripped = strip_comments("/* a */ x /* b */");
        assert_eq!(stripped.text, " x ");
        assert_eq!(stripped.block_comments, 2);
    }

    #[test]
    fn test_comment_markers_inside_quotes_survive() {
        let stripped = strip_comments("say \"http://kh\"; say '/';");
        assert_eq!(stripped.text, "say \"http://kh\"; say '/';");
        assert_eq!(stripped.comment_count(), 0);
    }

    #[test]
    fn test_unclosed_block_opener_is_kept() {
        let stripped = strip_comments("x;\n/* never closed\n");
        assert_eq!(stripped.text, "x;\n/* never closed\n");
        assert_eq!(stripped.block_comments, 0);

        let stripped = strip_comments("4 /* 2; // tail\n");
        assert_eq!(stripped.text, "4 /* 2; \n");
        assert_eq!(stripped.line_comments, 1);
    }
}

//! L4: tokenizes the edit buffer's raw text for display coloring
//! (spec.md §4.8). ASCII-oriented, matching the word-boundary scope the
//! rest of the editor assumes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Command,
    Flag,
    Variable,
    StringLit,
    Comment,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub kind: TokenKind,
}

fn is_word_boundary(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'#' | b'\'' | b'"' | b'$')
}

/// Tokenizes `line` into colorable spans. Only tokens that carry a color
/// (command, flag, variable, string, comment) are emitted; plain text
/// between them is left for the caller to pass through uncolored.
pub fn tokenize(line: &str) -> Vec<Token> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut first_word_done = false;

    while i < bytes.len() {
        let c = bytes[i];

        if c == b' ' || c == b'\t' {
            i += 1;
            continue;
        }

        if c == b'#' {
            tokens.push(Token {
                start: i,
                end: bytes.len(),
                kind: TokenKind::Comment,
            });
            break;
        }

        if c == b'\'' || c == b'"' {
            let quote = c;
            let start = i;
            i += 1;
            while i < bytes.len() && bytes[i] != quote {
                i += 1;
            }
            if i < bytes.len() {
                i += 1;
            }
            tokens.push(Token {
                start,
                end: i,
                kind: TokenKind::StringLit,
            });
            first_word_done = true;
            continue;
        }

        if c == b'$' {
            let start = i;
            i += 1;
            if i < bytes.len() && bytes[i] == b'{' {
                i += 1;
                while i < bytes.len() && bytes[i] != b'}' {
                    i += 1;
                }
                if i < bytes.len() {
                    i += 1;
                }
            } else if i < bytes.len() && matches!(bytes[i], b'?' | b'$' | b'!' | b'#' | b'*' | b'@') {
                i += 1;
            } else {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
            }
            tokens.push(Token {
                start,
                end: i,
                kind: TokenKind::Variable,
            });
            first_word_done = true;
            continue;
        }

        let start = i;
        while i < bytes.len() && !is_word_boundary(bytes[i]) {
            i += 1;
        }
        let kind = if !first_word_done {
            TokenKind::Command
        } else if bytes[start] == b'-' {
            TokenKind::Flag
        } else {
            TokenKind::Plain
        };
        if kind != TokenKind::Plain {
            tokens.push(Token { start, end: i, kind });
        }
        first_word_done = true;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_word_is_command() {
        let tokens = tokenize("echo hello");
        assert_eq!(tokens[0].kind, TokenKind::Command);
        assert_eq!(&"echo hello"[tokens[0].start..tokens[0].end], "echo");
    }

    #[test]
    fn dash_word_is_flag() {
        let tokens = tokenize("ls -la");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Flag));
    }

    #[test]
    fn dollar_var_is_variable_token() {
        let line = "echo $HOME";
        let tokens = tokenize(line);
        let var = tokens.iter().find(|t| t.kind == TokenKind::Variable).unwrap();
        assert_eq!(&line[var.start..var.end], "$HOME");
    }

    #[test]
    fn braced_var_spans_to_closing_brace() {
        let line = "echo ${HOME}";
        let tokens = tokenize(line);
        let var = tokens.iter().find(|t| t.kind == TokenKind::Variable).unwrap();
        assert_eq!(&line[var.start..var.end], "${HOME}");
    }

    #[test]
    fn quoted_string_spans_to_closing_quote() {
        let line = "echo \"hello world\"";
        let tokens = tokenize(line);
        let s = tokens.iter().find(|t| t.kind == TokenKind::StringLit).unwrap();
        assert_eq!(&line[s.start..s.end], "\"hello world\"");
    }

    #[test]
    fn hash_starts_comment_to_end_of_line() {
        let line = "echo hi # a comment";
        let tokens = tokenize(line);
        let comment = tokens.iter().find(|t| t.kind == TokenKind::Comment).unwrap();
        assert_eq!(&line[comment.start..comment.end], "# a comment");
    }

    #[test]
    fn plain_words_are_not_tokenized() {
        let tokens = tokenize("echo plainword");
        assert!(tokens.iter().all(|t| t.kind != TokenKind::Plain));
        assert_eq!(tokens.len(), 1);
    }
}

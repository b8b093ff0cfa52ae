//! Decomposes a glob word into the literal directory prefix that names no
//! meta-characters, the pattern component that does, and a trailing
//! qualifier block (none are part of the source shell's own glob syntax
//! here; `fswalk` stops at the match and does not apply qualifiers beyond
//! what `matcher` understands).

/// True if `s` contains any character the matcher treats specially.
pub fn has_glob_metachar(s: &str) -> bool {
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' | '?' | '[' | '~' | '(' | '|' => return true,
            '\\' => {
                chars.next();
            }
            _ => {}
        }
    }
    false
}

/// Splits a path-like glob word into path components, each either literal
/// or containing meta-characters. `a/b*/c` -> `["a", "b*", "c"]`.
pub fn split_components(word: &str) -> Vec<&str> {
    if word.is_empty() {
        return vec![""];
    }
    word.split('/').collect()
}

/// Finds the longest literal (non-meta) leading directory prefix of a
/// glob word, e.g. `src/foo/*.rs` -> (`src/foo`, `*.rs`).
pub fn split_literal_prefix(word: &str) -> (String, String) {
    let components = split_components(word);
    let mut literal_end = 0;
    for (i, comp) in components.iter().enumerate() {
        if has_glob_metachar(comp) {
            break;
        }
        literal_end = i + 1;
    }
    if literal_end == components.len() {
        // No meta-characters anywhere; the whole word is the literal part.
        return (word.to_string(), String::new());
    }
    let prefix = components[..literal_end].join("/");
    let rest = components[literal_end..].join("/");
    (prefix, rest)
}

/// File-type qualifier trailing a basename pattern: `(.)` plain file,
/// `(@)` symlink, `(/)` directory, `(*)` executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    File,
    Symlink,
    Directory,
    Executable,
}

impl Qualifier {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Qualifier::File),
            '@' => Some(Qualifier::Symlink),
            '/' => Some(Qualifier::Directory),
            '*' => Some(Qualifier::Executable),
            _ => None,
        }
    }
}

/// A decomposed basename pattern: the core match pattern, an optional
/// exclusion pattern (`pat~excl`), and an optional trailing type
/// qualifier (`pat(/)`).
pub struct GlobPattern {
    pub base: String,
    pub exclusion: Option<String>,
    pub qualifier: Option<Qualifier>,
}

/// Decomposes a single basename pattern component into base, exclusion,
/// and qualifier, per the trailing-`(X)` and top-level-`~` grammar.
pub fn decompose(component: &str) -> GlobPattern {
    let mut rest = component;
    let mut qualifier = None;

    if rest.ends_with(')') && rest.len() >= 3 {
        let open = rest.len() - 3;
        if rest.as_bytes()[open] == b'(' {
            let tag = rest.chars().nth(open + 1).unwrap();
            if let Some(q) = Qualifier::from_char(tag) {
                qualifier = Some(q);
                rest = &rest[..open];
            }
        }
    }

    let (base, exclusion) = match rest.find('~') {
        Some(idx) => (rest[..idx].to_string(), Some(rest[idx + 1..].to_string())),
        None => (rest.to_string(), None),
    };

    GlobPattern {
        base,
        exclusion,
        qualifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decomposes_qualifier() {
        let p = decompose("*.rs(/)");
        assert_eq!(p.base, "*.rs");
        assert_eq!(p.qualifier, Some(Qualifier::Directory));
    }

    #[test]
    fn decomposes_exclusion() {
        let p = decompose("*.rs~*_test.rs");
        assert_eq!(p.base, "*.rs");
        assert_eq!(p.exclusion.as_deref(), Some("*_test.rs"));
    }

    #[test]
    fn plain_pattern_has_neither() {
        let p = decompose("*.rs");
        assert_eq!(p.base, "*.rs");
        assert!(p.exclusion.is_none());
        assert!(p.qualifier.is_none());
    }

    #[test]
    fn detects_metachars() {
        assert!(has_glob_metachar("*.rs"));
        assert!(has_glob_metachar("file?.txt"));
        assert!(has_glob_metachar("[abc]"));
        assert!(!has_glob_metachar("plain.txt"));
    }

    #[test]
    fn escaped_metachar_does_not_count() {
        assert!(!has_glob_metachar("literal\\*star"));
    }

    #[test]
    fn splits_literal_prefix() {
        let (prefix, rest) = split_literal_prefix("src/foo/*.rs");
        assert_eq!(prefix, "src/foo");
        assert_eq!(rest, "*.rs");
    }

    #[test]
    fn no_prefix_when_first_component_has_meta() {
        let (prefix, rest) = split_literal_prefix("*.rs");
        assert_eq!(prefix, "");
        assert_eq!(rest, "*.rs");
    }

    #[test]
    fn whole_word_literal_when_no_meta() {
        let (prefix, rest) = split_literal_prefix("a/b/c.txt");
        assert_eq!(prefix, "a/b/c.txt");
        assert_eq!(rest, "");
    }
}

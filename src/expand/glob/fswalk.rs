//! Walks the filesystem against a decomposed glob pattern, one path
//! component at a time, applying `GLOB_MATCH_CAP` and falling back to the
//! literal pattern text when nothing matches (spec.md §4.7: globbing
//! never fails a command, an unmatched pattern just passes through).

use std::fs;
use std::path::{Path, PathBuf};

use crate::limits::GLOB_MATCH_CAP;

use super::matcher;
use super::pattern::{decompose, has_glob_metachar, split_components, split_literal_prefix, Qualifier};

/// True if any path component of `word` contains a glob meta-character.
fn is_glob_word(word: &str) -> bool {
    split_components(word).iter().any(|c| has_glob_metachar(c))
}

fn dot_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn qualifier_matches(qualifier: Qualifier, entry: &fs::DirEntry) -> bool {
    let Ok(meta) = entry.metadata() else {
        return false;
    };
    match qualifier {
        Qualifier::File => meta.is_file(),
        Qualifier::Directory => meta.is_dir(),
        Qualifier::Symlink => entry.path().symlink_metadata().map(|m| m.is_symlink()).unwrap_or(false),
        Qualifier::Executable => is_executable(&meta),
    }
}

#[cfg(unix)]
fn is_executable(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(meta: &fs::Metadata) -> bool {
    meta.is_file()
}

/// Walks the single `component` pattern against entries of `base` (an
/// existing directory, or "." for a relative search with no directory
/// prefix), appending matches to `out`. Dotfiles only match when the
/// pattern itself starts with `.`, matching the conventional shell rule.
/// `component` may carry a trailing type qualifier and a `~exclusion`.
fn walk_component(base: &Path, component: &str, out: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(base) {
        Ok(e) => e,
        Err(_) => return,
    };
    let decomposed = decompose(component);
    let leading_dot = decomposed.base.starts_with('.');
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = match name.to_str() {
            Some(n) => n,
            None => continue,
        };
        if dot_hidden(name) && !leading_dot {
            continue;
        }
        if !matcher::matches(&decomposed.base, name) {
            continue;
        }
        if let Some(exclusion) = &decomposed.exclusion {
            if matcher::matches(exclusion, name) {
                continue;
            }
        }
        if let Some(qualifier) = decomposed.qualifier {
            if !qualifier_matches(qualifier, &entry) {
                continue;
            }
        }
        out.push(entry.path());
    }
}

/// Recursively matches the remaining pattern components against the
/// filesystem rooted at `base`.
fn walk(base: &Path, components: &[&str], out: &mut Vec<PathBuf>) {
    if out.len() >= GLOB_MATCH_CAP {
        return;
    }
    match components.split_first() {
        None => out.push(base.to_path_buf()),
        Some((head, rest)) => {
            if !has_glob_metachar(head) {
                let next = base.join(head);
                if rest.is_empty() {
                    if next.exists() {
                        out.push(next);
                    }
                } else {
                    walk(&next, rest, out);
                }
                return;
            }
            let mut matched = Vec::new();
            walk_component(base, head, &mut matched);
            matched.sort();
            for path in matched {
                if out.len() >= GLOB_MATCH_CAP {
                    break;
                }
                if rest.is_empty() {
                    out.push(path);
                } else {
                    walk(&path, rest, out);
                }
            }
        }
    }
}

/// Expands a single already variable-expanded word against the
/// filesystem. Returns `[word]` unchanged if the word contains no glob
/// meta-characters, or if it does but nothing on disk matches.
pub fn expand(word: &str) -> Vec<String> {
    if !is_glob_word(word) {
        return vec![word.to_string()];
    }

    let (literal_prefix, rest) = split_literal_prefix(word);
    let base: PathBuf = if literal_prefix.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(&literal_prefix)
    };
    if !literal_prefix.is_empty() && !base.exists() {
        return vec![word.to_string()];
    }

    let components: Vec<&str> = split_components(&rest).into_iter().filter(|c| !c.is_empty()).collect();
    if components.is_empty() {
        return vec![word.to_string()];
    }

    let mut matches = Vec::new();
    walk(&base, &components, &mut matches);
    matches.truncate(GLOB_MATCH_CAP);

    if matches.is_empty() {
        return vec![word.to_string()];
    }

    let mut paths: Vec<String> = matches
        .into_iter()
        .map(|p| {
            if literal_prefix.is_empty() {
                p.strip_prefix("./").map(|s| s.to_path_buf()).unwrap_or(p)
            } else {
                p
            }
        })
        .map(|p| p.to_string_lossy().into_owned())
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    fn tmp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("shellcore_glob_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn no_meta_chars_passes_through() {
        assert_eq!(expand("plain/path.txt"), vec!["plain/path.txt".to_string()]);
    }

    #[test]
    fn matches_files_in_directory() {
        let dir = tmp_dir("basic");
        File::create(dir.join("a.txt")).unwrap();
        File::create(dir.join("b.txt")).unwrap();
        File::create(dir.join("c.log")).unwrap();

        let pattern = format!("{}/*.txt", dir.display());
        let mut result = expand(&pattern);
        result.sort();
        assert_eq!(result.len(), 2);
        assert!(result[0].ends_with("a.txt"));
        assert!(result[1].ends_with("b.txt"));
    }

    #[test]
    fn dotfiles_excluded_unless_pattern_starts_with_dot() {
        let dir = tmp_dir("dotfiles");
        File::create(dir.join(".hidden")).unwrap();
        File::create(dir.join("visible")).unwrap();

        let star = format!("{}/*", dir.display());
        let result = expand(&star);
        assert!(result.iter().all(|p| !p.ends_with(".hidden")));

        let dotstar = format!("{}/.*", dir.display());
        let result = expand(&dotstar);
        assert!(result.iter().any(|p| p.ends_with(".hidden")));
    }

    #[test]
    fn exclusion_filters_out_matches() {
        let dir = tmp_dir("exclusion");
        File::create(dir.join("a.rs")).unwrap();
        File::create(dir.join("a_test.rs")).unwrap();

        let pattern = format!("{}/*.rs~*_test.rs", dir.display());
        let result = expand(&pattern);
        assert_eq!(result.len(), 1);
        assert!(result[0].ends_with("a.rs"));
    }

    #[test]
    fn qualifier_restricts_to_directories() {
        let dir = tmp_dir("qualifier");
        File::create(dir.join("file.txt")).unwrap();
        fs::create_dir(dir.join("subdir")).unwrap();

        let pattern = format!("{}/*(/)", dir.display());
        let result = expand(&pattern);
        assert_eq!(result.len(), 1);
        assert!(result[0].ends_with("subdir"));
    }

    #[test]
    fn no_match_falls_back_to_literal() {
        let dir = tmp_dir("nomatch");
        let pattern = format!("{}/*.nonexistent", dir.display());
        assert_eq!(expand(&pattern), vec![pattern]);
    }
}

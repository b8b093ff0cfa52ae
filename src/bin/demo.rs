//! Small interactive demo exercising the line editor end-to-end: reads a
//! line, runs the expansion pipeline over it, echoes the resulting argv,
//! and records it in history. Grounded on the teacher's
//! `setup_panic_hook`/`setup_terminal`/`restore_terminal` pattern, adapted
//! from a `ratatui` alternate-screen session to this crate's own raw-mode
//! `Terminal`.

use std::collections::HashMap;
use std::panic;

use shellcore::editor::LineEditor;
use shellcore::expand::{self, ExpansionContext};
use shellcore::history::{expand_history, HistoryRing};
use shellcore::terminal::{self, Terminal};

/// Restores cooked mode before the default panic hook runs, so a panic
/// mid-edit never leaves the terminal raw.
fn install_panic_hook() {
    let original = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = Terminal::new().disable_raw();
        original(info);
    }));
}

fn main() {
    install_panic_hook();
    terminal::install_signal_handlers();

    let mut editor = LineEditor::new();
    editor.set_completion_callback(|prefix, _line_upto_cursor| {
        complete_path(prefix)
    });

    let mut history = HistoryRing::new(shellcore::limits::HISTORY_CAPACITY);
    let env: HashMap<String, String> = std::env::vars().collect();

    loop {
        match editor.read_line("shellcore> ", &history) {
            Ok(None) => {
                println!("exit");
                break;
            }
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let (expanded, _occurred) = expand_history(&line, &history, None);
                history.push(&expanded);

                let mut ctx = ExpansionContext::new(env.clone());
                ctx.positional = vec!["shellcore-demo".to_string()];
                let words = expand::expand_words(expanded.split_whitespace(), &ctx);
                println!("{words:?}");
            }
            Err(_) => {
                continue;
            }
        }
    }
}

/// Minimal basename completion used only by the demo: lists entries of
/// the prefix's directory (or cwd) whose name starts with the typed
/// partial basename.
fn complete_path(typed: &str) -> Vec<String> {
    let (dir, partial) = match typed.rfind('/') {
        Some(idx) => (&typed[..idx + 1], &typed[idx + 1..]),
        None => ("", typed),
    };
    let search_dir = if dir.is_empty() { "." } else { dir };
    let entries = match std::fs::read_dir(search_dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };
    entries
        .flatten()
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| name.starts_with(partial))
        .collect()
}

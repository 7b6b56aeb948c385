//! Lint: key hints (`[X]`) drawn by a `render.rs` must be clickable.
//!
//! List rows go through `ClickableList::push_clickable()` and button rows
//! through `TabBar::tab()`. A plain `.push(` carrying a key hint draws a button
//! that taps cannot reach. Hints built at runtime (`format!("[{}]", key)`)
//! are not literal and are not flagged.
//!
//! Scans every `render.rs` under `src/games/`.

use std::fs;
use std::path::{Path, PathBuf};

/// True when `s` holds a one-character bracket hint such as `[v]`, `[1]` or `[-]`.
fn contains_bracket_key(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || b"-=!~{}|\\".contains(&w[1]))
    })
}

/// `(line number, trimmed line)` of every non-clickable push with a key hint.
fn find_bracket_key_in_push(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.starts_with("//"))
        .filter(|(_, line)| line.contains(".push(") && !line.contains("push_clickable("))
        .filter(|(_, line)| contains_bracket_key(line))
        .map(|(n, line)| (n, line.to_string()))
        .collect()
}

fn render_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            render_files(&path, out);
        } else if path.file_name().is_some_and(|n| n == "render.rs") {
            out.push(path);
        }
    }
}

#[test]
fn no_bracket_keys_in_non_clickable_push() {
    let mut files = Vec::new();
    render_files(&Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games"), &mut files);
    assert!(!files.is_empty(), "no render.rs found under src/games");

    let mut report = String::new();
    for path in &files {
        let Ok(source) = fs::read_to_string(path) else {
            continue;
        };
        for (line_num, line) in find_bracket_key_in_push(&source) {
            report.push_str(&format!("  {}:{}: {}\n", path.display(), line_num, line));
        }
    }

    assert!(
        report.is_empty(),
        "Key hints [X] drawn by a non-clickable push().\n\
         List rows should use push_clickable(); button rows belong in a TabBar.\n\n{}",
        report
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_bracket_key_in_push() {
        let source = r#"cl.push(Line::from(" [v] Buy all  [s] Save"));"#;
        assert_eq!(find_bracket_key_in_push(source).len(), 1);
    }

    #[test]
    fn reports_line_numbers() {
        let source = "let a = 1;\ncl.push(Line::from(\"[r] Compete\"));\n";
        assert_eq!(find_bracket_key_in_push(source)[0].0, 2);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [a] Better Form"), actions::ITEM_BASE);"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn allows_formatted_item_keys() {
        let source = r#"cl.push(Line::from(format!("{} {}", key_label(row), name)));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [r] Compete"));"#;
        assert!(find_bracket_key_in_push(source).is_empty());
    }

    #[test]
    fn bracket_key_detection() {
        assert!(contains_bracket_key("[v]"));
        assert!(contains_bracket_key("[S]"));
        assert!(contains_bracket_key("[1]"));
        assert!(contains_bracket_key("[-]"));
        assert!(!contains_bracket_key("[]"));
        assert!(!contains_bracket_key("[II]"));
        assert!(!contains_bracket_key("[SPACE]"));
        assert!(!contains_bracket_key("[ ] switch"));
        assert!(!contains_bracket_key("ab"));
    }
}

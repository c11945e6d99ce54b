//! Locating the title line of a note.

/// Splits a leading YAML frontmatter block from the note body.
///
/// The block must open with a `---` line and close with `---` or `...`.
/// Returns `(frontmatter, body)`; an unterminated block is not frontmatter.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let Some(opening) = lines.next() else {
        return (None, content);
    };
    if opening.trim_end() != "---" {
        return (None, content);
    }

    let start = opening.len();
    let mut pos = start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == "---" || trimmed == "..." {
            return (Some(&content[start..pos]), &content[pos + line.len()..]);
        }
        pos += line.len();
    }

    (None, content)
}

/// Returns the first non-blank line after any frontmatter.
pub fn first_line(content: &str) -> Option<&str> {
    let (_, body) = split_frontmatter(content);
    body.lines().find(|line| !line.trim().is_empty())
}

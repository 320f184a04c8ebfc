//! Comment and trailing-comma tolerant JSON preprocessing.
//!
//! `tsconfig.json` is JSON with comments. The scanner below walks the text
//! once, tracking whether it is inside a string literal, so that sequences
//! like `"@/*"` survive while real comments are blanked out.

/// Remove `//` line comments and `/* */` block comments.
///
/// Newlines inside removed comments are kept so that `serde_json` error
/// positions still point at the right line.
pub fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    if c == '\n' {
                        out.push('\n');
                    }
                    prev = c;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Remove commas that directly precede a closing `}` or `]`.
pub fn strip_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_string = false;
    let mut escaped = false;
    // Index in `out` of a comma that may turn out to be trailing.
    let mut pending_comma: Option<usize> = None;

    for ch in input.chars() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            ',' => {
                pending_comma = Some(out.len());
                out.push(ch);
            }
            '}' | ']' => {
                if let Some(idx) = pending_comma.take() {
                    out.remove(idx);
                }
                out.push(ch);
            }
            c if c.is_whitespace() => out.push(c),
            '"' => {
                pending_comma = None;
                in_string = true;
                out.push(ch);
            }
            _ => {
                pending_comma = None;
                out.push(ch);
            }
        }
    }

    out
}

/// Full preprocessing pass applied before handing text to `serde_json`.
pub fn to_strict_json(input: &str) -> String {
    strip_trailing_commas(&strip_comments(input))
}

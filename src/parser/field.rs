//! Structured field tokenizer: quoted-strings, escapes and whitespace canonicalization.

/// `LWSP-char = SPACE / HTAB`
pub(crate) fn is_lwsp(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FieldState {
    Plain,
    Space,
    Quoted,
    Escaped,
}

/// Tokenize a raw structured header value.
///
/// Runs of horizontal whitespace collapse to a single space, a quoted-string
/// is copied without its quotes (with `\x` unescaped to `x`), and anything
/// after the closing quote is dropped. The result is trimmed.
///
/// # Examples
/// - `"text/plain"` → `"text/plain"`
/// - `"Hello,   World"` → `"Hello, World"`
/// - `"\"a \\\"b\\\"\" tail"` → `"a \"b\""`
pub fn tokenize(raw: &str) -> String {
    let mut state = FieldState::Plain;
    let mut output = String::with_capacity(raw.len());

    for c in raw.chars() {
        match state {
            FieldState::Plain => {
                if is_lwsp(c) {
                    state = FieldState::Space;
                } else if c == '"' {
                    state = FieldState::Quoted;
                } else {
                    output.push(c);
                }
            }
            FieldState::Space => {
                if !is_lwsp(c) {
                    output.push(' ');
                    output.push(c);
                    state = FieldState::Plain;
                }
            }
            FieldState::Quoted => match c {
                '\\' => state = FieldState::Escaped,
                '"' => break,
                _ => output.push(c),
            },
            FieldState::Escaped => {
                output.push(c);
                state = FieldState::Quoted;
            }
        }
    }

    output.trim().to_string()
}

//! Translates the inline HTML markup Jenkins embeds in progressive console
//! output into terminal escape sequences.
//!
//! Four markup shapes are handled, always in this order: colored spans,
//! remaining plain spans, anchors, bold elements. The order is a contract:
//! a span that loses its color match in pass one must still be unwrapped by
//! pass two. Matching is non-greedy, non-recursive and never crosses a
//! newline; anything that does not match stays literal.

/// Terminal styling for a run of console text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStyle {
    Plain,
    Cyan,
    Yellow,
    Green,
    Red,
    Link,
    Bold,
}

impl ConsoleStyle {
    /// Looks up the style for a six-digit hex color from a console span.
    /// Colors outside the known palette render unstyled.
    pub fn for_hex(code: &str) -> Self {
        match code {
            "00CDCD" => ConsoleStyle::Cyan,
            "CDCD00" => ConsoleStyle::Yellow,
            "00CD00" => ConsoleStyle::Green,
            "CD0000" => ConsoleStyle::Red,
            _ => ConsoleStyle::Plain,
        }
    }

    /// Wraps `text` in the escape sequence for this style.
    pub fn paint(&self, text: &str) -> String {
        let (attr, color) = match self {
            ConsoleStyle::Plain => return text.to_string(),
            ConsoleStyle::Cyan => ("01;", 96),
            ConsoleStyle::Yellow => ("01;", 93),
            ConsoleStyle::Green => ("01;", 92),
            ConsoleStyle::Red => ("", 91),
            ConsoleStyle::Link => ("04;", 91),
            ConsoleStyle::Bold => ("01;", 97),
        };
        format!("\x1b[{attr}{color}m{text}\x1b[0m")
    }
}

const COLOR_SPAN_OPEN: &str = "<span style=\"color: #";
const COLOR_SPAN_OPEN_END: &str = ";\">";
const SPAN_CLOSE: &str = "</span>";

/// Converts console markup to styled terminal text.
///
/// Pure and infallible: malformed markup degrades to literal text. After the
/// four rewrite passes the two entities Jenkins emits are decoded and leading
/// whitespace is stripped from the whole result.
pub fn colorize(markup: &str) -> String {
    let s = rewrite_colored_spans(markup);
    let s = rewrite_tag(&s, "<span", Some('>'), SPAN_CLOSE, ConsoleStyle::Plain);
    let s = rewrite_tag(&s, "<a href=", Some('>'), "</a>", ConsoleStyle::Link);
    let s = rewrite_tag(&s, "<b>", None, "</b>", ConsoleStyle::Bold);
    let s = s.replace("&gt;", ">").replace("&lt;", "<");
    s.trim_start().to_string()
}

/// First pass: spans carrying an inline six-digit uppercase hex color.
fn rewrite_colored_spans(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(at) = rest.find(COLOR_SPAN_OPEN) {
        let (head, tail) = rest.split_at(at);
        out.push_str(head);
        match capture_colored(tail) {
            Some((style, text, consumed)) => {
                out.push_str(&style.paint(text));
                rest = &tail[consumed..];
            }
            None => {
                // Not a well-formed colored span; leave the text for the
                // plain-span pass.
                out.push_str(&tail[..COLOR_SPAN_OPEN.len()]);
                rest = &tail[COLOR_SPAN_OPEN.len()..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Parses one colored span at the start of `tail`. Returns the style, the
/// inner text and the number of bytes consumed.
fn capture_colored(tail: &str) -> Option<(ConsoleStyle, &str, usize)> {
    let hex_start = COLOR_SPAN_OPEN.len();
    let hex = tail.get(hex_start..hex_start + 6)?;
    if !hex
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
    {
        return None;
    }
    let after_hex = &tail[hex_start + 6..];
    if !after_hex.starts_with(COLOR_SPAN_OPEN_END) {
        return None;
    }
    let body = &after_hex[COLOR_SPAN_OPEN_END.len()..];
    let close_at = body.find(SPAN_CLOSE)?;
    if body[..close_at].contains('\n') {
        return None;
    }
    let consumed =
        hex_start + 6 + COLOR_SPAN_OPEN_END.len() + close_at + SPAN_CLOSE.len();
    Some((ConsoleStyle::for_hex(hex), &body[..close_at], consumed))
}

/// One rewrite pass over a single markup shape. `open` is the literal start
/// of the opening tag; when `attr_end` is set the tag runs to the nearest
/// such character on the same line. Content runs to the nearest `close`.
fn rewrite_tag(
    input: &str,
    open: &str,
    attr_end: Option<char>,
    close: &str,
    style: ConsoleStyle,
) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(at) = rest.find(open) {
        let (head, tail) = rest.split_at(at);
        out.push_str(head);
        match capture_tag(tail, open.len(), attr_end, close) {
            Some((text, consumed)) => {
                out.push_str(&style.paint(text));
                rest = &tail[consumed..];
            }
            None => {
                out.push_str(&tail[..open.len()]);
                rest = &tail[open.len()..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Finds the content between an opening tag and `close`, confined to one
/// line. Returns the content and the number of bytes consumed.
fn capture_tag<'a>(
    tail: &'a str,
    open_len: usize,
    attr_end: Option<char>,
    close: &str,
) -> Option<(&'a str, usize)> {
    let mut content_start = open_len;
    if let Some(end) = attr_end {
        let attrs = &tail[open_len..];
        let end_at = attrs.find(end)?;
        if attrs[..end_at].contains('\n') {
            return None;
        }
        content_start = open_len + end_at + end.len_utf8();
    }
    let body = &tail[content_start..];
    let close_at = body.find(close)?;
    if body[..close_at].contains('\n') {
        return None;
    }
    Some((&body[..close_at], content_start + close_at + close.len()))
}

//! Line based markdown to HTML rendering.
//!
//! Only a small subset of markdown is understood:
//!
//! * ATX headings (`#` to `######` followed by whitespace) become `<h1>`..`<h6>`
//! * consecutive `-`, `*` or `+` items become one `<ul>` of `<li>`
//! * a triple backtick fence emits `<pre><code>` and the next one
//!   `</code></pre>`; the lines between are escaped but never formatted, each
//!   followed by `\n`. An unterminated fence is closed at end of input
//! * blank lines become empty separators
//! * everything else becomes a `<p>`
//!
//! Headings, list items and paragraphs get inline formatting (see
//! [`format_inline`]). Blocks are joined with `\n`.
//!
//! ```
//! let html = askbox_core::markdown::render("# Title\n\n- one\n- two");
//! assert_eq!(html, "<h1>Title</h1>\n\n<ul><li>one</li><li>two</li></ul>");
//! ```

mod inline;

pub use inline::{escape_html, format_inline};

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-*+]\s+").unwrap());

const FENCE: &str = "```";

/// What the scan is in the middle of
enum Open {
    Nothing,
    List(Vec<String>),
    Code,
}

struct Renderer {
    blocks: Vec<String>,
    open: Open,
}

impl Renderer {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            open: Open::Nothing,
        }
    }

    fn flush_list(&mut self) {
        if let Open::List(items) = &mut self.open {
            let list = format!("<ul>{}</ul>", items.concat());
            self.open = Open::Nothing;
            self.blocks.push(list);
        }
    }

    fn open_code(&mut self) {
        self.flush_list();
        self.open = Open::Code;
        self.blocks.push("<pre><code>".to_string());
    }

    fn close_code(&mut self) {
        if matches!(self.open, Open::Code) {
            self.open = Open::Nothing;
            self.blocks.push("</code></pre>".to_string());
        }
    }

    fn push_line(&mut self, raw_line: &str) {
        let line = raw_line.trim_end();

        if line.starts_with(FENCE) {
            if matches!(self.open, Open::Code) {
                self.close_code();
            } else {
                self.open_code();
            }
            return;
        }

        if matches!(self.open, Open::Code) {
            self.blocks.push(format!("{}\n", escape_html(raw_line)));
            return;
        }

        if line.trim().is_empty() {
            self.flush_list();
            self.blocks.push(String::new());
            return;
        }

        if let Some(captures) = HEADING.captures(line) {
            self.flush_list();
            let level = captures[1].len();
            self.blocks.push(format!(
                "<h{level}>{}</h{level}>",
                format_inline(&captures[2])
            ));
            return;
        }

        if LIST_MARKER.is_match(line) {
            let item = format!("<li>{}</li>", format_inline(&LIST_MARKER.replace(line, "")));
            match &mut self.open {
                Open::List(items) => items.push(item),
                _ => self.open = Open::List(vec![item]),
            }
            return;
        }

        self.flush_list();
        self.blocks.push(format!("<p>{}</p>", format_inline(line)));
    }

    fn finish(mut self) -> String {
        self.flush_list();
        self.close_code();
        self.blocks.join("\n")
    }
}

/// Splits on `\r\n`, `\n` or `\r`. A terminator at the very end does not
/// start another line.
fn split_lines(input: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK.split(input).collect();
    if lines.len() > 1 && lines.last() == Some(&"") {
        lines.pop();
    }
    lines
}

/// Renders `markdown` into an HTML fragment.
pub fn render(markdown: &str) -> String {
    let mut renderer = Renderer::new();
    for line in split_lines(markdown) {
        renderer.push_line(line);
    }
    renderer.finish()
}

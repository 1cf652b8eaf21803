//! Free text to paragraph/run structure.
//!
//! Rich-text résumé fields (summaries, highlights) are typed by hand with a small
//! Markdown-compatible vocabulary. This module turns such text into [`Paragraph`]s of styled
//! [`Run`]s, which template helpers then write out as document markup.
//!
//! Rules:
//! - Every line break (`\r\n`, `\n` or `\r`) starts a new paragraph, blank lines included.
//! - A line that is exactly `-` or `*`, or starts with `-`/`*` followed by whitespace, is a
//!   bullet. The marker and the whitespace after it are dropped.
//! - A run of `*` or `_` characters splits into delimiters: pairs first (`**`, `__` = bold),
//!   then a leftover single (`*`, `_` = italic), so `***x***` is bold-italic. Bold and italic
//!   toggle independently.
//! - A delimiter opens only when followed by non-whitespace, closes only when preceded by
//!   non-whitespace, and closes only a span opened with the same character. `_` between two
//!   alphanumerics (`snake_case`) is literal. Delimiters left unpaired are literal text.
//!
//! Translation never fails: any input produces at least one paragraph, and every paragraph
//! has at least one run.

use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParagraphStyle {
    #[default]
    Normal,
    ListItem,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

impl RunStyle {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (false, false) => RunStyle::Normal,
            (true, false) => RunStyle::Bold,
            (false, true) => RunStyle::Italic,
            (true, true) => RunStyle::BoldItalic,
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, RunStyle::Bold | RunStyle::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, RunStyle::Italic | RunStyle::BoldItalic)
    }

    fn as_str(self) -> &'static str {
        match self {
            RunStyle::Normal => "normal",
            RunStyle::Bold => "bold",
            RunStyle::Italic => "italic",
            RunStyle::BoldItalic => "boldItalic",
        }
    }
}

/// A maximal stretch of text sharing one style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Run {
    pub style: RunStyle,
    pub text: String,
}

impl Run {
    pub fn new(style: RunStyle, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.style.is_bold()
    }

    pub fn is_italic(&self) -> bool {
        self.style.is_italic()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub style: ParagraphStyle,
    /// Never empty.
    pub runs: Vec<Run>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self {
            style: ParagraphStyle::Normal,
            runs: vec![Run::default()],
        }
    }
}

impl Paragraph {
    pub fn is_list_item(&self) -> bool {
        self.style == ParagraphStyle::ListItem
    }

    /// Run text concatenated, without any styling.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

// Templates see `{style, listItem, runs}` and `{style, text, bold, italic}` so they can
// branch on flags without string comparisons.
impl Serialize for Paragraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let style = match self.style {
            ParagraphStyle::Normal => "normal",
            ParagraphStyle::ListItem => "listItem",
        };
        let mut state = serializer.serialize_struct("Paragraph", 3)?;
        state.serialize_field("style", style)?;
        state.serialize_field("listItem", &self.is_list_item())?;
        state.serialize_field("runs", &self.runs)?;
        state.end()
    }
}

impl Serialize for Run {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Run", 4)?;
        state.serialize_field("style", self.style.as_str())?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("bold", &self.is_bold())?;
        state.serialize_field("italic", &self.is_italic())?;
        state.end()
    }
}

/// Translate free text into paragraphs, one per line.
pub fn translate(text: &str) -> Vec<Paragraph> {
    split_lines(text).into_iter().map(translate_line).collect()
}

fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut index = 0;

    while index < bytes.len() {
        match bytes[index] {
            b'\n' => {
                lines.push(&text[start..index]);
                index += 1;
                start = index;
            }
            b'\r' => {
                lines.push(&text[start..index]);
                index += if bytes.get(index + 1) == Some(&b'\n') { 2 } else { 1 };
                start = index;
            }
            _ => index += 1,
        }
    }
    lines.push(&text[start..]);
    lines
}

fn translate_line(line: &str) -> Paragraph {
    let (style, body) = match bullet_body(line) {
        Some(body) => (ParagraphStyle::ListItem, body),
        None => (ParagraphStyle::Normal, line),
    };

    let chars: Vec<char> = body.chars().collect();
    let mut delimiters = tokenise(&chars);
    pair(&mut delimiters);

    Paragraph {
        style,
        runs: emit(&chars, &delimiters),
    }
}

/// Text after the bullet marker, or `None` if the line is not a bullet.
fn bullet_body(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(|c: char| c == '-' || c == '*')?;
    if rest.is_empty() || rest.starts_with(char::is_whitespace) {
        Some(rest.trim_start())
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Literal,
    Open,
    Close,
}

#[derive(Clone, Copy, Debug)]
struct Delimiter {
    /// Char offset into the line body.
    start: usize,
    /// 2 for bold, 1 for italic.
    width: usize,
    marker: char,
    can_open: bool,
    can_close: bool,
    role: Role,
}

impl Delimiter {
    fn is_bold(&self) -> bool {
        self.width == 2
    }

    fn channel(&self) -> usize {
        usize::from(self.is_bold())
    }
}

fn tokenise(chars: &[char]) -> Vec<Delimiter> {
    let mut delimiters = Vec::new();
    let mut index = 0;

    while index < chars.len() {
        let marker = chars[index];
        if marker != '*' && marker != '_' {
            index += 1;
            continue;
        }

        let start = index;
        while index < chars.len() && chars[index] == marker {
            index += 1;
        }

        let before = start.checked_sub(1).map(|i| chars[i]);
        let after = chars.get(index).copied();
        let intraword = marker == '_'
            && before.is_some_and(char::is_alphanumeric)
            && after.is_some_and(char::is_alphanumeric);
        let can_open = !intraword && after.is_some_and(|c| !c.is_whitespace());
        let can_close = !intraword && before.is_some_and(|c| !c.is_whitespace());

        let len = index - start;
        let widths = std::iter::repeat(2)
            .take(len / 2)
            .chain((len % 2 == 1).then_some(1));
        let mut offset = start;
        for width in widths {
            delimiters.push(Delimiter {
                start: offset,
                width,
                marker,
                can_open,
                can_close,
                role: Role::Literal,
            });
            offset += width;
        }
    }

    delimiters
}

/// Left-to-right pairing with one pending opener per channel (bold, italic).
///
/// A later opener on a busy channel replaces the pending one, which stays literal.
fn pair(delimiters: &mut [Delimiter]) {
    let mut pending: [Option<usize>; 2] = [None, None];

    for index in 0..delimiters.len() {
        let current = delimiters[index];
        let slot = &mut pending[current.channel()];
        match *slot {
            Some(opener) if current.can_close && delimiters[opener].marker == current.marker => {
                delimiters[opener].role = Role::Open;
                delimiters[index].role = Role::Close;
                *slot = None;
            }
            _ if current.can_open => *slot = Some(index),
            _ => {}
        }
    }
}

fn emit(chars: &[char], delimiters: &[Delimiter]) -> Vec<Run> {
    let mut runs = Vec::new();
    let mut text = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut paired = delimiters
        .iter()
        .filter(|d| d.role != Role::Literal)
        .peekable();

    let mut index = 0;
    while index < chars.len() {
        if let Some(delimiter) = paired.next_if(|d| d.start == index) {
            push_run(&mut runs, &mut text, RunStyle::from_flags(bold, italic));
            let opening = delimiter.role == Role::Open;
            if delimiter.is_bold() {
                bold = opening;
            } else {
                italic = opening;
            }
            index += delimiter.width;
            continue;
        }
        text.push(chars[index]);
        index += 1;
    }
    push_run(&mut runs, &mut text, RunStyle::from_flags(bold, italic));

    if runs.is_empty() {
        runs.push(Run::default());
    }
    runs
}

fn push_run(runs: &mut Vec<Run>, text: &mut String, style: RunStyle) {
    if text.is_empty() {
        return;
    }
    let text = std::mem::take(text);
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(&text),
        _ => runs.push(Run { style, text }),
    }
}

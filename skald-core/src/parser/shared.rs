// Shared helpers and pattern fragments for block and inline parsers

use once_cell::sync::Lazy;
use regex::Regex;
use unicase::UniCase;

/// HTML block-level tag names recognized by HTML block type 6.
pub const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "base", "basefont", "blockquote", "body",
    "caption", "center", "col", "colgroup", "dd", "details", "dialog", "dir",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header",
    "hr", "html", "iframe", "legend", "li", "link", "main", "menu", "menuitem",
    "meta", "nav", "noframes", "ol", "optgroup", "option", "p", "param",
    "section", "source", "summary", "table", "tbody", "td", "tfoot", "th",
    "thead", "title", "tr", "track", "ul",
];

pub const TAG_NAME: &str = r"[A-Za-z][A-Za-z0-9-]*";

pub const ATTRIBUTE: &str =
    r#" +[A-Za-z:_][A-Za-z0-9\-_.:]*(?: *= *(?:[^ \t\n"'`=<>]+|'[^']*'|"[^"]*"))?"#;

/// Attribute variant whose quoted values may not span lines, used by HTML
/// block type 7 where the whole tag must sit on one line.
pub const ATTRIBUTE_NO_LF: &str =
    r#" +[A-Za-z:_][A-Za-z0-9\-_.:]*(?: *= *(?:[^ \t\n"'`=<>]+|'[^\n']*'|"[^\n"]*"))?"#;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ASCII punctuation plus the Unicode punctuation categories named by the
// CommonMark spec for delimiter flanking.
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A[!-/:-@\[-`{-~\p{Pc}\p{Pd}\p{Pe}\p{Pf}\p{Pi}\p{Po}\p{Ps}]").unwrap()
});

pub fn is_punctuation(c: char) -> bool {
    let mut buf = [0u8; 4];
    PUNCTUATION.is_match(c.encode_utf8(&mut buf))
}

/// Normalize a link label: collapse whitespace runs, trim, compare caseless.
pub fn normalize_label(label: &str) -> UniCase<String> {
    UniCase::new(WHITESPACE_RUN.replace_all(label.trim(), " ").into_owned())
}

/// Takes a CamelCased kind name and converts it to snake_case, keeping
/// acronyms together: `HTMLBlock` becomes `html_block`.
pub fn camel_to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_ascii_uppercase() {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_ascii_uppercase() {
                j += 1;
            }
            if j - i > 1 {
                // an acronym run; a trailing capital followed by lowercase
                // starts the next word
                if j < chars.len() && chars[j].is_ascii_lowercase() {
                    j -= 1;
                }
                words.push(chars[i..j].iter().collect::<String>().to_lowercase());
                i = j;
            } else {
                let mut k = i + 1;
                while k < chars.len() && chars[k].is_ascii_lowercase() {
                    k += 1;
                }
                words.push(chars[i..k].iter().collect::<String>().to_lowercase());
                i = k;
            }
        } else {
            let mut k = i;
            while k < chars.len() && !chars[k].is_ascii_uppercase() {
                k += 1;
            }
            words.push(chars[i..k].iter().collect());
            i = k;
        }
    }
    words.join("_")
}

/// Check that the text contains only backslash-escaped or balanced pairs of
/// the given brackets.
pub fn is_paired(text: &str, open: char, close: char) -> bool {
    let mut count = 0usize;
    let mut escape = false;
    for c in text.chars() {
        if escape {
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == open {
            count += 1;
        } else if c == close {
            if count == 0 {
                return false;
            }
            count -= 1;
        }
    }
    count == 0
}

/// Split at the first run of spaces or tabs, returning
/// `(before, spaces, after)`. The latter two are empty when no space occurs.
pub fn partition_by_spaces(text: &str) -> (&str, &str, &str) {
    let mut start = None;
    for (i, c) in text.char_indices() {
        match (c == ' ' || c == '\t', start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => return (&text[..s], &text[s..i], &text[i..]),
            _ => {}
        }
    }
    match start {
        Some(s) => (&text[..s], &text[s..], ""),
        None => (text, "", ""),
    }
}

/// Remove backslash escapes in front of ASCII punctuation.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_punctuation() {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Expand tabs to 4-column stops, counting columns from the line start.
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len() + 8);
    let mut col = 0usize;
    for ch in line.chars() {
        match ch {
            '\t' => {
                let n = 4 - col % 4;
                out.extend(std::iter::repeat(' ').take(n));
                col += n;
            }
            '\n' => {
                out.push('\n');
                col = 0;
            }
            _ => {
                out.push(ch);
                col += 1;
            }
        }
    }
    out
}

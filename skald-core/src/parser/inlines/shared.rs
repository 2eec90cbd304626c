// Link destination and title sub-parsers, shared between inline links and
// link reference definitions.

use nom::{
    branch::alt,
    character::complete::{char, none_of},
    combinator::{map, recognize},
    multi::many0,
    sequence::{delimited, preceded},
    IResult,
};

use crate::parser::shared::unescape;

/// Angle-bracketed destination: `<...>` with no line feed and no unescaped
/// angle bracket inside.
pub fn angle_link_dest(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('<'),
        many0(alt((
            map(preceded(char('\\'), none_of("\n")), |_| ()),
            map(none_of("\n<>\\"), |_| ()),
        ))),
        char('>'),
    ))(input)
}

/// Bare destination: no whitespace or ASCII control characters, any
/// parentheses balanced or escaped, terminated by an unbalanced `)`.
/// May be empty.
pub fn bare_link_dest(input: &str) -> IResult<&str, &str> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut escaped = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'(' {
            depth += 1;
        } else if b == b')' {
            if depth == 0 {
                break;
            }
            depth -= 1;
        } else if b.is_ascii_whitespace() || b == 0x0b || b < 0x20 || b == 0x7f {
            break;
        }
        i += 1;
    }
    if depth != 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TakeWhile1,
        )));
    }
    Ok((&input[i..], &input[..i]))
}

/// A link title delimited by `"…"`, `'…'`, or `(…)`, returned with its
/// delimiters still attached.
pub fn link_title(input: &str) -> IResult<&str, &str> {
    alt((
        quoted_title('"', '"'),
        quoted_title('\'', '\''),
        quoted_title('(', ')'),
    ))(input)
}

fn quoted_title(open: char, close: char) -> impl Fn(&str) -> IResult<&str, &str> {
    move |input: &str| {
        let mut chars = input.char_indices();
        match chars.next() {
            Some((_, c)) if c == open => {}
            _ => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Char,
                )))
            }
        }
        let mut escaped = false;
        for (i, c) in chars {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == close {
                return Ok((&input[i + c.len_utf8()..], &input[..i + c.len_utf8()]));
            } else if c == open {
                // an unescaped opener may not nest inside a paren title
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::TakeUntil,
                )));
            }
        }
        Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::TakeUntil,
        )))
    }
}

/// Strip angle brackets if present and resolve backslash escapes.
pub fn cook_dest(raw: &str) -> String {
    let inner = if raw.len() >= 2 && raw.starts_with('<') && raw.ends_with('>') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };
    unescape(inner)
}

/// Drop the title delimiters and resolve backslash escapes.
pub fn cook_title(raw: &str) -> String {
    unescape(&raw[1..raw.len() - 1])
}

pub struct Whitespace {
    pub len: usize,
    pub newlines: usize,
}

/// Measure the run of whitespace at the start of `text`.
pub fn leading_whitespace(text: &str) -> Whitespace {
    let mut len = 0;
    let mut newlines = 0;
    for c in text.chars() {
        if !c.is_whitespace() {
            break;
        }
        if c == '\n' {
            newlines += 1;
        }
        len += c.len_utf8();
    }
    Whitespace { len, newlines }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test_angle_dest() {
        let (rest, dest) = angle_link_dest("<b)c> tail").unwrap();
        assert_eq!(dest, "<b)c>");
        assert_eq!(rest, " tail");
        // spaces are fine inside the brackets, line feeds are not
        assert!(angle_link_dest("<my url>").is_ok());
        assert!(angle_link_dest("<a\nb>").is_err());
        assert!(angle_link_dest("<a<b>").is_err());
    }

    #[test]
    fn smoke_test_angle_dest_escapes() {
        let (_, dest) = angle_link_dest(r"<a\>b>").unwrap();
        assert_eq!(dest, r"<a\>b>");
        assert_eq!(cook_dest(dest), "a>b");
    }

    #[test]
    fn smoke_test_bare_dest_balanced() {
        let (rest, dest) = bare_link_dest("/url(a(b))rest) x").unwrap();
        assert_eq!(dest, "/url(a(b))rest");
        assert_eq!(rest, ") x");
        assert!(bare_link_dest("/ur(l").is_err());
    }

    #[test]
    fn smoke_test_bare_dest_may_be_empty() {
        let (rest, dest) = bare_link_dest(")").unwrap();
        assert_eq!(dest, "");
        assert_eq!(rest, ")");
    }

    #[test]
    fn smoke_test_titles() {
        let (_, t) = link_title("\"a title\")").unwrap();
        assert_eq!(cook_title(t), "a title");
        let (_, t) = link_title("'single'").unwrap();
        assert_eq!(t, "'single'");
        let (_, t) = link_title(r"(paren\))").unwrap();
        assert_eq!(cook_title(t), "paren)");
        assert!(link_title("\"unterminated").is_err());
        assert!(link_title("(a(b))").is_err());
    }

    #[test]
    fn smoke_test_leading_whitespace() {
        let ws = leading_whitespace("  \n  x");
        assert_eq!(ws.len, 5);
        assert_eq!(ws.newlines, 1);
    }
}

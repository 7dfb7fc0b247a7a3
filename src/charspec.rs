//! Parsing of `--on-char` / `--off-char` values
//!
//! A value is either a named alias (`space`, `tab`, `emspace`, ...) or a string with
//! backslash escapes. Either way it must resolve to exactly one Unicode scalar so that
//! every pixel maps to exactly one output character.

use crate::error::GridError;
use std::iter::Peekable;
use std::str::Chars;

/// Named aliases for characters that are awkward to pass on a command line
const ALIASES: &[(&str, char)] = &[
    ("space", ' '),
    ("tab", '\t'),
    ("nbspace", '\u{00A0}'),
    ("emspace", '\u{2003}'),
    ("enspace", '\u{2002}'),
    ("thinspace", '\u{2009}'),
    ("figspace", '\u{2007}'),
    ("mspace", '\u{2003}'),
    // zero width, renders as nothing in most terminals
    ("zwnbsp", '\u{FEFF}'),
];

/// Resolve a character specification to a single char
pub fn parse_char(spec: &str) -> Result<char, GridError> {
    let lowered = spec.to_lowercase();
    if let Some((_, ch)) = ALIASES.iter().find(|(name, _)| *name == lowered) {
        return Ok(*ch);
    }

    let decoded = decode_escapes(spec)?;
    let mut chars = decoded.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(GridError::CharSpec(format!(
            "--on-char/--off-char must be ONE character after escapes. Got {:?} from {:?}",
            decoded, spec
        ))),
    }
}

/// Command line value parser, yields the resolved one-character string
pub fn resolve(spec: &str) -> Result<String, GridError> {
    parse_char(spec).map(String::from)
}

/// Decode backslash escapes (`\t`, `\x41`, `\u2003`, `\U0001F600`, octal, ...)
///
/// Unknown escapes such as `\q` are kept verbatim, backslash included.
pub fn decode_escapes(input: &str) -> Result<String, GridError> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(next) = chars.next() else {
            return Err(GridError::CharSpec(format!(
                "trailing backslash in {:?}",
                input
            )));
        };

        match next {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            // escaped newline is a line continuation
            '\n' => {}
            '0'..='7' => {
                let mut value = next.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(scalar(value, input)?);
            }
            'x' => out.push(hex_escape(&mut chars, 2, input)?),
            'u' => out.push(hex_escape(&mut chars, 4, input)?),
            'U' => out.push(hex_escape(&mut chars, 8, input)?),
            'N' => {
                return Err(GridError::CharSpec(format!(
                    "named escapes (\\N{{...}}) are not supported in {:?}",
                    input
                )))
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_escape(
    chars: &mut Peekable<Chars<'_>>,
    digits: usize,
    input: &str,
) -> Result<char, GridError> {
    let mut value = 0u32;
    for _ in 0..digits {
        let digit = chars
            .next()
            .and_then(|d| d.to_digit(16))
            .ok_or_else(|| {
                GridError::CharSpec(format!(
                    "truncated escape, expected {} hex digits in {:?}",
                    digits, input
                ))
            })?;
        value = value * 16 + digit;
    }
    scalar(value, input)
}

fn scalar(value: u32, input: &str) -> Result<char, GridError> {
    char::from_u32(value).ok_or_else(|| {
        GridError::CharSpec(format!(
            "escape U+{:X} in {:?} is not a Unicode scalar value",
            value, input
        ))
    })
}

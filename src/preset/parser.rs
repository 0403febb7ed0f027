//! Preset document parsing
//!
//! Two stages. `locate` finds the effect list, output filename and title
//! with a single structural scan. `parse_list` then reads the effect list
//! with a closed recursive-descent grammar:
//!
//! ```text
//! list  ::= ( call ( ',' call )* ','? )?
//! call  ::= IDENT '(' ( arg ( ',' arg )* ','? )? ')'
//! arg   ::= IDENT '=' value
//! value ::= NUMBER | IDENT '.' 'Mode' '.' IDENT
//! ```
//!
//! Nothing outside this grammar is accepted. There are no expressions, no
//! nested calls and no free identifiers, so a stored preset can only ever
//! name registered effects and literal values.

use crate::error::{FxError, Result};
use crate::registry::{scan_number, ParamValue};

/// The three structural parts of a preset document
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentParts<'a> {
    pub title: Option<String>,
    /// Text between the outer brackets
    pub list: &'a str,
    /// Byte offset of `list` within the document
    pub list_offset: usize,
    pub output_name: String,
}

/// One `Name(arg=value, ...)` expression
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedCall {
    pub name: String,
    pub position: usize,
    pub args: Vec<(String, ParamValue)>,
}

fn format_error(details: impl Into<String>) -> FxError {
    FxError::Format {
        details: details.into(),
    }
}

/// Find the effect list, the quoted filename after it and the title line
pub(crate) fn locate(text: &str) -> Result<DocumentParts<'_>> {
    let bytes = text.as_bytes();
    let open = text
        .find('[')
        .ok_or_else(|| format_error("no bracketed effect list"))?;

    let mut depth = 0usize;
    let mut close = None;
    for (i, &b) in bytes.iter().enumerate().skip(open + 1) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| format_error(format!("unbalanced ')' at position {}", i)))?;
            }
            b'[' => return Err(format_error(format!("nested '[' at position {}", i))),
            b']' if depth == 0 => {
                close = Some(i);
                break;
            }
            b']' => return Err(format_error(format!("unbalanced ']' at position {}", i))),
            _ => {}
        }
    }
    let close = close.ok_or_else(|| format_error("effect list is never closed"))?;

    let rest = &text[close + 1..];
    let quote = rest
        .find('"')
        .ok_or_else(|| format_error("no quoted output filename after the effect list"))?;
    let after_quote = &rest[quote + 1..];
    let end = after_quote
        .find('"')
        .ok_or_else(|| format_error("output filename is not terminated"))?;
    let output_name = &after_quote[..end];
    if output_name.trim().is_empty() {
        return Err(format_error("output filename is empty"));
    }

    let title = text[..open]
        .lines()
        .map(str::trim_start)
        .find_map(|line| line.strip_prefix("# "))
        .map(|t| t.trim().to_string());

    Ok(DocumentParts {
        title,
        list: &text[open + 1..close],
        list_offset: open + 1,
        output_name: output_name.to_string(),
    })
}

/// Parse an effect list; positions in errors are relative to the document
pub(crate) fn parse_list(list: &str, offset: usize) -> Result<Vec<ParsedCall>> {
    Parser::new(list, offset).parse_list()
}

/// Recursive descent parser for the effect list
///
/// LL(1), byte lookahead. Identifiers and numbers are ASCII.
struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
    offset: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, offset: usize) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            offset,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn error(&self, at: usize, message: impl Into<String>) -> FxError {
        FxError::Parse {
            position: self.offset + at,
            message: message.into(),
        }
    }

    fn describe_current(&self) -> String {
        match self.peek() {
            Some(b) if b.is_ascii_graphic() => format!("'{}'", b as char),
            Some(_) => "non-ASCII input".to_string(),
            None => "end of list".to_string(),
        }
    }

    fn expect(&mut self, byte: u8) -> Result<()> {
        self.skip_ws();
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(
                self.pos,
                format!("expected '{}', found {}", byte as char, self.describe_current()),
            ))
        }
    }

    /// `IDENT ::= [A-Za-z_][A-Za-z0-9_]*`
    fn ident(&mut self) -> Result<(String, usize)> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(b) if b.is_ascii_alphabetic() || b == b'_' => self.pos += 1,
            _ => {
                return Err(self.error(
                    start,
                    format!("expected identifier, found {}", self.describe_current()),
                ))
            }
        }
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        let name = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        Ok((name, start))
    }

    /// `list ::= ( call ( ',' call )* ','? )?`
    fn parse_list(&mut self) -> Result<Vec<ParsedCall>> {
        let mut calls = Vec::new();
        loop {
            self.skip_ws();
            if self.peek().is_none() {
                break;
            }
            calls.push(self.parse_call()?);
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                None => break,
                _ => {
                    return Err(self.error(
                        self.pos,
                        format!("expected ',' between effects, found {}", self.describe_current()),
                    ))
                }
            }
        }
        Ok(calls)
    }

    /// `call ::= IDENT '(' ( arg ( ',' arg )* ','? )? ')'`
    fn parse_call(&mut self) -> Result<ParsedCall> {
        let (name, position) = self.ident()?;
        self.expect(b'(')?;

        let mut args: Vec<(String, ParamValue)> = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(b')') {
                self.pos += 1;
                break;
            }

            let (arg, arg_pos) = self.ident()?;
            if args.iter().any(|(existing, _)| *existing == arg) {
                return Err(self.error(arg_pos, format!("duplicate argument '{}'", arg)));
            }
            self.expect(b'=')?;
            let value = self.parse_value(&name)?;
            args.push((arg, value));

            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(self.error(
                        self.pos,
                        format!("expected ',' or ')', found {}", self.describe_current()),
                    ))
                }
            }
        }

        Ok(ParsedCall {
            name,
            position,
            args,
        })
    }

    /// `value ::= NUMBER | IDENT '.' 'Mode' '.' IDENT`
    fn parse_value(&mut self, owner: &str) -> Result<ParamValue> {
        self.skip_ws();
        let start = self.pos;

        if let Some(end) = scan_number(self.input, start) {
            let text = String::from_utf8_lossy(&self.input[start..end]);
            let value = ParamValue::parse_number(&text)
                .ok_or_else(|| self.error(start, format!("invalid number '{}'", text)))?;
            self.pos = end;
            return Ok(value);
        }

        let (scope, scope_pos) = self.ident()?;
        if scope != owner {
            return Err(self.error(
                scope_pos,
                format!("'{}' is not a value; only numbers and {}.Mode constants are allowed", scope, owner),
            ));
        }
        self.expect(b'.')?;
        let (mode_kw, mode_pos) = self.ident()?;
        if mode_kw != "Mode" {
            return Err(self.error(mode_pos, format!("expected 'Mode', found '{}'", mode_kw)));
        }
        self.expect(b'.')?;
        let (constant, _) = self.ident()?;
        Ok(ParamValue::Mode(constant))
    }
}

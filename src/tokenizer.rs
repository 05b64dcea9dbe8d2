//! The `tokenize` function in this module splits one line of source text into raw
//! tokens. Spans are recognized in priority order:
//!
//! 1. `%` comment, through end of line (dropped, stops tokenizing)
//! 2. `( ... )` string, up to the first `)`
//! 3. `{ ... }` code block, up to the first `}`
//! 4. `[ ... ]` array, up to the first `]`
//! 5. any run of non-whitespace characters
//!
//! Delimited spans do not nest. A span that is never closed is not an error: it simply
//! fails to match and the text is picked up as ordinary whitespace-separated tokens.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::char,
    combinator::{map, recognize, rest, value},
};
use tracing::debug;

/// Split a line into raw tokens in source order, with comments removed.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut input = line;

    loop {
        input = input.trim_start();
        if input.is_empty() {
            break;
        }
        match lexeme(input) {
            Ok((remaining, Some(token))) => {
                debug!(token, "token");
                tokens.push(token.to_owned());
                input = remaining;
            }
            // A comment swallows the rest of the line
            Ok((_, None)) => break,
            // Unreachable for non-empty input: a bare word matches any non-whitespace char
            Err(_) => break,
        }
    }

    tokens
}

/// One lexeme: `None` for a comment, `Some(token)` otherwise
fn lexeme(input: &str) -> IResult<&str, Option<&str>> {
    alt((
        value(None, comment),
        map(
            alt((
                |i| delimited_span(i, '(', ')'),
                |i| delimited_span(i, '{', '}'),
                |i| delimited_span(i, '[', ']'),
                bare_word,
            )),
            Some,
        ),
    ))
    .parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize((char('%'), rest)).parse(input)
}

/// An `open ... close` span with no nesting; includes both delimiters
fn delimited_span(input: &str, open: char, close: char) -> IResult<&str, &str> {
    recognize((char(open), take_till(move |c| c == close), char(close))).parse(input)
}

fn bare_word(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace).parse(input)
}

//! Reader for the plain text test-case format.
//!
//! The first non-blank line holds the number of test cases. Each test
//! case is a line with the number of segments, followed by one line
//! `x1 y1 x2 y2` per segment. Blank lines are ignored anywhere.
//!
//! ```text
//! 2
//! 2
//! 0 0 4 4
//! 0 4 4 0
//! 1
//! 0 0 1 1
//! ```
use std::{error::Error, fmt, fs, io, path::Path};

use itertools::Itertools;
use log::debug;

use crate::segments::{Segment, SegmentError};

/// Failure to read a test-case file. Line numbers are 1-based.
#[derive(Debug)]
pub enum ParseError {
    Io(io::Error),
    UnexpectedEof { line: usize, expected: &'static str },
    InvalidCount { line: usize, token: String },
    WrongTokenCount { line: usize, found: usize },
    InvalidNumber { line: usize, token: String },
    Segment { line: usize, source: SegmentError },
    TrailingInput { line: usize },
}

impl ParseError {
    /// The line the error was found on, if it came from the input text.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Io(_) => None,
            ParseError::UnexpectedEof { line, .. }
            | ParseError::InvalidCount { line, .. }
            | ParseError::WrongTokenCount { line, .. }
            | ParseError::InvalidNumber { line, .. }
            | ParseError::Segment { line, .. }
            | ParseError::TrailingInput { line } => Some(*line),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Io(e) => write!(f, "could not read input: {}", e),
            ParseError::UnexpectedEof { line, expected } => {
                write!(f, "line {}: unexpected end of input, expected {}", line, expected)
            }
            ParseError::InvalidCount { line, token } => {
                write!(f, "line {}: invalid count {:?}", line, token)
            }
            ParseError::WrongTokenCount { line, found } => write!(
                f,
                "line {}: expected 4 coordinates, found {} tokens",
                line, found
            ),
            ParseError::InvalidNumber { line, token } => {
                write!(f, "line {}: invalid number {:?}", line, token)
            }
            ParseError::Segment { line, source } => write!(f, "line {}: {}", line, source),
            ParseError::TrailingInput { line } => {
                write!(f, "line {}: unexpected content after the last test case", line)
            }
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseError::Io(e) => Some(e),
            ParseError::Segment { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError::Io(e)
    }
}

/// Non-blank lines of the input, with their line numbers.
struct Lines<I> {
    inner: I,
    last: usize,
}

impl<'a, I: Iterator<Item = (usize, &'a str)>> Lines<I> {
    fn next_line(&mut self, expected: &'static str) -> Result<(usize, &'a str), ParseError> {
        match self.inner.next() {
            Some((line, text)) => {
                self.last = line;
                Ok((line, text))
            }
            None => Err(ParseError::UnexpectedEof {
                line: self.last + 1,
                expected,
            }),
        }
    }

    fn next_count(&mut self, expected: &'static str) -> Result<usize, ParseError> {
        let (line, text) = self.next_line(expected)?;
        text.parse().map_err(|_| ParseError::InvalidCount {
            line,
            token: text.to_string(),
        })
    }

    fn next_segment(&mut self) -> Result<Segment, ParseError> {
        let (line, text) = self.next_line("a segment")?;
        let (x1, y1, x2, y2) = text
            .split_whitespace()
            .collect_tuple()
            .ok_or_else(|| ParseError::WrongTokenCount {
                line,
                found: text.split_whitespace().count(),
            })?;
        let number = |token: &str| {
            token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
                line,
                token: token.to_string(),
            })
        };
        Segment::from_coords(number(x1)?, number(y1)?, number(x2)?, number(y2)?)
            .map_err(|source| ParseError::Segment { line, source })
    }
}

/// Parse every test case in `input`.
///
/// Fails on the first malformed line; no partial result is returned.
pub fn parse_test_cases(input: &str) -> Result<Vec<Vec<Segment>>, ParseError> {
    let mut lines = Lines {
        inner: input
            .lines()
            .enumerate()
            .map(|(idx, text)| (idx + 1, text.trim()))
            .filter(|(_, text)| !text.is_empty()),
        last: 0,
    };

    let num_cases = lines.next_count("the number of test cases")?;
    let mut cases = Vec::with_capacity(num_cases);
    for _ in 0..num_cases {
        let num_segments = lines.next_count("the number of segments")?;
        let segments = (0..num_segments)
            .map(|_| lines.next_segment())
            .collect::<Result<Vec<_>, _>>()?;
        cases.push(segments);
    }

    if let Some((line, _)) = lines.inner.next() {
        return Err(ParseError::TrailingInput { line });
    }
    debug!("parsed {} test cases", cases.len());
    Ok(cases)
}

/// Read and parse the test-case file at `path`.
pub fn read_test_cases<P: AsRef<Path>>(path: P) -> Result<Vec<Vec<Segment>>, ParseError> {
    let input = fs::read_to_string(path)?;
    parse_test_cases(&input)
}

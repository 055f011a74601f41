use std::io::BufRead;

use battlemap_core::SerializationError;

use super::{ARRAY_END, ARRAY_START, OBJECT_END, OBJECT_START};

/// Token reader for the map format with a single token of lookahead.
///
/// `peek_token` fills the lookahead slot without consuming; `next_token`
/// drains the slot before touching the underlying stream.
pub struct MapDataReader<R: BufRead> {
    input: R,
    peeked: Option<String>,
    array_depth: usize,
    line_number: usize,
}

impl<R: BufRead> MapDataReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            peeked: None,
            array_depth: 0,
            line_number: 0,
        }
    }

    /// Number of physical lines consumed so far, for diagnostics.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn array_depth(&self) -> usize {
        self.array_depth
    }

    fn read_line(&mut self) -> Result<Option<String>, SerializationError> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            return Ok(Some(line));
        }
    }

    /// Next non-blank line, or `None` at end of stream.
    pub fn next_token(&mut self) -> Result<Option<String>, SerializationError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.read_line(),
        }
    }

    /// Looks at the next token without consuming it.
    pub fn peek_token(&mut self) -> Result<Option<&str>, SerializationError> {
        if self.peeked.is_none() {
            self.peeked = self.read_line()?;
        }
        Ok(self.peeked.as_deref())
    }

    /// True once no tokens remain.
    pub fn at_end(&mut self) -> Result<bool, SerializationError> {
        Ok(self.peek_token()?.is_none())
    }

    fn require_token(&mut self) -> Result<String, SerializationError> {
        self.next_token()?.ok_or(SerializationError::UnexpectedEof)
    }

    pub fn read_string(&mut self) -> Result<String, SerializationError> {
        self.require_token()
    }

    pub fn read_int(&mut self) -> Result<i64, SerializationError> {
        let token = self.require_token()?;
        token
            .trim()
            .parse::<i64>()
            .map_err(|_| SerializationError::PrimitiveParse {
                kind: "integer",
                token,
            })
    }

    pub fn read_float(&mut self) -> Result<f64, SerializationError> {
        let token = self.require_token()?;
        token
            .trim()
            .parse::<f64>()
            .map_err(|_| SerializationError::PrimitiveParse {
                kind: "float",
                token,
            })
    }

    pub fn read_bool(&mut self) -> Result<bool, SerializationError> {
        let token = self.require_token()?;
        match token.trim() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(SerializationError::PrimitiveParse {
                kind: "boolean",
                token,
            }),
        }
    }

    fn expect_structural(&mut self, expected: &str) -> Result<(), SerializationError> {
        let token = self.next_token()?;
        if token.as_deref() == Some(expected) {
            tracing::trace!(token = expected, line = self.line_number, "structural token");
            Ok(())
        } else {
            Err(SerializationError::structural(expected, token.as_deref()))
        }
    }

    /// Consumes `[` and returns the nesting depth inside the new array, to be
    /// passed to [`has_more_array_items`](Self::has_more_array_items).
    pub fn expect_array_start(&mut self) -> Result<usize, SerializationError> {
        self.expect_structural(ARRAY_START)?;
        self.array_depth += 1;
        Ok(self.array_depth)
    }

    pub fn expect_array_end(&mut self) -> Result<(), SerializationError> {
        if self.array_depth == 0 {
            let token = self.next_token()?;
            return Err(SerializationError::structural(
                "<no open array>",
                token.as_deref(),
            ));
        }
        self.expect_structural(ARRAY_END)?;
        self.array_depth -= 1;
        Ok(())
    }

    /// True when another item of the array opened at `depth` follows, i.e.
    /// the reader is still inside that array and the next token does not
    /// close it. End of stream yields `false`; the caller's
    /// `expect_array_end` then reports the desync.
    pub fn has_more_array_items(&mut self, depth: usize) -> Result<bool, SerializationError> {
        if self.array_depth < depth {
            return Ok(false);
        }
        Ok(matches!(self.peek_token()?, Some(token) if token != ARRAY_END))
    }

    pub fn expect_object_start(&mut self) -> Result<(), SerializationError> {
        self.expect_structural(OBJECT_START)
    }

    pub fn expect_object_end(&mut self) -> Result<(), SerializationError> {
        self.expect_structural(OBJECT_END)
    }
}

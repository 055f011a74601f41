use std::io::Write;

use battlemap_core::SerializationError;

use super::{ARRAY_END, ARRAY_START, OBJECT_END, OBJECT_START};

/// True if `value` can be written with [`MapDataWriter::write_string`] and
/// read back as the same single token.
pub fn is_representable(value: &str) -> bool {
    !value.trim().is_empty() && !value.contains(['\n', '\r'])
}

/// Streaming writer for the map token format.
pub struct MapDataWriter<W: Write> {
    out: W,
}

impl<W: Write> MapDataWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_line(&mut self, token: &str) -> Result<(), SerializationError> {
        self.out.write_all(token.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    /// Writes a string verbatim. Blank and multi-line strings cannot be read
    /// back as one token and are rejected.
    pub fn write_string(&mut self, value: &str) -> Result<(), SerializationError> {
        if !is_representable(value) {
            return Err(SerializationError::UnrepresentableString {
                value: value.to_string(),
            });
        }
        self.write_line(value)
    }

    pub fn write_int(&mut self, value: i64) -> Result<(), SerializationError> {
        self.write_line(&value.to_string())
    }

    pub fn write_float(&mut self, value: f64) -> Result<(), SerializationError> {
        self.write_line(&value.to_string())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), SerializationError> {
        self.write_line(if value { "1" } else { "0" })
    }

    pub fn start_array(&mut self) -> Result<(), SerializationError> {
        self.write_line(ARRAY_START)
    }

    pub fn end_array(&mut self) -> Result<(), SerializationError> {
        self.write_line(ARRAY_END)
    }

    pub fn start_object(&mut self) -> Result<(), SerializationError> {
        self.write_line(OBJECT_START)
    }

    pub fn end_object(&mut self) -> Result<(), SerializationError> {
        self.write_line(OBJECT_END)
    }

    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.out.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(mut self) -> Result<W, SerializationError> {
        self.out.flush()?;
        Ok(self.out)
    }
}

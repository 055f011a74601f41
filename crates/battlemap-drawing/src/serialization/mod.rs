//! Line-oriented token codec for map documents.
//!
//! One primitive value or structural token per line:
//!
//! ```text
//! 2          integer
//! 3.5        float (shortest round-trip form, never an exponent)
//! 1          boolean ("1" / "0")
//! goblins    string (verbatim, single line, not blank)
//! [  ]       array start / end, tracked by a nesting counter
//! {  }       object start / end, validated but not counted
//! ```
//!
//! Blank lines are never significant and are skipped on read.

mod reader;
mod writer;

pub use reader::MapDataReader;
pub use writer::{is_representable, MapDataWriter};

use battlemap_core::ShapeError;

/// Rejects strings a map file cannot hold, before they enter the model.
pub(crate) fn check_representable(field: &'static str, value: &str) -> Result<(), ShapeError> {
    if is_representable(value) {
        Ok(())
    } else {
        Err(ShapeError::UnrepresentableString {
            field,
            value: value.to_string(),
        })
    }
}

pub(crate) const ARRAY_START: &str = "[";
pub(crate) const ARRAY_END: &str = "]";
pub(crate) const OBJECT_START: &str = "{";
pub(crate) const OBJECT_END: &str = "}";

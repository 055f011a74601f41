//! Type aliases for shared, single-threaded state.
//!
//! The drawing model is single-threaded: collections that undo and redo
//! together hold the same history through a [`Shared`] handle instead of
//! duplicating the stack.
//!
//! ```rust,ignore
//! use battlemap_core::types::*;
//!
//! let history: Shared<CommandHistory> = shared(CommandHistory::new());
//! history.borrow_mut().undo();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wraps a value in a new [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

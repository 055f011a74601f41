//! Reversible edits.
//!
//! An [`EditCommand`] records a set of created items and a set of deleted
//! items against one shared [`EditTarget`]. Executing removes the deleted
//! items and inserts the created ones; undoing mirrors that. Items are
//! matched by identity, never by value.

use std::fmt::Debug;

use battlemap_core::Shared;

/// A command that can be executed and undone against the state it was
/// built for.
pub trait Command {
    fn execute(&mut self);

    fn undo(&mut self);

    /// A no-op changes nothing and is never recorded in a history.
    fn is_noop(&self) -> bool;

    /// Returns the name of the command for display.
    fn name(&self) -> &str;
}

/// Items with a stable identity.
pub trait Identified {
    type Id: Copy + PartialEq + Debug;

    fn id(&self) -> Self::Id;
}

/// State an [`EditCommand`] can apply itself to.
pub trait EditTarget {
    type Item: Identified + Clone;

    /// Removes the members with the given ids, returning the removed live
    /// values. Ids that are not members are ignored.
    fn remove_items(&mut self, ids: &[<Self::Item as Identified>::Id]) -> Vec<Self::Item>;

    fn insert_item(&mut self, item: Self::Item);

    /// Called once after every apply, to refresh derived state.
    fn finish_edit(&mut self);
}

/// A created-set / deleted-set edit bound to one target.
pub struct EditCommand<T: EditTarget> {
    target: Shared<T>,
    name: String,
    created: Vec<T::Item>,
    deleted: Vec<T::Item>,
}

impl<T: EditTarget> EditCommand<T> {
    pub fn new(target: Shared<T>, name: impl Into<String>) -> Self {
        Self {
            target,
            name: name.into(),
            created: Vec::new(),
            deleted: Vec::new(),
        }
    }

    /// Records an item to be inserted. Only valid before first execution.
    pub fn add_created(&mut self, item: T::Item) {
        self.created.push(item);
    }

    /// Records an item to be removed. Only valid before first execution.
    pub fn add_deleted(&mut self, item: T::Item) {
        self.deleted.push(item);
    }

    pub fn created(&self) -> &[T::Item] {
        &self.created
    }

    pub fn deleted(&self) -> &[T::Item] {
        &self.deleted
    }

    fn apply(target: &Shared<T>, remove: &mut [T::Item], insert: &[T::Item]) {
        let mut target = target.borrow_mut();
        let ids: Vec<_> = remove.iter().map(Identified::id).collect();

        // Members may have been mutated since they were recorded (points
        // added, erase marks); keep the live values so the mirror step
        // restores them as they were.
        for live in target.remove_items(&ids) {
            if let Some(slot) = remove.iter_mut().find(|item| item.id() == live.id()) {
                *slot = live;
            }
        }
        for item in insert {
            target.insert_item(item.clone());
        }
        target.finish_edit();
    }
}

impl<T: EditTarget> Command for EditCommand<T> {
    fn execute(&mut self) {
        Self::apply(&self.target, &mut self.deleted, &self.created);
    }

    fn undo(&mut self) {
        Self::apply(&self.target, &mut self.created, &self.deleted);
    }

    fn is_noop(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<T: EditTarget> Debug for EditCommand<T>
where
    T::Item: Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditCommand")
            .field("name", &self.name)
            .field("created", &self.created)
            .field("deleted", &self.deleted)
            .finish()
    }
}

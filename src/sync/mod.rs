//! Reducer keeping an ordered row list in step with a push feed.
//!
//! The hosted service pushes a tagged [`ChangeEvent`] for every row
//! mutation. [`apply_change`] folds one event into the current list without
//! a refetch. Events are applied in arrival order with no timestamp-based
//! reconciliation, so the last event to arrive wins.

use im::Vector;
use std::fmt::Debug;
use std::hash::Hash;

/// A record returned by the hosted table service.
pub trait Row: Clone {
    /// Stable row identifier.
    type Id: Copy + Eq + Hash + Debug;

    /// Returns the row identifier.
    fn row_id(&self) -> Self::Id;
}

/// Tagged notification describing one row mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<R: Row> {
    /// A row was inserted.
    Created(R),
    /// A row was updated; carries the full new row.
    Updated(R),
    /// A row was deleted.
    Deleted(R::Id),
}

impl<R: Row> ChangeEvent<R> {
    /// Returns the identifier of the affected row.
    pub fn row_id(&self) -> R::Id {
        match self {
            Self::Created(row) | Self::Updated(row) => row.row_id(),
            Self::Deleted(id) => *id,
        }
    }

    /// Returns the event tag as used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
        }
    }
}

/// Applies `event` to a newest-first list and returns the resulting list.
///
/// - `Created` prepends the row. A row whose id is already listed is
///   replaced in place instead, so ids stay unique.
/// - `Updated` replaces the matching row in place; unknown ids are ignored.
/// - `Deleted` removes the matching row; unknown ids are ignored.
///
/// The input list is left untouched.
#[must_use]
pub fn apply_change<R: Row>(rows: &Vector<R>, event: ChangeEvent<R>) -> Vector<R> {
    let mut next = rows.clone();
    match event {
        ChangeEvent::Created(row) => match position_of(&next, row.row_id()) {
            Some(index) => {
                next.set(index, row);
            }
            None => next.push_front(row),
        },
        ChangeEvent::Updated(row) => {
            if let Some(index) = position_of(&next, row.row_id()) {
                next.set(index, row);
            }
        }
        ChangeEvent::Deleted(id) => next.retain(|row| row.row_id() != id),
    }
    next
}

/// Returns the index of the row with `id`, if present.
pub fn position_of<R: Row>(rows: &Vector<R>, id: R::Id) -> Option<usize> {
    rows.iter().position(|row| row.row_id() == id)
}

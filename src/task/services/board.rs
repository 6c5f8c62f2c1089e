//! Pure board reducer.
//!
//! Operates on a persistent [`Vector`], so producing the next list leaves
//! the current one untouched and cheap to keep.

use crate::{
    sync::position_of,
    task::domain::{Task, TaskId, TaskStatus},
};
use im::Vector;
use thiserror::Error;

/// The dragged or edited task is not on the board.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("task not on board: {0}")]
pub struct UnknownTask(pub TaskId);

/// The three board columns, each in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardColumns {
    /// Tasks not started.
    pub todo: Vec<Task>,
    /// Tasks being worked on.
    pub in_progress: Vec<Task>,
    /// Finished tasks.
    pub completed: Vec<Task>,
}

impl BoardColumns {
    /// Returns the column for `status`.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::Todo => &self.todo,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }
}

/// Partitions `tasks` into columns, preserving list order in each.
#[must_use]
pub fn columns(tasks: &Vector<Task>) -> BoardColumns {
    let mut board = BoardColumns::default();
    for task in tasks {
        let column = match task.status() {
            TaskStatus::Todo => &mut board.todo,
            TaskStatus::InProgress => &mut board.in_progress,
            TaskStatus::Completed => &mut board.completed,
        };
        column.push(task.clone());
    }
    board
}

/// Outcome of a reducer step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardChange {
    /// Nothing to do; the list is unchanged and nothing is persisted.
    Unchanged,
    /// The list changed.
    Changed {
        /// The new list.
        tasks: Vector<Task>,
        /// The moved task as it now appears in the list.
        task: Task,
    },
}

/// Moves one task to `status` without changing its list position.
///
/// Returns [`BoardChange::Unchanged`] when the task already has `status`.
///
/// # Errors
///
/// Returns [`UnknownTask`] when no task has `task_id`.
pub fn change_status(
    tasks: &Vector<Task>,
    task_id: TaskId,
    status: TaskStatus,
) -> Result<BoardChange, UnknownTask> {
    let index = position_of(tasks, task_id).ok_or(UnknownTask(task_id))?;
    let Some(current) = tasks.get(index) else {
        return Err(UnknownTask(task_id));
    };
    if current.status() == status {
        return Ok(BoardChange::Unchanged);
    }

    let moved = current.with_status(status);
    Ok(BoardChange::Changed {
        tasks: tasks.update(index, moved.clone()),
        task: moved,
    })
}

/// A position on the board: a column and an index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardSlot {
    /// Column.
    pub status: TaskStatus,
    /// Index within the column.
    pub index: usize,
}

impl BoardSlot {
    /// Creates a slot.
    #[must_use]
    pub const fn new(status: TaskStatus, index: usize) -> Self {
        Self { status, index }
    }
}

/// A completed drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropRequest {
    /// Dragged task.
    pub task_id: TaskId,
    /// Where the drag started.
    pub source: BoardSlot,
    /// Where the task was dropped; `None` when dropped outside the board.
    pub destination: Option<BoardSlot>,
}

impl DropRequest {
    /// Creates a drop onto `destination`.
    #[must_use]
    pub const fn new(task_id: TaskId, source: BoardSlot, destination: BoardSlot) -> Self {
        Self {
            task_id,
            source,
            destination: Some(destination),
        }
    }

    /// Creates a drop outside any column.
    #[must_use]
    pub const fn cancelled(task_id: TaskId, source: BoardSlot) -> Self {
        Self {
            task_id,
            source,
            destination: None,
        }
    }
}

/// Applies a drag-and-drop move.
///
/// The task is removed from the list, moved to the destination column with
/// its order set to the destination index, and reinserted so that it sits
/// at that index within the destination column. The index counts the
/// column *after* the dragged task was removed, for moves within a column
/// and across columns alike. Indexes past the end of the column place the
/// task after the column's last task; a task dropped into an empty column
/// goes to the end of the list.
///
/// Drops outside the board, or back onto the source slot, are unchanged.
///
/// # Errors
///
/// Returns [`UnknownTask`] when no task has the dragged id.
pub fn apply_drop(tasks: &Vector<Task>, request: DropRequest) -> Result<BoardChange, UnknownTask> {
    let Some(destination) = request.destination else {
        return Ok(BoardChange::Unchanged);
    };
    if destination == request.source {
        return Ok(BoardChange::Unchanged);
    }

    let task_id = request.task_id;
    let from = position_of(tasks, task_id).ok_or(UnknownTask(task_id))?;
    let mut next = tasks.clone();
    let removed = next.remove(from);

    let order = i32::try_from(destination.index).unwrap_or(i32::MAX);
    let moved = removed.with_position(destination.status, order);
    let at = insertion_index(&next, destination);
    next.insert(at, moved.clone());

    Ok(BoardChange::Changed {
        tasks: next,
        task: moved,
    })
}

/// Maps a column slot to a list index in `tasks`.
fn insertion_index(tasks: &Vector<Task>, slot: BoardSlot) -> usize {
    let column: Vec<usize> = tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| task.status() == slot.status)
        .map(|(index, _)| index)
        .collect();
    match column.get(slot.index) {
        Some(&index) => index,
        None => column.last().map_or(tasks.len(), |&last| last + 1),
    }
}

//! Application services for the task board.

pub mod board;
mod board_service;

pub use board::{
    BoardChange, BoardColumns, BoardSlot, DropRequest, UnknownTask, apply_drop, change_status,
    columns,
};
pub use board_service::{
    BoardError, BoardResult, BoardService, CreateTaskRequest, EditTaskRequest, ImageUpload,
};

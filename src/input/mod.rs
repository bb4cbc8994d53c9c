//! 指针输入

mod drag;

pub use drag::{Cursor, DragController, DragState, PointerCapture, PointerEvent};

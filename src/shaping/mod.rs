//! Shaping pipeline: LayoutPiece (C8), Layout (C9), LayoutCache (C10).

pub mod cache;
pub mod layout;
pub mod layout_piece;

//! LSP feature providers (diagnostics, quick fixes, hover)

pub mod code_actions;
pub mod diagnostics;
pub mod hover;

mod editor_utils;
mod hen_cli;

pub use editor_utils::{create_editor_buffer, resolve_editor};
pub use hen_cli::HenCli;

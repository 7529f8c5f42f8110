use anyhow::{Context, Result, bail};
use std::{fs, path::Path, process::Command};

/// `$VISUAL`, then `$EDITOR`, then `vim`.
pub fn resolve_editor() -> String {
    std::env::var("VISUAL")
        .ok()
        .or_else(|| std::env::var("EDITOR").ok())
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| "vim".into())
}

/// Opens an empty temp file in `editor_cmd` and returns what was written.
pub fn create_editor_buffer(editor_cmd: &str) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("hen")
        .suffix(".txt")
        .tempfile()
        .context("creating temp file for the editor")?;

    let path = file.path().to_path_buf();
    open_file_in_editor(editor_cmd, &path)?;
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

fn open_file_in_editor(editor_cmd: &str, path: &Path) -> Result<()> {
    let status = Command::new(editor_cmd)
        .arg(path)
        .status()
        .with_context(|| format!("starting editor {editor_cmd:?}"))?;
    if !status.success() {
        bail!("Editor exited with status {}", status);
    }
    Ok(())
}

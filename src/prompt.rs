use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{Error, Result};

pub const TEMPLATES_DIR: &str = "templates";
pub const SYSTEM_PROMPT_FILE: &str = "system_prompt.txt";

/// Read the user prompt. Invalid UTF-8 is replaced rather than rejected.
pub fn load_prompt(path: &Path) -> Result<String> {
    read_text("prompt file", path)
}

/// `<dir of the running binary>/templates`, independent of the working directory.
pub fn executable_template_dir() -> Result<PathBuf> {
    let exe = env::current_exe().map_err(Error::Executable)?;
    let dir = exe.parent().ok_or_else(|| {
        Error::Executable(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })?;
    Ok(dir.join(TEMPLATES_DIR))
}

pub fn load_system_prompt(template_dir: &Path) -> Result<String> {
    read_text("system prompt", &template_dir.join(SYSTEM_PROMPT_FILE))
}

fn read_text(what: &'static str, path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::File {
        what,
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded {} from {} ({} bytes)", what, path.display(), bytes.len());
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

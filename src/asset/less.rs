//! LESS to CSS compilation.
//!
//! The renderer is an external collaborator behind [`LessRenderer`]; the
//! default runs the configured command (`lessc` by default) with the source
//! on stdin. Every `.less` file gets a sibling `.css` file. The first failure
//! stops the run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::CompileError;
use crate::debug;
use crate::utils::exec::{Cmd, FilterRule};

/// `render(source, filename) -> css`
pub trait LessRenderer: Send + Sync {
    fn render(&self, source: &str, filename: &Path) -> Result<String>;
}

/// lessc deprecation chatter
const LESSC_FILTER: FilterRule = FilterRule::new(&["npm WARN", "DeprecationWarning"]);

/// Renders through an external command, e.g. `["lessc"]` or `["npx", "lessc"]`.
#[derive(Debug, Clone)]
pub struct CommandLessRenderer {
    command: Vec<String>,
}

impl CommandLessRenderer {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Whether the program resolves on `PATH`.
    pub fn is_available(&self) -> bool {
        self.command
            .first()
            .is_some_and(|program| which::which(program).is_ok())
    }
}

impl LessRenderer for CommandLessRenderer {
    fn render(&self, source: &str, filename: &Path) -> Result<String> {
        let Some(program) = self.command.first() else {
            bail!("less_command is empty");
        };
        if !self.is_available() {
            bail!("`{program}` not found in PATH");
        }

        let dir = filename.parent().unwrap_or(Path::new("."));
        let output = Cmd::from_slice(&self.command)
            .arg(format!("--include-path={}", dir.display()))
            .arg("-")
            .cwd(dir)
            .stdin(source)
            .filter(&LESSC_FILTER)
            .run()?;
        Ok(String::from_utf8(output.stdout)?)
    }
}

/// Compile each file to its sibling `.css`, in order. Returns the written paths.
pub fn compile_less(
    renderer: &dyn LessRenderer,
    files: &[PathBuf],
) -> Result<Vec<PathBuf>, CompileError> {
    let mut written = Vec::with_capacity(files.len());
    for path in files {
        let source =
            fs::read_to_string(path).map_err(|err| CompileError::Io(path.clone(), err))?;
        let css = renderer
            .render(&source, path)
            .map_err(|source| CompileError::Render {
                path: path.clone(),
                source,
            })?;
        let target = path.with_extension("css");
        fs::write(&target, css).map_err(|err| CompileError::Io(target.clone(), err))?;
        debug!("less"; "{} -> {}", path.display(), target.display());
        written.push(target);
    }
    Ok(written)
}

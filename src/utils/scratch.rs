use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Run-scoped scratch directory holding downloaded objects and expanded
/// archive entries before upload. Nothing under it survives the run.
#[derive(Debug, Clone)]
pub struct ScratchArena {
    root: PathBuf,
}

impl ScratchArena {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Arena under the OS temp dir, namespaced by run id so concurrent
    /// invocations do not collide.
    pub fn for_run(run_id: &str) -> Self {
        Self::new(std::env::temp_dir().join("focus-mirror").join(run_id))
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Clear and recreate the arena. Best-effort at run start; the caller
    /// logs a failure and proceeds.
    pub fn reset(&self) -> io::Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)?;
        }
        fs::create_dir_all(&self.root)
    }
}

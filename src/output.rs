//! Output sink for rendered documentation: a file or stdout.
//!
//! The sink is owned by [`LibdocOutput`] and released when it is dropped, so
//! a failed write never leaves a file handle open.

use crate::error::Result;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct LibdocOutput {
    sink: Box<dyn Write>,
    path: Option<PathBuf>,
}

impl LibdocOutput {
    /// Open `path` for writing, creating parent directories as needed.
    /// `None` writes to stdout.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let sink: Box<dyn Write> = match path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Box::new(BufWriter::new(File::create(path)?))
            }
            None => Box::new(io::stdout().lock()),
        };
        Ok(LibdocOutput {
            sink,
            path: path.map(Path::to_path_buf),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Flush and close the sink.
    pub fn finish(mut self) -> Result<()> {
        self.sink.flush()?;
        match self.path() {
            Some(path) => tracing::info!(path = %path.display(), "wrote documentation"),
            None => tracing::debug!("wrote documentation to stdout"),
        }
        Ok(())
    }
}

impl Write for LibdocOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_file_and_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.json");
        let mut out = LibdocOutput::open(Some(&path)).unwrap();
        assert_eq!(out.path(), Some(path.as_path()));
        out.write_all(b"{}").unwrap();
        out.finish().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as a file.
        assert!(LibdocOutput::open(Some(dir.path())).is_err());
    }
}

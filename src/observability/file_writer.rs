//! Size-capped log file for the tracing subscriber.
//!
//! The interactive session owns the terminal, so log events go to
//! `<data_dir>/modstash.log` instead. Once that file grows past the cap it is
//! renamed to `modstash.log.<millis>` and a fresh one is started; only the
//! newest few renamed files are kept.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_CAP_BYTES: u64 = 10 * 1024 * 1024;
const KEPT_ARCHIVES: usize = 3;

/// Log sink shared by every thread of the process.
///
/// ```rust
/// use modstash::observability::FileWriter;
///
/// let log = FileWriter::new(std::env::temp_dir().join("modstash-doc.log"));
/// log.write_bytes(b"hello\n")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FileWriter {
    path: PathBuf,
    cap_bytes: u64,
    /// Opened on first write and dropped on rotation.
    handle: Mutex<Option<File>>,
}

impl FileWriter {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self::with_limit(path, DEFAULT_CAP_BYTES)
    }

    /// Rotates once the file exceeds `cap_bytes`.
    #[must_use]
    pub const fn with_limit(path: PathBuf, cap_bytes: u64) -> Self {
        Self {
            path,
            cap_bytes,
            handle: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `buf` and flushes, rotating first if the file is over the cap.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, or [`io::ErrorKind::Other`] if a
    /// thread panicked while writing.
    pub fn write_bytes(&self, buf: &[u8]) -> io::Result<()> {
        let mut handle = self.lock()?;

        if self.over_cap() {
            *handle = None;
            self.archive_current()?;
        }

        let file = match handle.take() {
            Some(file) => file,
            None => OpenOptions::new().create(true).append(true).open(&self.path)?,
        };
        let file = handle.insert(file);
        file.write_all(buf)?;
        file.flush()
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, Option<File>>> {
        self.handle
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))
    }

    fn over_cap(&self) -> bool {
        fs::metadata(&self.path).is_ok_and(|m| m.len() > self.cap_bytes)
    }

    fn base_name(&self) -> io::Result<&str> {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))
    }

    fn archive_current(&self) -> io::Result<()> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let archive = self.path.with_file_name(format!("{}.{stamp}", self.base_name()?));
        if self.path.exists() {
            fs::rename(&self.path, archive)?;
        }
        self.prune_archives()
    }

    /// Deletes all but the newest [`KEPT_ARCHIVES`] archives. Failures to
    /// delete a single archive are ignored.
    fn prune_archives(&self) -> io::Result<()> {
        let Some(dir) = self.path.parent() else {
            return Ok(());
        };
        let prefix = format!("{}.", self.base_name()?);

        let mut archives: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(&prefix))
            })
            .collect();

        // Equal-width millisecond stamps: lexical order is age order.
        archives.sort_unstable_by(|a, b| b.cmp(a));
        for stale in archives.into_iter().skip(KEPT_ARCHIVES) {
            let _ = fs::remove_file(stale);
        }
        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("path", &self.path)
            .field("cap_bytes", &self.cap_bytes)
            .finish_non_exhaustive()
    }
}

/// What [`MakeWriter`] hands the fmt layer for each event.
#[derive(Debug)]
pub struct FileWriterHandle<'a> {
    sink: &'a FileWriter,
}

impl Write for FileWriterHandle<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sink.write_bytes(buf).map(|()| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterHandle<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterHandle { sink: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_count(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("test.log."))
            .count()
    }

    #[test]
    fn appends_through_make_writer() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("test.log"));

        writer.make_writer().write_all(b"one\n").unwrap();
        writer.make_writer().write_all(b"two\n").unwrap();

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn rotates_past_limit_and_keeps_three_archives() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limit(dir.path().join("test.log"), 4);

        for _ in 0..6 {
            writer.write_bytes(b"0123456789").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        let archives = archive_count(dir.path());
        assert!((1..=KEPT_ARCHIVES).contains(&archives));
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "0123456789");
    }
}

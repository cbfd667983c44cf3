//! Rotating file writer with size-based rotation and backup retention.
//!
//! Trace files grow with every exported batch; the writer caps them at a
//! size threshold and keeps a fixed number of timestamped backups.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// The file is opened lazily on the first write. Before every write the
/// current size is checked; once it exceeds the limit the file is renamed to
/// `<stem>.json.<unix-seconds>` and a fresh one is started. Backups beyond
/// the retention count are removed, oldest first.
///
/// # Example
///
/// ```rust,ignore
/// let writer = FileWriter::new(PathBuf::from("/tmp/marketmod-otlp.json"));
/// writer.write_line("{\"resourceSpans\": []}")?;
/// ```
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    writer: Mutex<Option<File>>,
}

impl FileWriter {
    /// Creates a writer with the default 10 MB limit and 3 backups.
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    /// Creates a writer with explicit rotation limits.
    ///
    /// # Parameters
    ///
    /// * `file_path` - Primary trace file, created on first write
    /// * `max_bytes` - Size above which the file is rotated
    /// * `max_backups` - Rotated files kept on disk
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `json` and a newline, rotating first when the file is full.
    ///
    /// # Errors
    ///
    /// Fails on filesystem errors or when a previous writer panicked while
    /// holding the lock.
    pub fn write_line(&self, json: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        let file = match writer.as_mut() {
            Some(file) => file,
            None => writer.insert(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.file_path)?,
            ),
        };

        writeln!(file, "{json}")?;
        file.flush()
    }

    fn check_and_rotate(&self, writer: &mut Option<File>) -> io::Result<()> {
        let oversized = fs::metadata(&self.file_path).is_ok_and(|m| m.len() > self.max_bytes);
        if oversized {
            *writer = None;
            self.rotate_files()?;
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let backup_path = self.file_path.with_extension(format!("json.{timestamp}"));
        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Removes backups beyond the retention count, newest kept.
    ///
    /// Individual deletion failures are ignored so one stuck file does not
    /// block the rest.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent_dir = self
            .file_path
            .parent()
            .ok_or_else(|| io::Error::other("No parent directory"))?;

        let file_stem = self
            .file_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| io::Error::other("Invalid file name"))?;

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(file_stem) && name.contains(".json."))
            })
            .collect();

        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time)
        });

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

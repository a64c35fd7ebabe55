//! Output sinks: where finished atlas images and descriptors end up.

use std::{
    collections::BTreeMap,
    io::{self, BufWriter, Write},
    mem,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use fs_err as fs;

/// Creates named output files. Several files may be open and written from
/// different threads at once.
pub trait OutputSink: Send + Sync {
    fn create(&self, filename: &str) -> io::Result<Box<dyn Write + Send + '_>>;
}

/// Writes files into a directory on disk, creating it if needed.
#[derive(Debug, Clone)]
pub struct FileSink {
    directory: PathBuf,
}

impl FileSink {
    pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl OutputSink for FileSink {
    fn create(&self, filename: &str) -> io::Result<Box<dyn Write + Send + '_>> {
        fs::create_dir_all(&self.directory)?;

        let path = self.directory.join(filename);
        log::trace!("Writing {}", path.display());

        let file = fs::File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Keeps written files in memory. Clones share the same set of files.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every file written so far, keyed by name.
    pub fn files(&self) -> BTreeMap<String, Vec<u8>> {
        self.lock().clone()
    }

    pub fn get(&self, filename: &str) -> Option<Vec<u8>> {
        self.lock().get(filename).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OutputSink for MemorySink {
    fn create(&self, filename: &str) -> io::Result<Box<dyn Write + Send + '_>> {
        // Creating a file again truncates it, like `File::create`.
        self.lock().insert(filename.to_owned(), Vec::new());

        Ok(Box::new(MemoryFile {
            sink: self,
            filename: filename.to_owned(),
            buffer: Vec::new(),
        }))
    }
}

/// A file being written into a [`MemorySink`]. Contents become visible in the
/// sink on every flush, and when the file is dropped.
struct MemoryFile<'a> {
    sink: &'a MemorySink,
    filename: String,
    buffer: Vec<u8>,
}

impl MemoryFile<'_> {
    fn publish(&mut self) {
        let contents = mem::take(&mut self.buffer);
        let mut files = self.sink.lock();
        files.entry(self.filename.clone()).or_default().extend(contents);
    }
}

impl Write for MemoryFile<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.publish();
        Ok(())
    }
}

impl Drop for MemoryFile<'_> {
    fn drop(&mut self) {
        self.publish();
    }
}

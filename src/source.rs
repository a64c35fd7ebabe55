//! Asset sources: where the images that get packed come from.
//!
//! A source hands assets over one at a time through an [`AssetStream`]. Each
//! stream runs its producer on its own thread, which stops as soon as the
//! run's [`CancelToken`] fires or nobody is left to receive assets, and
//! reports exactly one terminal result once it's done.

use std::{
    io::{self, BufReader, Cursor, Read},
    panic,
    path::{Path, PathBuf},
    sync::{
        mpsc::{self, Receiver, SyncSender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use fs_err as fs;
use walkdir::WalkDir;

use crate::{asset_name::AssetName, cancel::CancelToken, error::Error, glob::Glob};

/// A single named input that can be read as bytes.
pub trait Asset: Send {
    fn name(&self) -> &AssetName;

    fn open(&self) -> io::Result<Box<dyn Read + '_>>;
}

/// Produces the stream of assets a run packs.
pub trait AssetSource: Send + Sync {
    fn stream(&self, cancel: &CancelToken) -> AssetStream;
}

impl<F> AssetSource for F
where
    F: Fn(&CancelToken) -> AssetStream + Send + Sync,
{
    fn stream(&self, cancel: &CancelToken) -> AssetStream {
        self(cancel)
    }
}

/// The receiving end of an asset source, plus the producer feeding it.
pub struct AssetStream {
    assets: Receiver<Box<dyn Asset>>,
    producer: StreamHandle,
}

impl AssetStream {
    /// Runs `produce` on a new thread, handing it a sender to publish assets
    /// through. Whatever `produce` returns becomes the stream's terminal
    /// result.
    pub fn spawn<F>(cancel: &CancelToken, produce: F) -> Self
    where
        F: FnOnce(&AssetSender) -> Result<(), Error> + Send + 'static,
    {
        // Rendezvous channel: the producer never gets ahead of the consumers.
        let (sender, assets) = mpsc::sync_channel(0);
        let sender = AssetSender {
            sender,
            cancel: cancel.clone(),
        };

        let producer = thread::spawn(move || produce(&sender));

        Self {
            assets,
            producer: StreamHandle(producer),
        }
    }

    pub fn into_parts(self) -> (Receiver<Box<dyn Asset>>, StreamHandle) {
        (self.assets, self.producer)
    }
}

/// Waits on the producer thread of an [`AssetStream`].
pub struct StreamHandle(JoinHandle<Result<(), Error>>);

impl StreamHandle {
    /// Blocks until the producer exits and returns its terminal result. The
    /// receiving end of the stream should be dropped or drained first, or a
    /// producer waiting to hand over an asset will never exit.
    pub fn finish(self) -> Result<(), Error> {
        match self.0.join() {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }
}

pub struct AssetSender {
    sender: SyncSender<Box<dyn Asset>>,
    cancel: CancelToken,
}

impl AssetSender {
    /// Publishes an asset, blocking until a consumer takes it. Fails with
    /// `Error::Cancelled` if the run was cancelled or every consumer is gone.
    pub fn send<A: Asset + 'static>(&self, asset: A) -> Result<(), Error> {
        self.cancel.check()?;

        self.sender
            .send(Box::new(asset))
            .map_err(|_| Error::Cancelled)
    }

    pub fn check(&self) -> Result<(), Error> {
        self.cancel.check()
    }
}

struct FileAsset {
    name: AssetName,
    path: PathBuf,
}

impl Asset for FileAsset {
    fn name(&self) -> &AssetName {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        let file = fs::File::open(&self.path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Streams every regular file under a directory, recursively. Assets are
/// named by their path relative to the directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl AssetSource for DirectorySource {
    fn stream(&self, cancel: &CancelToken) -> AssetStream {
        let root = self.root.clone();

        AssetStream::spawn(cancel, move |sender| {
            log::trace!("Searching for assets in {}", root.display());

            let walker = WalkDir::new(&root).sort_by(|a, b| a.file_name().cmp(b.file_name()));

            for entry in walker {
                sender.check()?;

                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let name = AssetName::from_paths(&root, entry.path());
                log::trace!("Found asset {}", name);

                sender.send(FileAsset {
                    name,
                    path: entry.into_path(),
                })?;
            }

            Ok(())
        })
    }
}

/// Streams a fixed list of files from a directory. Assets are named by the
/// file names they were listed with.
#[derive(Debug, Clone)]
pub struct FileListSource {
    directory: PathBuf,
    files: Vec<String>,
}

impl FileListSource {
    pub fn new<P, I, S>(directory: P, files: I) -> Self
    where
        P: Into<PathBuf>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: directory.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetSource for FileListSource {
    fn stream(&self, cancel: &CancelToken) -> AssetStream {
        let directory = self.directory.clone();
        let files = self.files.clone();

        AssetStream::spawn(cancel, move |sender| {
            for file_name in files {
                let path = directory.join(&file_name);

                sender.send(FileAsset {
                    name: AssetName::new(file_name),
                    path,
                })?;
            }

            Ok(())
        })
    }
}

/// Streams every file matching a glob. Assets are named by their file name
/// alone.
#[derive(Debug, Clone)]
pub struct GlobSource {
    glob: Glob,
}

impl GlobSource {
    pub fn new(glob: Glob) -> Self {
        Self { glob }
    }
}

impl AssetSource for GlobSource {
    fn stream(&self, cancel: &CancelToken) -> AssetStream {
        let glob = self.glob.clone();

        AssetStream::spawn(cancel, move |sender| {
            let prefix = glob.get_prefix();
            let base_path = if prefix.as_os_str().is_empty() {
                Path::new(".").to_owned()
            } else {
                prefix
            };

            log::trace!(
                "Searching for assets in '{}' matching '{}'",
                base_path.display(),
                glob
            );

            let walker = WalkDir::new(&base_path).sort_by(|a, b| a.file_name().cmp(b.file_name()));

            for entry in walker {
                sender.check()?;

                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let match_path = entry.path().strip_prefix(".").unwrap_or(entry.path());
                if !glob.is_match(match_path) {
                    continue;
                }

                let name = AssetName::new(entry.file_name().to_string_lossy().as_ref());
                log::trace!("Found asset {}", name);

                sender.send(FileAsset {
                    name,
                    path: entry.into_path(),
                })?;
            }

            Ok(())
        })
    }
}

struct MemoryAsset {
    name: AssetName,
    contents: Arc<[u8]>,
}

impl Asset for MemoryAsset {
    fn name(&self) -> &AssetName {
        &self.name
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(&self.contents[..])))
    }
}

/// Streams assets held in memory, in the order they were added.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    assets: Vec<(AssetName, Arc<[u8]>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<N, C>(mut self, name: N, contents: C) -> Self
    where
        N: Into<AssetName>,
        C: Into<Arc<[u8]>>,
    {
        self.add(name, contents);
        self
    }

    pub fn add<N, C>(&mut self, name: N, contents: C)
    where
        N: Into<AssetName>,
        C: Into<Arc<[u8]>>,
    {
        self.assets.push((name.into(), contents.into()));
    }
}

impl AssetSource for MemorySource {
    fn stream(&self, cancel: &CancelToken) -> AssetStream {
        let assets = self.assets.clone();

        AssetStream::spawn(cancel, move |sender| {
            for (name, contents) in assets {
                sender.send(MemoryAsset { name, contents })?;
            }

            Ok(())
        })
    }
}

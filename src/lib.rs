//! atlaspack packs loose sprite images into texture atlases, writing each
//! atlas out as a PNG alongside a descriptor that tells a game engine where
//! every sprite ended up.
//!
//! A run reads assets from an [`AssetSource`], decodes them on a small pool of
//! worker threads, packs them into as many atlases as they need and writes
//! every atlas's image and descriptor to an [`OutputSink`] concurrently.
//!
//! ```no_run
//! use atlaspack::{run, CancelToken, DirectorySource, FileSink, Params};
//!
//! let params = Params {
//!     padding: 2,
//!     format: Some("starling".to_owned()),
//!     ..Params::new(DirectorySource::new("sprites"), FileSink::new("out"))
//! };
//!
//! let report = run(params, &CancelToken::new())?;
//! println!("wrote {} atlases", report.atlases.len());
//! # Ok::<(), atlaspack::Error>(())
//! ```

mod allocate;
mod alpha_bleed;
mod asset_name;
mod atlas;
mod cancel;
mod decode;
mod descriptor;
mod error;
mod glob;
mod image;
mod lua_ast;
mod output;
mod run;
mod source;
mod sprite;

pub use guillo::SortOrder;

pub use crate::{
    asset_name::AssetName,
    atlas::AtlasReport,
    cancel::CancelToken,
    decode::DECODE_WORKERS,
    descriptor::{AtlasDescription, DescriptorFormat, SpriteRecord},
    error::Error,
    glob::Glob,
    image::{Image, Pixel},
    output::{FileSink, MemorySink, OutputSink},
    run::{
        run, PackReport, Params, DEFAULT_ATLAS_HEIGHT, DEFAULT_ATLAS_NAME, DEFAULT_ATLAS_WIDTH,
        DEFAULT_FORMAT, MAX_ATLAS_DIMENSION,
    },
    source::{
        Asset, AssetSender, AssetSource, AssetStream, DirectorySource, FileListSource,
        GlobSource, MemorySource, StreamHandle,
    },
};

use std::io;

use thiserror::Error;

use crate::asset_name::AssetName;

/// Everything that can end a packing run.
///
/// Apart from sprites being deferred to a later atlas, nothing is recovered
/// from: the first of these to happen is what the run reports.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no asset source was given to read sprites from")]
    MissingInput,

    #[error("no output sink was given to write atlases to")]
    MissingOutput,

    #[error("unknown descriptor format '{name}'. Valid options are 'love', 'starling' and 'json'.")]
    UnknownFormat { name: String },

    #[error("atlas dimensions must be between 1 and {max} pixels, got {width}x{height}")]
    InvalidSize { width: u32, height: u32, max: u32 },

    #[error("sprite scale must be a positive number, got {scale}")]
    InvalidScale { scale: f64 },

    #[error(
        "sprite {name} needs {}x{} pixels (including padding), which can never fit in a {}x{} atlas",
        .size.0, .size.1, .atlas_size.0, .atlas_size.1
    )]
    InputTooLarge {
        name: AssetName,
        size: (u32, u32),
        atlas_size: (u32, u32),
    },

    #[error("{remaining} sprites could not be placed, even in an empty atlas")]
    OutOfRoom { remaining: usize },

    #[error("packing these sprites needs more than the maximum of {max} atlases")]
    MaxAtlasesExceeded { max: usize },

    #[error("couldn't decode {name} as an image")]
    Decode {
        name: AssetName,
        source: image::ImageError,
    },

    #[error("packing was cancelled")]
    Cancelled,

    #[error(transparent)]
    Io {
        #[from]
        source: io::Error,
    },

    #[error(transparent)]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    #[error(transparent)]
    Glob {
        #[from]
        source: globset::Error,
    },

    #[error(transparent)]
    Encode {
        #[from]
        source: png::EncodingError,
    },

    #[error(transparent)]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

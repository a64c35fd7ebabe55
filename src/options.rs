use std::path::PathBuf;

use atlaspack::SortOrder;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs sprites into texture atlases for 2D games")]
pub struct Options {
    /// The directory of sprites to pack, or a glob matching them like
    /// `sprites/**/*.png`. Can also be set by the project file.
    pub input: Option<String>,

    /// The name atlases are given, followed by their number.
    #[structopt(long)]
    pub name: Option<String>,

    /// The directory to write atlases to. Defaults to the current directory.
    #[structopt(long, short)]
    pub out: Option<PathBuf>,

    /// The descriptor format to write next to each atlas image.
    ///
    /// Options:
    ///
    /// - love: A Lua module returning Love2D quads
    ///
    /// - starling: A Starling/Sparrow TextureAtlas XML file
    ///
    /// - json: A JSON document listing every sprite
    #[structopt(long)]
    pub format: Option<String>,

    /// The width of each atlas, in pixels.
    #[structopt(long)]
    pub width: Option<u32>,

    /// The height of each atlas, in pixels.
    #[structopt(long)]
    pub height: Option<u32>,

    /// Empty pixels to leave around every sprite.
    #[structopt(long)]
    pub padding: Option<u32>,

    /// The most atlases to produce. Packing fails if the sprites need more.
    /// Zero means no limit.
    #[structopt(long)]
    pub max_atlases: Option<usize>,

    /// Which sprites to pack first: 'area' or 'max-side'.
    #[structopt(long)]
    pub sort: Option<SortOrder>,

    /// Scales every sprite by this factor before packing.
    #[structopt(long)]
    pub scale: Option<f64>,

    /// Fill transparent pixels with the color of their neighbors to avoid
    /// dark fringes when atlases are filtered.
    #[structopt(long)]
    pub bleed: bool,

    /// The project file to read settings from. Defaults to atlaspack.toml in
    /// the current directory, if there is one.
    #[structopt(long)]
    pub config: Option<PathBuf>,

    /// Log what packing is doing in more detail.
    #[structopt(long, short)]
    pub verbose: bool,
}

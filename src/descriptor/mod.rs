//! Descriptor formats: text files telling a game engine where each sprite
//! ended up inside an atlas image.

mod json;
mod love;
mod starling;

use std::{fmt, io::Write, str::FromStr};

use serde::Serialize;

use crate::error::Error;

/// Everything a descriptor records about one atlas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtlasDescription {
    pub name: String,

    /// File name of the atlas image, relative to the descriptor.
    pub image: String,
    pub width: u32,
    pub height: u32,

    /// Sprites in the order they were packed.
    pub sprites: Vec<SpriteRecord>,
}

/// Where one sprite's pixels are inside its atlas, excluding padding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpriteRecord {
    pub name: String,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFormat {
    /// A Lua module returning a table of Love2D quads.
    Love,

    /// A Starling/Sparrow `TextureAtlas` XML document.
    Starling,

    /// A JSON document mirroring [`AtlasDescription`].
    Json,
}

impl DescriptorFormat {
    pub fn name(self) -> &'static str {
        match self {
            DescriptorFormat::Love => "love",
            DescriptorFormat::Starling => "starling",
            DescriptorFormat::Json => "json",
        }
    }

    /// The file extension descriptors in this format are written with.
    pub fn extension(self) -> &'static str {
        match self {
            DescriptorFormat::Love => "lua",
            DescriptorFormat::Starling => "xml",
            DescriptorFormat::Json => "json",
        }
    }

    pub fn render<W: Write>(self, atlas: &AtlasDescription, output: W) -> Result<(), Error> {
        match self {
            DescriptorFormat::Love => love::render(atlas, output),
            DescriptorFormat::Starling => starling::render(atlas, output),
            DescriptorFormat::Json => json::render(atlas, output),
        }
    }
}

impl Default for DescriptorFormat {
    fn default() -> Self {
        DescriptorFormat::Love
    }
}

impl fmt::Display for DescriptorFormat {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

impl FromStr for DescriptorFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "love" => Ok(DescriptorFormat::Love),
            "starling" => Ok(DescriptorFormat::Starling),
            "json" => Ok(DescriptorFormat::Json),
            _ => Err(Error::UnknownFormat {
                name: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_description() -> AtlasDescription {
    AtlasDescription {
        name: "atlas-1".to_owned(),
        image: "atlas-1.png".to_owned(),
        width: 512,
        height: 256,
        sprites: vec![
            SpriteRecord {
                name: "character_hero".to_owned(),
                left: 2,
                top: 2,
                width: 256,
                height: 252,
            },
            SpriteRecord {
                name: "button".to_owned(),
                left: 260,
                top: 2,
                width: 200,
                height: 80,
            },
        ],
    }
}

use guillo::Block;
use image::{DynamicImage, GenericImageView};

use crate::asset_name::AssetName;

/// How decoded images turn into packable sprites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteOptions {
    /// Empty space reserved above and to the left of every sprite. Since the
    /// next sprite's space starts right after this one's, it ends up on every
    /// side.
    pub padding: u32,

    /// Multiplier applied to each image's size before packing.
    pub scale: f64,
}

impl Default for SpriteOptions {
    fn default() -> Self {
        Self {
            padding: 0,
            scale: 1.0,
        }
    }
}

/// A decoded image on its way into an atlas.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: AssetName,
    image: DynamicImage,

    /// The size this sprite is drawn at, after scaling.
    dimensions: (u32, u32),
    padding: u32,

    /// Where the sprite's pixels start, once it has been packed.
    position: Option<(u32, u32)>,
}

impl Sprite {
    pub fn new(name: AssetName, image: DynamicImage, options: SpriteOptions) -> Self {
        let dimensions = scaled_size(image.dimensions(), options.scale);

        Self {
            name,
            image,
            dimensions,
            padding: options.padding,
            position: None,
        }
    }

    pub fn name(&self) -> &AssetName {
        &self.name
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn position(&self) -> Option<(u32, u32)> {
        self.position
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }
}

impl Block for Sprite {
    fn size(&self) -> (u32, u32) {
        (
            self.dimensions.0.saturating_add(self.padding),
            self.dimensions.1.saturating_add(self.padding),
        )
    }

    fn place(&mut self, pos: (u32, u32)) {
        debug_assert!(self.position.is_none(), "{} was placed twice", self.name);

        self.position = Some((pos.0 + self.padding, pos.1 + self.padding));
    }
}

fn scaled_size(size: (u32, u32), scale: f64) -> (u32, u32) {
    if (scale - 1.0).abs() < f64::EPSILON {
        return size;
    }

    let scale_axis = |value: u32| (f64::from(value) * scale).round().max(1.0) as u32;

    (scale_axis(size.0), scale_axis(size.1))
}

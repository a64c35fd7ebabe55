use std::{
    io::Write,
    sync::mpsc,
    thread,
};

use crate::{
    alpha_bleed::alpha_bleed,
    cancel::CancelToken,
    descriptor::{AtlasDescription, DescriptorFormat, SpriteRecord},
    error::Error,
    image::Image,
    output::OutputSink,
    sprite::Sprite,
};

/// One finished page of packed sprites, ready to be drawn and described.
#[derive(Debug)]
pub struct Atlas {
    name: String,
    sprites: Vec<Sprite>,
    size: (u32, u32),
    image_filename: String,
    descriptor_filename: String,
}

impl Atlas {
    /// Creates the atlas numbered `index` (counting from 1) out of sprites
    /// that have all been placed.
    pub fn new(
        base_name: &str,
        index: usize,
        sprites: Vec<Sprite>,
        size: (u32, u32),
        format: DescriptorFormat,
    ) -> Self {
        debug_assert!(sprites.iter().all(Sprite::is_placed));

        let name = format!("{}-{}", base_name, index);
        let image_filename = format!("{}.png", name);
        let descriptor_filename = format!("{}.{}", name, format.extension());

        Self {
            name,
            sprites,
            size,
            image_filename,
            descriptor_filename,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_filename(&self) -> &str {
        &self.image_filename
    }

    pub fn descriptor_filename(&self) -> &str {
        &self.descriptor_filename
    }

    /// Draws every sprite onto a blank canvas the size of the atlas.
    pub fn create_image(&self, bleed: bool, cancel: &CancelToken) -> Result<Image, Error> {
        let mut image = Image::new_empty_rgba8(self.size);

        for sprite in &self.sprites {
            cancel.check()?;

            let pos = sprite.position().unwrap_or_default();
            image.draw(sprite.image(), pos, sprite.dimensions());
        }

        if bleed {
            cancel.check()?;
            alpha_bleed(&mut image);
        }

        Ok(image)
    }

    pub fn write_image(
        &self,
        sink: &dyn OutputSink,
        bleed: bool,
        cancel: &CancelToken,
    ) -> Result<(), Error> {
        let image = self.create_image(bleed, cancel)?;
        cancel.check()?;

        let mut file = sink.create(&self.image_filename)?;
        image.encode_png(&mut file)?;
        file.flush()?;

        log::trace!("Wrote {}", self.image_filename);
        Ok(())
    }

    pub fn write_descriptor(
        &self,
        sink: &dyn OutputSink,
        format: DescriptorFormat,
    ) -> Result<(), Error> {
        let mut file = sink.create(&self.descriptor_filename)?;
        format.render(&self.description(), &mut file)?;
        file.flush()?;

        log::trace!("Wrote {}", self.descriptor_filename);
        Ok(())
    }

    pub fn description(&self) -> AtlasDescription {
        AtlasDescription {
            name: self.name.clone(),
            image: self.image_filename.clone(),
            width: self.size.0,
            height: self.size.1,
            sprites: self.sprite_records(),
        }
    }

    pub fn report(&self) -> AtlasReport {
        AtlasReport {
            name: self.name().to_owned(),
            image_filename: self.image_filename().to_owned(),
            descriptor_filename: self.descriptor_filename().to_owned(),
            size: self.size,
            sprites: self.sprite_records(),
        }
    }

    fn sprite_records(&self) -> Vec<SpriteRecord> {
        self.sprites
            .iter()
            .map(|sprite| {
                let (left, top) = sprite.position().unwrap_or_default();
                let (width, height) = sprite.dimensions();

                SpriteRecord {
                    name: sprite.name().display_name().to_owned(),
                    left,
                    top,
                    width,
                    height,
                }
            })
            .collect()
    }
}

/// What a run produced for one atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtlasReport {
    pub name: String,
    pub image_filename: String,
    pub descriptor_filename: String,
    pub size: (u32, u32),
    pub sprites: Vec<SpriteRecord>,
}

/// Writes the image and descriptor of every atlas, all at once.
///
/// Each atlas gets one thread drawing and encoding its image and another
/// rendering its descriptor. The first failure cancels the rest and is the
/// one returned; files that were already written are left in place.
pub fn write_atlases(
    atlases: &[Atlas],
    sink: &dyn OutputSink,
    format: DescriptorFormat,
    bleed: bool,
    cancel: &CancelToken,
) -> Result<(), Error> {
    thread::scope(|scope| {
        let (result_tx, result_rx) = mpsc::channel();

        for atlas in atlases {
            let image_tx = result_tx.clone();
            scope.spawn(move || {
                let result = cancel
                    .check()
                    .and_then(|_| atlas.write_image(sink, bleed, cancel));
                let _ = image_tx.send(result);
            });

            let descriptor_tx = result_tx.clone();
            scope.spawn(move || {
                let result = cancel
                    .check()
                    .and_then(|_| atlas.write_descriptor(sink, format));
                let _ = descriptor_tx.send(result);
            });
        }

        drop(result_tx);

        let mut first_error = None;
        for result in result_rx {
            if let Err(err) = result {
                if first_error.is_none() {
                    log::debug!("Writing atlases failed, stopping: {}", err);
                    cancel.cancel();
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    })
}

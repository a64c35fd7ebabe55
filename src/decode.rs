//! Turns a stream of assets into decoded sprites on a fixed pool of worker
//! threads.

use std::{
    io::Read,
    sync::{
        mpsc::{self, Receiver},
        Mutex, PoisonError,
    },
    thread,
};

use crate::{
    cancel::CancelToken,
    error::Error,
    source::{Asset, AssetStream},
    sprite::{Sprite, SpriteOptions},
};

pub const DECODE_WORKERS: usize = 5;

/// Decodes every asset in the stream into a sprite.
///
/// The first failure, whether from a worker or from the stream itself, ends
/// decoding: `cancel` is triggered so that every other worker and the
/// producer stop, and that failure is returned. Sprites come back in the
/// order they finished decoding.
pub fn decode_sprites(
    stream: AssetStream,
    options: SpriteOptions,
    cancel: &CancelToken,
) -> Result<Vec<Sprite>, Error> {
    let (assets, producer) = stream.into_parts();
    let assets = Mutex::new(assets);

    let decoded = thread::scope(|scope| {
        let (result_tx, result_rx) = mpsc::sync_channel(DECODE_WORKERS);

        for worker in 0..DECODE_WORKERS {
            let result_tx = result_tx.clone();
            let assets = &assets;

            scope.spawn(move || {
                log::trace!("Decode worker {} starting", worker);

                while let Some(asset) = next_asset(assets, cancel) {
                    let result = decode_asset(&*asset, options);

                    if result_tx.send(result).is_err() {
                        break;
                    }
                }

                log::trace!("Decode worker {} done", worker);
            });
        }

        // Only the workers' senders remain, so the channel closes once the
        // last worker exits.
        drop(result_tx);

        collect_sprites(result_rx, cancel)
    });

    // A producer blocked on handing over an asset is released once nobody can
    // receive it anymore.
    drop(assets);
    let stream_result = producer.finish();

    let sprites = decoded?;

    match stream_result {
        Ok(()) => {
            log::debug!("Decoded {} sprites", sprites.len());
            Ok(sprites)
        }
        Err(err) => {
            cancel.cancel();
            Err(err)
        }
    }
}

fn next_asset(
    assets: &Mutex<Receiver<Box<dyn Asset>>>,
    cancel: &CancelToken,
) -> Option<Box<dyn Asset>> {
    if cancel.is_cancelled() {
        return None;
    }

    let assets = assets.lock().unwrap_or_else(PoisonError::into_inner);
    assets.recv().ok()
}

fn collect_sprites(
    results: Receiver<Result<Sprite, Error>>,
    cancel: &CancelToken,
) -> Result<Vec<Sprite>, Error> {
    let mut sprites = Vec::new();

    for result in results.iter() {
        match result {
            Ok(sprite) => sprites.push(sprite),
            Err(err) => {
                log::debug!("Decoding failed, stopping: {}", err);
                cancel.cancel();

                // Dropping the receiver here makes any worker still trying to
                // report a result give up.
                return Err(err);
            }
        }
    }

    Ok(sprites)
}

fn decode_asset(asset: &dyn Asset, options: SpriteOptions) -> Result<Sprite, Error> {
    let name = asset.name().clone();
    log::trace!("Decoding {}", name);

    let mut contents = Vec::new();
    asset.open()?.read_to_end(&mut contents)?;

    let image = image::load_from_memory(&contents).map_err(|source| Error::Decode {
        name: name.clone(),
        source,
    })?;

    Ok(Sprite::new(name, image, options))
}

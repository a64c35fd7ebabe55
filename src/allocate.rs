use guillo::{Block, GuillotinePacker, PackError};

use crate::{cancel::CancelToken, error::Error, sprite::Sprite};

/// Spreads sprites over as many atlases of the given size as they need.
///
/// Each pass packs every remaining sprite it can into a fresh atlas, in the
/// order given, and defers the rest to the next pass. There is always at
/// least one pass, so no sprites at all still makes one empty atlas. Every sprite ends up
/// in exactly one of the returned atlases, which keep the order their sprites
/// were packed in.
///
/// A `max_atlases` of zero means there is no limit.
pub fn allocate(
    sprites: Vec<Sprite>,
    size: (u32, u32),
    max_atlases: usize,
    cancel: &CancelToken,
) -> Result<Vec<Vec<Sprite>>, Error> {
    let mut atlases = Vec::new();
    let mut remaining = sprites;

    loop {
        cancel.check()?;

        if max_atlases > 0 && atlases.len() == max_atlases {
            log::debug!(
                "{} sprites left over after filling {} atlases",
                remaining.len(),
                max_atlases
            );
            return Err(Error::MaxAtlasesExceeded { max: max_atlases });
        }

        let attempted = remaining.len();
        let mut packer = GuillotinePacker::new(size);
        let mut completed = Vec::new();
        let mut deferred = Vec::new();

        for mut sprite in remaining {
            match packer.pack(&mut sprite) {
                Ok(_) => completed.push(sprite),
                Err(PackError::OutOfRoom) => deferred.push(sprite),
                Err(PackError::InputTooLarge { size, area }) => {
                    log::error!("{} is too large to ever fit in an atlas", sprite.name());

                    return Err(Error::InputTooLarge {
                        name: sprite.name().clone(),
                        size,
                        atlas_size: area,
                    });
                }
            }
        }

        log::debug!(
            "Atlas {} holds {} sprites, {} deferred",
            atlases.len() + 1,
            completed.len(),
            deferred.len()
        );

        atlases.push(completed);
        if deferred.is_empty() {
            break;
        }

        if deferred.len() == attempted {
            return Err(Error::OutOfRoom {
                remaining: deferred.len(),
            });
        }

        remaining = deferred;
    }

    Ok(atlases)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::BTreeSet;

    use guillo::{Rect, SortOrder};
    use image::DynamicImage;

    use crate::{asset_name::AssetName, sprite::SpriteOptions};

    fn sprites(sizes: &[(&str, (u32, u32))], padding: u32) -> Vec<Sprite> {
        let options = SpriteOptions {
            padding,
            ..Default::default()
        };

        sizes
            .iter()
            .map(|&(name, (width, height))| {
                Sprite::new(
                    AssetName::new(name),
                    DynamicImage::new_rgba8(width, height),
                    options,
                )
            })
            .collect()
    }

    fn fixtures() -> Vec<Sprite> {
        let mut sprites = sprites(
            &[
                ("button.png", (200, 80)),
                ("button_active.png", (200, 80)),
                ("button_hover.png", (200, 80)),
                ("character_evil.png", (256, 256)),
                ("character_hero.png", (256, 256)),
            ],
            0,
        );
        SortOrder::Area.sort(&mut sprites);
        sprites
    }

    // The area a placed sprite claims, including its padding.
    fn claimed_rect(sprite: &Sprite) -> Rect {
        let (x, y) = sprite.position().unwrap();
        let padding = sprite.size().0 - sprite.dimensions().0;

        Rect::new((x - padding, y - padding), sprite.size())
    }

    fn names(atlas: &[Sprite]) -> Vec<&str> {
        atlas.iter().map(|sprite| sprite.name().as_ref()).collect()
    }

    fn assert_valid_layout(atlases: &[Vec<Sprite>], size: (u32, u32)) {
        let bounds = Rect::new((0, 0), size);

        for atlas in atlases {
            for (i, a) in atlas.iter().enumerate() {
                let rect = claimed_rect(a);
                assert!(bounds.contains(&rect), "{} is out of bounds", a.name());

                for b in &atlas[i + 1..] {
                    assert!(
                        !rect.intersects(&claimed_rect(b)),
                        "{} overlaps {}",
                        a.name(),
                        b.name()
                    );
                }
            }
        }
    }

    #[test]
    fn everything_fits_in_one_atlas() {
        let atlases = allocate(fixtures(), (1024, 1024), 0, &CancelToken::new()).unwrap();

        assert_eq!(atlases.len(), 1);
        assert_eq!(atlases[0].len(), 5);
        assert_valid_layout(&atlases, (1024, 1024));
    }

    #[test]
    fn overflow_spills_into_second_atlas() {
        let atlases = allocate(fixtures(), (400, 400), 0, &CancelToken::new()).unwrap();

        assert_eq!(atlases.len(), 2);
        assert_eq!(
            names(&atlases[0]),
            vec!["character_evil.png", "button.png", "button_active.png"]
        );
        assert_eq!(
            names(&atlases[1]),
            vec!["character_hero.png", "button_hover.png"]
        );
        assert_valid_layout(&atlases, (400, 400));
    }

    #[test]
    fn every_sprite_lands_exactly_once() {
        let sizes: Vec<(String, (u32, u32))> = (0..60u32)
            .map(|i| (format!("{}.png", i), (10 + (i * 37) % 90, 10 + (i * 53) % 70)))
            .collect();
        let named: Vec<(&str, (u32, u32))> = sizes
            .iter()
            .map(|(name, size)| (name.as_str(), *size))
            .collect();

        let mut input = sprites(&named, 3);
        SortOrder::MaxSide.sort(&mut input);

        let atlases = allocate(input, (256, 256), 0, &CancelToken::new()).unwrap();
        assert!(atlases.len() > 1);
        assert_valid_layout(&atlases, (256, 256));

        let mut seen = BTreeSet::new();
        for sprite in atlases.iter().flatten() {
            assert!(seen.insert(sprite.name().to_string()), "{} placed twice", sprite.name());
        }
        assert_eq!(seen.len(), 60);
    }

    #[test]
    fn padding_offsets_placement() {
        let input = sprites(&[("button.png", (124, 50))], 2);

        let atlases = allocate(input, (2048, 2048), 0, &CancelToken::new()).unwrap();

        assert_eq!(atlases[0][0].position(), Some((2, 2)));
        assert_eq!(atlases[0][0].dimensions(), (124, 50));
    }

    #[test]
    fn padded_sprite_too_large() {
        let input = sprites(&[("button.png", (124, 50))], 2);

        let result = allocate(input, (124, 50), 0, &CancelToken::new());

        match result {
            Err(Error::InputTooLarge {
                name,
                size,
                atlas_size,
            }) => {
                assert_eq!(name.as_ref(), "button.png");
                assert_eq!(size, (126, 52));
                assert_eq!(atlas_size, (124, 50));
            }
            other => panic!("expected InputTooLarge, got {:?}", other.map(|a| a.len())),
        }
    }

    #[test]
    fn too_large_regardless_of_other_sprites() {
        let mut input = fixtures();
        input.extend(sprites(&[("banner.png", (401, 10))], 0));

        let result = allocate(input, (400, 400), 0, &CancelToken::new());

        assert!(matches!(result, Err(Error::InputTooLarge { name, .. }) if name.as_ref() == "banner.png"));
    }

    #[test]
    fn max_atlases_exceeded() {
        let result = allocate(fixtures(), (400, 400), 1, &CancelToken::new());

        assert!(matches!(result, Err(Error::MaxAtlasesExceeded { max: 1 })));
    }

    #[test]
    fn max_atlases_reached_exactly() {
        let atlases = allocate(fixtures(), (400, 400), 2, &CancelToken::new()).unwrap();

        assert_eq!(atlases.len(), 2);
    }

    #[test]
    fn nothing_to_allocate_still_makes_one_atlas() {
        let atlases = allocate(Vec::new(), (64, 64), 1, &CancelToken::new()).unwrap();

        assert_eq!(atlases.len(), 1);
        assert!(atlases[0].is_empty());
    }

    #[test]
    fn same_input_same_layout() {
        let layout = || {
            allocate(fixtures(), (400, 400), 0, &CancelToken::new())
                .unwrap()
                .iter()
                .map(|atlas| {
                    atlas
                        .iter()
                        .map(|sprite| (sprite.name().to_string(), sprite.position()))
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(layout(), layout());
    }

    #[test]
    fn cancelled() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = allocate(fixtures(), (1024, 1024), 0, &cancel);

        assert!(matches!(result, Err(Error::Cancelled)));
    }
}

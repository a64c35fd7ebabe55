use std::time::Instant;

use guillo::SortOrder;

use crate::{
    allocate::allocate,
    atlas::{write_atlases, Atlas, AtlasReport},
    cancel::CancelToken,
    decode::decode_sprites,
    descriptor::DescriptorFormat,
    error::Error,
    output::OutputSink,
    source::AssetSource,
    sprite::SpriteOptions,
};

pub const DEFAULT_ATLAS_NAME: &str = "atlas";
pub const DEFAULT_ATLAS_WIDTH: u32 = 2048;
pub const DEFAULT_ATLAS_HEIGHT: u32 = 2048;
pub const DEFAULT_FORMAT: &str = "love";

/// The largest width or height an atlas may have.
pub const MAX_ATLAS_DIMENSION: u32 = 16384;

/// Describes one packing run. Unset fields fall back to their defaults when
/// the run starts.
#[derive(Default)]
pub struct Params {
    /// Prefix of every atlas's name. Defaults to `atlas`.
    pub name: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Gutter reserved around every sprite, in pixels.
    pub padding: u32,

    /// Most atlases the run may produce. Zero means no limit.
    pub max_atlases: usize,
    pub sort: SortOrder,

    /// Multiplier applied to every sprite's size. Defaults to 1.
    pub scale: Option<f64>,

    /// Whether to bleed color into transparent pixels of finished atlases.
    pub bleed: bool,

    /// Name of the descriptor format to write. Defaults to `love`.
    pub format: Option<String>,

    pub input: Option<Box<dyn AssetSource>>,
    pub output: Option<Box<dyn OutputSink>>,
}

impl Params {
    pub fn new<I, O>(input: I, output: O) -> Self
    where
        I: AssetSource + 'static,
        O: OutputSink + 'static,
    {
        Self {
            input: Some(Box::new(input)),
            output: Some(Box::new(output)),
            ..Default::default()
        }
    }
}

/// A validated [`Params`] with every default filled in.
struct Settings {
    name: String,
    size: (u32, u32),
    max_atlases: usize,
    sort: SortOrder,
    sprite_options: SpriteOptions,
    bleed: bool,
    format: DescriptorFormat,
    input: Box<dyn AssetSource>,
    output: Box<dyn OutputSink>,
}

impl Settings {
    fn resolve(params: Params) -> Result<Self, Error> {
        let input = params.input.ok_or(Error::MissingInput)?;
        let output = params.output.ok_or(Error::MissingOutput)?;

        let format = params
            .format
            .as_deref()
            .unwrap_or(DEFAULT_FORMAT)
            .parse::<DescriptorFormat>()?;

        let width = params.width.unwrap_or(DEFAULT_ATLAS_WIDTH);
        let height = params.height.unwrap_or(DEFAULT_ATLAS_HEIGHT);
        let in_range = |side: u32| side > 0 && side <= MAX_ATLAS_DIMENSION;
        if !in_range(width) || !in_range(height) {
            return Err(Error::InvalidSize {
                width,
                height,
                max: MAX_ATLAS_DIMENSION,
            });
        }

        let scale = params.scale.unwrap_or(1.0);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::InvalidScale { scale });
        }

        Ok(Self {
            name: params
                .name
                .unwrap_or_else(|| DEFAULT_ATLAS_NAME.to_owned()),
            size: (width, height),
            max_atlases: params.max_atlases,
            sort: params.sort,
            sprite_options: SpriteOptions {
                padding: params.padding,
                scale,
            },
            bleed: params.bleed,
            format,
            input,
            output,
        })
    }
}

/// What a successful run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReport {
    pub atlases: Vec<AtlasReport>,
}

impl PackReport {
    pub fn sprite_count(&self) -> usize {
        self.atlases.iter().map(|atlas| atlas.sprites.len()).sum()
    }
}

/// Packs every asset from the input into atlases and writes their images and
/// descriptors to the output.
///
/// Either every sprite ends up in some atlas, or the first error that
/// happened is returned. Cancelling `cancel` stops the run as soon as each
/// stage notices. Failures inside the run stop its own work without
/// cancelling `cancel` itself.
pub fn run(params: Params, cancel: &CancelToken) -> Result<PackReport, Error> {
    let start_time = Instant::now();
    let settings = Settings::resolve(params)?;
    let cancel = cancel.child();

    let stream = settings.input.stream(&cancel);
    let mut sprites = decode_sprites(stream, settings.sprite_options, &cancel)?;

    // Decoding finishes in whatever order the workers got to each asset, so
    // settle ties by name before the real sort.
    sprites.sort_by(|a, b| a.name().cmp(b.name()));
    settings.sort.sort(&mut sprites);

    log::debug!(
        "Packing {} sprites into {}x{} atlases, largest {} first",
        sprites.len(),
        settings.size.0,
        settings.size.1,
        settings.sort
    );

    let atlases: Vec<Atlas> = allocate(sprites, settings.size, settings.max_atlases, &cancel)?
        .into_iter()
        .enumerate()
        .map(|(index, sprites)| {
            Atlas::new(
                &settings.name,
                index + 1,
                sprites,
                settings.size,
                settings.format,
            )
        })
        .collect();

    write_atlases(
        &atlases,
        &*settings.output,
        settings.format,
        settings.bleed,
        &cancel,
    )?;

    let report = PackReport {
        atlases: atlases.iter().map(Atlas::report).collect(),
    };

    log::info!(
        "Packed {} sprites into {} atlases",
        report.sprite_count(),
        report.atlases.len()
    );
    log::info!("Texture packing took {:?}", start_time.elapsed());

    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;

    use std::collections::BTreeSet;

    use crate::{
        descriptor::SpriteRecord,
        image::{Image, Pixel},
        output::MemorySink,
        source::MemorySource,
    };

    fn png(size: (u32, u32), color: Pixel) -> Vec<u8> {
        let mut image = Image::new_empty_rgba8(size);
        for y in 0..size.1 {
            for x in 0..size.0 {
                image.set_pixel((x, y), color);
            }
        }

        let mut encoded = Vec::new();
        image.encode_png(&mut encoded).unwrap();
        encoded
    }

    fn fixtures() -> MemorySource {
        let grey = Pixel::new(128, 128, 128, 255);

        MemorySource::new()
            .with("button.png", png((200, 80), grey))
            .with("button_active.png", png((200, 80), grey))
            .with("button_hover.png", png((200, 80), grey))
            .with("character_evil.png", png((256, 256), grey))
            .with("character_hero.png", png((256, 256), grey))
    }

    fn sprite_names(report: &PackReport) -> BTreeSet<String> {
        report
            .atlases
            .iter()
            .flat_map(|atlas| atlas.sprites.iter().map(|sprite| sprite.name.clone()))
            .collect()
    }

    #[test]
    fn one_atlas_when_everything_fits() {
        let sink = MemorySink::new();
        let params = Params {
            width: Some(1024),
            height: Some(1024),
            ..Params::new(fixtures(), sink.clone())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        assert_eq!(report.atlases.len(), 1);
        assert_eq!(report.sprite_count(), 5);
        assert_eq!(
            sink.files().keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["atlas-1.lua", "atlas-1.png"]
        );

        let descriptor = String::from_utf8(sink.get("atlas-1.lua").unwrap()).unwrap();
        insta::assert_snapshot!(descriptor, @r"
        local quads = {}

        quads['character_evil'] = love.graphics.newQuad(0,0,256,256,1024,1024)
        quads['character_hero'] = love.graphics.newQuad(256,0,256,256,1024,1024)
        quads['button'] = love.graphics.newQuad(512,0,200,80,1024,1024)
        quads['button_active'] = love.graphics.newQuad(712,0,200,80,1024,1024)
        quads['button_hover'] = love.graphics.newQuad(512,80,200,80,1024,1024)

        return quads
        ");

        let image = ::image::load_from_memory(&sink.get("atlas-1.png").unwrap()).unwrap();
        assert_eq!(image.width(), 1024);
        assert_eq!(image.height(), 1024);
    }

    #[test]
    fn overflow_makes_a_second_atlas() {
        let sink = MemorySink::new();
        let params = Params {
            width: Some(400),
            height: Some(400),
            format: Some("starling".to_owned()),
            ..Params::new(fixtures(), sink.clone())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        assert_eq!(report.atlases.len(), 2);

        let first: BTreeSet<_> = report.atlases[0].sprites.iter().map(|s| s.name.clone()).collect();
        let second: BTreeSet<_> = report.atlases[1].sprites.iter().map(|s| s.name.clone()).collect();
        assert!(first.is_disjoint(&second));
        assert_eq!(first.len() + second.len(), 5);
        assert_eq!(sprite_names(&report).len(), 5);

        assert_eq!(
            sink.files().keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["atlas-1.png", "atlas-1.xml", "atlas-2.png", "atlas-2.xml"]
        );

        let descriptor = String::from_utf8(sink.get("atlas-2.xml").unwrap()).unwrap();
        insta::assert_snapshot!(descriptor, @r###"
        <TextureAtlas imagePath="atlas-2.png">
            <SubTexture name="character_hero" x="0" y="0" width="256" height="256"/>
            <SubTexture name="button_hover" x="0" y="256" width="200" height="80"/>
        </TextureAtlas>
        "###);
    }

    #[test]
    fn padding_offsets_sprites() {
        let source = MemorySource::new().with("button.png", png((124, 50), Pixel::new(1, 2, 3, 255)));
        let sink = MemorySink::new();
        let params = Params {
            padding: 2,
            ..Params::new(source, sink.clone())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        assert_eq!(report.atlases.len(), 1);
        assert_eq!(report.atlases[0].size, (2048, 2048));
        assert_eq!(
            report.atlases[0].sprites,
            vec![SpriteRecord {
                name: "button".to_owned(),
                left: 2,
                top: 2,
                width: 124,
                height: 50,
            }]
        );

        let image = ::image::load_from_memory(&sink.get("atlas-1.png").unwrap())
            .unwrap()
            .to_rgba8();
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 0]);
        assert_eq!(image.get_pixel(2, 2).0, [1, 2, 3, 255]);
        assert_eq!(image.get_pixel(125, 51).0, [1, 2, 3, 255]);
        assert_eq!(image.get_pixel(126, 52).0, [0, 0, 0, 0]);
    }

    #[test]
    fn padded_sprite_too_large_for_atlas() {
        let source = MemorySource::new().with("button.png", png((124, 50), Pixel::new(1, 2, 3, 255)));
        let sink = MemorySink::new();
        let params = Params {
            width: Some(124),
            height: Some(50),
            padding: 2,
            ..Params::new(source, sink.clone())
        };

        let result = run(params, &CancelToken::new());

        assert!(matches!(result, Err(Error::InputTooLarge { .. })));
        assert!(sink.files().is_empty());
    }

    #[test]
    fn too_many_atlases_writes_nothing() {
        let sink = MemorySink::new();
        let params = Params {
            width: Some(400),
            height: Some(400),
            max_atlases: 1,
            ..Params::new(fixtures(), sink.clone())
        };

        let result = run(params, &CancelToken::new());

        assert!(matches!(result, Err(Error::MaxAtlasesExceeded { max: 1 })));
        assert!(sink.files().is_empty());
    }

    #[test]
    fn same_input_same_output() {
        let pack = || {
            let sink = MemorySink::new();
            let params = Params {
                width: Some(400),
                height: Some(400),
                sort: SortOrder::MaxSide,
                ..Params::new(fixtures(), sink.clone())
            };

            run(params, &CancelToken::new()).unwrap();
            sink.files()
        };

        assert_eq!(pack(), pack());
    }

    #[test]
    fn scale_shrinks_sprites() {
        let source = MemorySource::new().with("hero.png", png((100, 40), Pixel::new(9, 9, 9, 255)));
        let params = Params {
            scale: Some(0.5),
            format: Some("json".to_owned()),
            ..Params::new(source, MemorySink::new())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        let sprite = &report.atlases[0].sprites[0];
        assert_eq!((sprite.width, sprite.height), (50, 20));
        assert_eq!(report.atlases[0].descriptor_filename, "atlas-1.json");
    }

    #[test]
    fn custom_name() {
        let params = Params {
            name: Some("ui".to_owned()),
            ..Params::new(fixtures(), MemorySink::new())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        assert_eq!(report.atlases[0].name, "ui-1");
        assert_eq!(report.atlases[0].image_filename, "ui-1.png");
        assert_eq!(report.atlases[0].descriptor_filename, "ui-1.lua");
    }

    #[test]
    fn empty_input_writes_one_empty_atlas() {
        let sink = MemorySink::new();
        let report = run(Params::new(MemorySource::new(), sink.clone()), &CancelToken::new()).unwrap();

        assert_eq!(report.atlases.len(), 1);
        assert_eq!(report.atlases[0].name, "atlas-1");
        assert!(report.atlases[0].sprites.is_empty());

        let files = sink.files();
        assert_eq!(
            files.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["atlas-1.lua", "atlas-1.png"]
        );
        assert_eq!(
            String::from_utf8(files["atlas-1.lua"].clone()).unwrap(),
            "local quads = {}\n\n\nreturn quads\n"
        );
    }

    #[test]
    fn largest_atlas_is_accepted() {
        let params = Params {
            width: Some(MAX_ATLAS_DIMENSION),
            height: Some(1),
            ..Params::new(MemorySource::new(), MemorySink::new())
        };

        let report = run(params, &CancelToken::new()).unwrap();

        assert_eq!(report.atlases[0].size, (MAX_ATLAS_DIMENSION, 1));
    }

    #[test]
    fn undecodable_asset_fails_run() {
        let source = fixtures().with("notes.png", b"these are not pixels".to_vec());
        let sink = MemorySink::new();

        let result = run(Params::new(source, sink.clone()), &CancelToken::new());

        assert!(matches!(result, Err(Error::Decode { ref name, .. }) if name.as_ref() == "notes.png"));
        assert!(sink.files().is_empty());
    }

    #[test]
    fn failures_do_not_cancel_caller() {
        let cancel = CancelToken::new();
        let source = MemorySource::new().with("notes.png", b"not an image".to_vec());

        let result = run(Params::new(source, MemorySink::new()), &cancel);

        assert!(result.is_err());
        assert!(!cancel.is_cancelled());
    }

    #[test]
    fn cancelled_run_writes_nothing() {
        let sink = MemorySink::new();
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = run(Params::new(fixtures(), sink.clone()), &cancel);

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(sink.files().is_empty());
    }

    #[test]
    fn validates_params() {
        let missing_input = Params {
            output: Some(Box::new(MemorySink::new())),
            ..Default::default()
        };
        assert!(matches!(
            run(missing_input, &CancelToken::new()),
            Err(Error::MissingInput)
        ));

        let missing_output = Params {
            input: Some(Box::new(fixtures())),
            ..Default::default()
        };
        assert!(matches!(
            run(missing_output, &CancelToken::new()),
            Err(Error::MissingOutput)
        ));

        let unknown_format = Params {
            format: Some("plist".to_owned()),
            ..Params::new(fixtures(), MemorySink::new())
        };
        assert!(matches!(
            run(unknown_format, &CancelToken::new()),
            Err(Error::UnknownFormat { .. })
        ));

        let zero_width = Params {
            width: Some(0),
            ..Params::new(fixtures(), MemorySink::new())
        };
        assert!(matches!(
            run(zero_width, &CancelToken::new()),
            Err(Error::InvalidSize { width: 0, .. })
        ));

        let huge = Params {
            width: Some(32768),
            height: Some(32768),
            ..Params::new(fixtures(), MemorySink::new())
        };
        assert!(matches!(
            run(huge, &CancelToken::new()),
            Err(Error::InvalidSize {
                width: 32768,
                max: MAX_ATLAS_DIMENSION,
                ..
            })
        ));

        let negative_scale = Params {
            scale: Some(-1.0),
            ..Params::new(fixtures(), MemorySink::new())
        };
        assert!(matches!(
            run(negative_scale, &CancelToken::new()),
            Err(Error::InvalidScale { .. })
        ));
    }
}

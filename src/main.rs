mod config;
mod options;

use std::{env, path::PathBuf, process};

use anyhow::{anyhow, Context};
use atlaspack::{
    AssetSource, CancelToken, DirectorySource, FileSink, Glob, GlobSource, Params, SortOrder,
};
use structopt::StructOpt;

use crate::{config::Config, options::Options};

fn main() {
    let options = Options::from_args();

    let default_filter = if options.verbose {
        "atlaspack=debug,guillo=debug"
    } else {
        "atlaspack=info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Err(err) = run(options) {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    let config = match &options.config {
        Some(path) => Config::read_from_file(path)?,
        None => Config::read_from_folder_or_default(env::current_dir()?)?,
    };

    let input = options
        .input
        .or(config.input)
        .ok_or_else(|| anyhow!("no input was given, pass a directory or glob of sprites"))?;

    let source: Box<dyn AssetSource> = if Glob::is_pattern(&input) {
        let glob = Glob::new(&input).with_context(|| format!("invalid glob '{}'", input))?;
        Box::new(GlobSource::new(glob))
    } else {
        Box::new(DirectorySource::new(&input))
    };

    let out = options
        .out
        .or(config.out)
        .unwrap_or_else(|| PathBuf::from("."));

    let sort = match (options.sort, config.sort) {
        (Some(sort), _) => sort,
        (None, Some(name)) => name.parse::<SortOrder>().map_err(anyhow::Error::msg)?,
        (None, None) => SortOrder::default(),
    };

    log::debug!("Packing sprites from {} into {}", input, out.display());

    let params = Params {
        name: options.name.or(config.name),
        width: options.width.or(config.width),
        height: options.height.or(config.height),
        padding: options.padding.or(config.padding).unwrap_or(0),
        max_atlases: options.max_atlases.or(config.max_atlases).unwrap_or(0),
        sort,
        scale: options.scale.or(config.scale),
        bleed: options.bleed || config.bleed.unwrap_or(false),
        format: options.format.or(config.format),
        input: Some(source),
        output: Some(Box::new(FileSink::new(out))),
    };

    let report = atlaspack::run(params, &CancelToken::new())?;

    for atlas in &report.atlases {
        log::info!(
            "Wrote {} and {} ({} sprites)",
            atlas.image_filename,
            atlas.descriptor_filename,
            atlas.sprites.len()
        );
    }

    Ok(())
}

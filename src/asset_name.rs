use std::{
    ffi::OsStr,
    fmt,
    path::{self, Path},
    sync::Arc,
};

/// Identifies an asset within the source it came from, like
/// `ui/buttons/play.png`.
///
/// This is really just a string, but by making it have an explicit type with
/// known conversions, we can avoid mixing it up with file system paths or the
/// names of output files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetName(Arc<str>);

impl AssetName {
    pub fn new<S: Into<Arc<str>>>(name: S) -> Self {
        AssetName(name.into())
    }

    /// Names an asset by its path relative to the root it was discovered
    /// under. Paths outside of the root keep their full path.
    pub fn from_paths(root_path: &Path, asset_path: &Path) -> Self {
        let relative = asset_path.strip_prefix(root_path).unwrap_or(asset_path);

        let displayed = format!("{}", relative.display());

        // In order to make relative paths behave cross-platform, fix the path
        // separator to always be / on platforms where it isn't the main separator.
        let displayed = if path::MAIN_SEPARATOR == '/' {
            displayed
        } else {
            displayed.replace(path::MAIN_SEPARATOR, "/")
        };

        AssetName(displayed.into())
    }

    /// The name sprites from this asset are listed under in descriptors: the
    /// file name without its directory or extension.
    pub fn display_name(&self) -> &str {
        Path::new(&*self.0)
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or(&self.0)
    }
}

impl AsRef<str> for AssetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetName {
    fn from(value: &str) -> Self {
        AssetName::new(value)
    }
}

impl fmt::Display for AssetName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

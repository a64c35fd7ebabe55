//! Wrapper around globset's Glob type that keeps the compiled matcher next to
//! the pattern, and knows which part of the pattern is a plain directory we
//! can start walking from.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use globset::{Glob as InnerGlob, GlobMatcher};

pub use globset::Error;

#[derive(Debug, Clone)]
pub struct Glob {
    inner: InnerGlob,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(glob: &str) -> Result<Self, Error> {
        let inner = InnerGlob::new(glob)?;
        let matcher = inner.compile_matcher();

        Ok(Glob { inner, matcher })
    }

    /// Tells whether the given string uses any glob syntax, as opposed to
    /// being a plain path.
    pub fn is_pattern(value: &str) -> bool {
        GLOB_PATTERN_CHARACTERS
            .chars()
            .any(|special_char| value.contains(special_char))
    }

    pub fn is_match<P: AsRef<Path>>(&self, path: P) -> bool {
        self.matcher.is_match(path)
    }

    /// The longest leading path of this glob that contains no pattern syntax.
    /// Every match lives somewhere under it.
    pub fn get_prefix(&self) -> PathBuf {
        get_non_pattern_prefix(Path::new(self.inner.glob()))
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Glob {}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(f)
    }
}

// A basic set of characters that might indicate the use of glob pattern syntax.
// This is to distinguish portions of a glob that are fixed paths (e.g.
// "foo.png") from ones that are leveraging patterns (e.g. "*.png").
//
// This approach has false positives, as it will treat escape sequences like
// `[*]` as pattern syntax, but those should be rare enough to be acceptable
//
// Glob syntax described here: https://docs.rs/globset/0.4.4/globset/#syntax
const GLOB_PATTERN_CHARACTERS: &str = "*?{}[]";

fn get_non_pattern_prefix(glob_path: &Path) -> PathBuf {
    let mut prefix = PathBuf::new();

    for component in glob_path.iter() {
        let component_str = component.to_string_lossy();

        if Glob::is_pattern(&component_str) {
            break;
        }

        prefix.push(component);
    }

    prefix
}

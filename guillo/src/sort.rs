use std::{cmp::Reverse, fmt, str::FromStr};

use crate::types::Block;

/// The order blocks are presented to a packer in. Packing big blocks first
/// leaves the small ones to fill in the gaps, which packs much more densely
/// than arbitrary order.
///
/// Both orders are descending and stable: blocks that compare equal keep the
/// order they were given in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Largest `width * height` first.
    Area,

    /// Longest side first.
    MaxSide,
}

impl SortOrder {
    pub fn sort<B: Block>(self, blocks: &mut [B]) {
        match self {
            SortOrder::Area => blocks.sort_by_key(|block| {
                let (w, h) = block.size();
                Reverse(u64::from(w) * u64::from(h))
            }),
            SortOrder::MaxSide => blocks.sort_by_key(|block| {
                let (w, h) = block.size();
                Reverse(w.max(h))
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortOrder::Area => "area",
            SortOrder::MaxSide => "max-side",
        }
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Area
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<SortOrder, Self::Err> {
        match value {
            "area" => Ok(SortOrder::Area),
            "max-side" => Ok(SortOrder::MaxSide),

            _ => Err(String::from(
                "Invalid sort order. Valid options are 'area' and 'max-side'.",
            )),
        }
    }
}

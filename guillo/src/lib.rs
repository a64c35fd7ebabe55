//! Guillo is a small library for packing rectangles into fixed-size areas. It
//! was built for atlaspack, a tool that packs sprites into texture atlases.
//!
//! Guillo exposes a single packing implementation,
//! [`GuillotinePacker`][GuillotinePacker], along with the
//! [`SortOrder`][SortOrder] heuristics that decide which order blocks should
//! be fed to it in.
//!
//! ## Example
//! ```
//! use guillo::{Block, GuillotinePacker, PackError, SortOrder};
//!
//! // Anything with a size that wants to know where it ended up can be packed.
//! struct Sprite {
//!     size: (u32, u32),
//!     pos: Option<(u32, u32)>,
//! }
//!
//! impl Block for Sprite {
//!     fn size(&self) -> (u32, u32) {
//!         self.size
//!     }
//!
//!     fn place(&mut self, pos: (u32, u32)) {
//!         self.pos = Some(pos);
//!     }
//! }
//!
//! let mut sprites = vec![
//!     Sprite { size: (64, 64), pos: None },
//!     Sprite { size: (128, 64), pos: None },
//!     Sprite { size: (1, 200), pos: None },
//! ];
//!
//! // Packing the biggest blocks first gives the best results.
//! SortOrder::Area.sort(&mut sprites);
//!
//! let mut packer = GuillotinePacker::new((256, 256));
//! for sprite in &mut sprites {
//!     match packer.pack(sprite) {
//!         Ok(_) => {}
//!         Err(PackError::OutOfRoom) => { /* try another packer */ }
//!         Err(err @ PackError::InputTooLarge { .. }) => panic!("{}", err),
//!     }
//! }
//!
//! assert!(sprites.iter().all(|sprite| sprite.pos.is_some()));
//! ```

mod geometry;
mod packer;
mod sort;
mod types;

#[cfg(test)]
mod test_block;

pub use geometry::*;
pub use packer::*;
pub use sort::*;
pub use types::*;

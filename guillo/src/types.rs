use thiserror::Error;

/// Anything that can be placed into packing space.
///
/// A packer asks a `Block` for its size, finds room for it, then calls
/// [`place`][Block::place] exactly once with the top-left corner of the space
/// it reserved. Implementors should treat their size as fixed from the moment
/// they're handed to a packer.
pub trait Block {
    /// The width and height of the space this block needs.
    fn size(&self) -> (u32, u32);

    /// Records where the block ended up.
    fn place(&mut self, pos: (u32, u32));
}

impl<B: Block + ?Sized> Block for &mut B {
    #[inline]
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    #[inline]
    fn place(&mut self, pos: (u32, u32)) {
        (**self).place(pos)
    }
}

impl<B: Block + ?Sized> Block for Box<B> {
    #[inline]
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    #[inline]
    fn place(&mut self, pos: (u32, u32)) {
        (**self).place(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PackError {
    /// The block is bigger than the whole packing area, so no amount of free
    /// space would ever be enough.
    #[error(
        "a {}x{} block can never fit in a {}x{} packing area",
        .size.0, .size.1, .area.0, .area.1
    )]
    InputTooLarge { size: (u32, u32), area: (u32, u32) },

    /// There's no free space left that can hold the block. The block might
    /// still fit into a fresh packer of the same size.
    #[error("out of room")]
    OutOfRoom,
}

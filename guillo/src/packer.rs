use crate::{
    geometry::Rect,
    types::{Block, PackError},
};

#[derive(Debug, Clone)]
struct Node {
    rect: Rect,

    /// Set once a block has been placed at this node's origin: the size of
    /// that block and the indices of the `right` and `down` children that
    /// split the space it left over.
    split: Option<Split>,
}

#[derive(Debug, Clone, Copy)]
struct Split {
    block_size: (u32, u32),
    right: usize,
    down: usize,
}

/// Packs blocks into a single fixed-size area using a guillotine free-space
/// tree.
///
/// Every placed block claims the top-left corner of a free node, and the rest
/// of that node is split into a `right` strip as tall as the block and a
/// `down` strip spanning the node's full width. The tree always partitions the
/// whole area exactly.
///
/// The packer is greedy and never backtracks, so the same sequence of
/// [`pack`][GuillotinePacker::pack] calls on a fresh packer always produces
/// the same placements. How densely it packs depends entirely on the order
/// blocks are presented in; see [`SortOrder`][crate::SortOrder].
#[derive(Debug, Clone)]
pub struct GuillotinePacker {
    // Nodes live in an arena and refer to their children by index. The root
    // is always at index 0.
    nodes: Vec<Node>,
}

impl GuillotinePacker {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            nodes: vec![Node {
                rect: Rect::new((0, 0), size),
                split: None,
            }],
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.nodes[0].rect.size
    }

    /// Finds room for the block, tells it where it landed via
    /// [`Block::place`], and returns that position.
    pub fn pack<B: Block + ?Sized>(&mut self, block: &mut B) -> Result<(u32, u32), PackError> {
        let size = block.size();
        let area = self.size();

        if size.0 > area.0 || size.1 > area.1 {
            return Err(PackError::InputTooLarge { size, area });
        }

        let index = self.find_node(size).ok_or(PackError::OutOfRoom)?;
        let pos = self.split_node(index, size);

        log::trace!("Placed {}x{} block at {:?}", size.0, size.1, pos);

        block.place(pos);
        Ok(pos)
    }

    /// The rectangles claimed by every block packed so far.
    pub fn placements(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes.iter().filter_map(|node| {
            node.split
                .map(|split| Rect::new(node.rect.pos, split.block_size))
        })
    }

    /// The free rectangles that are still available for placement.
    pub fn free_space(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes
            .iter()
            .filter(|node| node.split.is_none())
            .map(|node| node.rect)
    }

    // Depth-first search of the tree. A used node searches its `right` subtree
    // before its `down` subtree; an unused node is accepted if the block fits.
    fn find_node(&self, size: (u32, u32)) -> Option<usize> {
        let mut to_visit = vec![0];

        while let Some(index) = to_visit.pop() {
            let node = &self.nodes[index];

            match node.split {
                Some(split) => {
                    to_visit.push(split.down);
                    to_visit.push(split.right);
                }
                None => {
                    if node.rect.fits(size) {
                        return Some(index);
                    }
                }
            }
        }

        None
    }

    fn split_node(&mut self, index: usize, block_size: (u32, u32)) -> (u32, u32) {
        let rect = self.nodes[index].rect;
        let (x, y) = rect.pos;
        let (w, h) = rect.size;
        let (bw, bh) = block_size;

        let right = self.nodes.len();
        self.nodes.push(Node {
            rect: Rect::new((x + bw, y), (w - bw, bh)),
            split: None,
        });

        let down = self.nodes.len();
        self.nodes.push(Node {
            rect: Rect::new((x, y + bh), (w, h - bh)),
            split: None,
        });

        self.nodes[index].split = Some(Split {
            block_size,
            right,
            down,
        });

        rect.pos
    }
}

use crate::types::Block;

#[derive(Debug, Clone)]
pub(crate) struct TestBlock {
    pub id: &'static str,
    pub size: (u32, u32),
    pub placed: Option<(u32, u32)>,
}

impl TestBlock {
    pub fn new(id: &'static str, size: (u32, u32)) -> Self {
        Self {
            id,
            size,
            placed: None,
        }
    }
}

impl Block for TestBlock {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn place(&mut self, pos: (u32, u32)) {
        assert!(self.placed.is_none(), "{} was placed twice", self.id);
        self.placed = Some(pos);
    }
}

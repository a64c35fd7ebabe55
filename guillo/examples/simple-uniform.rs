use guillo::{Block, GuillotinePacker, PackError};

#[derive(Debug)]
struct Square {
    size: (u32, u32),
    pos: Option<(u32, u32)>,
}

impl Block for Square {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn place(&mut self, pos: (u32, u32)) {
        self.pos = Some(pos);
    }
}

fn main() {
    env_logger::init();

    let mut squares: Vec<_> = (0..5)
        .map(|_| Square {
            size: (128, 128),
            pos: None,
        })
        .collect();

    let mut packer = GuillotinePacker::new((256, 256));
    for square in &mut squares {
        if let Err(PackError::OutOfRoom) = packer.pack(square) {
            println!("No room left for {:?}", square.size);
        }
    }

    println!("Pack result: {:#?}", squares);
}

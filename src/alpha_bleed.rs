//! Spreads color into the fully transparent pixels of a composited atlas.
//!
//! Texture filtering samples neighbouring texels, so the transparent gutter
//! around each sprite would otherwise pull black into its edges. Every
//! transparent pixel takes the average color of its already-colored
//! neighbours, working outwards from the opaque pixels breadth-first. Alpha is
//! left untouched.

use std::collections::VecDeque;

use crate::image::{Image, Pixel};

pub fn alpha_bleed(img: &mut Image) {
    let (w, h) = img.size();

    // Pixels that hold a color worth sampling: everything opaque to start
    // with, then every pixel once it has been bled.
    let mut can_be_sampled = Mask2::new(w, h);

    // Pixels that are already queued, or never need to be.
    let mut visited = Mask2::new(w, h);

    let mut to_visit = VecDeque::new();

    let adjacent_positions = |x: u32, y: u32| {
        DIRECTIONS.iter().filter_map(move |&(x_offset, y_offset)| {
            let x_source = (x as i64) + x_offset;
            let y_source = (y as i64) + y_offset;

            if x_source < 0 || y_source < 0 || x_source >= w as i64 || y_source >= h as i64 {
                return None;
            }

            Some((x_source as u32, y_source as u32))
        })
    };

    for y in 0..h {
        for x in 0..w {
            if img.get_pixel((x, y)).a != 0 {
                can_be_sampled.set(x, y);
                visited.set(x, y);
                continue;
            }

            let borders_opaque = adjacent_positions(x, y)
                .any(|(x_source, y_source)| img.get_pixel((x_source, y_source)).a != 0);

            if borders_opaque {
                visited.set(x, y);
                to_visit.push_back((x, y));
            }
        }
    }

    log::trace!("Bleeding color into {} edge pixels", to_visit.len());

    while let Some((x, y)) = to_visit.pop_front() {
        let mut new_color = (0u32, 0u32, 0u32);
        let mut contributing = 0u32;

        for (x_source, y_source) in adjacent_positions(x, y) {
            if can_be_sampled.get(x_source, y_source) {
                let source = img.get_pixel((x_source, y_source));

                contributing += 1;
                new_color.0 += u32::from(source.r);
                new_color.1 += u32::from(source.g);
                new_color.2 += u32::from(source.b);
            } else if !visited.get(x_source, y_source) {
                visited.set(x_source, y_source);
                to_visit.push_back((x_source, y_source));
            }
        }

        // Every queued pixel borders something that was sampleable when it
        // was queued.
        if contributing > 0 {
            let pixel = Pixel::new(
                (new_color.0 / contributing) as u8,
                (new_color.1 / contributing) as u8,
                (new_color.2 / contributing) as u8,
                0,
            );

            img.set_pixel((x, y), pixel);
        }

        can_be_sampled.set(x, y);
    }
}

const DIRECTIONS: &[(i64, i64)] = &[
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

struct Mask2 {
    size: (u32, u32),
    data: Vec<bool>,
}

impl Mask2 {
    fn new(w: u32, h: u32) -> Self {
        Self {
            size: (w, h),
            data: vec![false; (w as usize) * (h as usize)],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.size.0 as usize
    }

    fn get(&self, x: u32, y: u32) -> bool {
        self.data[self.index(x, y)]
    }

    fn set(&mut self, x: u32, y: u32) {
        let index = self.index(x, y);
        self.data[index] = true;
    }
}

//! The RGBA canvas atlases are composited onto.

use std::io::Write;

use image::{imageops, DynamicImage, GenericImageView, Rgba};

const STRIDE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba<u8>> for Pixel {
    fn from(value: Rgba<u8>) -> Self {
        let [r, g, b, a] = value.0;
        Self { r, g, b, a }
    }
}

/// An 8-bit RGBA image with tightly packed rows.
#[derive(Debug, Clone)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
}

impl Image {
    /// How many bytes an image of the given size takes, if that fits in a
    /// `usize` at all.
    pub fn byte_len(size: (u32, u32)) -> Option<usize> {
        (size.0 as usize)
            .checked_mul(size.1 as usize)?
            .checked_mul(STRIDE)
    }

    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();

        assert!(Self::byte_len(size) == Some(data.len()));

        Self { size, data }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let len = match Self::byte_len(size) {
            Some(len) => len,
            None => panic!("a {}x{} image can't be addressed", size.0, size.1),
        };

        Self::new_rgba8(size, vec![0; len])
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), png::EncodingError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;
        output_writer.finish()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Draws a decoded image into the rectangle at `pos` of the given size.
    ///
    /// Pixels are replaced, never blended. Images that are already RGBA and
    /// the right size are copied row by row; anything else is resized and
    /// converted first.
    pub fn draw(&mut self, source: &DynamicImage, pos: (u32, u32), size: (u32, u32)) {
        if source.dimensions() != size {
            let resized = imageops::resize(source, size.0, size.1, imageops::FilterType::Triangle);
            self.blit_rows(resized.as_raw(), size.0, pos);
            return;
        }

        match source {
            DynamicImage::ImageRgba8(buffer) => {
                self.blit_rows(buffer.as_raw(), size.0, pos);
            }
            other => {
                for (x, y, pixel) in other.pixels() {
                    self.set_pixel((pos.0 + x, pos.1 + y), Pixel::from(pixel));
                }
            }
        }
    }

    fn blit_rows(&mut self, source: &[u8], source_width: u32, pos: (u32, u32)) {
        let source_width_bytes = source_width as usize * STRIDE;
        if source_width_bytes == 0 {
            return;
        }

        let self_width_bytes = self.size.0 as usize * STRIDE;
        let left_in_bytes = pos.0 as usize * STRIDE;

        for (source_y, source_row) in source.chunks_exact(source_width_bytes).enumerate() {
            let self_y = pos.1 as usize + source_y;

            let start_in_bytes = self_y * self_width_bytes + left_in_bytes;
            let end_in_bytes = start_in_bytes + source_row.len();

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(source_row);
        }
    }

    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.offset(pos);

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let start = self.offset(pos);

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }

    fn offset(&self, pos: (u32, u32)) -> usize {
        (pos.1 as usize * self.size.0 as usize + pos.0 as usize) * STRIDE
    }
}

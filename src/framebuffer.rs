pub const C8_DISPLAY_WIDTH: usize = 64;
pub const C8_DISPLAY_HEIGHT: usize = 32;
pub const C8_DISPLAY_SIZE: usize = C8_DISPLAY_WIDTH * C8_DISPLAY_HEIGHT;

/// Monochrome 64x32 screen, stored row-major.
///
/// Coordinates outside the screen are never an error: reads see an unlit
/// pixel and writes are dropped. That is what gives sprite drawing its
/// clipping behaviour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [bool; C8_DISPLAY_SIZE],
}

impl Framebuffer {
    pub fn new() -> Self {
        Self {
            pixels: [false; C8_DISPLAY_SIZE],
        }
    }

    fn offset(x: usize, y: usize) -> Option<usize> {
        if x < C8_DISPLAY_WIDTH && y < C8_DISPLAY_HEIGHT {
            Some(y * C8_DISPLAY_WIDTH + x)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        match Self::offset(x, y) {
            Some(offset) => self.pixels[offset],
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// XORs `bit` into the pixel at (x, y) and reports whether a lit pixel
    /// was hit by a set bit.
    pub fn toggle(&mut self, x: usize, y: usize, bit: bool) -> bool {
        match Self::offset(x, y) {
            Some(offset) => {
                let collision = bit && self.pixels[offset];
                self.pixels[offset] ^= bit;
                collision
            }
            None => false,
        }
    }

    /// Coordinates of every lit pixel, row by row.
    pub fn lit_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(|(_, lit)| **lit)
            .map(|(offset, _)| (offset % C8_DISPLAY_WIDTH, offset / C8_DISPLAY_WIDTH))
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|lit| !lit)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

use std::io::Write;

/// Packed `0xRRGGBBAA` pixel.
pub type Pixel = u32;

/// Pack an RGBA `[f32; 4]` (components in 0..=1) into a [`Pixel`].
pub fn pack(c: [f32; 4]) -> Pixel {
    let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
    (ch(c[0]) << 24) | (ch(c[1]) << 16) | (ch(c[2]) << 8) | ch(c[3])
}

/// Split a [`Pixel`] into its RGBA bytes.
pub fn unpack(p: Pixel) -> [u8; 4] {
    p.to_be_bytes()
}

/// Software raster target. Row-major, origin at the top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0x0000_00FF; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Pixel) {
        self.pixels.fill(color);
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Write one pixel. Off-surface writes are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Pixel) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Clip a rectangle to the surface, returning pixel ranges.
    fn clip(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(usize, usize, usize, usize)> {
        let x0 = x.max(0) as i64;
        let y0 = y.max(0) as i64;
        let x1 = (x as i64 + w as i64).min(self.width as i64);
        let y1 = (y as i64 + h as i64).min(self.height as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    /// Opaque fill, clipped to the surface.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Pixel) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(color);
        }
    }

    /// Alpha-over fill. `alpha` scales the colour's own alpha channel.
    pub fn blend_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Pixel, alpha: f32) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        let src = unpack(color);
        let a = (src[3] as f32 / 255.0) * alpha.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let stride = self.width as usize;
        for row in y0..y1 {
            for px in &mut self.pixels[row * stride + x0..row * stride + x1] {
                let dst = unpack(*px);
                let mix = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
                *px = u32::from_be_bytes([
                    mix(src[0], dst[0]),
                    mix(src[1], dst[1]),
                    mix(src[2], dst[2]),
                    255,
                ]);
            }
        }
    }

    /// Binary PPM (P6). Alpha is dropped.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut body = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.pixels {
            let [r, g, b, _] = unpack(*p);
            body.extend_from_slice(&[r, g, b]);
        }
        out.write_all(&body)?;
        out.flush()
    }
}

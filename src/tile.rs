//! Image tiling - splits the image into a grid of square cells, one per glyph.

use crate::{PictileError, Result};
use image::{Rgba, RgbaImage};

/// Columns targeted when no explicit tile size is given
pub const DEFAULT_COLUMNS: u32 = 100;

/// How the side length of a tile is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSize {
    /// Explicit side length in pixels
    Fixed(u32),
    /// Side length picked so the grid is roughly `columns` wide
    Auto { columns: u32 },
}

impl Default for TileSize {
    fn default() -> Self {
        TileSize::Auto { columns: DEFAULT_COLUMNS }
    }
}

/// A rectangular region of the source image, already clamped to its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub col: u32,
    pub row: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Tile {
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Grid layout for an image of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    size: u32,
    cols: u32,
    rows: u32,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, size: TileSize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PictileError::InvalidInput {
                reason: format!("image has no pixels ({}x{})", width, height),
                source: None,
            });
        }

        let size = match size {
            TileSize::Fixed(n) => {
                if n == 0 || n > width || n > height {
                    return Err(PictileError::InvalidTileSize(format!(
                        "tile size {} does not fit a {}x{} image",
                        n, width, height
                    )));
                }
                n
            }
            TileSize::Auto { columns } => auto_size(width, height, columns)?,
        };

        // Ceil so the last partial column/row still gets a tile
        let cols = width.div_ceil(size);
        let rows = height.div_ceil(size);
        tracing::debug!(size, cols, rows, "tile grid for {}x{} image", width, height);

        Ok(Self { width, height, size, cols, rows })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Tile at (col, row); edge tiles shrink to stay inside the image
    pub fn tile(&self, col: u32, row: u32) -> Tile {
        let x = col * self.size;
        let y = row * self.size;
        let width = self.size.min(self.width - x);
        let height = self.size.min(self.height - y);
        Tile { col, row, x, y, width, height }
    }

    /// All tiles of one row, left to right
    pub fn row(&self, row: u32) -> impl Iterator<Item = Tile> + '_ {
        (0..self.cols).map(move |col| self.tile(col, row))
    }

    /// All tiles in row-major order
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (0..self.rows).flat_map(move |row| self.row(row))
    }
}

fn auto_size(width: u32, height: u32, columns: u32) -> Result<u32> {
    if columns == 0 {
        return Err(PictileError::InvalidTileSize(
            "auto tile size needs at least one column".to_string(),
        ));
    }
    let wanted = width.div_ceil(columns).max(1);
    let limit = width.min(height);
    if wanted > limit {
        tracing::warn!(wanted, limit, "auto tile size clamped to the shorter image side");
    }
    Ok(wanted.min(limit))
}

/// Whether alpha takes part in color reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    /// Treat every pixel as opaque
    #[default]
    Ignore,
    /// Reduce alpha alongside the color channels
    Preserve,
}

/// Borrowed view of one tile's pixels.
pub struct TileView<'a> {
    image: &'a RgbaImage,
    tile: Tile,
    alpha: AlphaMode,
}

impl<'a> TileView<'a> {
    pub fn new(image: &'a RgbaImage, tile: Tile, alpha: AlphaMode) -> Self {
        Self { image, tile, alpha }
    }

    pub fn tile(&self) -> Tile {
        self.tile
    }

    pub fn len(&self) -> usize {
        self.tile.pixel_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pixels in row-major order, with alpha forced opaque under `AlphaMode::Ignore`
    pub fn pixels(&self) -> impl Iterator<Item = Rgba<u8>> + '_ {
        let t = self.tile;
        (t.y..t.y + t.height).flat_map(move |y| {
            (t.x..t.x + t.width).map(move |x| {
                let mut p = *self.image.get_pixel(x, y);
                if self.alpha == AlphaMode::Ignore {
                    p.0[3] = 255;
                }
                p
            })
        })
    }
}

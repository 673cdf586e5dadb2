//! Image to colored character art converter.
//!
//! The image is cut into square tiles, each tile is reduced to one color,
//! and that color picks a glyph from a brightness ramp. The resulting grid
//! is written out as HTML, plain text or ANSI.

pub mod color;
pub mod config;
pub mod glyph;
pub mod reduce;
pub mod render;
pub mod tile;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use config::Options;
pub use glyph::{Alphabet, GlyphMode, GlyphSelector};
pub use reduce::ReduceMode;
pub use render::{Cell, Document, OutputFormat};
pub use tile::{AlphaMode, Tile, TileGrid, TileSize};

use image::{Rgb, RgbaImage};
use tile::TileView;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PictileError {
    /// Missing, unreadable or empty image; `source` is set when decoding failed
    #[error("Invalid input: {reason}")]
    InvalidInput {
        reason: String,
        #[source]
        source: Option<image::ImageError>,
    },
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(String),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),
    #[error("Invalid character list: {0}")]
    InvalidCharlist(String),
    #[error("Cannot write {}: {source}", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PictileError>;

/// Load any format the `image` crate can decode
pub fn open_image(path: impl AsRef<Path>) -> Result<image::DynamicImage> {
    let path = path.as_ref();
    image::open(path).map_err(|source| PictileError::InvalidInput {
        reason: format!("cannot read image {}: {}", path.display(), source),
        source: Some(source),
    })
}

/// Tiling and color-reduction pipeline
pub struct Converter {
    tile_size: TileSize,
    reducer: ReduceMode,
    alpha: AlphaMode,
    glyphs: GlyphSelector,
    monochrome: bool,
    ascii: bool,
    background: Rgb<u8>,
    font_size: u32,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self {
            tile_size: TileSize::default(),
            reducer: ReduceMode::default(),
            alpha: AlphaMode::default(),
            glyphs: GlyphSelector::default(),
            monochrome: false,
            ascii: false,
            background: color::DEFAULT_BACKGROUND,
            font_size: render::DEFAULT_FONT_SIZE,
        }
    }

    /// Build a converter, validating color, charlist, reducer and font size up front
    pub fn from_options(options: &Options) -> Result<Self> {
        if options.font_size == 0 || options.font_size > render::MAX_FONT_SIZE {
            return Err(PictileError::Config(format!(
                "font size must be between 1 and {}, got {}",
                render::MAX_FONT_SIZE,
                options.font_size
            )));
        }
        Ok(Self::new()
            .with_tile_size(options.tile_size())
            .with_reducer(options.reduce_mode()?)
            .with_alpha(options.alpha_mode())
            .with_glyphs(GlyphSelector::new(options.alphabet()?, options.glyph_mode()))
            .with_monochrome(options.use_monochrome)
            .with_ascii(options.use_ascii)
            .with_background(options.background()?)
            .with_font_size(options.font_size))
    }

    pub fn with_tile_size(mut self, size: TileSize) -> Self {
        self.tile_size = size;
        self
    }

    pub fn with_reducer(mut self, reducer: ReduceMode) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_alpha(mut self, alpha: AlphaMode) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_glyphs(mut self, glyphs: GlyphSelector) -> Self {
        self.glyphs = glyphs;
        self
    }

    pub fn with_monochrome(mut self, enabled: bool) -> Self {
        self.monochrome = enabled;
        self
    }

    /// Plain ASCII art: glyphs still follow luminance, cells lose their color
    pub fn with_ascii(mut self, enabled: bool) -> Self {
        self.ascii = enabled;
        self
    }

    pub fn with_background(mut self, background: Rgb<u8>) -> Self {
        self.background = background;
        self
    }

    pub fn with_font_size(mut self, font_size: u32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn convert(&self, image: &image::DynamicImage) -> Result<Document> {
        self.convert_rgba(&image.to_rgba8())
    }

    pub fn convert_rgba(&self, image: &RgbaImage) -> Result<Document> {
        let grid = TileGrid::new(image.width(), image.height(), self.tile_size)?;
        let reduce = self.reducer.function();
        tracing::debug!(reducer = ?self.reducer, ascii = self.ascii, "converting");

        let convert_row = |row: u32| -> Vec<Cell> {
            grid.row(row)
                .map(|tile| {
                    let mut rgba = reduce(&TileView::new(image, tile, self.alpha));
                    if self.monochrome {
                        rgba = color::monochrome(rgba);
                    }
                    let index = (tile.row * grid.cols() + tile.col) as usize;
                    Cell { glyph: self.glyphs.select(rgba, index), color: rgba }
                })
                .collect()
        };

        #[cfg(not(target_arch = "wasm32"))]
        let rows: Vec<Vec<Cell>> = {
            use rayon::prelude::*;
            (0..grid.rows()).into_par_iter().map(convert_row).collect()
        };
        #[cfg(target_arch = "wasm32")]
        let rows: Vec<Vec<Cell>> = (0..grid.rows()).map(convert_row).collect();

        Ok(Document {
            rows,
            columns: grid.cols(),
            background: self.background,
            font_size: self.font_size,
            colored: !self.ascii,
        })
    }
}

/// Convert `input` with `options` and write the result; returns the output path
#[cfg(not(target_arch = "wasm32"))]
pub fn run(input: &Path, options: &Options) -> Result<PathBuf> {
    // Validate everything cheap before decoding the image
    let converter = Converter::from_options(options)?;
    let output = options.output_path(input);
    render::check_output_dir(&output)?;

    let image = open_image(input)?;
    tracing::info!(input = %input.display(), width = image.width(), height = image.height(), "loaded image");

    let document = converter.convert(&image)?;
    render::write_atomic(&output, &document.render(options.format))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn scenario_image() -> RgbaImage {
        // Top row white, bottom row black
        RgbaImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_half_white_half_black_averages_to_mid_gray() {
        let doc = Converter::new()
            .with_tile_size(TileSize::Fixed(2))
            .convert_rgba(&scenario_image())
            .unwrap();
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0].len(), 1);
        let cell = doc.rows[0][0];
        assert_eq!(cell.color, Rgba([128, 128, 128, 255]));
        assert_eq!(cell.glyph, '=');
    }

    #[test]
    fn test_zero_tile_size_fails() {
        let err = Converter::new()
            .with_tile_size(TileSize::Fixed(0))
            .convert_rgba(&scenario_image())
            .unwrap_err();
        assert!(matches!(err, PictileError::InvalidTileSize(_)));
    }

    #[test]
    fn test_grid_shape_and_order() {
        let image = RgbaImage::from_fn(5, 3, |x, y| Rgba([x as u8 * 50, y as u8 * 100, 0, 255]));
        let doc = Converter::new()
            .with_tile_size(TileSize::Fixed(2))
            .with_reducer(ReduceMode::MostCommon)
            .convert_rgba(&image)
            .unwrap();
        assert_eq!(doc.columns, 3);
        assert_eq!(doc.rows.len(), 2);
        assert!(doc.rows.iter().all(|r| r.len() == 3));
        // All-distinct tiles keep their top-left pixel
        assert_eq!(doc.rows[0][1].color, Rgba([100, 0, 0, 255]));
        assert_eq!(doc.rows[1][2].color, Rgba([200, 200, 0, 255]));
    }

    #[test]
    fn test_monochrome_cells_are_gray() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]));
        let doc = Converter::new()
            .with_tile_size(TileSize::Fixed(2))
            .with_monochrome(true)
            .convert_rgba(&image)
            .unwrap();
        for cell in doc.rows.iter().flatten() {
            let [r, g, b, _] = cell.color.0;
            assert!(r == g && g == b);
        }
    }

    #[test]
    fn test_ascii_mode_same_glyphs_without_color() {
        let image = RgbaImage::from_fn(6, 6, |x, y| Rgba([(x * 40) as u8, (y * 40) as u8, 90, 255]));
        let colored = Converter::new().with_tile_size(TileSize::Fixed(2));
        let ascii = Converter::new().with_tile_size(TileSize::Fixed(2)).with_ascii(true);
        let a = colored.convert_rgba(&image).unwrap();
        let b = ascii.convert_rgba(&image).unwrap();
        assert!(a.colored);
        assert!(!b.colored);
        assert_eq!(a.to_text(), b.to_text());
    }

    #[test]
    fn test_from_options_validates_eagerly() {
        let bad_color = Options { background_color: "#12".to_string(), ..Options::default() };
        assert!(matches!(
            Converter::from_options(&bad_color),
            Err(PictileError::InvalidColor(_))
        ));
        for font_size in [0, render::MAX_FONT_SIZE + 1, u32::MAX] {
            let bad_font = Options { font_size, ..Options::default() };
            assert!(matches!(Converter::from_options(&bad_font), Err(PictileError::Config(_))));
        }
        let bad_chars = Options { charlist: Some(String::new()), ..Options::default() };
        assert!(matches!(
            Converter::from_options(&bad_chars),
            Err(PictileError::InvalidCharlist(_))
        ));
    }
}

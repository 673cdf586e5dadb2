//! Conversion options, loadable from a JSON file.
//!
//! Keys are kebab-case and mirror the command line flags, e.g.
//! `{ "size": 8, "background-color": "#262626", "use-common": true }`.

use crate::glyph::{Alphabet, GlyphMode};
use crate::reduce::ReduceMode;
use crate::render::{OutputFormat, DEFAULT_FONT_SIZE};
use crate::tile::{AlphaMode, TileSize, DEFAULT_COLUMNS};
use crate::{color, PictileError, Result};
use image::Rgb;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Options {
    /// Tile side in pixels; auto when absent
    pub size: Option<u32>,
    /// Target column count for auto sizing
    pub columns: u32,
    pub background_color: String,
    pub use_common: bool,
    pub quadratic: bool,
    pub use_ascii: bool,
    pub use_monochrome: bool,
    pub cycle: bool,
    pub charlist: Option<String>,
    pub keep_alpha: bool,
    pub font_size: u32,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            size: None,
            columns: DEFAULT_COLUMNS,
            background_color: color::to_hex(color::DEFAULT_BACKGROUND),
            use_common: false,
            quadratic: false,
            use_ascii: false,
            use_monochrome: false,
            cycle: false,
            charlist: None,
            keep_alpha: false,
            font_size: DEFAULT_FONT_SIZE,
            format: OutputFormat::default(),
            output: None,
        }
    }
}

impl Options {
    /// Read options from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| PictileError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| PictileError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PictileError::Config(e.to_string()))
    }

    pub fn tile_size(&self) -> TileSize {
        match self.size {
            Some(n) => TileSize::Fixed(n),
            None => TileSize::Auto { columns: self.columns },
        }
    }

    pub fn reduce_mode(&self) -> Result<ReduceMode> {
        match (self.use_common, self.quadratic) {
            (true, true) => Err(PictileError::Config(
                "use-common and quadratic are mutually exclusive".to_string(),
            )),
            (true, false) => Ok(ReduceMode::MostCommon),
            (false, true) => Ok(ReduceMode::Quadratic),
            (false, false) => Ok(ReduceMode::Mean),
        }
    }

    pub fn glyph_mode(&self) -> GlyphMode {
        if self.cycle {
            GlyphMode::Cycle
        } else {
            GlyphMode::Luminance
        }
    }

    pub fn alpha_mode(&self) -> AlphaMode {
        if self.keep_alpha {
            AlphaMode::Preserve
        } else {
            AlphaMode::Ignore
        }
    }

    pub fn background(&self) -> Result<Rgb<u8>> {
        color::parse_color(&self.background_color)
    }

    pub fn alphabet(&self) -> Result<Alphabet> {
        match &self.charlist {
            Some(chars) => Alphabet::new(chars),
            None => Ok(Alphabet::default()),
        }
    }

    /// Explicit output path, or one next to the input
    pub fn output_path(&self, input: &Path) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| crate::render::default_output_path(input, self.format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.tile_size(), TileSize::Auto { columns: DEFAULT_COLUMNS });
        assert_eq!(options.reduce_mode().unwrap(), ReduceMode::Mean);
        assert_eq!(options.glyph_mode(), GlyphMode::Luminance);
        assert_eq!(options.background().unwrap(), Rgb([0, 0, 0]));
        assert_eq!(options.alphabet().unwrap(), Alphabet::default());
        assert_eq!(options.output_path(Path::new("a/b.jpg")), PathBuf::from("a/b.html"));
    }

    #[test]
    fn test_from_json() {
        let options = Options::from_json(
            r##"{
                "size": 8,
                "background-color": "#262626",
                "use-common": true,
                "charlist": "X",
                "format": "ansi",
                "output": "out.ans"
            }"##,
        )
        .unwrap();
        assert_eq!(options.tile_size(), TileSize::Fixed(8));
        assert_eq!(options.reduce_mode().unwrap(), ReduceMode::MostCommon);
        assert_eq!(options.background().unwrap(), Rgb([0x26, 0x26, 0x26]));
        assert_eq!(options.alphabet().unwrap().chars(), &['X']);
        assert_eq!(options.format, OutputFormat::Ansi);
        assert_eq!(options.output_path(Path::new("in.png")), PathBuf::from("out.ans"));
        // Unspecified keys keep their defaults
        assert_eq!(options.font_size, DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Options::from_json(r#"{ "colour": "red" }"#).unwrap_err();
        assert!(matches!(err, PictileError::Config(_)));
    }

    #[test]
    fn test_conflicting_reducers() {
        let options = Options { use_common: true, quadratic: true, ..Options::default() };
        assert!(options.reduce_mode().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Options::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PictileError::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pictile.json");
        std::fs::write(&path, r#"{ "use-ascii": true, "columns": 40 }"#).unwrap();
        let options = Options::load(&path).unwrap();
        assert!(options.use_ascii);
        assert_eq!(options.tile_size(), TileSize::Auto { columns: 40 });
    }
}

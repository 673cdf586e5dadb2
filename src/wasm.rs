//! WebAssembly bindings for pictile

use crate::{color, Alphabet, Converter, GlyphMode, GlyphSelector, OutputFormat, ReduceMode, TileSize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmConverter {
    size: Option<u32>,
    columns: u32,
    background: String,
    charlist: Option<String>,
    reducer: ReduceMode,
    ascii: bool,
    monochrome: bool,
    font_size: u32,
}

#[wasm_bindgen]
impl WasmConverter {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmConverter {
        WasmConverter {
            size: None,
            columns: crate::tile::DEFAULT_COLUMNS,
            background: color::to_hex(color::DEFAULT_BACKGROUND),
            charlist: None,
            reducer: ReduceMode::Mean,
            ascii: false,
            monochrome: false,
            font_size: crate::render::DEFAULT_FONT_SIZE,
        }
    }

    /// Tile size in pixels; 0 means automatic
    #[wasm_bindgen]
    pub fn set_size(&mut self, size: u32) {
        self.size = (size > 0).then_some(size);
    }

    #[wasm_bindgen]
    pub fn set_columns(&mut self, columns: u32) {
        self.columns = columns;
    }

    #[wasm_bindgen]
    pub fn set_background(&mut self, background: String) {
        self.background = background;
    }

    #[wasm_bindgen]
    pub fn set_charlist(&mut self, chars: String) {
        self.charlist = Some(chars);
    }

    /// One of "mean", "most-common", "quadratic"
    #[wasm_bindgen]
    pub fn set_reducer(&mut self, name: &str) -> Result<(), JsValue> {
        self.reducer = match name {
            "mean" => ReduceMode::Mean,
            "most-common" => ReduceMode::MostCommon,
            "quadratic" => ReduceMode::Quadratic,
            other => return Err(JsValue::from_str(&format!("Unknown reducer: {}", other))),
        };
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_ascii(&mut self, enabled: bool) {
        self.ascii = enabled;
    }

    #[wasm_bindgen]
    pub fn set_monochrome(&mut self, enabled: bool) {
        self.monochrome = enabled;
    }

    #[wasm_bindgen]
    pub fn set_font_size(&mut self, font_size: u32) {
        self.font_size = font_size;
    }

    /// Convert RGBA canvas data to an HTML document
    #[wasm_bindgen]
    pub fn to_html(&self, image_data: &[u8], width: u32, height: u32) -> Result<String, JsValue> {
        let img = image::RgbaImage::from_raw(width, height, image_data.to_vec())
            .ok_or_else(|| JsValue::from_str("Invalid image dimensions"))?;

        let tile_size = match self.size {
            Some(n) => TileSize::Fixed(n),
            None => TileSize::Auto { columns: self.columns },
        };
        let alphabet = match &self.charlist {
            Some(chars) => Alphabet::new(chars),
            None => Ok(Alphabet::default()),
        }
        .map_err(to_js)?;
        let background = color::parse_color(&self.background).map_err(to_js)?;

        let document = Converter::new()
            .with_tile_size(tile_size)
            .with_reducer(self.reducer)
            .with_glyphs(GlyphSelector::new(alphabet, GlyphMode::Luminance))
            .with_ascii(self.ascii)
            .with_monochrome(self.monochrome)
            .with_background(background)
            .with_font_size(self.font_size)
            .convert_rgba(&img)
            .map_err(to_js)?;

        web_sys::console::debug_1(&format!("pictile: {} rows", document.rows.len()).into());
        Ok(document.render(OutputFormat::Html))
    }
}

impl Default for WasmConverter {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js(e: crate::PictileError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

//! Document rendering - serializes the cell grid as HTML, plain text or ANSI.

use crate::color::{contrasting, to_hex, to_hex_alpha};
use crate::{PictileError, Result};
use image::{Rgb, Rgba};
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_FONT_SIZE: u32 = 24;
pub const MAX_FONT_SIZE: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgba<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Html,
    Text,
    Ansi,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Text => "txt",
            OutputFormat::Ansi => "ans",
        }
    }
}

/// Grid of cells plus the page-level styling
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub rows: Vec<Vec<Cell>>,
    pub columns: u32,
    pub background: Rgb<u8>,
    pub font_size: u32,
    /// False in ASCII-art mode: every cell uses one foreground
    pub colored: bool,
}

impl Document {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Html => self.to_html(),
            OutputFormat::Text => self.to_text(),
            OutputFormat::Ansi => self.to_ansi(),
        }
    }

    pub fn to_html(&self) -> String {
        // Cells are a bit smaller than the font so glyphs pack tightly
        let cell = self.font_size.saturating_mul(3).div_ceil(4);
        let background = to_hex(self.background);

        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
        let _ = write!(
            out,
            "body {{ line-height: {cell}px; background: {background}; display: grid; \
             grid-template-columns: repeat({cols}, {cell}px); align-content: start; margin: 0; }}\n",
            cols = self.columns,
        );
        let _ = writeln!(out, "span {{ font-size: {cell}px; white-space: pre; }}");
        if !self.colored {
            let _ = writeln!(out, "body {{ color: {}; }}", to_hex(contrasting(self.background)));
        }
        out.push_str("</style>\n</head>\n<body>\n");

        for row in &self.rows {
            for cell in row {
                let glyph = escape_html(cell.glyph);
                if self.colored {
                    let _ = write!(out, "<span style=\"color: {};\">{}</span>", to_hex_alpha(cell.color), glyph);
                } else {
                    let _ = write!(out, "<span>{}</span>", glyph);
                }
            }
            out.push('\n');
        }

        out.push_str("</body>\n</html>\n");
        out
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.extend(row.iter().map(|c| printable(c.glyph)));
            out.push('\n');
        }
        out
    }

    pub fn to_ansi(&self) -> String {
        let [br, bg, bb] = self.background.0;
        let fixed = contrasting(self.background).0;

        let mut out = String::new();
        for row in &self.rows {
            let _ = write!(out, "\x1b[48;2;{};{};{}m", br, bg, bb);
            if !self.colored {
                let _ = write!(out, "\x1b[38;2;{};{};{}m", fixed[0], fixed[1], fixed[2]);
            }
            for cell in row {
                if self.colored {
                    let [r, g, b, _] = cell.color.0;
                    let _ = write!(out, "\x1b[38;2;{};{};{}m", r, g, b);
                }
                out.push(printable(cell.glyph));
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

fn escape_html(glyph: char) -> String {
    match glyph {
        '&' => "&amp;".to_string(),
        '<' => "&lt;".to_string(),
        '>' => "&gt;".to_string(),
        '"' => "&quot;".to_string(),
        '\'' => "&#39;".to_string(),
        c if c.is_control() => " ".to_string(),
        c => c.to_string(),
    }
}

fn printable(glyph: char) -> char {
    if glyph.is_control() {
        ' '
    } else {
        glyph
    }
}

/// `photo.png` becomes `photo.html` (or the format's extension)
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    input.with_extension(format.extension())
}

fn output_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Fail early when the directory that would hold `path` is missing
pub fn check_output_dir(path: &Path) -> Result<()> {
    let dir = output_dir(path);
    if dir.is_dir() {
        Ok(())
    } else {
        Err(PictileError::WriteError {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("directory {} does not exist", dir.display()),
            ),
        })
    }
}

/// Write through a temporary file in the target directory, then rename over the target.
#[cfg(not(target_arch = "wasm32"))]
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    use std::io::Write;

    let write_error = |source: std::io::Error| PictileError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(output_dir(path)).map_err(write_error)?;
    tmp.write_all(contents.as_bytes()).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;

    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(glyphs: &[&str], colored: bool) -> Document {
        let rows: Vec<Vec<Cell>> = glyphs
            .iter()
            .map(|row| {
                row.chars()
                    .map(|glyph| Cell { glyph, color: Rgba([255, 0, 0, 255]) })
                    .collect()
            })
            .collect();
        Document {
            columns: rows.first().map_or(0, |r| r.len() as u32),
            rows,
            background: Rgb([0x26, 0x26, 0x26]),
            font_size: DEFAULT_FONT_SIZE,
            colored,
        }
    }

    #[test]
    fn test_html_layout() {
        let html = doc(&["ab", "cd"], true).to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("background: #262626"));
        assert!(html.contains("grid-template-columns: repeat(2, 18px)"));
        assert!(html.contains("line-height: 18px"));
        assert_eq!(html.matches("<span style=\"color: #ff0000;\">").count(), 4);
        assert!(html.contains("<span style=\"color: #ff0000;\">d</span>\n</body>"));
    }

    #[test]
    fn test_html_escapes_markup() {
        let html = doc(&["<&>\"'"], true).to_html();
        assert!(html.contains(">&lt;</span>"));
        assert!(html.contains(">&amp;</span>"));
        assert!(html.contains(">&gt;</span>"));
        assert!(html.contains(">&quot;</span>"));
        assert!(html.contains(">&#39;</span>"));
        assert!(!html.contains("><</span>"));
    }

    #[test]
    fn test_html_ascii_mode_has_no_cell_colors() {
        let html = doc(&["ab"], false).to_html();
        assert!(!html.contains("style=\"color"));
        assert!(html.contains("<span>a</span><span>b</span>"));
        assert!(html.contains("body { color: #ffffff; }"));
    }

    #[test]
    fn test_html_alpha_color() {
        let mut d = doc(&["a"], true);
        d.rows[0][0].color = Rgba([1, 2, 3, 4]);
        assert!(d.to_html().contains("color: #01020304;"));
    }

    #[test]
    fn test_text_output() {
        assert_eq!(doc(&["ab", "c\u{7}"], true).to_text(), "ab\nc \n");
    }

    #[test]
    fn test_ansi_output() {
        let ansi = doc(&["a"], true).to_ansi();
        assert_eq!(ansi, "\x1b[48;2;38;38;38m\x1b[38;2;255;0;0ma\x1b[0m\n");
        let mono = doc(&["ab"], false).to_ansi();
        assert_eq!(mono.matches("\x1b[38;2;").count(), 1);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("pics/cat.png"), OutputFormat::Html),
            PathBuf::from("pics/cat.html")
        );
        assert_eq!(
            default_output_path(Path::new("cat"), OutputFormat::Text),
            PathBuf::from("cat.txt")
        );
    }

    #[test]
    fn test_html_huge_font_size_saturates() {
        let mut d = doc(&["a"], true);
        d.font_size = u32::MAX;
        assert!(d.to_html().contains(&format!("line-height: {}px", u32::MAX / 4 + 1)));
    }

    #[test]
    fn test_check_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_output_dir(&dir.path().join("out.html")).is_ok());
        assert!(check_output_dir(Path::new("out.html")).is_ok());
        let err = check_output_dir(&dir.path().join("missing").join("out.html")).unwrap_err();
        assert!(matches!(err, PictileError::WriteError { .. }));
    }

    #[test]
    fn test_write_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, "new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
        // Only the target remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.html");
        let err = write_atomic(&path, "x").unwrap_err();
        assert!(matches!(err, PictileError::WriteError { .. }));
    }
}

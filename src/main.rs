//! pictile CLI - Convert images to colored character art

use clap::{Parser, ValueEnum};
use pictile::{Options, OutputFormat, PictileError};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "pictile", about = "Convert images to colored character art")]
struct Args {
    /// Input image file
    input: PathBuf,
    /// Tile size in pixels (default: picked from --columns)
    #[arg(short, long)]
    size: Option<u32>,
    /// Target number of columns when the tile size is automatic
    #[arg(long)]
    columns: Option<u32>,
    /// Background color; hex or CSS color name
    #[arg(short = 'c', long = "background-color")]
    background_color: Option<String>,
    /// Use the most common color of each tile instead of the average
    #[arg(long, conflicts_with = "quadratic")]
    use_common: bool,
    /// Use the root-mean-square average, which keeps highlights brighter
    #[arg(long)]
    quadratic: bool,
    /// Plain ASCII art: no per-character colors
    #[arg(long)]
    use_ascii: bool,
    /// Render tile colors as shades of gray
    #[arg(long)]
    use_monochrome: bool,
    /// Pick characters in sequence instead of by brightness
    #[arg(long)]
    cycle: bool,
    /// Characters to draw with, ordered from least to most ink
    #[arg(long)]
    charlist: Option<String>,
    /// Keep tile transparency in the output colors
    #[arg(long)]
    keep_alpha: bool,
    /// Font size in px for HTML output
    #[arg(long)]
    font_size: Option<u32>,
    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,
    /// Output file (default: input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// JSON file with default options
    #[arg(long)]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
    Ansi,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => OutputFormat::Html,
            Format::Text => OutputFormat::Text,
            Format::Ansi => OutputFormat::Ansi,
        }
    }
}

impl Args {
    /// Config file values, overridden by anything given on the command line
    fn options(&self) -> Result<Options, PictileError> {
        let mut options = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };

        if let Some(size) = self.size {
            options.size = Some(size);
        }
        if let Some(columns) = self.columns {
            options.columns = columns;
        }
        if let Some(color) = &self.background_color {
            options.background_color = color.clone();
        }
        if self.use_common {
            options.use_common = true;
            options.quadratic = false;
        }
        if self.quadratic {
            options.quadratic = true;
            options.use_common = false;
        }
        options.use_ascii |= self.use_ascii;
        options.use_monochrome |= self.use_monochrome;
        options.cycle |= self.cycle;
        options.keep_alpha |= self.keep_alpha;
        if let Some(chars) = &self.charlist {
            options.charlist = Some(chars.clone());
        }
        if let Some(font_size) = self.font_size {
            options.font_size = font_size;
        }
        if let Some(format) = self.format {
            options.format = format.into();
        }
        if let Some(output) = &self.output {
            options.output = Some(output.clone());
        }
        Ok(options)
    }
}

fn main() -> Result<(), PictileError> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = args.options().and_then(|options| pictile::run(&args.input, &options));
    match result {
        Ok(output) => {
            println!("{}", output.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!("{}", e);
            Err(e)
        }
    }
}

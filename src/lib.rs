//! svgnorm - Normalize UML tool SVG exports for word processors
//!
//! Diagram exporters wrap every shape in groups carrying the same
//! `matrix(...)` transform, pad diagrams with invisible rectangles and use
//! attributes that word processors render badly. svgnorm folds the shared
//! transform into shape coordinates and conservatively removes or rewrites the
//! rest, leaving class borders and text untouched.

mod ast;
mod batch;
mod clean;
mod error;
mod fonts;
mod matrix;
mod parse;
mod path;
mod serialize;

pub use ast::*;
pub use batch::*;
pub use clean::*;
pub use error::*;
pub use fonts::*;
pub use matrix::*;
pub use parse::*;
pub use path::{collapse_close_paths, transform_path_data};
pub use serialize::*;

/// Parse, clean and re-serialize an SVG string with default settings.
pub fn normalize(svg: &str) -> Result<(String, Changes), SvgError> {
    normalize_with_options(svg, &Options::default())
}

/// Parse, clean and re-serialize an SVG string.
pub fn normalize_with_options(svg: &str, options: &Options) -> Result<(String, Changes), SvgError> {
    let mut doc = parse_svg(svg)?;
    let changes = clean(&mut doc, options);
    Ok((serialize(&doc, options), changes))
}

/// Normalization options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Font family replaced in `<text>` elements (default: Arial)
    pub source_font: String,
    /// Replacement font family; `None` disables retargeting (default: Cambria)
    pub target_font: Option<String>,
    /// Appended to a file name to form its backup (default: `.backup`)
    pub backup_suffix: String,
    /// Extension of the files picked up in a directory (default: `svg`)
    pub extension: String,
    /// Indentation per nesting level when writing (default: two spaces)
    pub indent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            source_font: "Arial".into(),
            target_font: Some("Cambria".into()),
            backup_suffix: ".backup".into(),
            extension: "svg".into(),
            indent: "  ".into(),
        }
    }
}

impl Options {
    pub fn font_rule(&self) -> Option<FontRule> {
        self.target_font
            .as_ref()
            .map(|to| FontRule::new(self.source_font.as_str(), to.as_str()))
    }
}

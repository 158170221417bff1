use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: Box<SvgError>,
    },
}

impl SvgError {
    /// Attach the file being processed to an error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        SvgError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

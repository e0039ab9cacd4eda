use thiserror::Error;

/// Errors raised while fetching an asset by URL
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("asset URL is not allowed: {0}")]
    InvalidUrl(String),

    #[error("failed to read asset {url}")]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading, validating, or measuring fonts
#[derive(Error, Debug)]
pub enum FontError {
    #[error(transparent)]
    /// [owned_ttf_parser] failed to parse the font
    FaceParsingError(#[from] owned_ttf_parser::FaceParsingError),

    #[error("font '{0}' cannot measure text widths")]
    Unmeasurable(String),

    #[error("regular face of font family '{family}' is unavailable")]
    MissingRegular {
        family: String,
        #[source]
        source: Box<FontError>,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Errors raised by the imposition engine
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ImpositionError {
    #[error("cannot impose an empty document")]
    EmptyDocument,

    #[error("unknown format family '{0}', expected 'two-up' or 'three-up'")]
    UnknownFormatFamily(String),
}

/// Errors raised while reading configuration or content input
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unknown page format '{0}', expected one of a5, dl, narrow-a4, narrow-a3")]
    UnknownPageFormat(String),

    #[error("invalid style configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// All errors that abort an export
#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    /// An I/O error occurred while writing the PDF
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Imposition(#[from] ImpositionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("a page referenced by the page order is missing from the document")]
    PageMissing,

    #[error("export was cancelled")]
    Cancelled,
}

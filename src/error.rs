use thiserror::Error;

/// Errors that can occur while operating on the canvas
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to decode snapshot: {0}")]
    SnapshotDecode(#[source] image::ImageError),

    #[error("Failed to encode snapshot: {0}")]
    SnapshotEncode(#[source] image::ImageError),

    #[error("Failed to export image: {0}")]
    Export(#[source] image::ImageError),

    #[error("Failed to save {path}: {source}")]
    Save {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start download: {0}")]
    Download(String),

    #[error("Invalid color {0:?}, expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    #[error("Failed to read config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type for canvas operations
pub type CanvasResult<T> = Result<T, CanvasError>;

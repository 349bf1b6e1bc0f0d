use crate::scale::ExportBlocked;

pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("failed to decode image: {context}")]
    ImageDecode {
        #[source]
        source: image::ImageError,
        context: String,
    },
    #[error("failed to encode raster for export")]
    RasterEncode {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{0}")]
    Blocked(#[from] ExportBlocked),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn image_decode(source: image::ImageError, context: impl Into<String>) -> Self {
        Self::ImageDecode {
            source,
            context: context.into(),
        }
    }

    pub fn raster_encode(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::RasterEncode {
            source: Box::new(source),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

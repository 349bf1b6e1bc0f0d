mod hayro;
mod image;

pub use self::hayro::PdfPreview;
pub use self::image::SourceImage;

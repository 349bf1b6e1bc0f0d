use tokio::sync::oneshot;
use tracing::warn;

use crate::backend::SourceImage;
use crate::error::{AppError, AppResult};
use crate::scale::ScaleRequest;

use super::{ExportOptions, OutputDocument, render_document};

/// Everything a background finalize needs, tagged with the session revision.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub revision: u64,
    pub image: SourceImage,
    pub request: ScaleRequest,
}

#[derive(Debug)]
pub struct ExportCompletion {
    pub revision: u64,
    pub result: AppResult<OutputDocument>,
}

/// Single-shot completion signal for one finalize.
pub struct PendingExport {
    revision: u64,
    done: oneshot::Receiver<AppResult<OutputDocument>>,
}

impl PendingExport {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub async fn completion(&mut self) -> ExportCompletion {
        let result = match (&mut self.done).await {
            Ok(result) => result,
            Err(_) => {
                warn!(revision = self.revision, "export worker dropped its completion signal");
                Err(AppError::unsupported(
                    "export worker stopped before finishing",
                ))
            }
        };
        ExportCompletion {
            revision: self.revision,
            result,
        }
    }
}

/// Runs the encode on the blocking pool. Must be called within a tokio runtime.
pub fn spawn_export(job: ExportJob, options: ExportOptions) -> PendingExport {
    let (done_tx, done_rx) = oneshot::channel();
    let revision = job.revision;
    tokio::task::spawn_blocking(move || {
        let result = render_document(&job.image, &job.request, &options);
        let _ = done_tx.send(result);
    });
    PendingExport {
        revision,
        done: done_rx,
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::{ExportJob, spawn_export};
    use crate::backend::SourceImage;
    use crate::export::ExportOptions;
    use crate::scale::{MarkedPoint, PixelPoint, ScaleInputs};

    #[tokio::test]
    async fn completion_signal_carries_document_and_revision() {
        let image = SourceImage::from_rgba("a.png", RgbaImage::from_pixel(30, 20, Rgba([0, 0, 0, 255])));
        let request = ScaleInputs {
            image_size: Some(image.dimensions()),
            start: MarkedPoint::at(PixelPoint::new(0.0, 0.0)),
            end: MarkedPoint::at(PixelPoint::new(0.0, 144.0)),
            physical_distance: 8.0,
            desired_scale: 4.0,
        }
        .validate()
        .expect("inputs should validate");

        let mut pending = spawn_export(
            ExportJob {
                revision: 9,
                image,
                request,
            },
            ExportOptions::default(),
        );
        assert_eq!(pending.revision(), 9);

        let completion = pending.completion().await;
        assert_eq!(completion.revision, 9);
        let document = completion.result.expect("export should succeed");
        assert_eq!(document.zoom_factor(), 1.0);
        assert_eq!(document.page_size_pt(), (30.0 + 144.0, 20.0 + 144.0));
    }
}

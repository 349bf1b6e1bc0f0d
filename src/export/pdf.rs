use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};

use crate::config::RasterEncoding;
use crate::scale::PrintLayout;

use super::raster::EncodedRaster;

const PRODUCER: &str = concat!("scale-pdf ", env!("CARGO_PKG_VERSION"));
const IMAGE_NAME: Name<'static> = Name(b"Im1");

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const PAGE_ID: Ref = Ref::new(3);
const CONTENT_ID: Ref = Ref::new(4);
const IMAGE_ID: Ref = Ref::new(5);
const SOFT_MASK_ID: Ref = Ref::new(6);
const INFO_ID: Ref = Ref::new(7);

/// Writes a one-page document with `raster` placed per `layout`.
pub(crate) fn write_document(layout: &PrintLayout, raster: &EncodedRaster, title: &str) -> Vec<u8> {
    let mut pdf = Pdf::new();

    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID).kids([PAGE_ID]).count(1);
    pdf.document_info(INFO_ID)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    let mut page = pdf.page(PAGE_ID);
    page.media_box(Rect::new(
        0.0,
        0.0,
        layout.page_width_pt as f32,
        layout.page_height_pt as f32,
    ));
    page.parent(PAGE_TREE_ID);
    page.contents(CONTENT_ID);
    page.resources().x_objects().pair(IMAGE_NAME, IMAGE_ID);
    page.finish();

    let filter = filter_for(raster.encoding);
    let mut image = pdf.image_xobject(IMAGE_ID, &raster.color);
    if let Some(filter) = filter {
        image.filter(filter);
    }
    image.width(raster.width as i32);
    image.height(raster.height as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    if raster.alpha.is_some() {
        image.s_mask(SOFT_MASK_ID);
    }
    image.finish();

    if let Some(alpha) = raster.alpha.as_deref() {
        let mut mask = pdf.image_xobject(SOFT_MASK_ID, alpha);
        if let Some(filter) = filter {
            mask.filter(filter);
        }
        mask.width(raster.width as i32);
        mask.height(raster.height as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        mask.finish();
    }

    let (x, y) = layout.image_origin_pt;
    let mut content = Content::new();
    content.save_state();
    content.transform([
        layout.image_width_pt as f32,
        0.0,
        0.0,
        layout.image_height_pt as f32,
        x as f32,
        y as f32,
    ]);
    content.x_object(IMAGE_NAME);
    content.restore_state();
    pdf.stream(CONTENT_ID, &content.finish());

    pdf.finish()
}

fn filter_for(encoding: RasterEncoding) -> Option<Filter> {
    match encoding {
        RasterEncoding::Flate => Some(Filter::FlateDecode),
        RasterEncoding::Jpeg => Some(Filter::DctDecode),
        RasterEncoding::Raw => None,
    }
}

#[cfg(test)]
mod tests {
    use super::write_document;
    use crate::config::RasterEncoding;
    use crate::export::raster::EncodedRaster;
    use crate::scale::PrintLayout;

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|window| window == needle)
    }

    #[test]
    fn document_declares_page_box_and_image_placement() {
        let layout = PrintLayout::new(2, 1, 36.0);
        let raster = EncodedRaster {
            width: 2,
            height: 1,
            encoding: RasterEncoding::Raw,
            color: vec![255, 0, 0, 0, 0, 255],
            alpha: None,
        };

        let bytes = write_document(&layout, &raster, "plan.png");
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/MediaBox [0 0 216 180]"));
        assert!(contains(&bytes, b"72 0 0 36 72 72 cm"));
        assert!(contains(&bytes, b"/Im1 Do"));
        assert!(!contains(&bytes, b"/SMask"));
        assert!(!contains(&bytes, b"/DCTDecode"));
    }

    #[test]
    fn alpha_raster_is_linked_as_soft_mask() {
        let layout = PrintLayout::new(1, 1, 72.0);
        let raster = EncodedRaster {
            width: 1,
            height: 1,
            encoding: RasterEncoding::Raw,
            color: vec![0, 0, 0],
            alpha: Some(vec![128]),
        };

        let bytes = write_document(&layout, &raster, "mask.png");
        assert!(contains(&bytes, b"/SMask 6 0 R"));
        assert!(contains(&bytes, b"/DeviceGray"));
    }

    #[test]
    fn flate_raster_declares_flate_filter_on_image_and_mask() {
        let layout = PrintLayout::new(1, 1, 72.0);
        let raster = EncodedRaster {
            width: 1,
            height: 1,
            encoding: RasterEncoding::Flate,
            color: miniz_oxide::deflate::compress_to_vec_zlib(&[9, 8, 7], 6),
            alpha: Some(miniz_oxide::deflate::compress_to_vec_zlib(&[64], 6)),
        };

        let bytes = write_document(&layout, &raster, "flate.png");
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/FlateDecode").count(), 2);
        assert!(!contains(&bytes, b"/DCTDecode"));
    }
}

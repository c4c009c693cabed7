use crate::brochure::Brochure;
use crate::report::{ProgressEvent, ProgressSink};
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage};
use log::debug;
use lopdf::{Dictionary, Document, Object, Stream};
use std::io::Cursor;

/// Default cap on extracted images per request
pub const DEFAULT_MAX_IMAGES: usize = 6;

/// Images with width or height at or below this are treated as icons/logos
pub const DEFAULT_MIN_DIMENSION: u32 = 200;

/// A raster image pulled out of a brochure page
///
/// Pixel data is held decoded; `to_png` re-encodes losslessly so a layout
/// engine can downscale later without an extra lossy generation.
pub struct ExtractedImage {
    pub page_index: usize,
    pub width: u32,
    pub height: u32,
    pub pixels: DynamicImage,
}

impl ExtractedImage {
    pub fn to_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.pixels.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

/// Pulls embedded raster images from selected brochure pages
///
/// Enumerates each page's image XObjects in embedding order and decodes
/// them with the `image` crate. Icon-sized images are filtered out: a
/// photo must have both width and height strictly greater than
/// `min_dimension`. An image that fails to decode is skipped and does not
/// count against the requested maximum.
pub struct ImageExtractor {
    min_dimension: u32,
}

impl ImageExtractor {
    pub fn new(min_dimension: u32) -> Self {
        ImageExtractor { min_dimension }
    }

    /// Extract up to `max_images` qualifying images from `page_indices`
    ///
    /// Pages are visited in the given order, images in embedding order
    /// within each page; the result preserves that order. Out-of-range
    /// indices are skipped. Scanning stops entirely once `max_images`
    /// images have been accepted.
    pub fn extract(
        &self,
        brochure: &Brochure,
        page_indices: &[usize],
        max_images: usize,
        sink: &mut dyn ProgressSink,
    ) -> Vec<ExtractedImage> {
        let doc = brochure.document();
        let mut images = Vec::new();

        'pages: for &index in page_indices {
            let Some(page_id) = brochure.page_id(index) else {
                debug!("Page index {} out of range, skipping", index);
                continue;
            };
            for stream in page_image_streams(doc, page_id) {
                if images.len() >= max_images {
                    break 'pages;
                }
                match self.decode_stream(doc, stream) {
                    Ok(Some((width, height, pixels))) => {
                        images.push(ExtractedImage {
                            page_index: index,
                            width,
                            height,
                            pixels,
                        });
                    }
                    // Icon-sized, counted neither as result nor as failure
                    Ok(None) => {}
                    Err(reason) => {
                        sink.event(ProgressEvent::ImageSkipped { page: index, reason });
                    }
                }
            }
        }

        sink.event(ProgressEvent::ImagesExtracted { count: images.len() });
        images
    }

    /// Decode one image XObject, or `None` when it fails the size filter
    fn decode_stream(
        &self,
        doc: &Document,
        stream: &Stream,
    ) -> Result<Option<(u32, u32, DynamicImage)>, String> {
        let dict = &stream.dict;
        let width = dict
            .get(b"Width")
            .and_then(Object::as_i64)
            .map_err(|e| format!("missing width: {}", e))? as u32;
        let height = dict
            .get(b"Height")
            .and_then(Object::as_i64)
            .map_err(|e| format!("missing height: {}", e))? as u32;

        if width <= self.min_dimension || height <= self.min_dimension {
            debug!("Rejecting {}x{} image below size threshold", width, height);
            return Ok(None);
        }

        let filters = stream_filters(dict);
        let pixels = if filters.iter().any(|&f| f == b"DCTDecode".as_slice()) {
            image::load_from_memory_with_format(&stream.content, ImageFormat::Jpeg)
                .map_err(|e| format!("jpeg decode failed: {}", e))?
        } else {
            let raw = if filters.is_empty() {
                stream.content.clone()
            } else if filters.iter().all(|&f| f == b"FlateDecode".as_slice()) {
                stream
                    .decompressed_content()
                    .map_err(|e| format!("flate decode failed: {}", e))?
            } else {
                return Err(format!(
                    "unsupported filter chain: {:?}",
                    filters.iter().map(|f| String::from_utf8_lossy(f)).collect::<Vec<_>>()
                ));
            };
            raw_samples_to_image(doc, dict, width, height, raw)?
        };

        Ok(Some((width, height, pixels)))
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        ImageExtractor::new(DEFAULT_MIN_DIMENSION)
    }
}

/// Image XObject streams of a page, in embedding order
fn page_image_streams<'a>(doc: &'a Document, page_id: lopdf::ObjectId) -> Vec<&'a Stream> {
    let Ok(page_dict) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(resources) = page_dict.get(b"Resources").ok().and_then(|o| resolve_dict(doc, o))
    else {
        return Vec::new();
    };
    let Some(xobjects) = resources.get(b"XObject").ok().and_then(|o| resolve_dict(doc, o))
    else {
        return Vec::new();
    };

    let mut streams = Vec::new();
    for (_name, obj) in xobjects.iter() {
        let stream = match obj {
            Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_stream().ok()),
            Object::Stream(s) => Some(s),
            _ => None,
        };
        if let Some(stream) = stream {
            let is_image = stream
                .dict
                .get(b"Subtype")
                .and_then(Object::as_name)
                .map(|n| n == b"Image")
                .unwrap_or(false);
            if is_image {
                streams.push(stream);
            }
        }
    }
    streams
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok().and_then(|o| o.as_dict().ok()),
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

fn stream_filters(dict: &Dictionary) -> Vec<&[u8]> {
    match dict.get(b"Filter") {
        Ok(Object::Name(n)) => vec![n.as_slice()],
        Ok(Object::Array(arr)) => arr.iter().filter_map(|o| o.as_name().ok()).collect(),
        _ => Vec::new(),
    }
}

/// Interpret raw samples per the declared color space
fn raw_samples_to_image(
    doc: &Document,
    dict: &Dictionary,
    width: u32,
    height: u32,
    raw: Vec<u8>,
) -> Result<DynamicImage, String> {
    let bits = dict.get(b"BitsPerComponent").and_then(Object::as_i64).unwrap_or(8);
    if bits != 8 {
        return Err(format!("unsupported bit depth: {}", bits));
    }

    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| match o {
            Object::Reference(id) => doc.get_object(*id).ok()?.as_name().ok(),
            other => other.as_name().ok(),
        })
        .unwrap_or(b"DeviceRGB");

    match color_space {
        b"DeviceRGB" => RgbImage::from_raw(width, height, raw)
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| "rgb sample buffer too short".to_string()),
        b"DeviceGray" => GrayImage::from_raw(width, height, raw)
            .map(DynamicImage::ImageLuma8)
            .ok_or_else(|| "gray sample buffer too short".to_string()),
        other => Err(format!(
            "unsupported color space: {}",
            String::from_utf8_lossy(other)
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NullSink;
    use crate::test_pdf::{TestImage, build_pdf};

    fn brochure_with_images(images_per_page: Vec<Vec<TestImage>>) -> Brochure {
        let pages: Vec<(&str, Vec<TestImage>)> =
            images_per_page.into_iter().map(|imgs| ("page", imgs)).collect();
        Brochure::from_bytes(&build_pdf(&pages)).unwrap()
    }

    #[test]
    fn test_filters_icon_sized_images() {
        let brochure = brochure_with_images(vec![vec![
            TestImage::new(50, 50),
            TestImage::new(300, 400),
            TestImage::new(600, 201),
        ]]);
        let extractor = ImageExtractor::default();
        let images = extractor.extract(&brochure, &[0], 4, &mut NullSink);

        let dims: Vec<(u32, u32)> = images.iter().map(|i| (i.width, i.height)).collect();
        assert_eq!(dims, vec![(300, 400), (600, 201)]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 200 px exactly does not exceed the threshold
        let brochure = brochure_with_images(vec![vec![TestImage::new(600, 200)]]);
        let extractor = ImageExtractor::default();
        assert!(extractor.extract(&brochure, &[0], 4, &mut NullSink).is_empty());
    }

    #[test]
    fn test_max_images_short_circuits_across_pages() {
        let brochure = brochure_with_images(vec![
            vec![TestImage::new(400, 400), TestImage::new(400, 400)],
            vec![TestImage::new(400, 400), TestImage::new(400, 400)],
        ]);
        let extractor = ImageExtractor::default();
        let images = extractor.extract(&brochure, &[0, 1], 3, &mut NullSink);
        assert_eq!(images.len(), 3);
    }

    #[test]
    fn test_out_of_range_page_indices_are_skipped() {
        let brochure = brochure_with_images(vec![vec![TestImage::new(400, 400)]]);
        let extractor = ImageExtractor::default();
        let images = extractor.extract(&brochure, &[7, 0], 4, &mut NullSink);
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].page_index, 0);
    }

    #[test]
    fn test_page_order_preserved() {
        let brochure = brochure_with_images(vec![
            vec![TestImage::new(300, 300)],
            vec![TestImage::new(500, 500)],
        ]);
        let extractor = ImageExtractor::default();
        let images = extractor.extract(&brochure, &[1, 0], 4, &mut NullSink);
        let pages: Vec<usize> = images.iter().map(|i| i.page_index).collect();
        assert_eq!(pages, vec![1, 0]);
    }

    #[test]
    fn test_png_reencode_is_lossless() {
        let brochure = brochure_with_images(vec![vec![TestImage::new(300, 300)]]);
        let extractor = ImageExtractor::default();
        let images = extractor.extract(&brochure, &[0], 1, &mut NullSink);
        let png = images[0].to_png().unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.to_luma8().into_raw(), images[0].pixels.to_luma8().into_raw());
    }
}

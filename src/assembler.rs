use crate::brochure::Brochure;
use crate::error::OfferError;
use crate::image_extractor::ExtractedImage;
use crate::offer_pages::{add_page, image_xobject, place_image_operations};
use log::{debug, info};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::HashSet;

/// Printable area used when placing gallery images (A4 minus margins)
const GALLERY_BOX_WIDTH: f64 = 451.0;
const GALLERY_BOX_HEIGHT: f64 = 620.0;

/// Merges the generated offer pages, selected brochure pages and the
/// extracted photo gallery into one output document
///
/// Brochure pages are imported by renumbering the source objects past the
/// generated document's id range and re-parenting only the selected page
/// dictionaries into the output page tree. Duplicate and out-of-range
/// indices are dropped, first occurrence wins.
pub fn assemble(
    generated: Document,
    brochure: &Brochure,
    brochure_pages: &[usize],
    images: &[ExtractedImage],
) -> Result<Vec<u8>, OfferError> {
    let mut out = generated;
    let pages_id = output_pages_id(&out)?;

    let mut kids = pages_kids(&out, pages_id)?;

    // Import the selected brochure pages
    let selected = dedupe_in_range(brochure_pages, brochure.page_count());
    if !selected.is_empty() {
        let mut src = brochure.document().clone();
        src.renumber_objects_with(out.max_id + 1);
        out.max_id = src.max_id;

        let src_page_ids: Vec<ObjectId> = src.get_pages().into_values().collect();

        let mut selected_pages: Vec<(ObjectId, Dictionary)> = Vec::new();
        for &index in &selected {
            let page_id = src_page_ids[index];
            let page = src
                .get_object(page_id)
                .and_then(Object::as_dict)
                .map_err(|e| OfferError::AssemblyError(format!("brochure page {}: {}", index, e)))?;
            selected_pages.push((page_id, page.clone()));
        }

        for (object_id, object) in std::mem::take(&mut src.objects) {
            match object.type_name().unwrap_or(b"") {
                // The source page tree and catalog are not carried over;
                // selected pages are re-parented below.
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    out.objects.insert(object_id, object);
                }
            }
        }

        for (page_id, mut page) in selected_pages {
            page.set("Parent", pages_id);
            out.objects.insert(page_id, Object::Dictionary(page));
            kids.push(Object::Reference(page_id));
        }
        debug!("Imported brochure pages {:?}", selected);
    }

    // One gallery page per extracted photo
    for image in images {
        kids.push(Object::Reference(gallery_page(&mut out, pages_id, image)?));
    }

    let count = kids.len() as i64;
    let pages_dict = out
        .get_dictionary(pages_id)
        .map_err(|e| OfferError::AssemblyError(e.to_string()))?;
    let mut pages_dict = pages_dict.clone();
    pages_dict.set("Kids", kids);
    pages_dict.set("Count", count);
    out.objects.insert(pages_id, Object::Dictionary(pages_dict));

    out.renumber_objects();
    out.adjust_zero_pages();

    let mut bytes = Vec::new();
    out.save_to(&mut bytes)
        .map_err(|e| OfferError::AssemblyError(e.to_string()))?;
    info!("Assembled offer document: {} pages, {} bytes", count, bytes.len());
    Ok(bytes)
}

/// Page tree id of the output document, via its catalog
fn output_pages_id(doc: &Document) -> Result<ObjectId, OfferError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|e| OfferError::AssemblyError(format!("missing catalog: {}", e)))?;
    doc.get_dictionary(catalog_id)
        .and_then(|c| c.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|e| OfferError::AssemblyError(format!("missing page tree: {}", e)))
}

fn pages_kids(doc: &Document, pages_id: ObjectId) -> Result<Vec<Object>, OfferError> {
    doc.get_dictionary(pages_id)
        .and_then(|p| p.get(b"Kids"))
        .and_then(Object::as_array)
        .map(Clone::clone)
        .map_err(|e| OfferError::AssemblyError(format!("missing kids: {}", e)))
}

/// Keep the first occurrence of each in-range index, in caller order
fn dedupe_in_range(indices: &[usize], page_count: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    indices
        .iter()
        .copied()
        .filter(|&i| i < page_count && seen.insert(i))
        .collect()
}

/// Build one page showing a single extracted photo, scaled to fit
fn gallery_page(
    doc: &mut Document,
    pages_id: ObjectId,
    image: &ExtractedImage,
) -> Result<ObjectId, OfferError> {
    let scale = (GALLERY_BOX_WIDTH / image.width as f64)
        .min(GALLERY_BOX_HEIGHT / image.height as f64);
    let width = (image.width as f64 * scale).round() as i64;
    let height = (image.height as f64 * scale).round() as i64;

    let image_id = doc.add_object(image_xobject(&image.pixels));
    let mut xobjects = Dictionary::new();
    xobjects.set("Photo", Object::Reference(image_id));

    let operations = place_image_operations("Photo", 72, 780 - height, width, height);

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    add_page(doc, pages_id, font_id, xobjects, operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_extractor::{ImageExtractor, ExtractedImage};
    use crate::inventory::Inventory;
    use crate::offer_pages::OfferPageRenderer;
    use crate::report::NullSink;
    use crate::test_pdf::{TestImage, build_pdf, pdf_with_pages};
    use image::DynamicImage;

    fn generated() -> Document {
        let csv = "Unit Number,Dev Name\nU-1,The Una Villa\n";
        let inv = Inventory::from_csv_bytes(csv.as_bytes()).unwrap();
        let record = inv.find_by_key("U-1").unwrap();
        OfferPageRenderer::new("Co", "www.example.com")
            .render(record, "U-1", None)
            .unwrap()
    }

    fn test_image(width: u32, height: u32) -> ExtractedImage {
        ExtractedImage {
            page_index: 0,
            width,
            height,
            pixels: DynamicImage::ImageRgb8(image::RgbImage::new(width, height)),
        }
    }

    #[test]
    fn test_generated_plus_selected_brochure_pages() {
        let brochure = Brochure::from_bytes(&pdf_with_pages(&[
            "intro", "pricing", "villa plans", "amenities", "villa gallery",
        ]))
        .unwrap();

        let bytes = assemble(generated(), &brochure, &[2, 4], &[]).unwrap();
        let out = Document::load_mem(&bytes).unwrap();
        assert_eq!(out.get_pages().len(), 4);

        // Brochure content follows the generated pages, in the given order
        assert!(out.extract_text(&[3]).unwrap().contains("villa plans"));
        assert!(out.extract_text(&[4]).unwrap().contains("villa gallery"));
    }

    #[test]
    fn test_duplicate_and_out_of_range_indices_dropped() {
        let brochure = Brochure::from_bytes(&pdf_with_pages(&["a", "b"])).unwrap();
        let bytes = assemble(generated(), &brochure, &[1, 1, 7, 0, 1], &[]).unwrap();
        let out = Document::load_mem(&bytes).unwrap();
        assert_eq!(out.get_pages().len(), 4); // 2 generated + pages 1 and 0
        assert!(out.extract_text(&[3]).unwrap().contains("b"));
        assert!(out.extract_text(&[4]).unwrap().contains("a"));
    }

    #[test]
    fn test_gallery_page_per_image() {
        let brochure = Brochure::from_bytes(&pdf_with_pages(&["a"])).unwrap();
        let images = vec![test_image(400, 300), test_image(900, 1400)];
        let bytes = assemble(generated(), &brochure, &[], &images).unwrap();
        let out = Document::load_mem(&bytes).unwrap();
        assert_eq!(out.get_pages().len(), 4); // 2 generated + 2 gallery
    }

    #[test]
    fn test_end_to_end_with_extracted_images() {
        let brochure = Brochure::from_bytes(&build_pdf(&[
            ("villa photos", vec![TestImage::new(600, 400), TestImage::new(32, 32)]),
        ]))
        .unwrap();
        let images = ImageExtractor::default().extract(&brochure, &[0], 6, &mut NullSink);
        assert_eq!(images.len(), 1);

        let bytes = assemble(generated(), &brochure, &[0], &images).unwrap();
        let out = Document::load_mem(&bytes).unwrap();
        // 2 generated + 1 brochure + 1 gallery
        assert_eq!(out.get_pages().len(), 4);
        assert!(out.extract_text(&[3]).unwrap().contains("villa photos"));
    }
}

use crate::error::OfferError;
use crate::inventory::{Record, columns};
use image::{DynamicImage, GenericImageView};
use log::debug;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// A4 media box in points
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

/// One absolutely positioned line of text
struct Line {
    x: i64,
    y: i64,
    size: i64,
    text: String,
}

impl Line {
    fn new(x: i64, y: i64, size: i64, text: impl Into<String>) -> Self {
        Line { x, y, size, text: text.into() }
    }
}

/// Renders the generated portion of the offer document
///
/// Two pages built from the inventory record: a cover (title, unit
/// reference, optional branding logo) and a details page (summary
/// sentence, specification list, terms). Missing record fields render as
/// "N/A"; rendering never fails on incomplete data, only on a PDF-level
/// encoding problem.
pub struct OfferPageRenderer {
    company_name: String,
    company_website: String,
}

impl OfferPageRenderer {
    pub fn new(company_name: impl Into<String>, company_website: impl Into<String>) -> Self {
        OfferPageRenderer {
            company_name: company_name.into(),
            company_website: company_website.into(),
        }
    }

    /// Build the cover and details pages as a standalone document
    pub fn render(
        &self,
        record: &Record,
        unit_key: &str,
        logo: Option<&DynamicImage>,
    ) -> Result<Document, OfferError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let cover_id = self.build_cover(&mut doc, pages_id, font_id, record, unit_key, logo)?;
        let details_id = self.build_details(&mut doc, pages_id, font_id, record, unit_key)?;

        let kids = vec![Object::Reference(cover_id), Object::Reference(details_id)];
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => 2,
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        debug!("Rendered offer pages for unit {}", unit_key);
        Ok(doc)
    }

    fn build_cover(
        &self,
        doc: &mut Document,
        pages_id: lopdf::ObjectId,
        font_id: lopdf::ObjectId,
        record: &Record,
        unit_key: &str,
        logo: Option<&DynamicImage>,
    ) -> Result<lopdf::ObjectId, OfferError> {
        let development = record.get_or_na(columns::DEV_NAME).to_string();
        let lines = vec![
            Line::new(72, 700, 24, development),
            Line::new(72, 660, 24, "RESERVATION & OFFER LETTER"),
            Line::new(72, 420, 11, "Prepared for:"),
            Line::new(72, 395, 14, format!("Unit Reference: {}", unit_key)),
            Line::new(72, 120, 11, self.company_name.clone()),
            Line::new(72, 102, 11, self.company_website.clone()),
        ];

        let mut operations = text_operations(&lines);
        let mut xobjects = Dictionary::new();
        if let Some(logo) = logo {
            // Logo sits top-right, scaled to a 120pt-wide box
            let (logo_w, logo_h) = logo.dimensions();
            let target_w: i64 = 120;
            let target_h =
                (target_w as f64 * logo_h as f64 / logo_w.max(1) as f64).round() as i64;
            let logo_id = doc.add_object(image_xobject(logo));
            xobjects.set("Logo", Object::Reference(logo_id));
            operations.extend(place_image_operations(
                "Logo",
                PAGE_WIDTH - 72 - target_w,
                PAGE_HEIGHT - 72 - target_h,
                target_w,
                target_h,
            ));
        }

        add_page(doc, pages_id, font_id, xobjects, operations)
    }

    fn build_details(
        &self,
        doc: &mut Document,
        pages_id: lopdf::ObjectId,
        font_id: lopdf::ObjectId,
        record: &Record,
        unit_key: &str,
    ) -> Result<lopdf::ObjectId, OfferError> {
        let summary = format!(
            "{}. {}. BUA {} sqm. {} Bedrooms. Price = {}. 5% Down Payment. Delivery {}.",
            unit_key,
            record.get_or_na(columns::DEV_NAME),
            record.get_or_na(columns::BUA),
            record.get_or_na(columns::BEDROOMS),
            record.get_or_na(columns::PRICE),
            record.get_or_na(columns::DELIVERY),
        );

        let specs = [
            format!("Development: {}", record.get_or_na(columns::DEV_NAME)),
            format!(
                "Type: {} - {}",
                record.get_or_na(columns::UNIT_TYPE),
                record.get_or_na(columns::UNIT_SUBTYPE)
            ),
            format!("Floor: {}", record.get_or_na(columns::FLOOR)),
            format!("Bedrooms: {}", record.get_or_na(columns::BEDROOMS)),
            format!("BUA with Terraces: {} m2", record.get_or_na(columns::BUA)),
            format!("Garden Area: {} m2", record.get_or_na(columns::GARDEN)),
            format!("Roof Area: {} m2", record.get_or_na(columns::ROOF_AREA)),
            format!("Maid Room: {}", yes_no(record.get(columns::MAID_ROOM))),
            format!("Touristic Licensed: {}", yes_no(record.get(columns::TOURISTIC))),
        ];

        let mut lines = vec![
            Line::new(72, 760, 20, "UNIT DETAILS & SPECIFICATIONS"),
            Line::new(72, 715, 11, summary),
            Line::new(72, 660, 14, "SPECIFICATION SUMMARY"),
        ];
        let mut y = 635;
        for spec in specs {
            lines.push(Line::new(72, y, 11, spec));
            y -= 18;
        }

        y -= 25;
        lines.push(Line::new(72, y, 11, "TERMS & CONDITIONS:"));
        for term in [
            "1. Prices are subject to maintenance charges and taxes.",
            "2. Delivery date is subject to developer schedule.",
            "3. This offer is valid for 14 days from date of issue.",
        ] {
            y -= 18;
            lines.push(Line::new(72, y, 11, term));
        }

        add_page(doc, pages_id, font_id, Dictionary::new(), text_operations(&lines))
    }
}

fn yes_no(value: Option<&str>) -> &'static str {
    match value {
        Some(v) if v.trim().eq_ignore_ascii_case("yes") => "Yes",
        _ => "No",
    }
}

fn text_operations(lines: &[Line]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for line in lines {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec!["F1".into(), line.size.into()]));
        ops.push(Operation::new("Td", vec![line.x.into(), line.y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(line.text.as_str())]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Draw a named image XObject into the given box
pub(crate) fn place_image_operations(
    name: &str,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
) -> Vec<Operation> {
    vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
        ),
        Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
        Operation::new("Q", vec![]),
    ]
}

/// Encode a decoded raster image as a Flate-compressed RGB image XObject
pub(crate) fn image_xobject(img: &DynamicImage) -> Stream {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let mut stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    );
    // An uncompressed stream is still a valid PDF if compression fails
    let _ = stream.compress();
    stream
}

/// Append a finished page to the document's page tree
pub(crate) fn add_page(
    doc: &mut Document,
    pages_id: lopdf::ObjectId,
    font_id: lopdf::ObjectId,
    xobjects: Dictionary,
    operations: Vec<Operation>,
) -> Result<lopdf::ObjectId, OfferError> {
    let content = Content { operations };
    let encoded = content
        .encode()
        .map_err(|e| OfferError::RenderError(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let mut resources = dictionary! { "Font" => dictionary! { "F1" => font_id } };
    if !xobjects.is_empty() {
        resources.set("XObject", Object::Dictionary(xobjects));
    }
    let resources_id = doc.add_object(resources);

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    });
    Ok(page_id)
}

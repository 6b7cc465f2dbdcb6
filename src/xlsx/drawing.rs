//! Image anchoring in worksheet drawings.
//!
//! For every worksheet that shows a blanked image placeholder, the engine
//! makes sure the sheet has a drawing part, relates the drawing to the media
//! part, and appends a `oneCellAnchor` picture at the cell's position.

use crate::cell_ref::CellAddress;
use crate::detect::WORKBOOK_PART;
use crate::error::{Error, Result};
use crate::model::ImageSubstitution;
use crate::package::Package;
use crate::rels::{
    add_relationship, ensure_rels_document, related_targets, rels_path_for, resolve_target,
    REL_TYPE_DRAWING, REL_TYPE_IMAGE, REL_TYPE_WORKSHEET,
};
use crate::render::RenderOptions;
use crate::xml::{Element, Node, XmlTree};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Content type of a drawing part.
pub const DRAWING_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";

/// SpreadsheetML drawing namespace.
pub const NS_SPREADSHEET_DRAWING: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

/// DrawingML main namespace.
pub const NS_DRAWINGML: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

/// Office document relationships namespace (used by `r:id` / `r:embed`).
pub const NS_OFFICE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const EMPTY_DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/>"#;

/// Worksheet children that the schema places after `<drawing>`.
const AFTER_DRAWING: &[&str] = &[
    "legacyDrawing",
    "legacyDrawingHF",
    "drawingHF",
    "picture",
    "oleObjects",
    "controls",
    "webPublishItems",
    "tableParts",
    "extLst",
];

/// Anchor every queued image at the cells that reference its shared string.
///
/// Returns the number of anchors written. Substitutions that no cell
/// references are skipped.
pub fn embed_images(
    package: &mut Package,
    substitutions: &[ImageSubstitution],
    options: &RenderOptions,
) -> Result<usize> {
    if substitutions.is_empty() {
        return Ok(0);
    }

    let by_index: HashMap<usize, &ImageSubstitution> = substitutions
        .iter()
        .map(|sub| (sub.shared_string_index, sub))
        .collect();
    let mut used = HashSet::new();
    let mut anchors = 0;

    for sheet in worksheet_parts(package)? {
        if !package.has_entry(&sheet)? {
            warn!(sheet = %sheet, "worksheet part is missing");
            continue;
        }

        let cells = image_cells(package.read_tree(&sheet)?, &by_index);
        if cells.is_empty() {
            continue;
        }

        let drawing = drawing_for_sheet(package, &sheet)?;
        debug!(sheet = %sheet, drawing = %drawing, cells = cells.len(), "anchoring images");

        for (cell, index) in cells {
            let Some(sub) = by_index.get(&index) else {
                continue;
            };
            add_picture(package, &drawing, cell, sub, options)?;
            used.insert(index);
            anchors += 1;
        }
    }

    for sub in substitutions {
        if !used.contains(&sub.shared_string_index) {
            warn!(
                key = %sub.data_key,
                index = sub.shared_string_index,
                "image placeholder is not referenced by any cell"
            );
        }
    }

    Ok(anchors)
}

/// Worksheet part paths, in workbook relationship order.
pub fn worksheet_parts(package: &mut Package) -> Result<Vec<String>> {
    let rels_path = rels_path_for(WORKBOOK_PART);
    if !package.has_entry(&rels_path)? {
        warn!("workbook has no relationships part");
        return Ok(Vec::new());
    }
    let rels = package.read_tree(&rels_path)?;
    Ok(related_targets(rels, REL_TYPE_WORKSHEET)
        .iter()
        .map(|target| resolve_target(WORKBOOK_PART, target))
        .collect())
}

/// Shared-string cells of a worksheet whose index has a queued image.
///
/// Rows and cells may omit their `r` attribute; they then follow the
/// previous row or cell.
fn image_cells(
    sheet: &XmlTree,
    by_index: &HashMap<usize, &ImageSubstitution>,
) -> Vec<(CellAddress, usize)> {
    let Some(sheet_data) = sheet.root.as_ref().and_then(|root| root.child("sheetData")) else {
        return Vec::new();
    };

    let mut cells = Vec::new();
    let mut next_row = 0u32;
    for row in sheet_data.children_named("row") {
        let row_index = row
            .attr("r")
            .and_then(|r| r.trim().parse::<u32>().ok())
            .and_then(|r| r.checked_sub(1))
            .unwrap_or(next_row);
        next_row = row_index + 1;

        let mut next_column = 0u32;
        for cell in row.children_named("c") {
            let address = match cell.attr("r").and_then(CellAddress::parse) {
                Some(address) => address,
                None => {
                    if cell.attr("r").is_some() {
                        debug!(r = ?cell.attr("r"), "unusable cell reference, using position");
                    }
                    CellAddress::new(next_column, row_index)
                }
            };
            next_column = address.column + 1;

            if cell.attr("t") != Some("s") {
                continue;
            }
            let Some(index) = cell
                .child("v")
                .and_then(|v| v.text_content().trim().parse::<usize>().ok())
            else {
                continue;
            };
            if by_index.contains_key(&index) {
                cells.push((address, index));
            }
        }
    }
    cells
}

/// Drawing part of a worksheet, created and wired up if the sheet has none.
fn drawing_for_sheet(package: &mut Package, sheet: &str) -> Result<String> {
    let sheet_rels = rels_path_for(sheet);
    if package.has_entry(&sheet_rels)? {
        let existing = related_targets(package.read_tree(&sheet_rels)?, REL_TYPE_DRAWING);
        if let Some(target) = existing.first() {
            let drawing = resolve_target(sheet, target);
            if !package.has_entry(&drawing)? {
                package.put_entry(&drawing, EMPTY_DRAWING.as_bytes().to_vec(), DRAWING_CONTENT_TYPE);
            }
            return Ok(drawing);
        }
    }

    let drawing = next_drawing_path(package, sheet)?;
    debug!(sheet, drawing = %drawing, "creating drawing part");
    package.put_entry(&drawing, EMPTY_DRAWING.as_bytes().to_vec(), DRAWING_CONTENT_TYPE);

    let rels = ensure_rels_document(package, sheet)?;
    let rel_id = add_relationship(rels, sheet, REL_TYPE_DRAWING, &drawing)?;
    insert_drawing_reference(package.fetch_tree(sheet)?, &rel_id)?;
    Ok(drawing)
}

/// `xl/worksheets/sheet3.xml` → `xl/drawings/drawing3.xml`, or the next free name.
fn next_drawing_path(package: &mut Package, sheet: &str) -> Result<String> {
    let file = sheet.rsplit_once('/').map_or(sheet, |(_, file)| file);
    let preferred = format!("xl/drawings/{}", file.replace("sheet", "drawing"));
    if preferred.ends_with(".xml") && !package.has_entry(&preferred)? {
        return Ok(preferred);
    }

    let mut n = 1;
    loop {
        let candidate = format!("xl/drawings/drawing{n}.xml");
        if !package.has_entry(&candidate)? {
            return Ok(candidate);
        }
        n += 1;
    }
}

/// Add `<drawing r:id="..."/>` to a worksheet at its schema position.
fn insert_drawing_reference(sheet: &mut XmlTree, rel_id: &str) -> Result<()> {
    let root = sheet
        .root
        .as_mut()
        .ok_or_else(|| Error::XmlParse("worksheet has no root element".to_string()))?;

    let r = ensure_prefix(root, NS_OFFICE_RELATIONSHIPS, "r", false);
    let id_attr = qualify(&r, "id");
    let name = qualify(root.prefix().unwrap_or_default(), "drawing");

    if let Some(existing) = root.elements_mut().find(|el| el.local_name() == "drawing") {
        existing.set_attr(id_attr, rel_id);
        return Ok(());
    }

    let reference = Node::Element(Element::new(name).with_attr(id_attr, rel_id));
    let position = root.children.iter().position(|node| {
        matches!(node, Node::Element(el) if AFTER_DRAWING.contains(&el.local_name()))
    });
    match position {
        Some(pos) => root.children.insert(pos, reference),
        None => root.children.push(reference),
    }
    Ok(())
}

/// Relate the media part to the drawing and append its anchor.
fn add_picture(
    package: &mut Package,
    drawing: &str,
    cell: CellAddress,
    sub: &ImageSubstitution,
    options: &RenderOptions,
) -> Result<()> {
    let rels = ensure_rels_document(package, drawing)?;
    let rel_id = add_relationship(rels, drawing, REL_TYPE_IMAGE, &sub.media_path)?;

    let tree = package.fetch_tree(drawing)?;
    if tree.root.is_none() {
        *tree = XmlTree::parse_str(EMPTY_DRAWING)?;
    }
    let root = tree
        .root
        .as_mut()
        .ok_or_else(|| Error::XmlParse(format!("{drawing} has no root element")))?;
    if root.local_name() != "wsDr" {
        return Err(Error::XmlParse(format!(
            "unexpected drawing root <{}> in {drawing}",
            root.name
        )));
    }

    let ns = AnchorPrefixes {
        xdr: ensure_prefix(root, NS_SPREADSHEET_DRAWING, "xdr", true),
        a: ensure_prefix(root, NS_DRAWINGML, "a", true),
        r: ensure_prefix(root, NS_OFFICE_RELATIONSHIPS, "r", false),
    };
    let picture = Picture {
        id: next_shape_id(root),
        name: sub.media_file_name(),
        rel_id: &rel_id,
        cell,
        cx: options.pixels_to_emu(sub.size.width),
        cy: options.pixels_to_emu(sub.size.height),
    };
    debug!(drawing, cell = %cell, rel = %rel_id, id = picture.id, "picture anchored");
    root.push(one_cell_anchor(&ns, &picture));
    Ok(())
}

struct AnchorPrefixes {
    xdr: String,
    a: String,
    r: String,
}

struct Picture<'a> {
    id: u32,
    name: &'a str,
    rel_id: &'a str,
    cell: CellAddress,
    cx: u64,
    cy: u64,
}

fn one_cell_anchor(ns: &AnchorPrefixes, pic: &Picture<'_>) -> Element {
    let xdr = |local: &str| Element::new(qualify(&ns.xdr, local));
    let a = |local: &str| Element::new(qualify(&ns.a, local));

    xdr("oneCellAnchor")
        .with_child(
            xdr("from")
                .with_child(xdr("col").with_text(pic.cell.column.to_string()))
                .with_child(xdr("colOff").with_text("0"))
                .with_child(xdr("row").with_text(pic.cell.row.to_string()))
                .with_child(xdr("rowOff").with_text("0")),
        )
        .with_child(
            xdr("ext")
                .with_attr("cx", pic.cx.to_string())
                .with_attr("cy", pic.cy.to_string()),
        )
        .with_child(
            xdr("pic")
                .with_child(
                    xdr("nvPicPr")
                        .with_child(
                            xdr("cNvPr")
                                .with_attr("id", pic.id.to_string())
                                .with_attr("name", pic.name),
                        )
                        .with_child(xdr("cNvPicPr")),
                )
                .with_child(
                    xdr("blipFill")
                        .with_child(
                            a("blip")
                                .with_attr(qualify(&ns.r, "embed"), pic.rel_id)
                                .with_attr("cstate", "print"),
                        )
                        .with_child(a("stretch")),
                )
                .with_child(
                    xdr("spPr")
                        .with_attr("bwMode", "auto")
                        .with_child(
                            a("xfrm")
                                .with_child(a("off").with_attr("x", "0").with_attr("y", "0"))
                                .with_child(
                                    a("ext")
                                        .with_attr("cx", pic.cx.to_string())
                                        .with_attr("cy", pic.cy.to_string()),
                                ),
                        )
                        .with_child(
                            a("prstGeom")
                                .with_attr("prst", "rect")
                                .with_child(a("avLst")),
                        )
                        .with_child(a("ln").with_child(a("noFill"))),
                ),
        )
        .with_child(xdr("clientData"))
}

/// One more than the highest `cNvPr` id already in the drawing.
fn next_shape_id(root: &Element) -> u32 {
    root.descendants()
        .into_iter()
        .filter(|el| el.local_name() == "cNvPr")
        .filter_map(|el| el.attr("id").and_then(|id| id.parse::<u32>().ok()))
        .max()
        .map_or(1, |max| max.saturating_add(1))
}

/// Prefix bound to `namespace` on `root`, declaring `preferred` if unbound.
///
/// An empty prefix means the namespace is the default one, which is only
/// accepted for element names.
fn ensure_prefix(root: &mut Element, namespace: &str, preferred: &str, allow_default: bool) -> String {
    for (key, value) in &root.attributes {
        if value != namespace {
            continue;
        }
        if let Some(prefix) = key.strip_prefix("xmlns:") {
            return prefix.to_string();
        }
        if allow_default && key == "xmlns" {
            return String::new();
        }
    }

    let mut prefix = preferred.to_string();
    let mut n = 1;
    while root.attr(&format!("xmlns:{prefix}")).is_some() {
        prefix = format!("{preferred}{n}");
        n += 1;
    }
    root.set_attr(format!("xmlns:{prefix}"), namespace);
    prefix
}

fn qualify(prefix: &str, local: &str) -> String {
    if prefix.is_empty() {
        local.to_string()
    } else {
        format!("{prefix}:{local}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageFormat, ImageSize};
    use crate::rels::Relationships;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    const TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    fn sheet_xml(cells: &str, tail: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row r="1">{cells}</row></sheetData>{tail}</worksheet>"#
        )
    }

    fn package(entries: &[(&str, &str)]) -> Package {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(TYPES.as_bytes()).unwrap();
        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(b"<workbook/>").unwrap();
        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(WORKBOOK_RELS.as_bytes()).unwrap();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        Package::from_bytes(zip.finish().unwrap().into_inner()).unwrap()
    }

    fn substitution(index: usize, key: &str) -> ImageSubstitution {
        ImageSubstitution {
            shared_string_index: index,
            data_key: key.to_string(),
            size: ImageSize::new(200, 300),
            media_path: ImageSubstitution::media_path_for(key, ImageFormat::Jpeg),
        }
    }

    #[test]
    fn test_embed_creates_drawing() {
        let sheet = sheet_xml(
            r#"<c r="B3" t="s"><v>0</v></c><c r="C3" t="s"><v>1</v></c>"#,
            r#"<tableParts count="0"/>"#,
        );
        let mut package = package(&[("xl/worksheets/sheet1.xml", sheet.as_str())]);

        let subs = vec![substitution(0, "LOGO")];
        let count = embed_images(&mut package, &subs, &RenderOptions::default()).unwrap();
        assert_eq!(count, 1);

        // Worksheet references the new drawing before tableParts
        let sheet = package.read_tree("xl/worksheets/sheet1.xml").unwrap();
        let root = sheet.root.as_ref().unwrap();
        let names: Vec<&str> = root.elements().map(|el| el.local_name()).collect();
        assert_eq!(names, vec!["sheetData", "drawing", "tableParts"]);
        assert_eq!(root.attr("xmlns:r"), Some(NS_OFFICE_RELATIONSHIPS));
        assert_eq!(root.child("drawing").unwrap().attr("r:id"), Some("rId1"));

        let sheet_rels = package
            .read_tree("xl/worksheets/_rels/sheet1.xml.rels")
            .unwrap();
        assert_eq!(
            related_targets(sheet_rels, REL_TYPE_DRAWING),
            vec!["../drawings/drawing1.xml"]
        );
        assert_eq!(
            package.content_type("xl/drawings/drawing1.xml"),
            Some(DRAWING_CONTENT_TYPE)
        );

        let drawing = package.read_tree("xl/drawings/drawing1.xml").unwrap();
        let root = drawing.root.as_ref().unwrap();
        let anchor = root.child("oneCellAnchor").unwrap();
        let from = anchor.child("from").unwrap();
        assert_eq!(from.child("col").unwrap().text_content(), "1");
        assert_eq!(from.child("row").unwrap().text_content(), "2");
        let ext = anchor.child("ext").unwrap();
        assert_eq!(ext.attr("cx"), Some("2540000"));
        assert_eq!(ext.attr("cy"), Some("3810000"));

        let embed = anchor
            .descendants()
            .into_iter()
            .find(|el| el.local_name() == "blip")
            .and_then(|blip| blip.attr("r:embed"))
            .unwrap()
            .to_string();
        let drawing_rels = package
            .read_tree("xl/drawings/_rels/drawing1.xml.rels")
            .unwrap();
        let rels = Relationships::from_tree(drawing_rels);
        let image_rel = rels.get(&embed).unwrap();
        assert_eq!(image_rel.rel_type, REL_TYPE_IMAGE);
        assert_eq!(
            resolve_target("xl/drawings/drawing1.xml", &image_rel.target),
            subs[0].media_path
        );
    }

    #[test]
    fn test_embed_reuses_existing_drawing() {
        let sheet = sheet_xml(
            r#"<c r="A1" t="s"><v>0</v></c><c r="A2" t="s"><v>1</v></c>"#,
            r#"<drawing xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId7"/>"#,
        );
        let sheet_rels = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing5.xml"/></Relationships>"#;
        let drawing = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"><xdr:twoCellAnchor><xdr:sp><xdr:nvSpPr><xdr:cNvPr id="4" name="Shape"/></xdr:nvSpPr></xdr:sp></xdr:twoCellAnchor></xdr:wsDr>"#;
        let mut package = package(&[
            ("xl/worksheets/sheet1.xml", sheet.as_str()),
            ("xl/worksheets/_rels/sheet1.xml.rels", sheet_rels),
            ("xl/drawings/drawing5.xml", drawing),
        ]);

        let subs = vec![substitution(0, "A"), substitution(1, "B")];
        let count = embed_images(&mut package, &subs, &RenderOptions::default()).unwrap();
        assert_eq!(count, 2);

        let tree = package.read_tree("xl/drawings/drawing5.xml").unwrap();
        let root = tree.root.as_ref().unwrap();
        assert_eq!(root.children_named("oneCellAnchor").count(), 2);
        assert_eq!(root.attr("xmlns:r"), Some(NS_OFFICE_RELATIONSHIPS));
        let ids: Vec<&str> = root
            .descendants()
            .into_iter()
            .filter(|el| el.local_name() == "cNvPr")
            .filter_map(|el| el.attr("id"))
            .collect();
        assert_eq!(ids, vec!["4", "5", "6"]);

        assert!(!package.has_entry("xl/drawings/drawing1.xml").unwrap());
        let sheet = package.read_tree("xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(
            sheet
                .root
                .as_ref()
                .unwrap()
                .children_named("drawing")
                .count(),
            1
        );
    }

    #[test]
    fn test_unreferenced_substitution_is_skipped() {
        let sheet = sheet_xml(r#"<c r="A1" t="s"><v>3</v></c><c r="A2"><v>0</v></c>"#, "");
        let mut package = package(&[("xl/worksheets/sheet1.xml", sheet.as_str())]);

        let subs = vec![substitution(0, "LOGO")];
        let count = embed_images(&mut package, &subs, &RenderOptions::default()).unwrap();
        assert_eq!(count, 0);
        assert!(!package.has_entry("xl/drawings/drawing1.xml").unwrap());
    }

    #[test]
    fn test_embed_cell_without_reference() {
        let sheet = r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData><row><c t="s"><v>0</v></c></row></sheetData></worksheet>"#;
        let mut package = package(&[("xl/worksheets/sheet1.xml", sheet)]);

        let subs = vec![substitution(0, "LOGO")];
        let count = embed_images(&mut package, &subs, &RenderOptions::default()).unwrap();
        assert_eq!(count, 1);

        let drawing = package.read_tree("xl/drawings/drawing1.xml").unwrap();
        let from = drawing
            .root
            .as_ref()
            .unwrap()
            .child("oneCellAnchor")
            .and_then(|anchor| anchor.child("from"))
            .unwrap();
        assert_eq!(from.child("col").unwrap().text_content(), "0");
        assert_eq!(from.child("row").unwrap().text_content(), "0");
    }

    #[test]
    fn test_image_cells_follow_position() {
        let sheet = XmlTree::parse_str(
            r#"<worksheet><sheetData><row><c r="A1"><v>5</v></c></row><row><c t="s"><v>9</v></c><c t="s"><v>0</v></c></row><row r="7"><c r="C7" t="s"><v>2</v></c><c t="s"><v>1</v></c></row></sheetData></worksheet>"#,
        )
        .unwrap();
        let subs = [substitution(0, "A"), substitution(1, "B")];
        let by_index: HashMap<usize, &ImageSubstitution> =
            subs.iter().map(|s| (s.shared_string_index, s)).collect();

        assert_eq!(
            image_cells(&sheet, &by_index),
            vec![(CellAddress::new(1, 1), 0), (CellAddress::new(3, 6), 1)]
        );
    }

    #[test]
    fn test_next_drawing_path_skips_taken_names() {
        let mut package = package(&[("xl/drawings/drawing1.xml", EMPTY_DRAWING)]);
        assert_eq!(
            next_drawing_path(&mut package, "xl/worksheets/sheet1.xml").unwrap(),
            "xl/drawings/drawing2.xml"
        );
        assert_eq!(
            next_drawing_path(&mut package, "xl/worksheets/sheet4.xml").unwrap(),
            "xl/drawings/drawing4.xml"
        );
    }

    #[test]
    fn test_ensure_prefix() {
        let mut root = Element::new("wsDr").with_attr("xmlns", NS_SPREADSHEET_DRAWING);
        assert_eq!(ensure_prefix(&mut root, NS_SPREADSHEET_DRAWING, "xdr", true), "");
        assert_eq!(ensure_prefix(&mut root, NS_DRAWINGML, "a", true), "a");
        assert_eq!(root.attr("xmlns:a"), Some(NS_DRAWINGML));

        let mut root = Element::new("x").with_attr("xmlns:r", "urn:other");
        assert_eq!(ensure_prefix(&mut root, NS_OFFICE_RELATIONSHIPS, "r", false), "r1");
    }

    #[test]
    fn test_worksheet_parts() {
        let mut package = package(&[]);
        assert_eq!(
            worksheet_parts(&mut package).unwrap(),
            vec!["xl/worksheets/sheet1.xml"]
        );
    }
}

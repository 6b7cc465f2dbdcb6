//! In-memory workbook fixtures and output inspection helpers.

#![allow(dead_code)]

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Smallest JPEG header the format sniffers recognise.
pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];

/// Builder for a workbook with a shared string table and string-typed cells.
#[derive(Default)]
pub struct TemplateBuilder {
    strings: Vec<String>,
    sheets: Vec<Vec<(String, usize)>>,
    extra: Vec<(String, Vec<u8>)>,
}

impl TemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shared-string item whose content is the raw inner XML.
    pub fn string_xml(mut self, inner: &str) -> Self {
        self.strings.push(inner.to_string());
        self
    }

    /// Add a plain shared string.
    pub fn string(self, text: &str) -> Self {
        let escaped = quick_xml::escape::escape(text).into_owned();
        self.string_xml(&format!("<t>{escaped}</t>"))
    }

    /// Add a worksheet whose cells reference shared strings: (address, index).
    pub fn sheet(mut self, cells: &[(&str, usize)]) -> Self {
        self.sheets.push(
            cells
                .iter()
                .map(|(address, index)| (address.to_string(), *index))
                .collect(),
        );
        self
    }

    /// Add an arbitrary extra entry.
    pub fn entry(mut self, name: &str, data: &[u8]) -> Self {
        self.extra.push((name.to_string(), data.to_vec()));
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#,
        );
        for n in 1..=self.sheets.len() {
            types.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
            ));
        }
        types.push_str("</Types>");
        write(&mut zip, "[Content_Types].xml", types.as_bytes(), options);

        write(
            &mut zip,
            "_rels/.rels",
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
            options,
        );

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut workbook_rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for n in 1..=self.sheets.len() {
            workbook.push_str(&format!(
                r#"<sheet name="Sheet{n}" sheetId="{n}" r:id="rId{n}"/>"#
            ));
            workbook_rels.push_str(&format!(
                r#"<Relationship Id="rId{n}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{n}.xml"/>"#
            ));
        }
        workbook.push_str("</sheets></workbook>");
        workbook_rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/></Relationships>"#,
            self.sheets.len() + 1
        ));
        write(&mut zip, "xl/workbook.xml", workbook.as_bytes(), options);
        write(&mut zip, "xl/_rels/workbook.xml.rels", workbook_rels.as_bytes(), options);

        for (i, cells) in self.sheets.iter().enumerate() {
            let mut sheet = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
            );
            for (address, index) in cells {
                let row: String = address.chars().filter(char::is_ascii_digit).collect();
                sheet.push_str(&format!(
                    r#"<row r="{row}"><c r="{address}" t="s"><v>{index}</v></c></row>"#
                ));
            }
            sheet.push_str(r#"</sheetData><pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/></worksheet>"#);
            write(
                &mut zip,
                &format!("xl/worksheets/sheet{}.xml", i + 1),
                sheet.as_bytes(),
                options,
            );
        }

        let mut sst = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{n}" uniqueCount="{n}">"#,
            n = self.strings.len()
        );
        for item in &self.strings {
            sst.push_str(&format!("<si>{item}</si>"));
        }
        sst.push_str("</sst>");
        write(&mut zip, "xl/sharedStrings.xml", sst.as_bytes(), options);

        for (name, data) in &self.extra {
            write(&mut zip, name, data, options);
        }

        zip.finish().unwrap().into_inner()
    }

    /// Write the template to a file inside `dir`.
    pub fn write_to(&self, dir: &std::path::Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }
}

fn write(zip: &mut ZipWriter<Cursor<Vec<u8>>>, name: &str, data: &[u8], options: SimpleFileOptions) {
    zip.start_file(name, options).unwrap();
    zip.write_all(data).unwrap();
}

/// Names of all entries in an archive.
pub fn entry_names(archive: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(archive)).unwrap();
    archive.file_names().map(String::from).collect()
}

/// Text of an archive entry, if present.
pub fn read_entry(archive: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    Some(content)
}

/// Panic unless `xml` parses cleanly to the end.
pub fn assert_well_formed(xml: &str) {
    let mut reader = Reader::from_str(xml);
    let mut depth = 0i32;
    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => depth -= 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}\n{xml}", reader.buffer_position()),
        }
    }
    assert_eq!(depth, 0, "unbalanced XML:\n{xml}");
}

/// Text content of every `<si>` item, in order.
pub fn shared_string_texts(archive: &[u8]) -> Vec<String> {
    let xml = read_entry(archive, "xl/sharedStrings.xml").expect("shared strings present");
    let mut reader = Reader::from_str(&xml);
    let mut items = Vec::new();
    let mut current: Option<String> = None;
    let mut in_text = false;

    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) => match e.local_name().as_ref() {
                b"si" => current = Some(String::new()),
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"si" => items.extend(current.take()),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Text(t) if in_text => {
                if let Some(item) = current.as_mut() {
                    item.push_str(&t.unescape().unwrap());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    items
}

/// Values of an attribute on every element with the given local name.
pub fn attribute_values(xml: &str, element: &str, attribute: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut values = Vec::new();
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == element.as_bytes() => {
                for attr in e.attributes() {
                    let attr = attr.unwrap();
                    let key = attr.key.as_ref();
                    let local = key.rsplit(|b| *b == b':').next().unwrap_or(key);
                    if local == attribute.as_bytes() {
                        values.push(attr.unescape_value().unwrap().into_owned());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    values
}

/// Entries under `xl/media/`.
pub fn media_entries(archive: &[u8]) -> Vec<String> {
    entry_names(archive)
        .into_iter()
        .filter(|name| name.starts_with("xl/media/"))
        .collect()
}

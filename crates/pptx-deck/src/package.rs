//! OPC packaging: write a deck into a ZIP container, and read one back.

use crate::deck::SlideDeck;
use crate::error::DeckError;
use crate::parts;
use crate::Result;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Write every part of `deck` into a new ZIP container on `writer`.
pub(crate) fn write_package<W: Write + Seek>(deck: &SlideDeck, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let xml_options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    // JPEG/PNG are already compressed.
    let media_options = FileOptions::default().compression_method(CompressionMethod::Stored);

    let put = |zip: &mut ZipWriter<W>, name: &str, body: &str| -> Result<()> {
        zip.start_file(name, xml_options)?;
        zip.write_all(body.as_bytes())?;
        Ok(())
    };

    put(&mut zip, "[Content_Types].xml", &parts::content_types_xml(deck))?;
    put(&mut zip, "_rels/.rels", &parts::root_rels_xml())?;
    put(&mut zip, "docProps/core.xml", &parts::core_props_xml())?;
    put(&mut zip, "docProps/app.xml", &parts::app_props_xml(deck))?;
    put(&mut zip, "ppt/presentation.xml", &parts::presentation_xml(deck))?;
    put(
        &mut zip,
        "ppt/_rels/presentation.xml.rels",
        &parts::presentation_rels_xml(deck),
    )?;
    put(&mut zip, "ppt/presProps.xml", &parts::pres_props_xml())?;
    put(&mut zip, "ppt/viewProps.xml", &parts::view_props_xml())?;
    put(&mut zip, "ppt/tableStyles.xml", &parts::table_styles_xml())?;
    put(
        &mut zip,
        "ppt/slideMasters/slideMaster1.xml",
        &parts::slide_master_xml(),
    )?;
    put(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &parts::slide_master_rels_xml(),
    )?;
    put(
        &mut zip,
        "ppt/slideLayouts/slideLayout1.xml",
        &parts::slide_layout_xml(),
    )?;
    put(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &parts::slide_layout_rels_xml(),
    )?;
    put(&mut zip, "ppt/theme/theme1.xml", &parts::theme_xml())?;

    let mut media_counter = 0usize;
    for (index, slide) in deck.slides().iter().enumerate() {
        let slide_no = index + 1;
        let mut rel_ids = Vec::with_capacity(slide.pictures().len());
        let mut image_rels = Vec::with_capacity(slide.pictures().len());

        for (i, picture) in slide.pictures().iter().enumerate() {
            media_counter += 1;
            let media_name = parts::media_part_name(media_counter, picture.format());
            zip.start_file(media_name.as_str(), media_options)?;
            zip.write_all(picture.data())?;

            // rId1 is the layout.
            let rel_id = format!("rId{}", i + 2);
            let target = format!(
                "../media/image{media_counter}.{}",
                picture.format().extension()
            );
            rel_ids.push(rel_id.clone());
            image_rels.push((rel_id, target));
        }

        put(
            &mut zip,
            &parts::slide_part_name(slide_no),
            &parts::slide_xml(slide.pictures(), &rel_ids),
        )?;
        put(
            &mut zip,
            &parts::slide_rels_part_name(slide_no),
            &parts::slide_rels_xml(&image_rels),
        )?;
    }

    Ok(zip.finish()?)
}

// ── Read-back ────────────────────────────────────────────────────────────

/// Geometry and payload of one picture found on a slide.
#[derive(Debug, Clone)]
pub struct PictureSummary {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
    /// Zip path of the embedded media part.
    pub media_path: String,
    /// Raw bytes of the embedded media part.
    pub media: Vec<u8>,
}

/// Pictures found on one slide, in document order.
#[derive(Debug, Clone)]
pub struct SlideSummary {
    pub part_name: String,
    pub pictures: Vec<PictureSummary>,
}

/// What a written `.pptx` actually contains.
#[derive(Debug, Clone)]
pub struct DeckSummary {
    pub slide_width: i64,
    pub slide_height: i64,
    /// Slides in presentation order.
    pub slides: Vec<SlideSummary>,
}

impl DeckSummary {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Width divided by height of the slide size.
    pub fn aspect_ratio(&self) -> f64 {
        self.slide_width as f64 / self.slide_height as f64
    }
}

/// Open a `.pptx` file and summarise its slide size, slide order and the
/// pictures on each slide.
pub fn inspect_deck(path: impl AsRef<Path>) -> Result<DeckSummary> {
    let file = std::fs::File::open(path.as_ref())?;
    read_summary(std::io::BufReader::new(file))
}

fn read_summary<R: Read + Seek>(reader: R) -> Result<DeckSummary> {
    let mut archive = ZipArchive::new(reader)?;

    let presentation = read_part(&mut archive, "ppt/presentation.xml")?;
    let (slide_width, slide_height, slide_rel_ids) = parse_presentation(&presentation)?;

    let pres_rels = parse_rels(
        &read_part(&mut archive, "ppt/_rels/presentation.xml.rels")?,
        "ppt/_rels/presentation.xml.rels",
    )?;

    let mut slides = Vec::with_capacity(slide_rel_ids.len());
    for rel_id in slide_rel_ids {
        let target = pres_rels
            .get(&rel_id)
            .ok_or_else(|| DeckError::MissingPart(format!("relationship {rel_id}")))?;
        let part_name = resolve_target("ppt", target);
        let slide_xml = read_part(&mut archive, &part_name)?;

        let rels_name = rels_part_for(&part_name);
        let slide_rels = parse_rels(&read_part(&mut archive, &rels_name)?, &rels_name)?;
        let slide_dir = part_name
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("");

        let mut pictures = Vec::new();
        for pic in parse_pictures(&slide_xml, &part_name)? {
            let target = slide_rels
                .get(&pic.embed)
                .ok_or_else(|| DeckError::MissingPart(format!("relationship {}", pic.embed)))?;
            let media_path = resolve_target(slide_dir, target);
            let media = read_bytes(&mut archive, &media_path)?;
            pictures.push(PictureSummary {
                x: pic.x,
                y: pic.y,
                cx: pic.cx,
                cy: pic.cy,
                media_path,
                media,
            });
        }

        slides.push(SlideSummary {
            part_name,
            pictures,
        });
    }

    Ok(DeckSummary {
        slide_width,
        slide_height,
        slides,
    })
}

fn read_bytes<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut file = archive.by_name(name).map_err(|e| match e {
        zip::result::ZipError::FileNotFound => DeckError::MissingPart(name.to_string()),
        other => DeckError::Zip(other),
    })?;
    let mut buf = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let bytes = read_bytes(archive, name)?;
    String::from_utf8(bytes).map_err(|e| DeckError::Xml {
        part: name.to_string(),
        detail: e.to_string(),
    })
}

/// `ppt/slides/slide1.xml` → `ppt/slides/_rels/slide1.xml.rels`
fn rels_part_for(part_name: &str) -> String {
    match part_name.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{part_name}.rels"),
    }
}

/// Resolve a relationship target relative to the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

fn xml_error(part: &str, e: impl std::fmt::Display) -> DeckError {
    DeckError::Xml {
        part: part.to_string(),
        detail: e.to_string(),
    }
}

fn attr_i64(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<i64> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| String::from_utf8_lossy(&a.value).parse().ok())
}

fn attr_string(e: &quick_xml::events::BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).to_string())
}

/// Returns `(cx, cy, slide relationship ids in order)`.
fn parse_presentation(xml: &str) -> Result<(i64, i64, Vec<String>)> {
    const PART: &str = "ppt/presentation.xml";
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut size = None;
    let mut rel_ids = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"p:sldSz" => {
                    size = attr_i64(e, b"cx").zip(attr_i64(e, b"cy"));
                }
                b"p:sldId" => {
                    if let Some(id) = attr_string(e, b"r:id") {
                        rel_ids.push(id);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(PART, e)),
            _ => {}
        }
    }

    let (cx, cy) = size.ok_or_else(|| xml_error(PART, "missing <p:sldSz>"))?;
    Ok((cx, cy, rel_ids))
}

/// Map of relationship id → target.
fn parse_rels(xml: &str, part: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut rels = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) =
                    (attr_string(e, b"Id"), attr_string(e, b"Target"))
                {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
    }
    Ok(rels)
}

#[derive(Debug, Default)]
struct RawPicture {
    embed: String,
    x: i64,
    y: i64,
    cx: i64,
    cy: i64,
}

fn parse_pictures(xml: &str, part: &str) -> Result<Vec<RawPicture>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut pictures = Vec::new();
    let mut current: Option<RawPicture> = None;
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"p:pic" => {
                current = Some(RawPicture::default());
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"p:pic" => {
                if let Some(pic) = current.take() {
                    pictures.push(pic);
                }
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                if let Some(pic) = current.as_mut() {
                    match e.name().as_ref() {
                        b"a:blip" => pic.embed = attr_string(e, b"r:embed").unwrap_or_default(),
                        b"a:off" => {
                            pic.x = attr_i64(e, b"x").unwrap_or(0);
                            pic.y = attr_i64(e, b"y").unwrap_or(0);
                        }
                        b"a:ext" => {
                            pic.cx = attr_i64(e, b"cx").unwrap_or(0);
                            pic.cy = attr_i64(e, b"cy").unwrap_or(0);
                        }
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(part, e)),
            _ => {}
        }
    }
    Ok(pictures)
}

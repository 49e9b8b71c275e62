//! XML part generation.
//!
//! Static parts (master, layout, theme, properties) are fixed strings; the
//! presentation, slide and relationship parts are generated from the deck.

use crate::deck::{MediaFormat, Picture, SlideDeck};

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_EXTENDED_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_SLIDE_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_PRES_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
const REL_VIEW_PROPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
const REL_TABLE_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
pub(crate) const REL_IMAGE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_SLIDE_MASTER: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_PRES_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_EXTENDED_PROPS: &str =
    "application/vnd.openxmlformats-officedocument.extended-properties+xml";

/// Relationship ids in `presentation.xml.rels` that precede the slides.
const FIXED_PRESENTATION_RELS: usize = 5;

/// Zip path of slide `n` (1-based).
pub(crate) fn slide_part_name(n: usize) -> String {
    format!("ppt/slides/slide{n}.xml")
}

/// Zip path of the relationships part of slide `n` (1-based).
pub(crate) fn slide_rels_part_name(n: usize) -> String {
    format!("ppt/slides/_rels/slide{n}.xml.rels")
}

/// Zip path of media item `n` (1-based, deck-wide numbering).
pub(crate) fn media_part_name(n: usize, format: MediaFormat) -> String {
    format!("ppt/media/image{n}.{}", format.extension())
}

/// Relationship id of slide at 0-based `index` inside `presentation.xml.rels`.
fn slide_rel_id(index: usize) -> String {
    format!("rId{}", FIXED_PRESENTATION_RELS + 1 + index)
}

/// Escape text for use inside an XML attribute value.
pub(crate) fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn relationship(id: &str, rel_type: &str, target: &str) -> String {
    format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#)
}

fn override_part(part: &str, content_type: &str) -> String {
    format!(r#"<Override PartName="/{part}" ContentType="{content_type}"/>"#)
}

// ── Package-level parts ──────────────────────────────────────────────────

pub(crate) fn content_types_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    );
    xml.push_str(
        r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    );
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let uses = |format: MediaFormat| {
        deck.slides()
            .iter()
            .flat_map(|s| s.pictures())
            .any(|p| p.format() == format)
    };
    for format in [MediaFormat::Jpeg, MediaFormat::Png] {
        if uses(format) {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                format.extension(),
                format.content_type()
            ));
        }
    }

    xml.push_str(&override_part("ppt/presentation.xml", CT_PRESENTATION));
    xml.push_str(&override_part(
        "ppt/slideMasters/slideMaster1.xml",
        CT_SLIDE_MASTER,
    ));
    xml.push_str(&override_part(
        "ppt/slideLayouts/slideLayout1.xml",
        CT_SLIDE_LAYOUT,
    ));
    xml.push_str(&override_part("ppt/theme/theme1.xml", CT_THEME));
    xml.push_str(&override_part("ppt/presProps.xml", CT_PRES_PROPS));
    xml.push_str(&override_part("ppt/viewProps.xml", CT_VIEW_PROPS));
    xml.push_str(&override_part("ppt/tableStyles.xml", CT_TABLE_STYLES));
    for n in 1..=deck.slide_count() {
        xml.push_str(&override_part(&slide_part_name(n), CT_SLIDE));
    }
    xml.push_str(&override_part("docProps/core.xml", CT_CORE_PROPS));
    xml.push_str(&override_part("docProps/app.xml", CT_EXTENDED_PROPS));
    xml.push_str("</Types>");
    xml
}

pub(crate) fn root_rels_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    xml.push_str(&relationship("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"));
    xml.push_str(&relationship("rId2", REL_CORE_PROPS, "docProps/core.xml"));
    xml.push_str(&relationship("rId3", REL_EXTENDED_PROPS, "docProps/app.xml"));
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn core_props_xml() -> String {
    format!(
        "{XML_DECL}{}",
        r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title></dc:title><dc:creator>pptx-deck</dc:creator></cp:coreProperties>"#
    )
}

pub(crate) fn app_props_xml(deck: &SlideDeck) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"><Application>pptx-deck</Application><Slides>{}</Slides></Properties>"#,
        deck.slide_count()
    )
}

// ── Presentation ─────────────────────────────────────────────────────────

pub(crate) fn presentation_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(1024 + deck.slide_count() * 48);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    ));
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if deck.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for (index, slide) in deck.slides().iter().enumerate() {
            xml.push_str(&format!(
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                slide.id(),
                slide_rel_id(index)
            ));
        }
        xml.push_str("</p:sldIdLst>");
    }
    xml.push_str(&format!(
        r#"<p:sldSz cx="{}" cy="{}"/>"#,
        deck.slide_width(),
        deck.slide_height()
    ));
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

pub(crate) fn presentation_rels_xml(deck: &SlideDeck) -> String {
    let mut xml = String::with_capacity(1024 + deck.slide_count() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_MASTER,
        "slideMasters/slideMaster1.xml",
    ));
    xml.push_str(&relationship("rId2", REL_PRES_PROPS, "presProps.xml"));
    xml.push_str(&relationship("rId3", REL_VIEW_PROPS, "viewProps.xml"));
    xml.push_str(&relationship("rId4", REL_THEME, "theme/theme1.xml"));
    xml.push_str(&relationship("rId5", REL_TABLE_STYLES, "tableStyles.xml"));
    for index in 0..deck.slide_count() {
        xml.push_str(&relationship(
            &slide_rel_id(index),
            REL_SLIDE,
            &format!("slides/slide{}.xml", index + 1),
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn pres_props_xml() -> String {
    format!(r#"{XML_DECL}<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#)
}

pub(crate) fn view_props_xml() -> String {
    format!(
        r#"{XML_DECL}<p:viewPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
    )
}

pub(crate) fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

// ── Master, layout, theme ────────────────────────────────────────────────

const EMPTY_SP_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr></p:spTree>"#;

pub(crate) fn slide_master_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>{EMPTY_SP_TREE}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

pub(crate) fn slide_master_rels_xml() -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    ));
    xml.push_str(&relationship("rId2", REL_THEME, "../theme/theme1.xml"));
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn slide_layout_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank">{EMPTY_SP_TREE}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

pub(crate) fn slide_layout_rels_xml() -> String {
    let mut xml = String::with_capacity(256);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_MASTER,
        "../slideMasters/slideMaster1.xml",
    ));
    xml.push_str("</Relationships>");
    xml
}

pub(crate) fn theme_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<a:theme xmlns:a="{NS_A}" name="Office Theme">"#));
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in [
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ] {
        xml.push_str(&format!(r#"<a:{name}><a:srgbClr val="{rgb}"/></a:{name}>"#));
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    for slot in ["majorFont", "minorFont"] {
        xml.push_str(&format!(
            r#"<a:{slot}><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:{slot}>"#
        ));
    }
    xml.push_str("</a:fontScheme>");

    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str("<a:fillStyleLst>");
    xml.push_str(&solid.repeat(3));
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [9525, 25400, 38100] {
        xml.push_str(&format!(r#"<a:ln w="{width}">{solid}</a:ln>"#));
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    xml.push_str(&"<a:effectStyle><a:effectLst/></a:effectStyle>".repeat(3));
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    xml.push_str(&solid.repeat(3));
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/><a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    xml
}

// ── Slides ───────────────────────────────────────────────────────────────

/// Generate a slide part. `image_rel_ids[i]` is the relationship id of
/// the slide's `i`-th picture.
pub(crate) fn slide_xml(pictures: &[Picture], image_rel_ids: &[String]) -> String {
    let mut xml = String::with_capacity(1024 + pictures.len() * 640);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(
        r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#
    ));
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    for (i, (picture, rel_id)) in pictures.iter().zip(image_rel_ids).enumerate() {
        // Shape id 1 is the group; pictures start at 2.
        let shape_id = i + 2;
        let place = picture.placement();
        xml.push_str("<p:pic>");
        xml.push_str("<p:nvPicPr>");
        xml.push_str(&format!(
            r#"<p:cNvPr id="{shape_id}" name="Picture {}" descr="{}"/>"#,
            i + 1,
            escape_attr(picture.description())
        ));
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#);
        xml.push_str("</p:nvPicPr>");
        xml.push_str(&format!(
            r#"<p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#
        ));
        xml.push_str("<p:spPr><a:xfrm>");
        xml.push_str(&format!(r#"<a:off x="{}" y="{}"/>"#, place.x, place.y));
        xml.push_str(&format!(r#"<a:ext cx="{}" cy="{}"/>"#, place.cx, place.cy));
        xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#);
        xml.push_str("</p:pic>");
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

/// Generate a slide's relationships: the layout first, then one image
/// relationship per `(rel_id, media_target)` pair.
pub(crate) fn slide_rels_xml(images: &[(String, String)]) -> String {
    let mut xml = String::with_capacity(512 + images.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{NS_RELS}">"#));
    xml.push_str(&relationship(
        "rId1",
        REL_SLIDE_LAYOUT,
        "../slideLayouts/slideLayout1.xml",
    ));
    for (rel_id, target) in images {
        xml.push_str(&relationship(rel_id, REL_IMAGE, target));
    }
    xml.push_str("</Relationships>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::Placement;

    fn one_slide_deck() -> SlideDeck {
        let mut deck = SlideDeck::with_size(12_192_000, 6_858_000).unwrap();
        deck.add_blank_slide()
            .add_picture(vec![1, 2, 3], MediaFormat::Jpeg, Placement::new(0, 0, 100, 200))
            .set_description("page <1> & \"more\"");
        deck
    }

    #[test]
    fn presentation_lists_slides_and_size() {
        let xml = presentation_xml(&one_slide_deck());
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#), "{xml}");
        assert!(xml.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
    }

    #[test]
    fn presentation_without_slides_omits_id_list() {
        let xml = presentation_xml(&SlideDeck::new());
        assert!(!xml.contains("sldIdLst"));
    }

    #[test]
    fn presentation_rels_point_slides_at_matching_ids() {
        let xml = presentation_rels_xml(&one_slide_deck());
        assert!(xml.contains(r#"Id="rId6""#));
        assert!(xml.contains(r#"Target="slides/slide1.xml""#));
    }

    #[test]
    fn content_types_register_only_used_media() {
        let xml = content_types_xml(&one_slide_deck());
        assert!(xml.contains(r#"Extension="jpeg""#));
        assert!(!xml.contains(r#"Extension="png""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }

    #[test]
    fn slide_embeds_picture_with_escaped_description() {
        let deck = one_slide_deck();
        let xml = slide_xml(deck.slides()[0].pictures(), &["rId2".to_string()]);
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"<a:off x="0" y="0"/><a:ext cx="100" cy="200"/>"#));
        assert!(xml.contains("descr=\"page &lt;1&gt; &amp; &quot;more&quot;\""));
    }

    #[test]
    fn media_names_use_format_extension() {
        assert_eq!(media_part_name(3, MediaFormat::Png), "ppt/media/image3.png");
        assert_eq!(media_part_name(1, MediaFormat::Jpeg), "ppt/media/image1.jpeg");
    }
}

//! PPTX file parser implementation.

use deckcheck_core::{Deck, Error, ExtractedSlide, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader.
    ///
    /// Returns one `ExtractedSlide` per slide, numbered 1..N in
    /// presentation order, including slides with no textual shapes.
    pub fn parse<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::Zip(format!("Failed to open ZIP: {}", e)))?;

        let mut deck = Deck::new(filename);

        let slide_order = self.get_slide_order(&mut archive)?;

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            deck.add_slide(slide);
        }

        Ok(deck)
    }

    /// Get the ordered list of slide paths from the presentation relationships.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_path = "ppt/_rels/presentation.xml.rels";

        let rels_content = self.read_file_from_archive(archive, rels_path)?;
        let mut slides: Vec<(String, Option<usize>)> = Vec::new();

        let mut reader = Reader::from_str(&rels_content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.name().as_ref() == b"Relationship" =>
                {
                    let mut rel_type = String::new();
                    let mut target = String::new();
                    let mut id = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Type" => {
                                rel_type = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Target" => {
                                target = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            b"Id" => {
                                id = String::from_utf8_lossy(&attr.value).to_string();
                            }
                            _ => {}
                        }
                    }

                    // Slide relationships only, not layouts or masters
                    if rel_type.contains("/slide")
                        && !rel_type.contains("slideLayout")
                        && !rel_type.contains("slideMaster")
                    {
                        let order_num =
                            extract_slide_number(&id).or_else(|| extract_slide_number(&target));
                        let full_path = if target.starts_with('/') {
                            target[1..].to_string()
                        } else {
                            format!("ppt/{}", target)
                        };
                        slides.push((full_path, order_num));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!("Error parsing relationships: {}", e)));
                }
                _ => {}
            }
        }

        // Sort slides by their number, falling back to path order
        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<ExtractedSlide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let mut slide = ExtractedSlide::new(slide_number);

        for shape_text in self.extract_shape_texts(&content)? {
            slide.add_shape_text(&shape_text);
        }

        Ok(slide)
    }

    /// Extract the text of each shape from slide XML, in document order.
    ///
    /// A shape's text is its paragraphs joined with newlines; shapes whose
    /// text is blank are skipped.
    fn extract_shape_texts(&self, xml_content: &str) -> Result<Vec<String>> {
        let mut shapes = Vec::new();
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut in_shape = false;
        let mut in_text_body = false;
        let mut in_paragraph = false;
        let mut current_text = String::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" | b"pic" => {
                        in_shape = true;
                        current_text.clear();
                    }
                    b"txBody" if in_shape => {
                        in_text_body = true;
                    }
                    b"p" if in_text_body => {
                        in_paragraph = true;
                        if !current_text.is_empty() {
                            current_text.push('\n');
                        }
                    }
                    _ => {}
                },
                Ok(Event::Text(ref e)) => {
                    if in_paragraph {
                        let text = e.unescape().unwrap_or_default();
                        current_text.push_str(&text);
                    }
                }
                Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                    b"sp" | b"pic" => {
                        let text = current_text.trim();
                        if !text.is_empty() {
                            shapes.push(text.to_string());
                        }
                        current_text.clear();
                        in_shape = false;
                        in_text_body = false;
                        in_paragraph = false;
                    }
                    b"txBody" => {
                        in_text_body = false;
                    }
                    b"p" => {
                        in_paragraph = false;
                    }
                    _ => {}
                },
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("XML parsing error (continuing): {}", e);
                }
                _ => {}
            }
        }

        Ok(shapes)
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::Zip(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::Zip(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const RELS_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    fn slide_xml(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!(
            "<p:sld xmlns:p=\"p\" xmlns:a=\"a\"><p:cSld><p:spTree>\
             <p:sp><p:txBody>{}</p:txBody></p:sp>\
             </p:spTree></p:cSld></p:sld>",
            body
        )
    }

    fn build_pptx(slides: &[&str]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = FileOptions::default();

        let rels: String = slides
            .iter()
            .enumerate()
            .map(|(i, _)| {
                format!(
                    "<Relationship Id=\"rId{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>",
                    i + 1,
                    RELS_TYPE_SLIDE,
                    i + 1
                )
            })
            .collect();
        zip.start_file("ppt/_rels/presentation.xml.rels", opts)
            .unwrap();
        zip.write_all(format!("<Relationships>{}</Relationships>", rels).as_bytes())
            .unwrap();

        for (i, xml) in slides.iter().enumerate() {
            zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), opts)
                .unwrap();
            zip.write_all(xml.as_bytes()).unwrap();
        }

        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    #[test]
    fn test_parse_yields_one_entry_per_slide_in_order() {
        let s1 = slide_xml(&["Revenue was $5M in 2023"]);
        let s2 = slide_xml(&["Revenue was $7M in 2023"]);
        let s3 = slide_xml(&[]);
        let buf = build_pptx(&[&s1, &s2, &s3]);

        let deck = PptxParser::new().parse(buf, "deck.pptx").unwrap();
        assert_eq!(deck.slides.len(), 3);
        for (i, slide) in deck.slides.iter().enumerate() {
            assert_eq!(slide.number, i + 1);
        }
        assert_eq!(deck.slides[0].text(), "Revenue was $5M in 2023");
        assert_eq!(deck.slides[1].text(), "Revenue was $7M in 2023");
        assert!(deck.slides[2].shapes.is_empty());
    }

    #[test]
    fn test_whitespace_only_shape_is_skipped() {
        let xml = "<p:sld xmlns:p=\"p\" xmlns:a=\"a\"><p:spTree>\
                   <p:sp><p:txBody><a:p><a:r><a:t>  </a:t></a:r></a:p></p:txBody></p:sp>\
                   <p:sp><p:txBody><a:p><a:r><a:t>Kept</a:t></a:r></a:p></p:txBody></p:sp>\
                   </p:spTree></p:sld>";
        let shapes = PptxParser::new().extract_shape_texts(xml).unwrap();
        assert_eq!(shapes, vec!["Kept"]);
    }

    #[test]
    fn test_paragraphs_join_with_newlines() {
        let xml = slide_xml(&["Line one", "Line two"]);
        let shapes = PptxParser::new().extract_shape_texts(&xml).unwrap();
        assert_eq!(shapes, vec!["Line one\nLine two"]);
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let buf = Cursor::new(b"not a zip archive".to_vec());
        assert!(PptxParser::new().parse(buf, "bogus.pptx").is_err());
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}

//! Word 2003 XML ("WordprocessingML") fragments for translated rich text.
//!
//! Output is a sequence of `<w:p>` elements meant to be spliced into a document whose root
//! declares the `w` namespace; it has no root or declaration of its own.

use crate::constants::LIST_PARAGRAPH_STYLE;
use crate::markup::{Paragraph, Run};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;

/// Write paragraphs as `<w:p>` elements.
///
/// List items get the `ListBullet` paragraph style; bold and italic runs get `<w:b/>` and
/// `<w:i/>` run properties. Run text is escaped, stripped of characters XML forbids, and
/// keeps its whitespace.
pub fn paragraphs_to_wordml(paragraphs: &[Paragraph]) -> quick_xml::Result<String> {
    let mut xml = Writer::new(Vec::new());

    for paragraph in paragraphs {
        xml.write_event(Event::Start(BytesStart::new("w:p")))?;
        if paragraph.is_list_item() {
            xml.write_event(Event::Start(BytesStart::new("w:pPr")))?;
            let mut style = BytesStart::new("w:pStyle");
            style.push_attribute(("w:val", LIST_PARAGRAPH_STYLE));
            xml.write_event(Event::Empty(style))?;
            xml.write_event(Event::End(BytesEnd::new("w:pPr")))?;
        }
        for run in paragraph.runs.iter().filter(|run| !run.text.is_empty()) {
            write_run(&mut xml, run)?;
        }
        xml.write_event(Event::End(BytesEnd::new("w:p")))?;
    }

    Ok(String::from_utf8_lossy(&xml.into_inner()).into_owned())
}

fn write_run(xml: &mut Writer<Vec<u8>>, run: &Run) -> quick_xml::Result<()> {
    xml.write_event(Event::Start(BytesStart::new("w:r")))?;
    if run.is_bold() || run.is_italic() {
        xml.write_event(Event::Start(BytesStart::new("w:rPr")))?;
        if run.is_bold() {
            xml.write_event(Event::Empty(BytesStart::new("w:b")))?;
        }
        if run.is_italic() {
            xml.write_event(Event::Empty(BytesStart::new("w:i")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("w:rPr")))?;
    }

    let mut text = BytesStart::new("w:t");
    text.push_attribute(("xml:space", "preserve"));
    xml.write_event(Event::Start(text))?;
    xml.write_event(Event::Text(BytesText::new(&strip_invalid_xml_chars(&run.text))))?;
    xml.write_event(Event::End(BytesEnd::new("w:t")))?;

    xml.write_event(Event::End(BytesEnd::new("w:r")))?;
    Ok(())
}

/// Drop characters that may not appear in an XML 1.0 document: C0 controls other than tab,
/// line feed and carriage return, plus U+FFFE and U+FFFF.
pub(crate) fn strip_invalid_xml_chars(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

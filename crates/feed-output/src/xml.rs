//! Small quick-xml helpers shared by the feed writer.

use std::io::{self, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Write `<name>text</name>`.
pub(crate) fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write `<name>text</name>`, or `<name/>` when there is no text.
pub(crate) fn write_optional_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: Option<&str>,
) -> io::Result<()> {
    match text {
        Some(text) => write_text_element(writer, name, text),
        None => writer.write_event(Event::Empty(BytesStart::new(name))),
    }
}

/// Write `<wrapper><name>text</name></wrapper>`.
pub(crate) fn write_wrapped_element<W: Write>(
    writer: &mut Writer<W>,
    wrapper: &str,
    name: &str,
    text: &str,
) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(wrapper)))?;
    write_text_element(writer, name, text)?;
    writer.write_event(Event::End(BytesEnd::new(wrapper)))?;
    Ok(())
}

pub(crate) fn start<W: Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))
}

pub(crate) fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> io::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(write: impl FnOnce(&mut Writer<Vec<u8>>) -> io::Result<()>) -> String {
        let mut writer = Writer::new(Vec::new());
        write(&mut writer).expect("write");
        String::from_utf8(writer.into_inner()).expect("utf-8")
    }

    #[test]
    fn text_is_escaped() {
        let xml = render(|w| write_text_element(w, "Name", "Salt & <Pepper>"));
        assert_eq!(xml, "<Name>Salt &amp; &lt;Pepper&gt;</Name>");
    }

    #[test]
    fn missing_text_writes_empty_element() {
        let xml = render(|w| write_optional_element(w, "Name", None));
        assert_eq!(xml, "<Name/>");
    }

    #[test]
    fn wrapped_element_nests() {
        let xml = render(|w| {
            write_wrapped_element(w, "ManufacturerPartNumbers", "ManufacturerPartNumber", "X-1")
        });
        assert_eq!(
            xml,
            "<ManufacturerPartNumbers><ManufacturerPartNumber>X-1</ManufacturerPartNumber></ManufacturerPartNumbers>"
        );
    }
}

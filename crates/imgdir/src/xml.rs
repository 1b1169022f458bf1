use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{ImgdirError, Result};
use crate::node::{Entry, Leaf, LeafKind, Node, RawElement, DIR_TAG};

const INDENT_SIZE: usize = 2;

/// Parse XML text into the directory tree rooted at the document element.
pub fn parse_document(text: &str) -> Result<Node> {
    let root = parse_raw(text)?;
    if root.tag != DIR_TAG {
        return Err(ImgdirError::invalid_root(format!(
            "expected <{DIR_TAG}>, found <{}>",
            root.tag
        )));
    }
    match into_entry(root) {
        Entry::Dir(node) => Ok(node),
        _ => Err(ImgdirError::invalid_root("root directory has no name attribute")),
    }
}

/// Serialize a tree with an XML declaration, two-space indentation and a
/// trailing newline. Entry order is written exactly as stored.
pub fn write_document(root: &Node) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(ImgdirError::write)?;
    write_node(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(ImgdirError::write)
}

fn parse_raw(text: &str) -> Result<RawElement> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<RawElement> = Vec::new();
    let mut root: Option<RawElement> = None;

    loop {
        match reader.read_event().map_err(ImgdirError::parse)? {
            Event::Start(start) => stack.push(open_element(&start)?),
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ImgdirError::parse("closing tag without opening tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(ImgdirError::parse)?;
                push_text(&mut stack, &text);
            }
            Event::CData(data) => push_text(&mut stack, &String::from_utf8_lossy(&data)),
            Event::Eof => break,
            // Declarations, comments and doctype carry no data.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(ImgdirError::parse(format!(
            "unexpected end of input inside <{}>",
            stack.last().map(|e| e.tag.as_str()).unwrap_or_default()
        )));
    }
    root.ok_or_else(|| ImgdirError::invalid_root("document has no root element"))
}

fn open_element(start: &BytesStart<'_>) -> Result<RawElement> {
    let mut element = RawElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(ImgdirError::parse)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(ImgdirError::parse)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

/// Text outside the root element is ignored.
fn push_text(stack: &mut [RawElement], text: &str) {
    if let Some(element) = stack.last_mut() {
        element.text.push_str(text);
    }
}

fn attach(
    stack: &mut [RawElement],
    root: &mut Option<RawElement>,
    element: RawElement,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err(ImgdirError::parse(format!(
            "second root element <{}>",
            element.tag
        )));
    }
    *root = Some(element);
    Ok(())
}

fn into_entry(element: RawElement) -> Entry {
    if element.tag == DIR_TAG {
        return into_dir(element);
    }
    match LeafKind::from_tag(&element.tag) {
        Some(kind) if is_plain_leaf(&element) => {
            let name = element.attribute("name").unwrap_or_default().to_string();
            let value = element.attribute("value").unwrap_or_default().to_string();
            Entry::Leaf(Leaf { kind, name, value })
        }
        _ => Entry::Raw(element),
    }
}

fn into_dir(element: RawElement) -> Entry {
    match element.attribute("name") {
        Some(name) if element.attributes.len() == 1 && element.text.is_empty() => {
            let name = name.to_string();
            let entries = element.children.into_iter().map(into_entry).collect();
            Entry::Dir(Node::with_entries(name, entries))
        }
        _ => Entry::Raw(element),
    }
}

fn is_plain_leaf(element: &RawElement) -> bool {
    element.children.is_empty()
        && element.text.is_empty()
        && element.attribute("name").is_some()
        && element
            .attributes
            .iter()
            .all(|(key, _)| key == "name" || key == "value")
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    let mut start = BytesStart::new(DIR_TAG);
    start.push_attribute(("name", node.name()));

    if node.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(ImgdirError::write);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(ImgdirError::write)?;
    for entry in node.entries() {
        match entry {
            Entry::Dir(child) => write_node(writer, child)?,
            Entry::Leaf(leaf) => write_leaf(writer, leaf)?,
            Entry::Raw(raw) => write_raw(writer, raw)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(DIR_TAG)))
        .map_err(ImgdirError::write)
}

fn write_leaf<W: Write>(writer: &mut Writer<W>, leaf: &Leaf) -> Result<()> {
    let mut element = BytesStart::new(leaf.kind.tag());
    element.push_attribute(("name", leaf.name.as_str()));
    element.push_attribute(("value", leaf.value.as_str()));
    writer
        .write_event(Event::Empty(element))
        .map_err(ImgdirError::write)
}

fn write_raw<W: Write>(writer: &mut Writer<W>, raw: &RawElement) -> Result<()> {
    let mut start = BytesStart::new(raw.tag.as_str());
    for (key, value) in &raw.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if raw.children.is_empty() && raw.text.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(ImgdirError::write);
    }

    writer
        .write_event(Event::Start(start))
        .map_err(ImgdirError::write)?;
    if !raw.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&raw.text)))
            .map_err(ImgdirError::write)?;
    }
    for child in &raw.children {
        write_raw(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(raw.tag.as_str())))
        .map_err(ImgdirError::write)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<imgdir name="QuestInfo.img">
  <imgdir name="1000">
    <string name="name" value="Borrowing Sera&apos;s Mirror"/>
    <int name="area" value="20"/>
    <float name="ratio" value="0.5"/>
    <imgdir name="0">
      <int name="npc" value="2100"/>
    </imgdir>
  </imgdir>
  <imgdir name="1001"/>
</imgdir>
"#;

    #[test]
    fn parses_typed_leaves_and_directories() {
        let root = parse_document(SAMPLE).unwrap();
        assert_eq!(root.name(), "QuestInfo.img");
        let quest = root.find_child("1000").unwrap();
        assert_eq!(quest.string("name"), Some("Borrowing Sera's Mirror"));
        assert_eq!(quest.int("area"), Some(20));
        assert_eq!(quest.find_child("0").and_then(|s| s.int("npc")), Some(2100));
        assert!(root.find_child("1001").unwrap().is_empty());
    }

    #[test]
    fn unknown_elements_survive_round_trip() {
        let root = parse_document(SAMPLE).unwrap();
        let quest = root.find_child("1000").unwrap();
        let raw = quest
            .entries()
            .iter()
            .find_map(|entry| match entry {
                Entry::Raw(raw) => Some(raw),
                _ => None,
            })
            .expect("float kept as raw element");
        assert_eq!(raw.tag, "float");
        assert_eq!(raw.attribute("value"), Some("0.5"));

        let written = write_document(&root).unwrap();
        assert!(written.contains(r#"<float name="ratio" value="0.5"/>"#));
        assert_eq!(parse_document(&written).unwrap(), root);
    }

    #[test]
    fn opaque_text_and_cdata_survive_round_trip() {
        let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<imgdir name="String.img">
  <imgdir name="1000">
    <note name="a">Fish &amp; chips</note>
    <script name="b"><![CDATA[if (x < 3) say("hi");]]></script>
    <string name="odd">carries text</string>
  </imgdir>
</imgdir>
"#;
        let root = parse_document(text).unwrap();
        let quest = root.find_child("1000").unwrap();
        let texts: Vec<_> = quest
            .entries()
            .iter()
            .filter_map(|entry| match entry {
                Entry::Raw(raw) => Some((raw.tag.as_str(), raw.text.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            texts,
            vec![
                ("note", "Fish & chips"),
                ("script", r#"if (x < 3) say("hi");"#),
                ("string", "carries text"),
            ]
        );
        assert_eq!(quest.string("odd"), None);

        let written = write_document(&root).unwrap();
        assert!(written.contains("Fish &amp; chips"), "{written}");
        assert_eq!(parse_document(&written).unwrap(), root);
    }

    #[test]
    fn output_is_stable_across_cycles() {
        let root = parse_document(SAMPLE).unwrap();
        let first = write_document(&root).unwrap();
        let second = write_document(&parse_document(&first).unwrap()).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\""));
    }

    #[test]
    fn rejects_non_imgdir_root() {
        let err = parse_document("<root name=\"x\"/>").unwrap_err();
        assert!(matches!(err, ImgdirError::InvalidRoot(_)));
    }

    #[test]
    fn rejects_truncated_document() {
        assert!(parse_document("<imgdir name=\"a\"><imgdir name=\"b\">").is_err());
        assert!(parse_document("").is_err());
    }

    #[test]
    fn escapes_attribute_values() {
        let mut root = Node::new("Act.img");
        root.ensure_child("1")
            .push_leaf(Leaf::string("name", "Fish & \"Chips\" <3"));
        let written = write_document(&root).unwrap();
        let reparsed = parse_document(&written).unwrap();
        assert_eq!(
            reparsed.find_child("1").and_then(|q| q.string("name")),
            Some("Fish & \"Chips\" <3")
        );
    }
}

//! A format-preserving XML tree.
//!
//! Parsed with the `quick-xml` event reader without trimming, so everything
//! that is not an element boundary survives untouched: the declaration,
//! comments, whitespace, CDATA and raw attribute text. An unmodified
//! document serialises back to its input.
//!
//! Elements created in memory carry no whitespace. When one is spliced into
//! a parsed element it is laid out on lines of its own, indented like its
//! new siblings.

use std::fmt;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use pomsmith_core::tree::TreeElement;
use pomsmith_util::errors::PomsmithError;

const DEFAULT_INDENT: &str = "    ";
const BOM: char = '\u{feff}';

/// One piece of XML content. Text-like variants hold the raw source between
/// their delimiters, entities still escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Declaration(String),
    ProcessingInstruction(String),
    DocType(String),
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_to(out),
            Node::Text(t) => out.push_str(t),
            Node::CData(c) => {
                out.push_str("<![CDATA[");
                out.push_str(c);
                out.push_str("]]>");
            }
            Node::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Node::Declaration(d) | Node::ProcessingInstruction(d) => {
                out.push_str("<?");
                out.push_str(d);
                out.push_str("?>");
            }
            Node::DocType(d) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(d);
                out.push('>');
            }
        }
    }
}

/// An XML element and its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    /// Start tag between `<` and `>`: the name plus raw attribute text.
    start: String,
    self_closing: bool,
    children: Vec<Node>,
    /// Whitespace that opens the element's line.
    indent: String,
    depth: usize,
    /// Built in memory and not yet laid out.
    synthetic: bool,
}

impl Element {
    /// An empty element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            start: name.clone(),
            name,
            self_closing: false,
            children: Vec::new(),
            indent: String::new(),
            depth: 0,
            synthetic: true,
        }
    }

    /// `<name>text</name>`, escaping `text`.
    pub fn leaf(name: impl Into<String>, text: &str) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(escape(text).into_owned()));
        element
    }

    /// Append `child` as the last element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    fn parsed(start: &BytesStart<'_>, self_closing: bool, indent: String, depth: usize) -> Self {
        Self {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            start: String::from_utf8_lossy(start).into_owned(),
            self_closing,
            children: Vec::new(),
            indent,
            depth,
            synthetic: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Element children in document order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name == name)
    }

    /// Unescaped character data of the direct children, trimmed.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(raw) => match unescape(raw) {
                    Ok(t) => text.push_str(&t),
                    Err(_) => text.push_str(raw),
                },
                Node::CData(c) => text.push_str(c),
                _ => {}
            }
        }
        text.trim().to_string()
    }

    /// Text of the first child named `name`, if that child exists.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(Element::text)
    }

    /// Attribute text in a whitespace-insensitive form.
    fn attributes(&self) -> String {
        self.start[self.name.len().min(self.start.len())..]
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.start);
        if self.children.is_empty() && self.self_closing {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    /// Node position of the `index`-th element child.
    fn element_position(&self, index: usize) -> Option<usize> {
        self.children
            .iter()
            .enumerate()
            .filter(|(_, n)| matches!(n, Node::Element(_)))
            .map(|(i, _)| i)
            .nth(index)
    }

    fn last_element_position(&self) -> Option<usize> {
        self.children
            .iter()
            .rposition(|n| matches!(n, Node::Element(_)))
    }

    /// Newline style of the line the node at `at` opens, when that node
    /// starts a line of its own.
    fn line_break_before(&self, at: usize) -> Option<&'static str> {
        let Node::Text(ws) = self.children.get(at.checked_sub(1)?)? else {
            return None;
        };
        if !is_blank(ws) {
            return None;
        }
        let (head, _) = ws.rsplit_once('\n')?;
        Some(if head.ends_with('\r') { "\r\n" } else { "\n" })
    }

    /// Give a freshly inserted subtree its indentation. Parsed content is
    /// left alone.
    fn lay_out(&mut self, indent: &str, unit: &str, depth: usize, newline: &str) {
        self.indent = indent.to_string();
        self.depth = depth;
        if !self.synthetic {
            return;
        }
        self.synthetic = false;
        let only_elements = !self.children.is_empty()
            && self.children.iter().all(|n| matches!(n, Node::Element(_)));
        if !only_elements {
            return;
        }

        let inner = format!("{indent}{unit}");
        let mut laid_out = Vec::with_capacity(self.children.len() * 2 + 1);
        for node in std::mem::take(&mut self.children) {
            if let Node::Element(mut child) = node {
                child.lay_out(&inner, unit, depth + 1, newline);
                laid_out.push(Node::Text(format!("{newline}{inner}")));
                laid_out.push(Node::Element(child));
            }
        }
        laid_out.push(Node::Text(format!("{newline}{indent}")));
        self.children = laid_out;
    }
}

impl TreeElement for Element {
    fn name(&self) -> &str {
        &self.name
    }

    fn child_elements(&self) -> Vec<&Self> {
        self.elements().collect()
    }

    fn child_element_mut(&mut self, name: &str) -> Option<&mut Self> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    fn insert_element(&mut self, index: usize, mut child: Self) {
        if self.synthetic {
            let at = self
                .element_position(index)
                .unwrap_or(self.children.len());
            self.children.insert(at, Node::Element(child));
            return;
        }

        let depth = self.depth + 1;
        let Some(last) = self.last_element_position() else {
            // First element child: open a line one level deeper than ours
            // and keep any whitespace before the closing tag.
            let indent = format!("{}{}", self.indent, indent_unit(&self.indent, self.depth));
            child.lay_out(&indent, indent_unit(&indent, depth), depth, "\n");
            let closes_line = matches!(
                self.children.last(),
                Some(Node::Text(t)) if is_blank(t) && t.contains('\n')
            );
            let mut nodes = vec![Node::Text(format!("\n{indent}")), Node::Element(child)];
            if !closes_line {
                nodes.push(Node::Text(format!("\n{}", self.indent)));
            }
            let at = if closes_line {
                self.children.len() - 1
            } else {
                self.children.len()
            };
            self.children.splice(at..at, nodes);
            return;
        };

        let (reference, before) = match self.element_position(index) {
            Some(at) => (at, true),
            None => (last, false),
        };
        let Node::Element(sibling) = &self.children[reference] else {
            return;
        };
        let indent = sibling.indent.clone();

        let nodes = match self.line_break_before(reference) {
            Some(newline) => {
                child.lay_out(&indent, indent_unit(&indent, depth), depth, newline);
                let separator = Node::Text(format!("{newline}{indent}"));
                if before {
                    vec![Node::Element(child), separator]
                } else {
                    vec![separator, Node::Element(child)]
                }
            }
            None => {
                child.depth = depth;
                vec![Node::Element(child)]
            }
        };
        let at = if before { reference } else { reference + 1 };
        self.children.splice(at..at, nodes);
    }

    fn structurally_equal(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes() == other.attributes()
            && self.text() == other.text()
            && self.elements().count() == other.elements().count()
            && self
                .elements()
                .zip(other.elements())
                .all(|(a, b)| a.structurally_equal(b))
    }
}

/// A parsed XML document: the root element plus whatever surrounds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    bom: bool,
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    pub fn parse(xml: &str) -> Result<Self, PomsmithError> {
        let (bom, xml) = match xml.strip_prefix(BOM) {
            Some(rest) => (true, rest),
            None => (false, xml),
        };
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Element> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader.read_event().map_err(|e| PomsmithError::Manifest {
                message: format!("Invalid XML at byte {}: {e}", reader.buffer_position()),
            })?;
            let node = match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    let siblings = stack.last().map_or(&prolog, |p| &p.children);
                    let element = Element::parsed(
                        e,
                        matches!(event, Event::Empty(_)),
                        line_indent(siblings),
                        stack.len(),
                    );
                    if matches!(event, Event::Start(_)) {
                        stack.push(element);
                        continue;
                    }
                    Node::Element(element)
                }
                Event::End(_) => match stack.pop() {
                    Some(element) => Node::Element(element),
                    None => {
                        return Err(PomsmithError::Manifest {
                            message: "Unbalanced closing tag".to_string(),
                        })
                    }
                },
                Event::Text(ref e) => Node::Text(lossy(e)),
                Event::CData(ref e) => Node::CData(lossy(e)),
                Event::Comment(ref e) => Node::Comment(lossy(e)),
                Event::Decl(ref e) => Node::Declaration(lossy(e)),
                Event::PI(ref e) => Node::ProcessingInstruction(lossy(e)),
                Event::DocType(ref e) => Node::DocType(lossy(e)),
                Event::Eof => break,
                #[allow(unreachable_patterns)]
                _ => continue,
            };

            match (stack.last_mut(), node) {
                (Some(parent), node) => parent.children.push(node),
                (None, Node::Element(element)) if root.is_none() => root = Some(element),
                (None, Node::Element(element)) => {
                    return Err(PomsmithError::Manifest {
                        message: format!("Unexpected second root element <{}>", element.name),
                    })
                }
                (None, node) if root.is_none() => prolog.push(node),
                (None, node) => epilog.push(node),
            }
        }

        if let Some(open) = stack.last() {
            return Err(PomsmithError::Manifest {
                message: format!("Element <{}> is never closed", open.name),
            });
        }
        let root = root.ok_or_else(|| PomsmithError::Manifest {
            message: "Document has no root element".to_string(),
        })?;

        Ok(Self {
            bom,
            prolog,
            root,
            epilog,
        })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }
        for node in &self.prolog {
            node.write_to(&mut out);
        }
        self.root.write_to(&mut out);
        for node in &self.epilog {
            node.write_to(&mut out);
        }
        out
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn is_blank(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_whitespace())
}

/// Indentation of a node about to be appended after `siblings`.
fn line_indent(siblings: &[Node]) -> String {
    match siblings.last() {
        Some(Node::Text(ws)) if is_blank(ws) => ws
            .rsplit_once('\n')
            .map(|(_, indent)| indent.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// One indentation step, inferred from an element's indent and depth.
fn indent_unit(indent: &str, depth: usize) -> &str {
    if depth > 0 && !indent.is_empty() && indent.len() % depth == 0 {
        &indent[..indent.len() / depth]
    } else {
        DEFAULT_INDENT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomsmith_core::tree::{insert_ordered, Insertion};

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- build file -->
<project xmlns="http://maven.apache.org/POM/4.0.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <modelVersion>4.0.0</modelVersion>
  <name><![CDATA[Demo & co]]></name>
  <description>a &amp; b</description>
  <dependencies>
    <dependency>
      <groupId>a</groupId>
    </dependency>
    <dependency>
      <groupId>c</groupId>
    </dependency>
  </dependencies>
  <build/>
</project>
"#;

    fn by_group(a: &Element, b: &Element) -> std::cmp::Ordering {
        a.child_text("groupId").cmp(&b.child_text("groupId"))
    }

    fn dependency(group: &str) -> Element {
        Element::new("dependency").with_child(Element::leaf("groupId", group))
    }

    #[test]
    fn round_trip_is_byte_identical() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.to_xml(), POM);
    }

    #[test]
    fn round_trip_keeps_crlf_and_bom() {
        let xml = "\u{feff}<project>\r\n  <a x='1' />\r\n</project>\r\n";
        assert_eq!(XmlDocument::parse(xml).unwrap().to_xml(), xml);
    }

    #[test]
    fn text_is_unescaped_and_includes_cdata() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.root().child_text("description").as_deref(), Some("a & b"));
        assert_eq!(doc.root().child_text("name").as_deref(), Some("Demo & co"));
        assert_eq!(doc.root().child_text("missing"), None);
    }

    #[test]
    fn inserted_element_matches_sibling_indentation() {
        let mut doc = XmlDocument::parse(POM).unwrap();
        let deps = doc.root_mut().child_element_mut("dependencies").unwrap();
        let result = insert_ordered(deps, dependency("b"), by_group);
        assert!(result.is_inserted());
        let expected = POM.replace(
            "      <groupId>a</groupId>\n    </dependency>\n",
            "      <groupId>a</groupId>\n    </dependency>\n    <dependency>\n      <groupId>b</groupId>\n    </dependency>\n",
        );
        assert_eq!(doc.to_xml(), expected);
    }

    #[test]
    fn append_after_last_sibling() {
        let mut doc = XmlDocument::parse(POM).unwrap();
        let deps = doc.root_mut().child_element_mut("dependencies").unwrap();
        insert_ordered(deps, dependency("d"), by_group);
        assert!(doc.to_xml().contains(
            "<groupId>c</groupId>\n    </dependency>\n    <dependency>\n      <groupId>d</groupId>\n    </dependency>\n  </dependencies>"
        ));
    }

    #[test]
    fn insert_into_self_closing_element() {
        let mut doc = XmlDocument::parse(POM).unwrap();
        let build = doc.root_mut().child_element_mut("build").unwrap();
        build.insert_element(0, Element::leaf("finalName", "demo"));
        assert!(doc
            .to_xml()
            .contains("  <build>\n    <finalName>demo</finalName>\n  </build>\n"));
    }

    #[test]
    fn synthetic_container_is_laid_out_on_insertion() {
        let mut doc =
            XmlDocument::parse("<project>\n  <modelVersion>4.0.0</modelVersion>\n</project>")
                .unwrap();
        let mut container = Element::new("dependencies");
        container.insert_element(0, dependency("x"));
        doc.root_mut().insert_element(1, container);
        assert_eq!(
            doc.to_xml(),
            "<project>\n  <modelVersion>4.0.0</modelVersion>\n  <dependencies>\n    <dependency>\n      <groupId>x</groupId>\n    </dependency>\n  </dependencies>\n</project>"
        );
    }

    #[test]
    fn structural_equality_ignores_formatting() {
        let doc = XmlDocument::parse(POM).unwrap();
        let existing = doc.root().child("dependencies").unwrap();
        let first = existing.elements().next().unwrap();
        assert!(first.structurally_equal(&dependency("a")));
        assert!(!first.structurally_equal(&dependency("c")));

        let mut doc = doc.clone();
        let deps = doc.root_mut().child_element_mut("dependencies").unwrap();
        assert_eq!(
            insert_ordered(deps, dependency("a"), by_group),
            Insertion::AlreadyPresent
        );
    }

    #[test]
    fn rejects_malformed_documents() {
        for bad in ["", "<!-- only -->", "<a><b></a>", "<a></a><b/>", "<a>"] {
            assert!(
                matches!(XmlDocument::parse(bad), Err(PomsmithError::Manifest { .. })),
                "expected an error for {bad:?}"
            );
        }
    }

    #[test]
    fn unit_inferred_from_depth() {
        assert_eq!(indent_unit("        ", 2), "    ");
        assert_eq!(indent_unit("\t", 1), "\t");
        assert_eq!(indent_unit("", 0), DEFAULT_INDENT);
        assert_eq!(indent_unit("   ", 2), DEFAULT_INDENT);
    }
}

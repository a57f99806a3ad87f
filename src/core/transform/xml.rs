//! XML normalization into an ordered node tree and back
//!
//! Documents are read into a [`Value`] that keeps document order, so a rewritten
//! file only differs from its input where values were replaced:
//!
//! - the document is an array of top-level nodes
//! - an element is `{"<name>": [children...]}`, plus `":@": {"@_<attr>": ...}`
//!   when it has attributes
//! - a run of text or CDATA is `{"#text": "..."}`
//!
//! Source fields match element names and pseudonymize every text node below
//! the matched element, one element at a time. Attributes are left alone.
//! Derived fields read through a keyed view ([`XmlDocument::to_keyed`]) where
//! repeated siblings become arrays and text-only elements become strings.
//!
//! Rebuilding writes the XML declaration if there was one, indents by two
//! spaces and writes childless elements as self-closing. Comments,
//! processing instructions and doctypes are not carried over.

use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use super::path::{get_path, join_text};
use super::traversal::{derived_value, visit_and_replace};
use crate::domain::{DerivedField, PalosaError, Result};
use crate::pseudonymization::Pseudonymizer;

const ATTRIBUTES_KEY: &str = ":@";
const ATTRIBUTE_PREFIX: &str = "@_";
const TEXT_KEY: &str = "#text";

/// XML declaration fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

/// A parsed XML document in ordered node form
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub declaration: Option<XmlDeclaration>,
    /// Top-level nodes, always a [`Value::Array`]
    pub nodes: Value,
}

struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Vec<Value>,
}

impl Frame {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Value::String(existing)) = self
            .children
            .last_mut()
            .and_then(|last| last.get_mut(TEXT_KEY))
        {
            existing.push_str(text);
            return;
        }
        self.children.push(text_node(text.to_string()));
    }

    fn finish(self) -> Value {
        let mut node = Map::new();
        node.insert(self.name, Value::Array(self.children));
        if !self.attributes.is_empty() {
            node.insert(ATTRIBUTES_KEY.to_string(), Value::Object(self.attributes));
        }
        Value::Object(node)
    }
}

fn text_node(text: String) -> Value {
    let mut node = Map::new();
    node.insert(TEXT_KEY.to_string(), Value::String(text));
    Value::Object(node)
}

fn element_node(name: &str) -> Value {
    let mut node = Map::new();
    node.insert(name.to_string(), Value::Array(Vec::new()));
    Value::Object(node)
}

fn element_name(node: &Map<String, Value>) -> Option<&str> {
    node.iter()
        .find(|(key, value)| key.as_str() != ATTRIBUTES_KEY && value.is_array())
        .map(|(key, _)| key.as_str())
}

fn is_element_named(node: &Value, name: &str) -> bool {
    node.get(name).is_some_and(Value::is_array)
}

fn attach(stack: &mut [Frame], nodes: &mut Vec<Value>, node: Value) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => nodes.push(node),
    }
}

impl XmlDocument {
    /// Parses XML text; `file` only labels errors
    pub fn parse(file: &str, text: &str) -> Result<Self> {
        let parse_error = |message: String| PalosaError::DocumentParse {
            file: file.to_string(),
            message,
        };

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut declaration = None;
        let mut nodes = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(format!("at position {}: {e}", reader.buffer_position())))?;

            match event {
                Event::Decl(decl) => {
                    declaration = Some(read_declaration(&decl).map_err(parse_error)?);
                }
                Event::Start(start) => {
                    stack.push(read_start(&start).map_err(parse_error)?);
                }
                Event::Empty(start) => {
                    let node = read_start(&start).map_err(parse_error)?.finish();
                    attach(&mut stack, &mut nodes, node);
                }
                Event::Text(content) => {
                    let unescaped = content.unescape().map_err(|e| parse_error(e.to_string()))?;
                    if let Some(frame) = stack.last_mut() {
                        frame.push_text(&unescaped);
                    }
                }
                Event::CData(content) => {
                    let raw = String::from_utf8(content.into_inner().into_owned())
                        .map_err(|e| parse_error(e.to_string()))?;
                    if let Some(frame) = stack.last_mut() {
                        frame.push_text(&raw);
                    }
                }
                Event::End(_) => {
                    let frame = stack
                        .pop()
                        .ok_or_else(|| parse_error("unexpected closing tag".to_string()))?;
                    attach(&mut stack, &mut nodes, frame.finish());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(parse_error("unexpected end of document".to_string()));
        }
        if nodes.is_empty() {
            return Err(parse_error("no root element".to_string()));
        }

        Ok(Self {
            declaration,
            nodes: Value::Array(nodes),
        })
    }

    /// Keyed view of the document for dot-path lookups
    ///
    /// Elements become entries keyed by tag name and repeated siblings become
    /// an array under one key. Attributes keep their `@_` keys. An element
    /// holding only text becomes a string; text next to attributes or child
    /// elements is kept under `#text`. An empty element becomes `""`.
    pub fn to_keyed(&self) -> Value {
        let mut top = Map::new();
        for node in self.top_level() {
            if let Some((name, value)) = keyed_element(node) {
                add_keyed_child(&mut top, name, value);
            }
        }
        Value::Object(top)
    }

    /// Resolves a dot path against [`to_keyed`](Self::to_keyed)
    pub fn get_path(&self, path: &str) -> Option<Value> {
        get_path(&self.to_keyed(), path)
    }

    /// Replaces the content of the elements at a dot path with `value` as text
    ///
    /// Segments name elements; a numeric segment picks one of the same-named
    /// siblings, otherwise the write goes to all of them. Missing elements
    /// below the root are appended to their parent. Attributes are kept and
    /// `null` leaves the element empty. Returns `false` when nothing was
    /// written, which happens when the first segment is not a root element.
    pub fn set_path(&mut self, path: &str, value: &Value) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        match &mut self.nodes {
            Value::Array(nodes) => set_in_children(nodes, &segments, value, false),
            _ => false,
        }
    }

    /// Pseudonymizes the text of every element named in `sources`
    ///
    /// Each matching element is one replacement. Its text nodes, and those of
    /// its descendants, are classified one by one.
    pub fn apply_source_fields(
        &mut self,
        sources: &[String],
        pseudonymizer: &Pseudonymizer,
    ) -> Result<usize> {
        let mut total = 0;
        for name in sources {
            let count = visit_and_replace(
                &mut self.nodes,
                &|key: &str, value: &Value| key == name.as_str() && value.is_array(),
                &mut |children: &Value| pseudonymize_text(children, pseudonymizer),
            )?;
            tracing::trace!(field = %name, count, "Applied XML source field");
            total += count;
        }
        Ok(total)
    }

    /// Computes derived fields in definition order
    pub fn apply_derived_fields(&mut self, derived: &IndexMap<String, DerivedField>) {
        for (target, field) in derived {
            let keyed = self.to_keyed();
            let value = derived_value(field, |path| get_path(&keyed, path));
            if !self.set_path(target, &value) {
                tracing::warn!(field = %target, "Derived field has no root element to write to");
            }
        }
    }

    /// Serializes the tree back to indented XML
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        if let Some(decl) = &self.declaration {
            let event = BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            );
            write(&mut writer, Event::Decl(event))?;
        }

        let Value::Array(nodes) = &self.nodes else {
            return Err(PalosaError::Serialization(
                "XML document must be a list of nodes".to_string(),
            ));
        };
        for node in nodes {
            write_node(&mut writer, node)?;
        }

        String::from_utf8(writer.into_inner())
            .map_err(|e| PalosaError::Serialization(format!("XML output is not UTF-8: {e}")))
    }

    fn top_level(&self) -> &[Value] {
        self.nodes.as_array().map(Vec::as_slice).unwrap_or_default()
    }
}

fn keyed_element(node: &Value) -> Option<(String, Value)> {
    let map = node.as_object()?;
    let name = element_name(map)?;
    let children = map.get(name).and_then(Value::as_array)?;

    let mut keyed = Map::new();
    if let Some(Value::Object(attributes)) = map.get(ATTRIBUTES_KEY) {
        keyed.extend(attributes.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    let mut text = String::new();
    for child in children {
        match child.get(TEXT_KEY) {
            Some(content) => text.push_str(&join_text(content)),
            None => {
                if let Some((child_name, value)) = keyed_element(child) {
                    add_keyed_child(&mut keyed, child_name, value);
                }
            }
        }
    }

    let value = if keyed.is_empty() {
        Value::String(text)
    } else {
        if !text.is_empty() {
            keyed.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        Value::Object(keyed)
    };
    Some((name.to_string(), value))
}

fn add_keyed_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}

fn set_in_children(children: &mut Vec<Value>, segments: &[&str], value: &Value, create: bool) -> bool {
    let Some((name, rest)) = segments.split_first() else {
        return false;
    };
    let (index, rest) = match rest.split_first() {
        Some((segment, tail)) => match segment.parse::<usize>() {
            Ok(index) => (Some(index), tail),
            Err(_) => (None, rest),
        },
        None => (None, rest),
    };

    let mut positions: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, node)| is_element_named(node, name))
        .map(|(position, _)| position)
        .collect();
    if let Some(index) = index {
        positions = positions.get(index).copied().into_iter().collect();
    }
    if positions.is_empty() {
        if !create || index.is_some() {
            return false;
        }
        children.push(element_node(name));
        positions.push(children.len() - 1);
    }

    let mut written = false;
    for position in positions {
        let Some(content) = children[position]
            .get_mut(*name)
            .and_then(Value::as_array_mut)
        else {
            continue;
        };
        if rest.is_empty() {
            *content = match join_text(value) {
                text if text.is_empty() => Vec::new(),
                text => vec![text_node(text)],
            };
            written = true;
        } else {
            written |= set_in_children(content, rest, value, true);
        }
    }
    written
}

fn pseudonymize_text(value: &Value, pseudonymizer: &Pseudonymizer) -> Result<Value> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| pseudonymize_text(item, pseudonymizer))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, child) in map {
                let replaced = match (key.as_str(), child) {
                    (TEXT_KEY, Value::String(text)) => {
                        Value::String(pseudonymizer.pseudonymize_str(text)?)
                    }
                    (ATTRIBUTES_KEY, _) => child.clone(),
                    _ => pseudonymize_text(child, pseudonymizer)?,
                };
                out.insert(key.clone(), replaced);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

fn decode(bytes: &[u8]) -> std::result::Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| e.to_string())
}

fn read_declaration(decl: &BytesDecl<'_>) -> std::result::Result<XmlDeclaration, String> {
    let version = decl.version().map_err(|e| e.to_string())?;
    let encoding = match decl.encoding() {
        Some(value) => Some(decode(&value.map_err(|e| e.to_string())?)?),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(value) => Some(decode(&value.map_err(|e| e.to_string())?)?),
        None => None,
    };

    Ok(XmlDeclaration {
        version: decode(&version)?,
        encoding,
        standalone,
    })
}

fn read_start(start: &BytesStart<'_>) -> std::result::Result<Frame, String> {
    let mut frame = Frame {
        name: decode(start.name().as_ref())?,
        attributes: Map::new(),
        children: Vec::new(),
    };
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = decode(attribute.key.as_ref())?;
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        frame.attributes.insert(
            format!("{ATTRIBUTE_PREFIX}{key}"),
            Value::String(value.into_owned()),
        );
    }
    Ok(frame)
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| PalosaError::Serialization(format!("Failed to write XML: {e}")))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Value) -> Result<()> {
    let unexpected = || PalosaError::Serialization(format!("Unexpected XML node {node}"));
    let map = node.as_object().ok_or_else(unexpected)?;

    if let Some(content) = map.get(TEXT_KEY) {
        let text = join_text(content);
        if text.is_empty() {
            return Ok(());
        }
        return write(writer, Event::Text(BytesText::new(&text)));
    }

    let name = element_name(map).ok_or_else(unexpected)?;
    let mut start = BytesStart::new(name);
    if let Some(Value::Object(attributes)) = map.get(ATTRIBUTES_KEY) {
        for (key, attr) in attributes {
            let attr_name = key.strip_prefix(ATTRIBUTE_PREFIX).unwrap_or(key);
            start.push_attribute((attr_name, join_text(attr).as_str()));
        }
    }

    let children = map
        .get(name)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if children.is_empty() {
        return write(writer, Event::Empty(start));
    }

    write(writer, Event::Start(start))?;
    for child in children {
        write_node(writer, child)?;
    }
    write(writer, Event::End(BytesEnd::new(name)))
}

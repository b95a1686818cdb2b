//! Response body decoding into a normalized value tree.
//!
//! CJ's REST endpoints answer in XML while the GraphQL endpoints answer in
//! JSON. Both wire formats decode into the same [`serde_json::Value`] shape
//! so callers never branch on content type:
//!
//! - XML attributes become `"@name"` string entries on their element's map.
//! - An element with no attributes and no children decodes to its trimmed
//!   text content as a bare string.
//! - Repeated sibling tags fold into an array in document order; a single
//!   occurrence stays unwrapped ([`as_items`] normalizes that at the call
//!   site).
//! - The document root element is kept as the single top-level key, so
//!   `<a><b>1</b><b>2</b></a>` decodes to `{"a":{"b":["1","2"]}}`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::{truncate_chars, ApiError, RAW_SNIPPET_CHARS};

/// Decode a response body into the normalized tree.
///
/// The XML path is taken when the declared content type mentions `xml`
/// (case-insensitive) or the body opens with an XML declaration; everything
/// else is treated as JSON.
pub fn decode(body: &str, content_type: Option<&str>) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Err(decode_error("empty response body", body, content_type));
    }

    if looks_like_xml(body, content_type) {
        parse_xml(body, content_type)
    } else {
        serde_json::from_str(body)
            .map_err(|error| decode_error(format!("invalid JSON: {error}"), body, content_type))
    }
}

/// Normalize the one-or-many shape XML folding produces: an array yields its
/// elements, null yields nothing, and any other value is a single item.
pub fn as_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn looks_like_xml(body: &str, content_type: Option<&str>) -> bool {
    let declared_xml = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("xml"))
        .unwrap_or(false);
    declared_xml || body.trim_start().starts_with("<?xml")
}

/// One element being built while its subtree is parsed. `map` collects
/// attributes and children; `text` accumulates character data and is only
/// used when the map stays empty.
struct XmlElement {
    name: String,
    map: Map<String, Value>,
    text: String,
}

fn parse_xml(body: &str, content_type: Option<&str>) -> Result<Value, ApiError> {
    let mut reader = Reader::from_str(body);
    // Index 0 is a synthetic element that receives the document root.
    let mut stack = vec![XmlElement {
        name: String::new(),
        map: Map::new(),
        text: String::new(),
    }];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element =
                    open_element(&start).map_err(|msg| decode_error(msg, body, content_type))?;
                stack.push(element);
            }
            Ok(Event::Empty(start)) => {
                let element =
                    open_element(&start).map_err(|msg| decode_error(msg, body, content_type))?;
                let (name, value) = close_element(element);
                if let Some(parent) = stack.last_mut() {
                    attach_child(parent, name, value);
                }
            }
            Ok(Event::End(_)) => {
                // The synthetic root must never be popped by a closing tag.
                let element = match stack.pop() {
                    Some(element) if !stack.is_empty() => element,
                    _ => {
                        return Err(decode_error(
                            "invalid XML: unexpected closing tag",
                            body,
                            content_type,
                        ))
                    }
                };
                let (name, value) = close_element(element);
                if let Some(parent) = stack.last_mut() {
                    attach_child(parent, name, value);
                }
            }
            Ok(Event::Text(text)) => {
                let decoded = text.unescape().map_err(|error| {
                    decode_error(format!("invalid XML: {error}"), body, content_type)
                })?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&decoded);
                }
            }
            Ok(Event::CData(cdata)) => {
                let raw = cdata.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            // Declarations, comments, processing instructions, doctypes.
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(error) => {
                return Err(decode_error(
                    format!("invalid XML: {error}"),
                    body,
                    content_type,
                ))
            }
        }
    }

    if stack.len() != 1 {
        return Err(decode_error(
            "invalid XML: unexpected end of document",
            body,
            content_type,
        ));
    }
    let root = stack.remove(0);
    if root.map.is_empty() {
        return Err(decode_error(
            "invalid XML: no root element",
            body,
            content_type,
        ));
    }
    Ok(Value::Object(root.map))
}

fn open_element(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut map = Map::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.map_err(|error| format!("invalid XML attribute: {error}"))?;
        let key = format!("@{}", String::from_utf8_lossy(attribute.key.as_ref()));
        let value = attribute
            .unescape_value()
            .map_err(|error| format!("invalid XML attribute: {error}"))?;
        map.insert(key, Value::String(value.into_owned()));
    }
    Ok(XmlElement {
        name,
        map,
        text: String::new(),
    })
}

/// Finish an element: with attributes or children it becomes a map (mixed
/// text content is dropped), otherwise its trimmed text.
fn close_element(element: XmlElement) -> (String, Value) {
    let XmlElement { name, map, text } = element;
    if map.is_empty() {
        (name, Value::String(text.trim().to_owned()))
    } else {
        (name, Value::Object(map))
    }
}

/// Attach a finished child to its parent, folding repeated tag names into
/// an array while a single occurrence stays unwrapped.
fn attach_child(parent: &mut XmlElement, name: String, value: Value) {
    match parent.map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.map.insert(name, value);
        }
    }
}

fn decode_error(
    message: impl Into<String>,
    body: &str,
    content_type: Option<&str>,
) -> ApiError {
    ApiError::Decode {
        message: message.into(),
        raw_response: truncate_chars(body, RAW_SNIPPET_CHARS),
        content_type: content_type.map(str::to_owned),
    }
}

//! OPS XML envelope encoding and decoding
//!
//! Requests and responses share one shape: an `OPS_envelope` whose
//! `body/data_block` holds a `dt_assoc` of `<item key="...">` children. Items
//! nest further `dt_assoc` / `dt_array` blocks or carry scalar text.

use std::collections::BTreeMap;
use std::fmt::Write;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::http_client::CallKind;

const XML_HEADER: &str = "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\n\
<!DOCTYPE OPS_envelope SYSTEM 'ops.dtd'>\n";
const OPS_VERSION: &str = "0.9";
const OPS_PROTOCOL: &str = "XCP";

/// A value inside an OPS data block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OpsValue {
    Scalar(String),
    Assoc(BTreeMap<String, OpsValue>),
    Array(Vec<OpsValue>),
}

impl OpsValue {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_assoc(&self) -> Option<&BTreeMap<String, OpsValue>> {
        match self {
            Self::Assoc(map) => Some(map),
            _ => None,
        }
    }

    fn write_xml(&self, out: &mut String) {
        match self {
            Self::Scalar(s) => out.push_str(&escape(s.as_str())),
            Self::Assoc(map) => {
                out.push_str("<dt_assoc>");
                for (key, value) in map {
                    write_item(out, key, value);
                }
                out.push_str("</dt_assoc>");
            }
            Self::Array(items) => {
                out.push_str("<dt_array>");
                for (index, value) in items.iter().enumerate() {
                    write_item(out, &index.to_string(), value);
                }
                out.push_str("</dt_array>");
            }
        }
    }
}

fn write_item(out: &mut String, key: &str, value: &OpsValue) {
    let _ = write!(out, "<item key=\"{}\">", escape(key));
    value.write_xml(out);
    out.push_str("</item>");
}

/// One API call: `action` on `object` with `attributes`.
#[derive(Debug, Clone)]
pub(crate) struct OpsRequest {
    pub action: &'static str,
    pub object: &'static str,
    pub attributes: BTreeMap<String, OpsValue>,
}

impl OpsRequest {
    pub fn new(action: &'static str, object: &'static str) -> Self {
        Self {
            action,
            object,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes
            .insert(key.to_string(), OpsValue::scalar(value));
        self
    }

    /// Lookups and `GET_*` actions only read; registrations, renewals and
    /// transfers must not be resent.
    pub fn kind(&self) -> CallKind {
        if matches!(self.action, "LOOKUP" | "NAME_SUGGEST") || self.action.starts_with("GET_") {
            CallKind::Query
        } else {
            CallKind::Command
        }
    }

    /// Render the complete envelope. The signature covers these exact bytes.
    pub fn to_xml(&self) -> String {
        let mut block = BTreeMap::new();
        block.insert("protocol".to_string(), OpsValue::scalar(OPS_PROTOCOL));
        block.insert("action".to_string(), OpsValue::scalar(self.action));
        block.insert("object".to_string(), OpsValue::scalar(self.object));
        block.insert(
            "attributes".to_string(),
            OpsValue::Assoc(self.attributes.clone()),
        );

        let mut out = String::from(XML_HEADER);
        let _ = write!(
            out,
            "<OPS_envelope><header><version>{OPS_VERSION}</version></header><body><data_block>"
        );
        OpsValue::Assoc(block).write_xml(&mut out);
        out.push_str("</data_block></body></OPS_envelope>");
        out
    }
}

/// Decoded response header fields plus the `attributes` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpsResponse {
    pub is_success: bool,
    pub response_code: Option<String>,
    pub response_text: String,
    pub attributes: BTreeMap<String, OpsValue>,
}

impl OpsResponse {
    /// Scalar attribute by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(OpsValue::as_str)
    }
}

/// Parse a response envelope.
pub(crate) fn parse_response(xml: &str) -> Result<OpsResponse, String> {
    let block = parse_data_block(xml)?;
    let Some(map) = block.as_assoc() else {
        return Err("data_block does not contain a dt_assoc".to_string());
    };

    let scalar = |key: &str| map.get(key).and_then(OpsValue::as_str).map(str::to_string);

    let is_success = match scalar("is_success").as_deref() {
        Some("1") => true,
        Some("0") => false,
        other => return Err(format!("unexpected is_success value: {other:?}")),
    };

    let attributes = map
        .get("attributes")
        .and_then(OpsValue::as_assoc)
        .cloned()
        .unwrap_or_default();

    Ok(OpsResponse {
        is_success,
        response_code: scalar("response_code"),
        response_text: scalar("response_text").unwrap_or_default(),
        attributes,
    })
}

/// Locate `data_block` and decode the value it holds.
fn parse_data_block(xml: &str) -> Result<OpsValue, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"data_block" => {
                return parse_item_body(&mut reader, b"data_block");
            }
            Ok(Event::Eof) => return Err("response has no data_block".to_string()),
            Err(e) => return Err(format!("malformed XML: {e}")),
            Ok(_) => {}
        }
    }
}

/// Read the content of an element up to its closing tag `end`.
///
/// A nested `dt_assoc` / `dt_array` becomes a container; anything else is scalar text.
fn parse_item_body(reader: &mut Reader<&[u8]>, end: &[u8]) -> Result<OpsValue, String> {
    let mut text = String::new();
    let mut container = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"dt_assoc" => container = Some(parse_assoc(reader)?),
                b"dt_array" => container = Some(parse_array(reader)?),
                b"dt_scalar" => {
                    if let OpsValue::Scalar(s) = parse_item_body(reader, b"dt_scalar")? {
                        text.push_str(&s);
                    }
                }
                other => {
                    return Err(format!(
                        "unexpected element <{}>",
                        String::from_utf8_lossy(other)
                    ));
                }
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"dt_assoc" => container = Some(OpsValue::Assoc(BTreeMap::new())),
                b"dt_array" => container = Some(OpsValue::Array(Vec::new())),
                _ => {}
            },
            Ok(Event::Text(t)) => {
                let unescaped = t.unescape().map_err(|e| format!("bad text: {e}"))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(c)) => text.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::End(e)) if e.name().as_ref() == end => {
                return Ok(container.unwrap_or(OpsValue::Scalar(text)));
            }
            Ok(Event::Eof) => {
                return Err(format!(
                    "unexpected end of document inside <{}>",
                    String::from_utf8_lossy(end)
                ));
            }
            Err(e) => return Err(format!("malformed XML: {e}")),
            Ok(_) => {}
        }
    }
}

fn item_key(e: &BytesStart<'_>) -> Result<String, String> {
    let attr = e
        .try_get_attribute("key")
        .map_err(|err| format!("bad item attribute: {err}"))?
        .ok_or_else(|| "item without key".to_string())?;
    attr.unescape_value()
        .map(|v| v.into_owned())
        .map_err(|err| format!("bad item key: {err}"))
}

fn parse_assoc(reader: &mut Reader<&[u8]>) -> Result<OpsValue, String> {
    let mut map = BTreeMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"item" => {
                let key = item_key(&e)?;
                let value = parse_item_body(reader, b"item")?;
                map.insert(key, value);
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"item" => {
                map.insert(item_key(&e)?, OpsValue::Scalar(String::new()));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"dt_assoc" => {
                return Ok(OpsValue::Assoc(map));
            }
            Ok(Event::Eof) => return Err("unterminated dt_assoc".to_string()),
            Err(e) => return Err(format!("malformed XML: {e}")),
            Ok(_) => {}
        }
    }
}

fn parse_array(reader: &mut Reader<&[u8]>) -> Result<OpsValue, String> {
    let mut items = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"item" => {
                items.push(parse_item_body(reader, b"item")?);
            }
            Ok(Event::Empty(e)) if e.name().as_ref() == b"item" => {
                items.push(OpsValue::Scalar(String::new()));
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"dt_array" => {
                return Ok(OpsValue::Array(items));
            }
            Ok(Event::Eof) => return Err("unterminated dt_array".to_string()),
            Err(e) => return Err(format!("malformed XML: {e}")),
            Ok(_) => {}
        }
    }
}

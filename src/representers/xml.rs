//! Generic XML documents.
//!
//! Any model is written into a fixed vocabulary:
//!
//! ```text
//! <document xmlns="urn:x-rest-dispatch:generic-xml">
//!   <map>
//!     <item key="name">
//!       <string>widget</string>
//!     </item>
//!   </map>
//! </document>
//! ```
//!
//! Lists use `<list>` with `<item index="n">`; class-tagged objects use
//! `<object classname="...">` with `<property name="...">`. Control
//! characters XML 1.0 cannot carry are replaced with U+FFFD.

use std::borrow::Cow;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::http::Response;
use crate::negotiation::representer::media;
use crate::negotiation::{Model, Representer, RepresenterDescriptor, Token, Variant};

/// Namespace of the generic document vocabulary.
pub const GENERIC_XML_NS: &str = "urn:x-rest-dispatch:generic-xml";

/// Represents any model as a generic XML document.
#[derive(Debug, Clone)]
pub struct XmlRepresenter {
    descriptor: RepresenterDescriptor,
}

impl XmlRepresenter {
    pub fn new() -> Self {
        Self {
            descriptor: RepresenterDescriptor::new()
                .media_type(media("application/xml", 1000).advertised())
                .media_type(media("text/xml", 900))
                .media_type(media("*/*", 1).with_alias(Token::media_type("application", "xml")))
                .charset(super::utf8())
                .any_language()
                .all_models(),
        }
    }
}

impl Default for XmlRepresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Representer for XmlRepresenter {
    fn name(&self) -> &str {
        "xml"
    }

    fn descriptor(&self) -> &RepresenterDescriptor {
        &self.descriptor
    }

    fn render(
        &self,
        model: &Model,
        variant: &Variant,
        response: &mut Response,
    ) -> Result<(), RenderError> {
        let document = to_document(model)?;
        variant.apply_headers(response);
        response.set_body(document).append("\n");
        Ok(())
    }
}

/// Encode `model` as a complete generic XML document.
pub fn to_document(model: &Model) -> Result<Vec<u8>, RenderError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    emit(
        &mut writer,
        Event::Start(BytesStart::new("document").with_attributes([("xmlns", GENERIC_XML_NS)])),
    )?;
    match model.class() {
        Some(class) => encode_object(&mut writer, class, model.value())?,
        None => encode(&mut writer, model.value())?,
    }
    emit(&mut writer, Event::End(BytesEnd::new("document")))?;

    Ok(writer.into_inner())
}

type XmlWriter = Writer<Vec<u8>>;

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Xml(e.to_string()))
}

fn scalar(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<(), RenderError> {
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(&sanitize(text))))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn encode(writer: &mut XmlWriter, value: &Value) -> Result<(), RenderError> {
    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new("null"))),
        Value::Bool(b) => scalar(writer, "boolean", if *b { "true" } else { "false" }),
        Value::Number(n) => {
            let tag = if n.is_f64() { "double" } else { "integer" };
            scalar(writer, tag, &n.to_string())
        }
        Value::String(s) => scalar(writer, "string", s),
        Value::Array(items) => {
            emit(writer, Event::Start(BytesStart::new("list")))?;
            for (i, item) in items.iter().enumerate() {
                let index = i.to_string();
                emit(
                    writer,
                    Event::Start(BytesStart::new("item").with_attributes([("index", index.as_str())])),
                )?;
                encode(writer, item)?;
                emit(writer, Event::End(BytesEnd::new("item")))?;
            }
            emit(writer, Event::End(BytesEnd::new("list")))
        }
        Value::Object(map) => {
            emit(writer, Event::Start(BytesStart::new("map")))?;
            encode_entries(writer, map, "item", "key")?;
            emit(writer, Event::End(BytesEnd::new("map")))
        }
    }
}

fn encode_object(writer: &mut XmlWriter, class: &str, value: &Value) -> Result<(), RenderError> {
    let Value::Object(map) = value else {
        // a tagged scalar or list carries no properties of its own
        return encode(writer, value);
    };
    let class = sanitize(class);
    emit(
        writer,
        Event::Start(BytesStart::new("object").with_attributes([("classname", class.as_ref())])),
    )?;
    encode_entries(writer, map, "property", "name")?;
    emit(writer, Event::End(BytesEnd::new("object")))
}

fn encode_entries(
    writer: &mut XmlWriter,
    map: &Map<String, Value>,
    element: &str,
    attr: &str,
) -> Result<(), RenderError> {
    for (key, item) in map {
        let key = sanitize(key);
        emit(
            writer,
            Event::Start(BytesStart::new(element).with_attributes([(attr, key.as_ref())])),
        )?;
        encode(writer, item)?;
        emit(writer, Event::End(BytesEnd::new(element)))?;
    }
    Ok(())
}

/// Replace characters XML 1.0 forbids (C0 controls other than tab, LF, CR).
fn sanitize(text: &str) -> Cow<'_, str> {
    let forbidden = |c: char| c < '\u{20}' && !matches!(c, '\t' | '\n' | '\r');
    if text.chars().any(forbidden) {
        Cow::Owned(
            text.chars()
                .map(|c| if forbidden(c) { '\u{FFFD}' } else { c })
                .collect(),
        )
    } else {
        Cow::Borrowed(text)
    }
}

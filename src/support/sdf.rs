//! A small element tree for building SDF model documents.
//!
//! Documents are assembled as [`Element`] trees and serialized once with
//! [`to_document_string`], so markup is always balanced and escaped.
//!
//! ```
//! use cart_pendulum_models::support::sdf::{Element, Pose, to_document_string};
//!
//! let link = Element::new("link")
//!     .with_attribute("name", "cart")
//!     .with_child(Element::text("pose", Pose::zero()));
//!
//! let xml = to_document_string(&link).unwrap();
//! assert!(xml.contains(r#"<link name="cart">"#));
//! assert!(xml.contains("<pose>0 0 0 0 0 0</pose>"));
//! ```

use std::{fmt, io::Write, string::FromUtf8Error};

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use thiserror::Error;

/// Errors that can occur while serializing an element tree.
#[derive(Debug, Error)]
pub enum SdfError {
    #[error("failed to write <{element}>: {message}")]
    Write { element: String, message: String },
    #[error("serialized XML is not valid UTF-8")]
    Utf8(#[from] FromUtf8Error),
}

/// A pose as translation `x y z` followed by roll, pitch, yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub xyz: [f64; 3],
    pub rpy: [f64; 3],
}

impl Pose {
    /// The identity pose.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            xyz: [0.0; 3],
            rpy: [0.0; 3],
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            xyz: [x, y, z],
            rpy: [0.0; 3],
        }
    }

    /// Returns this pose with the given roll, pitch, and yaw.
    #[must_use]
    pub const fn with_rpy(mut self, roll: f64, pitch: f64, yaw: f64) -> Self {
        self.rpy = [roll, pitch, yaw];
        self
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.xyz;
        let [roll, pitch, yaw] = self.rpy;
        write!(f, "{x} {y} {z} {roll} {pitch} {yaw}")
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Empty,
    Text(String),
    Children(Vec<Element>),
}

/// A markup element with attributes and either text or child elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    content: Content,
}

impl Element {
    /// Creates an element with no attributes or content.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Empty,
        }
    }

    /// Creates a leaf element holding the display form of `value`.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content: Content::Text(value.to_string()),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl fmt::Display) -> Self {
        self.attributes.push((key.into(), value.to_string()));
        self
    }

    /// Appends a child element, replacing any text content.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        for child in children {
            self.push_child(child);
        }
        self
    }

    pub fn push_child(&mut self, child: Element) {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            content => *content = Content::Children(vec![child]),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the named attribute, if present.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the text content of a leaf element.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[Element] {
        match &self.content {
            Content::Children(children) => children.as_slice(),
            _ => &[],
        }
    }

    /// Returns the first direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children().iter().find(|c| c.name == name)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), SdfError> {
        let name = self.name.as_str();
        let mut start = BytesStart::new(name);
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        match &self.content {
            Content::Empty => emit(writer, name, Event::Empty(start)),
            Content::Text(text) => {
                emit(writer, name, Event::Start(start))?;
                emit(writer, name, Event::Text(BytesText::new(text)))?;
                emit(writer, name, Event::End(BytesEnd::new(name)))
            }
            Content::Children(children) => {
                emit(writer, name, Event::Start(start))?;
                for child in children {
                    child.write_to(writer)?;
                }
                emit(writer, name, Event::End(BytesEnd::new(name)))
            }
        }
    }
}

fn emit<W: Write>(writer: &mut Writer<W>, element: &str, event: Event<'_>) -> Result<(), SdfError> {
    writer.write_event(event).map_err(|e| SdfError::Write {
        element: element.to_owned(),
        message: e.to_string(),
    })
}

/// Serializes `root` as an indented XML document with a declaration.
///
/// # Errors
///
/// Returns an [`SdfError`] if writing fails or the output is not UTF-8.
pub fn to_document_string(root: &Element) -> Result<String, SdfError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        "?xml",
        Event::Decl(BytesDecl::new("1.0", None, None)),
    )?;
    root.write_to(&mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

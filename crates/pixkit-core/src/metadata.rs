//! Image and frame metadata carried through processing.
//!
//! Processors never read these values. They exist so that the codec layer
//! can attach properties (author, copyright, resolution, animation timing)
//! to an [`Image`](crate::Image) and get them back untouched after any
//! pipeline has run.
//!
//! Format-specific mapping is a closed set of codecs selected by
//! [`MetadataFormat`], not a hook on every property:
//!
//! ```rust
//! use pixkit_core::{AttrValue, ImageMetadata, MetadataFormat, PropertyTag};
//!
//! let mut meta = ImageMetadata::default();
//! meta.add(PropertyTag::ARTIST, "Jane Roe");
//! meta.add(PropertyTag::new("Comment", true), "first");
//!
//! // EXIF only knows a fixed tag set
//! let exif = MetadataFormat::Exif.encode(&meta);
//! assert_eq!(exif, vec![("Artist".to_string(), AttrValue::from("Jane Roe"))]);
//!
//! // PNG text chunks carry every string property
//! assert_eq!(MetadataFormat::PngText.encode(&meta).len(), 2);
//! ```

use std::borrow::Cow;

/// Attribute value stored in a property.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Integer value
    Int(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
    /// Raw bytes (opaque profiles, unknown chunks)
    Bytes(Vec<u8>),
}

impl AttrValue {
    /// Returns this value as an integer, if applicable.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Returns this value as a float, if applicable.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns this value as a string, if applicable.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<u8>> for AttrValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

/// Identity of a property and whether an image may hold several copies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyTag {
    /// Property name
    pub name: Cow<'static, str>,
    /// Whether multiple values may coexist
    pub allow_multiple: bool,
}

impl PropertyTag {
    /// Author of the image.
    pub const ARTIST: Self = Self::known("Artist");
    /// Copyright notice.
    pub const COPYRIGHT: Self = Self::known("Copyright");
    /// Free-form title or description.
    pub const DESCRIPTION: Self = Self::known("ImageDescription");
    /// Software that produced the image.
    pub const SOFTWARE: Self = Self::known("Software");
    /// Creation timestamp.
    pub const DATE_TIME: Self = Self::known("DateTime");

    const fn known(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            allow_multiple: false,
        }
    }

    /// Creates a custom tag.
    pub fn new(name: impl Into<String>, allow_multiple: bool) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            allow_multiple,
        }
    }
}

/// A tagged value attached to an image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageProperty {
    /// Tag identifying the property
    pub tag: PropertyTag,
    /// Property value
    pub value: AttrValue,
}

/// How an animation frame is disposed of before the next one is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposalMethod {
    /// No disposal specified
    #[default]
    Unspecified,
    /// Leave the frame in place
    DoNotDispose,
    /// Restore the area to the background colour
    RestoreToBackground,
    /// Restore the area to the previous frame
    RestoreToPrevious,
}

/// Per-frame metadata (animation timing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameMetadata {
    /// Delay before the next frame, in hundredths of a second
    pub delay: u32,
    /// Disposal method
    pub disposal: DisposalMethod,
}

/// Image-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageMetadata {
    /// Tagged properties in insertion order
    pub properties: Vec<ImageProperty>,
    /// Horizontal resolution in pixels per inch
    pub horizontal_resolution: Option<f64>,
    /// Vertical resolution in pixels per inch
    pub vertical_resolution: Option<f64>,
    /// Animation loop count (0 = forever)
    pub repeat_count: u16,
}

impl ImageMetadata {
    /// Adds a property. Tags that don't allow multiples replace their previous value.
    pub fn add(&mut self, tag: PropertyTag, value: impl Into<AttrValue>) {
        let value = value.into();
        if !tag.allow_multiple {
            if let Some(existing) = self.properties.iter_mut().find(|p| p.tag.name == tag.name) {
                existing.value = value;
                return;
            }
        }
        self.properties.push(ImageProperty { tag, value });
    }

    /// Returns the first property with the given name.
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.properties
            .iter()
            .find(|p| p.tag.name == name)
            .map(|p| &p.value)
    }

    /// Returns all values stored under `name`.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AttrValue> + 'a {
        self.properties
            .iter()
            .filter(move |p| p.tag.name == name)
            .map(|p| &p.value)
    }
}

/// Metadata encoding of a target container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataFormat {
    /// EXIF IFD entries
    Exif,
    /// PNG `tEXt` keyword/value chunks
    PngText,
}

const EXIF_TAGS: [PropertyTag; 5] = [
    PropertyTag::ARTIST,
    PropertyTag::COPYRIGHT,
    PropertyTag::DESCRIPTION,
    PropertyTag::SOFTWARE,
    PropertyTag::DATE_TIME,
];

impl MetadataFormat {
    /// Returns `true` if this format can represent the property.
    pub fn supports(&self, property: &ImageProperty) -> bool {
        match self {
            Self::Exif => EXIF_TAGS.iter().any(|t| t.name == property.tag.name),
            Self::PngText => matches!(property.value, AttrValue::String(_)),
        }
    }

    /// Lists the entries this format would persist, in property order.
    pub fn encode(&self, metadata: &ImageMetadata) -> Vec<(String, AttrValue)> {
        metadata
            .properties
            .iter()
            .filter(|p| self.supports(p))
            .map(|p| (p.tag.name.to_string(), p.value.clone()))
            .collect()
    }

    /// Turns entries read by a codec back into properties.
    ///
    /// EXIF entries outside the known tag set are dropped. PNG keywords may
    /// repeat, so they decode to multi-valued tags.
    pub fn decode<I>(&self, entries: I) -> Vec<ImageProperty>
    where
        I: IntoIterator<Item = (String, AttrValue)>,
    {
        entries
            .into_iter()
            .filter_map(|(name, value)| {
                let tag = match self {
                    Self::Exif => EXIF_TAGS.iter().find(|t| t.name == name.as_str())?.clone(),
                    Self::PngText => PropertyTag::new(name, true),
                };
                let property = ImageProperty { tag, value };
                self.supports(&property).then_some(property)
            })
            .collect()
    }
}

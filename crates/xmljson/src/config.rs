//! Configuration consumed by both codec directions.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::String;

use crate::value::Value;

/// A converter applied to the text of elements carrying a matching
/// `xsi:type` attribute. Receives the raw text and produces the value the
/// projection stores in place of the coerced text.
pub type XsiTypeConverter = fn(&str) -> Value;

/// Converters keyed by `xsi:type` attribute value, sealed at construction.
///
/// Build one from a caller-owned map or collect it from pairs; both copy
/// the entries, so later changes to the source never reach the
/// configuration. The exposed views are read-only: entries cannot be added
/// or removed once the map is built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct XsiTypeMap(BTreeMap<String, XsiTypeConverter>);

impl XsiTypeMap {
    /// Looks up the converter registered for an `xsi:type` value.
    #[must_use]
    pub fn get(&self, xsi_type: &str) -> Option<XsiTypeConverter> {
        self.0.get(xsi_type).copied()
    }

    /// Returns `true` when no converter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the registered `xsi:type` values and their converters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, XsiTypeConverter)> {
        self.0.iter().map(|(name, &convert)| (name.as_str(), convert))
    }
}

impl From<&BTreeMap<String, XsiTypeConverter>> for XsiTypeMap {
    fn from(map: &BTreeMap<String, XsiTypeConverter>) -> Self {
        Self(map.clone())
    }
}

impl FromIterator<(String, XsiTypeConverter)> for XsiTypeMap {
    fn from_iter<I: IntoIterator<Item = (String, XsiTypeConverter)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Options for [`parse`] and [`serialize`].
///
/// Construct the record with struct-update syntax over [`Default`], then
/// share it by reference. The converter map is a sealed [`XsiTypeMap`]: it
/// deep-copies its source when built and exposes no way to add or remove
/// entries. Cloning the record yields an independent deep copy (the maps
/// own their contents).
///
/// # Examples
///
/// ```
/// use xmljson::XmlConfig;
///
/// let config = XmlConfig {
///     keep_strings: true,
///     ..XmlConfig::default()
/// };
/// assert_eq!(config.cdata_tag_name, "content");
/// ```
///
/// [`parse`]: crate::parse
/// [`serialize`]: crate::serialize
#[derive(Clone, Debug, PartialEq)]
pub struct XmlConfig {
    /// Disables primitive coercion: all leaf text and attribute values stay
    /// strings instead of being interpreted as integers, doubles, booleans
    /// or null.
    ///
    /// # Default
    ///
    /// `false`
    pub keep_strings: bool,

    /// The synthetic key under which mixed text and CDATA accumulate, and
    /// which the serializer emits as raw text rather than a wrapped element.
    ///
    /// # Default
    ///
    /// `"content"`
    pub cdata_tag_name: String,

    /// When `true`, an element carrying `xsi:nil="true"` projects to JSON
    /// `null` and the attribute is dropped. When `false`, `xsi:nil` is an
    /// ordinary attribute.
    ///
    /// # Default
    ///
    /// `false`
    pub convert_nil_to_null: bool,

    /// Converters keyed by `xsi:type` attribute value. An element whose
    /// `xsi:type` names a registered converter has its text run through the
    /// converter instead of the primitive coercer, and the attribute is
    /// dropped. Unrecognized values stay ordinary attributes. Built from a
    /// caller-owned map via [`XsiTypeMap::from`] or collected from pairs;
    /// the entries are fixed once the map is built.
    ///
    /// # Default
    ///
    /// empty
    pub xsi_type_map: XsiTypeMap,

    /// Element names that always project as arrays, even when they occur
    /// once.
    ///
    /// # Default
    ///
    /// empty
    pub force_list: BTreeSet<String>,

    /// Upper bound on simultaneously open element frames during projection;
    /// exceeding it is a hard parse failure. `None` means unbounded.
    ///
    /// # Default
    ///
    /// `Some(512)`
    pub max_nesting_depth: Option<usize>,

    /// When serializing, emit `<t></t>` instead of `<t/>` for empty string
    /// values.
    ///
    /// # Default
    ///
    /// `false`
    pub close_empty_tag: bool,

    /// Spaces per nesting level added during serialization; `0` emits a
    /// single line with no trailing newline.
    ///
    /// # Default
    ///
    /// `0`
    pub indent_factor: usize,
}

impl XmlConfig {
    /// The default bound on open element frames.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 512;
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            keep_strings: false,
            cdata_tag_name: String::from("content"),
            convert_nil_to_null: false,
            xsi_type_map: XsiTypeMap::default(),
            force_list: BTreeSet::new(),
            max_nesting_depth: Some(Self::DEFAULT_MAX_NESTING_DEPTH),
            close_empty_tag: false,
            indent_factor: 0,
        }
    }
}

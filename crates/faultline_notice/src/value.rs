//! Schema-free document value model.
//!
//! Crash notices arrive with wide structural variance: repeated tags,
//! single vs. multi-child elements, attribute-only elements, and `var`-list
//! encodings. [`Value`] is the tagged intermediate representation produced
//! by converting one document node without a schema; section-specific
//! typing is applied afterwards by the parser.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// A schema-free value converted from one document node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Plain text content.
    Scalar(String),
    /// Ordered sequence, produced when sibling tags repeat.
    List(Vec<Value>),
    /// Mapping of normalized key to value.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Converts a document node into a [`Value`].
    ///
    /// Disambiguation rules, applied in order:
    /// 1. A node whose only content is text becomes a `Scalar`.
    /// 2. A node with no children becomes an `Object` of its attributes.
    /// 3. A node whose element children are all `var` tags becomes an
    ///    `Object` keyed by each child's `key` attribute.
    /// 4. Any other node becomes an `Object` of recursively converted
    ///    children; a repeated key coerces the prior value into a `List`
    ///    and appends.
    ///
    /// Keys are normalized (`-` replaced by `_`); keys that normalize to
    /// blank are dropped. An empty node converts to an empty `Object`.
    #[must_use]
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let elements: Vec<roxmltree::Node<'_, '_>> =
            node.children().filter(roxmltree::Node::is_element).collect();

        if elements.is_empty() {
            let text = direct_text(node);
            if !text.trim().is_empty() {
                return Self::Scalar(text);
            }
            return Self::from_attributes(node);
        }

        if elements.iter().all(|e| e.has_tag_name("var")) {
            return Self::from_var_elements(&elements);
        }

        let mut object = BTreeMap::new();
        for element in elements {
            let key = normalize_key(element.tag_name().name());
            if key.trim().is_empty() {
                continue;
            }
            let value = Self::from_node(element);
            match object.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(mut slot) => match slot.get_mut() {
                    Self::List(items) => items.push(value),
                    existing => {
                        let first = std::mem::replace(existing, Self::List(Vec::new()));
                        *existing = Self::List(vec![first, value]);
                    }
                },
            }
        }
        Self::Object(object)
    }

    /// Builds an `Object` from a node's attributes.
    fn from_attributes(node: roxmltree::Node<'_, '_>) -> Self {
        let mut object = BTreeMap::new();
        for attr in node.attributes() {
            let key = normalize_key(attr.name());
            if key.trim().is_empty() {
                continue;
            }
            object.insert(key, Self::Scalar(attr.value().to_string()));
        }
        Self::Object(object)
    }

    /// Builds an `Object` from a run of `var` elements, keyed by each
    /// element's `key` attribute.
    fn from_var_elements(elements: &[roxmltree::Node<'_, '_>]) -> Self {
        let mut object = BTreeMap::new();
        for element in elements {
            let key = normalize_key(element.attribute("key").unwrap_or(""));
            if key.trim().is_empty() {
                continue;
            }
            object.insert(key, Self::Scalar(inner_text(*element)));
        }
        Self::Object(object)
    }

    /// Returns `true` when the value carries no content.
    ///
    /// Empty string, empty list and empty object are uniformly "absent";
    /// downstream required-field checks rely on this.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Scalar(s) => s.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Object(object) => object.is_empty(),
        }
    }

    /// Returns the scalar text, if this value is a `Scalar`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the underlying mapping, if this value is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Consumes the value, returning the mapping if it is an `Object`.
    #[must_use]
    pub fn into_object(self) -> Option<BTreeMap<String, Value>> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Looks up a key, if this value is an `Object`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|object| object.get(key))
    }
}

/// Normalizes a tag or attribute name into an object key.
pub(crate) fn normalize_key(raw: &str) -> String {
    raw.replace('-', "_")
}

/// Concatenated text of a node's direct text children.
fn direct_text(node: roxmltree::Node<'_, '_>) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}

/// Concatenated text of all text descendants, in document order.
fn inner_text(node: roxmltree::Node<'_, '_>) -> String {
    node.descendants()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect()
}

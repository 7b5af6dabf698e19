//! Typed shapes for the small slice of the Notion API this service uses.
//!
//! Filters, property values and blocks are modelled as enums and rendered to
//! Notion's JSON on serialization, so callers never hand-assemble JSON and
//! test doubles can inspect exactly what would be sent.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};

/// Identifier of a Notion page (a database row).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub String);

impl PageId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A database query filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    UrlEquals {
        property: &'static str,
        value: String,
    },
    TitleEquals {
        property: &'static str,
        value: String,
    },
    /// Case-insensitive substring match on a title property.
    TitleContains {
        property: &'static str,
        value: String,
    },
    RelationContains {
        property: &'static str,
        id: PageId,
    },
    MultiSelectContains {
        property: &'static str,
        value: String,
    },
    MultiSelectIsEmpty {
        property: &'static str,
    },
    And(Vec<Filter>),
}

impl Filter {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Filter::UrlEquals { property, value } => {
                json!({ "property": property, "url": { "equals": value } })
            }
            Filter::TitleEquals { property, value } => {
                json!({ "property": property, "title": { "equals": value } })
            }
            Filter::TitleContains { property, value } => {
                json!({ "property": property, "title": { "contains": value } })
            }
            Filter::RelationContains { property, id } => {
                json!({ "property": property, "relation": { "contains": id } })
            }
            Filter::MultiSelectContains { property, value } => {
                json!({ "property": property, "multi_select": { "contains": value } })
            }
            Filter::MultiSelectIsEmpty { property } => {
                json!({ "property": property, "multi_select": { "is_empty": true } })
            }
            Filter::And(filters) => {
                json!({ "and": filters.iter().map(Filter::to_json).collect::<Vec<_>>() })
            }
        }
    }
}

impl Serialize for Filter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// A page property value, as written on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Title(String),
    RichText(Option<String>),
    Url(Option<String>),
    Email(Option<String>),
    Date(Option<NaiveDate>),
    Select(Option<String>),
    MultiSelect(Vec<String>),
    Relation(Vec<PageId>),
}

impl PropertyValue {
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            PropertyValue::Title(text) => json!({ "title": [{ "text": { "content": text } }] }),
            PropertyValue::RichText(text) => match text {
                Some(text) => json!({ "rich_text": [{ "text": { "content": text } }] }),
                None => json!({ "rich_text": [] }),
            },
            PropertyValue::Url(url) => json!({ "url": url }),
            PropertyValue::Email(email) => json!({ "email": email }),
            PropertyValue::Date(date) => match date {
                Some(date) => json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } }),
                None => json!({ "date": null }),
            },
            PropertyValue::Select(name) => match name {
                Some(name) => json!({ "select": { "name": name } }),
                None => json!({ "select": null }),
            },
            PropertyValue::MultiSelect(names) => json!({
                "multi_select": names.iter().map(|n| json!({ "name": n })).collect::<Vec<_>>()
            }),
            PropertyValue::Relation(ids) => json!({
                "relation": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>()
            }),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Named property values for a page create or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<&'static str, PropertyValue>);

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: PropertyValue) -> Self {
        self.0.insert(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A unit of page body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    BulletedListItem(String),
    Heading1(String),
    Heading2(String),
    TableOfContents,
}

impl Block {
    /// Notion block type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::BulletedListItem(_) => "bulleted_list_item",
            Block::Heading1(_) => "heading_1",
            Block::Heading2(_) => "heading_2",
            Block::TableOfContents => "table_of_contents",
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph(t)
            | Block::BulletedListItem(t)
            | Block::Heading1(t)
            | Block::Heading2(t) => Some(t.as_str()),
            Block::TableOfContents => None,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        let kind = self.type_name();
        let body = match self.text() {
            Some(text) => json!({ "rich_text": [{ "type": "text", "text": { "content": text } }] }),
            None => json!({}),
        };
        let mut object = serde_json::Map::new();
        object.insert("object".to_string(), json!("block"));
        object.insert("type".to_string(), json!(kind));
        object.insert(kind.to_string(), body);
        Value::Object(object)
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Minimal page object as returned by query and create.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PageObject {
    pub id: PageId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    pub results: Vec<PageObject>,
}

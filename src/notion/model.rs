//! Wire shapes of the Notion REST API, limited to what the bestiary reads.
//!
//! Typed enums fall back to an `Unsupported` variant for kinds we don't know
//! and for payloads that don't match the expected shape, so a schema change
//! upstream never fails a whole page.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
}

/// Concatenate the plain text of every fragment.
pub fn plain_text(fragments: &[RichText]) -> String {
    fragments.iter().map(|t| t.plain_text.as_str()).collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectOption {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Formula {
    Number { number: Option<f64> },
    String { string: Option<String> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rollup {
    Number { number: Option<f64> },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Property {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    Number {
        number: Option<f64>,
    },
    Select {
        select: Option<SelectOption>,
    },
    MultiSelect {
        #[serde(default)]
        multi_select: Vec<SelectOption>,
    },
    Checkbox {
        #[serde(default)]
        checkbox: bool,
    },
    Formula {
        formula: Formula,
    },
    Rollup {
        rollup: Rollup,
    },
    #[serde(other)]
    Unsupported,
}

impl Property {
    pub fn from_value(name: &str, value: Value) -> Property {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("Skipping malformed property {:?}: {}", name, e);
            Property::Unsupported
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Property::Title { .. } => "title",
            Property::RichText { .. } => "rich_text",
            Property::Number { .. } => "number",
            Property::Select { .. } => "select",
            Property::MultiSelect { .. } => "multi_select",
            Property::Checkbox { .. } => "checkbox",
            Property::Formula { .. } => "formula",
            Property::Rollup { .. } => "rollup",
            Property::Unsupported => "unsupported",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub rich_text: Vec<RichText>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextBody },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextBody },
    #[serde(rename = "paragraph")]
    Paragraph { paragraph: TextBody },
    #[serde(other)]
    Unsupported,
}

impl Block {
    pub fn from_value(value: Value) -> Block {
        serde_json::from_value(value).unwrap_or_else(|e| {
            debug!("Skipping malformed block: {}", e);
            Block::Unsupported
        })
    }
}

#[cfg(test)]
impl Block {
    pub fn heading_1(text: &str) -> Block {
        Block::Heading1 { heading_1: TextBody::from(text) }
    }

    pub fn heading_2(text: &str) -> Block {
        Block::Heading2 { heading_2: TextBody::from(text) }
    }

    pub fn paragraph(text: &str) -> Block {
        Block::Paragraph { paragraph: TextBody::from(text) }
    }
}

#[cfg(test)]
impl From<&str> for TextBody {
    fn from(text: &str) -> Self {
        TextBody {
            rich_text: vec![RichText { plain_text: text.to_string() }],
        }
    }
}

/// `GET /pages/{id}`. Property order follows the response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl Page {
    pub fn properties(&self) -> Vec<(String, Property)> {
        self.properties
            .iter()
            .map(|(name, value)| (name.clone(), Property::from_value(name, value.clone())))
            .collect()
    }

    /// First fragment of the title property, if there is one.
    pub fn title(&self) -> Option<String> {
        self.properties().into_iter().find_map(|(_, prop)| match prop {
            Property::Title { title } => title.into_iter().next().map(|t| t.plain_text),
            _ => None,
        })
    }
}

/// One page of `GET /blocks/{id}/children`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Value>,
    #[serde(default)]
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// Response of `POST /databases/{id}/query`.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResults {
    #[serde(default)]
    pub results: Vec<Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
}

use tracing::debug;

use super::aliases::property_field;
use super::statblock::{StatBlock, Value};
use crate::notion::model::{plain_text, Formula, Property, Rollup};

/// Flatten a typed page property into a single scalar.
pub fn coerce(property: &Property) -> Value {
    match property {
        Property::Title { title } => Value::Text(plain_text(title)),
        Property::RichText { rich_text } => Value::Text(plain_text(rich_text)),
        Property::Number { number } => Value::Number(number.unwrap_or(0.0)),
        Property::Select { select } => {
            Value::Text(select.as_ref().map(|s| s.name.clone()).unwrap_or_default())
        }
        Property::MultiSelect { multi_select } => Value::Text(
            multi_select
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Property::Checkbox { checkbox } => {
            Value::Text(if *checkbox { "Yes" } else { "No" }.to_string())
        }
        Property::Formula { formula: Formula::Number { number } } => {
            Value::Number(number.unwrap_or(0.0))
        }
        Property::Formula { formula: Formula::String { string } } => {
            Value::Text(string.clone().unwrap_or_default())
        }
        Property::Rollup { rollup: Rollup::Number { number } } => {
            Value::Number(number.unwrap_or(0.0))
        }
        Property::Formula { formula: Formula::Other }
        | Property::Rollup { rollup: Rollup::Other }
        | Property::Unsupported => Value::Text(String::new()),
    }
}

/// Overlay recognized page properties onto `stat_block`, in the given order.
/// Keys that match no alias are ignored.
pub fn apply_properties(properties: &[(String, Property)], stat_block: &mut StatBlock) {
    for (key, property) in properties {
        let value = coerce(property);
        debug!(name = %key, kind = property.kind(), value = ?value, "Page property");
        if let Some(field) = property_field(key) {
            stat_block.assign(field, &value);
        }
    }
}

use std::collections::HashMap;
use std::sync::LazyLock;

use super::statblock::{Affinity, Attribute, Field};

/// Every spelling a page property may use for a statblock field.
const PROPERTY_ALIASES: &[(&str, Field)] = &[
    ("name", Field::Name),
    ("level", Field::Level),
    ("lvl", Field::Level),
    ("rank", Field::Rank),
    ("species", Field::Species),
    ("traits", Field::Traits),
    ("max hp", Field::MaxHp),
    ("maxhp", Field::MaxHp),
    ("hp", Field::MaxHp),
    ("max mp", Field::MaxMp),
    ("maxmp", Field::MaxMp),
    ("mp", Field::MaxMp),
    ("initiative", Field::Initiative),
    ("init", Field::Initiative),
    ("def bonus", Field::DefBonus),
    ("defbonus", Field::DefBonus),
    ("def", Field::DefBonus),
    ("defense", Field::DefBonus),
    ("m.def bonus", Field::MDefBonus),
    ("m.defbonus", Field::MDefBonus),
    ("m.def", Field::MDefBonus),
    ("mdef", Field::MDefBonus),
    ("mdefbonus", Field::MDefBonus),
    ("magic defense", Field::MDefBonus),
    ("crisis", Field::Crisis),
    ("mig", Field::Attribute(Attribute::Mig)),
    ("might", Field::Attribute(Attribute::Mig)),
    ("dex", Field::Attribute(Attribute::Dex)),
    ("dexterity", Field::Attribute(Attribute::Dex)),
    ("ins", Field::Attribute(Attribute::Ins)),
    ("insight", Field::Attribute(Attribute::Ins)),
    ("wlp", Field::Attribute(Attribute::Wlp)),
    ("willpower", Field::Attribute(Attribute::Wlp)),
];

/// Short labels recognized in `key: value` paragraphs of the page body.
const DOCUMENT_LABELS: &[(&str, Field)] = &[
    ("level", Field::Level),
    ("rank", Field::Rank),
    ("species", Field::Species),
    ("traits", Field::Traits),
    ("max hp", Field::MaxHp),
    ("max mp", Field::MaxMp),
    ("initiative", Field::Initiative),
    ("def bonus", Field::DefBonus),
    ("m.def bonus", Field::MDefBonus),
    ("crisis", Field::Crisis),
    ("mig", Field::Attribute(Attribute::Mig)),
    ("dex", Field::Attribute(Attribute::Dex)),
    ("ins", Field::Attribute(Attribute::Ins)),
    ("wlp", Field::Attribute(Attribute::Wlp)),
];

// Affinities are spelled the same in both places.
fn build(entries: &[(&'static str, Field)]) -> HashMap<&'static str, Field> {
    entries
        .iter()
        .copied()
        .chain(Affinity::ALL.iter().map(|a| (a.label(), Field::Affinity(*a))))
        .collect()
}

static PROPERTY_TABLE: LazyLock<HashMap<&'static str, Field>> =
    LazyLock::new(|| build(PROPERTY_ALIASES));
static DOCUMENT_TABLE: LazyLock<HashMap<&'static str, Field>> =
    LazyLock::new(|| build(DOCUMENT_LABELS));

/// Resolve a page property name. Case and surrounding whitespace are ignored.
pub fn property_field(key: &str) -> Option<Field> {
    PROPERTY_TABLE.get(key.trim().to_lowercase().as_str()).copied()
}

/// Resolve an already trimmed, lower-cased label from a body paragraph.
pub fn document_field(label: &str) -> Option<Field> {
    DOCUMENT_TABLE.get(label).copied()
}

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder for an affinity nobody filled in.
pub const NO_AFFINITY: &str = "—";

static LEADING_INT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub name: String,
    pub level: i64,
    pub rank: String,
    pub species: String,
    pub traits: String,
    pub max_hp: i64,
    pub max_mp: i64,
    pub initiative: i64,
    pub def_bonus: i64,
    pub m_def_bonus: i64,
    pub crisis: i64,
    pub attributes: Attributes,
    pub affinities: Affinities,
    pub description: String,
    pub basic_attacks: Vec<String>,
    pub spells: Vec<String>,
    pub other_actions: Vec<String>,
    pub special_rules: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    pub mig: String,
    pub dex: String,
    pub ins: String,
    pub wlp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affinities {
    pub air: String,
    pub bolt: String,
    pub dark: String,
    pub earth: String,
    pub fire: String,
    pub ice: String,
    pub light: String,
    pub physical: String,
    pub poison: String,
}

impl Default for Affinities {
    fn default() -> Self {
        let dash = || NO_AFFINITY.to_string();
        Affinities {
            air: dash(),
            bolt: dash(),
            dark: dash(),
            earth: dash(),
            fire: dash(),
            ice: dash(),
            light: dash(),
            physical: dash(),
            poison: dash(),
        }
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBlock {
            name: String::new(),
            level: 0,
            rank: String::new(),
            species: String::new(),
            traits: String::new(),
            max_hp: 0,
            max_mp: 0,
            initiative: 0,
            def_bonus: 0,
            m_def_bonus: 0,
            crisis: 0,
            attributes: Attributes::default(),
            affinities: Affinities::default(),
            description: String::new(),
            basic_attacks: Vec::new(),
            spells: Vec::new(),
            other_actions: Vec::new(),
            special_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Mig,
    Dex,
    Ins,
    Wlp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    Air,
    Bolt,
    Dark,
    Earth,
    Fire,
    Ice,
    Light,
    Physical,
    Poison,
}

impl Affinity {
    pub const ALL: [Affinity; 9] = [
        Affinity::Air,
        Affinity::Bolt,
        Affinity::Dark,
        Affinity::Earth,
        Affinity::Fire,
        Affinity::Ice,
        Affinity::Light,
        Affinity::Physical,
        Affinity::Poison,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Affinity::Air => "air",
            Affinity::Bolt => "bolt",
            Affinity::Dark => "dark",
            Affinity::Earth => "earth",
            Affinity::Fire => "fire",
            Affinity::Ice => "ice",
            Affinity::Light => "light",
            Affinity::Physical => "physical",
            Affinity::Poison => "poison",
        }
    }
}

impl Affinities {
    pub fn get(&self, affinity: Affinity) -> &str {
        match affinity {
            Affinity::Air => &self.air,
            Affinity::Bolt => &self.bolt,
            Affinity::Dark => &self.dark,
            Affinity::Earth => &self.earth,
            Affinity::Fire => &self.fire,
            Affinity::Ice => &self.ice,
            Affinity::Light => &self.light,
            Affinity::Physical => &self.physical,
            Affinity::Poison => &self.poison,
        }
    }

    fn slot(&mut self, affinity: Affinity) -> &mut String {
        match affinity {
            Affinity::Air => &mut self.air,
            Affinity::Bolt => &mut self.bolt,
            Affinity::Dark => &mut self.dark,
            Affinity::Earth => &mut self.earth,
            Affinity::Fire => &mut self.fire,
            Affinity::Ice => &mut self.ice,
            Affinity::Light => &mut self.light,
            Affinity::Physical => &mut self.physical,
            Affinity::Poison => &mut self.poison,
        }
    }
}

impl Attributes {
    fn slot(&mut self, attribute: Attribute) -> &mut String {
        match attribute {
            Attribute::Mig => &mut self.mig,
            Attribute::Dex => &mut self.dex,
            Attribute::Ins => &mut self.ins,
            Attribute::Wlp => &mut self.wlp,
        }
    }
}

/// A statblock attribute that a property key or document label can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Level,
    Rank,
    Species,
    Traits,
    MaxHp,
    MaxMp,
    Initiative,
    DefBonus,
    MDefBonus,
    Crisis,
    Attribute(Attribute),
    Affinity(Affinity),
}

/// Scalar produced by coercing a property or a `key: value` line.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Integer reading: numbers truncate, text goes through [`parse_leading_int`].
    pub fn to_int(&self) -> i64 {
        match self {
            // `as` saturates and maps NaN to 0
            Value::Number(n) => n.trunc() as i64,
            Value::Text(s) => parse_leading_int(s),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Value::Number(n) => n.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

/// Reads an optionally signed run of digits at the start of `s`, skipping
/// leading whitespace. Anything unreadable is 0.
pub fn parse_leading_int(s: &str) -> i64 {
    LEADING_INT_RE
        .captures(s)
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .unwrap_or(0)
}

impl StatBlock {
    /// Store `value` into `field`, applying the per-field coercion rules.
    pub fn assign(&mut self, field: Field, value: &Value) {
        match field {
            Field::Name => {
                if let Value::Text(s) = value {
                    if !s.is_empty() {
                        self.name = s.clone();
                    }
                }
            }
            Field::Level => self.level = value.to_int().max(0),
            Field::Rank => self.rank = value.to_text(),
            Field::Species => self.species = value.to_text(),
            Field::Traits => self.traits = value.to_text(),
            Field::MaxHp => self.max_hp = value.to_int(),
            Field::MaxMp => self.max_mp = value.to_int(),
            Field::Initiative => self.initiative = value.to_int(),
            Field::DefBonus => self.def_bonus = value.to_int(),
            Field::MDefBonus => self.m_def_bonus = value.to_int(),
            Field::Crisis => self.crisis = value.to_int(),
            Field::Attribute(a) => *self.attributes.slot(a) = value.to_text(),
            Field::Affinity(a) => {
                let text = value.to_text();
                *self.affinities.slot(a) = if text.is_empty() {
                    NO_AFFINITY.to_string()
                } else {
                    text
                };
            }
        }
    }
}

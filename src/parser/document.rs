use super::aliases::document_field;
use super::statblock::{StatBlock, Value};
use crate::notion::model::{plain_text, Block};

/// The four action lists a `heading_2` can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionList {
    BasicAttacks,
    Spells,
    OtherActions,
    SpecialRules,
}

impl ActionList {
    fn from_heading(lowered: &str) -> Option<Self> {
        match lowered {
            "basic attacks" => Some(ActionList::BasicAttacks),
            "spells" => Some(ActionList::Spells),
            "other actions" => Some(ActionList::OtherActions),
            "special rules" => Some(ActionList::SpecialRules),
            _ => None,
        }
    }

    fn entries(self, stat_block: &mut StatBlock) -> &mut Vec<String> {
        match self {
            ActionList::BasicAttacks => &mut stat_block.basic_attacks,
            ActionList::Spells => &mut stat_block.spells,
            ActionList::OtherActions => &mut stat_block.other_actions,
            ActionList::SpecialRules => &mut stat_block.special_rules,
        }
    }
}

/// Where paragraphs currently land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    /// Before any `heading_2`, or after an empty one.
    None,
    List(ActionList),
    Unknown,
}

impl Section {
    fn from_heading(text: &str) -> Self {
        let lowered = text.to_lowercase();
        if lowered.is_empty() {
            return Section::None;
        }
        ActionList::from_heading(&lowered)
            .map(Section::List)
            .unwrap_or(Section::Unknown)
    }
}

/// Build a statblock from the page body alone.
pub fn parse_blocks(blocks: &[Block]) -> StatBlock {
    let mut stat_block = StatBlock::default();
    let mut section = Section::None;
    let mut description: Vec<String> = Vec::new();

    for block in blocks {
        match block {
            Block::Heading1 { heading_1 } => stat_block.name = plain_text(&heading_1.rich_text),
            Block::Heading2 { heading_2 } => {
                section = Section::from_heading(&plain_text(&heading_2.rich_text))
            }
            Block::Paragraph { paragraph } => {
                let text = plain_text(&paragraph.rich_text);
                if text.trim().is_empty() {
                    continue;
                }
                handle_paragraph(text, section, &mut stat_block, &mut description);
            }
            Block::Unsupported => {}
        }
    }

    stat_block.description = description.join(" ").trim().to_string();
    stat_block
}

fn handle_paragraph(
    text: String,
    section: Section,
    stat_block: &mut StatBlock,
    description: &mut Vec<String>,
) {
    match (section, text.find(':')) {
        (Section::None, Some(idx)) if idx > 0 => {
            let key = text[..idx].trim().to_lowercase();
            match document_field(&key) {
                Some(field) => {
                    let value = text[idx + 1..].trim().to_string();
                    stat_block.assign(field, &Value::Text(value));
                }
                None if !key.contains('•') => description.push(text),
                None => {}
            }
        }
        (Section::List(list), _) => list.entries(stat_block).push(text),
        (Section::None, None) => description.push(text),
        // leading colon, or a paragraph under a heading we don't track
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::model::BlockChildren;
    use crate::parser::statblock::NO_AFFINITY;

    fn h1(t: &str) -> Block {
        Block::heading_1(t)
    }
    fn h2(t: &str) -> Block {
        Block::heading_2(t)
    }
    fn p(t: &str) -> Block {
        Block::paragraph(t)
    }

    #[test]
    fn goblin_basic_attack_is_verbatim() {
        let sb = parse_blocks(&[h1("Goblin"), h2("Basic Attacks"), p("Claw: +3, 2 damage")]);
        assert_eq!(sb.name, "Goblin");
        assert_eq!(sb.basic_attacks, ["Claw: +3, 2 damage"]);
        assert_eq!(sb.description, "");
    }

    #[test]
    fn preamble_is_description() {
        let sb = parse_blocks(&[p("A small green creature.")]);
        assert_eq!(sb.description, "A small green creature.");
        assert!(sb.name.is_empty());
    }

    #[test]
    fn description_lines_joined_with_space() {
        let sb = parse_blocks(&[p("  Lurks in caves."), p(""), p("   "), p("Hates light.  ")]);
        assert_eq!(sb.description, "Lurks in caves. Hates light.");
    }

    #[test]
    fn stat_lines_before_sections() {
        let sb = parse_blocks(&[
            h1("Ghoul"),
            p("Level: 12"),
            p("Rank: Elite"),
            p("Max HP: lots"),
            p("M.Def Bonus: +2"),
            p("MIG: d8"),
            p("Dark: IM"),
            p("Air:"),
        ]);
        assert_eq!(sb.level, 12);
        assert_eq!(sb.rank, "Elite");
        assert_eq!(sb.max_hp, 0);
        assert_eq!(sb.m_def_bonus, 2);
        assert_eq!(sb.attributes.mig, "d8");
        assert_eq!(sb.affinities.dark, "IM");
        assert_eq!(sb.affinities.air, NO_AFFINITY);
        assert_eq!(sb.description, "");
    }

    #[test]
    fn unknown_key_keeps_whole_line_unless_bulleted() {
        let sb = parse_blocks(&[p("Habitat: swamps"), p("• Note: ignored"), p("Lore • bit: dropped too")]);
        assert_eq!(sb.description, "Habitat: swamps");
    }

    #[test]
    fn bullet_only_checked_in_key() {
        let sb = parse_blocks(&[p("Habitat: swamps • bogs")]);
        assert_eq!(sb.description, "Habitat: swamps • bogs");
    }

    #[test]
    fn leading_colon_is_dropped() {
        let sb = parse_blocks(&[p(":nothing here")]);
        assert_eq!(sb.description, "");
    }

    #[test]
    fn sections_route_to_lists() {
        let sb = parse_blocks(&[
            h2("SPELLS"),
            p("Fireball: 10 MP"),
            h2("Other Actions"),
            p("Roar"),
            h2("Special Rules"),
            p("Flying."),
            p("Regenerates 5 HP per turn."),
        ]);
        assert_eq!(sb.spells, ["Fireball: 10 MP"]);
        assert_eq!(sb.other_actions, ["Roar"]);
        assert_eq!(sb.special_rules, ["Flying.", "Regenerates 5 HP per turn."]);
        assert!(sb.basic_attacks.is_empty());
    }

    #[test]
    fn unknown_section_swallows_paragraphs() {
        let sb = parse_blocks(&[
            h2("Loot"),
            p("Gold: 100"),
            p("A rusty key"),
            p("Level: 9"),
        ]);
        assert_eq!(sb.level, 0);
        assert_eq!(sb.description, "");
        assert_eq!(sb, StatBlock::default());
    }

    #[test]
    fn heading_must_match_exactly() {
        let sb = parse_blocks(&[h2("Basic Attacks "), p("Bite")]);
        assert!(sb.basic_attacks.is_empty());
    }

    #[test]
    fn empty_heading_returns_to_preamble() {
        let sb = parse_blocks(&[h2("Spells"), p("Bolt"), h2(""), p("Level: 4"), p("Quiet.")]);
        assert_eq!(sb.spells, ["Bolt"]);
        assert_eq!(sb.level, 4);
        assert_eq!(sb.description, "Quiet.");
    }

    #[test]
    fn last_heading_1_wins() {
        let sb = parse_blocks(&[h1("Imp"), p("Small."), h1("Greater Imp")]);
        assert_eq!(sb.name, "Greater Imp");
    }

    #[test]
    fn other_blocks_are_ignored() {
        let sb = parse_blocks(&[h2("Spells"), Block::Unsupported, p("Ice Lance")]);
        assert_eq!(sb.spells, ["Ice Lance"]);
    }

    #[test]
    fn fixture_page_body() {
        let raw = std::fs::read_to_string("tests/fixtures/goblin_blocks.json").unwrap();
        let children: BlockChildren = serde_json::from_str(&raw).unwrap();
        let blocks: Vec<Block> = children.results.into_iter().map(Block::from_value).collect();
        let sb = parse_blocks(&blocks);
        assert_eq!(sb.name, "Goblin");
        assert_eq!(sb.level, 3);
        assert_eq!(sb.species, "Humanoid");
        assert_eq!(sb.attributes.dex, "d10");
        assert_eq!(sb.affinities.light, "VU");
        assert_eq!(
            sb.description,
            "A small green creature. Travels in noisy packs."
        );
        assert_eq!(sb.basic_attacks, ["Claw: +3, 2 damage", "Rusty Dagger: +3, 4 damage"]);
        assert_eq!(sb.special_rules, ["Cowardly: flees when alone."]);
        assert!(sb.spells.is_empty());
    }
}

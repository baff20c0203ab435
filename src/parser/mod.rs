pub mod aliases;
pub mod document;
pub mod properties;
pub mod statblock;

use crate::notion::model::{Block, Page};
use statblock::StatBlock;

/// Two-stage merge: page body → base statblock, then page properties on top.
pub fn assemble(page: &Page, blocks: &[Block]) -> StatBlock {
    let mut stat_block = document::parse_blocks(blocks);
    properties::apply_properties(&page.properties(), &mut stat_block);
    stat_block
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::model::BlockChildren;
    use crate::parser::statblock::{Affinity, NO_AFFINITY};
    use serde_json::json;

    fn page(properties: serde_json::Value) -> Page {
        serde_json::from_value(json!({"id": "p", "properties": properties})).unwrap()
    }

    fn fixture() -> (Page, Vec<Block>) {
        let raw = std::fs::read_to_string("tests/fixtures/goblin_page.json").unwrap();
        let page: Page = serde_json::from_str(&raw).unwrap();
        let raw = std::fs::read_to_string("tests/fixtures/goblin_blocks.json").unwrap();
        let children: BlockChildren = serde_json::from_str(&raw).unwrap();
        let blocks = children.results.into_iter().map(Block::from_value).collect();
        (page, blocks)
    }

    #[test]
    fn property_overrides_document() {
        let blocks = [Block::paragraph("Level: 3")];
        let sb = assemble(&page(json!({"Level": {"type": "number", "number": 5}})), &blocks);
        assert_eq!(sb.level, 5);
    }

    #[test]
    fn document_value_survives_without_property() {
        let blocks = [Block::paragraph("Level: 3"), Block::paragraph("Crisis: n/a")];
        let sb = assemble(&page(json!({})), &blocks);
        assert_eq!(sb.level, 3);
        assert_eq!(sb.crisis, 0);
    }

    #[test]
    fn title_property_fills_missing_name() {
        let sb = assemble(
            &page(json!({"Name": {"type": "title", "title": [{"plain_text": "Slime"}]}})),
            &[Block::paragraph("Wobbly.")],
        );
        assert_eq!(sb.name, "Slime");
    }

    #[test]
    fn no_heading_no_name() {
        let sb = assemble(&page(json!({})), &[Block::paragraph("Nameless thing.")]);
        assert!(sb.name.is_empty());
    }

    #[test]
    fn goblin_fixture() {
        let (page, blocks) = fixture();
        let sb = assemble(&page, &blocks);
        // property title beats the heading
        assert_eq!(sb.name, "Goblin Scout");
        // property beats "Level: 3" in the body
        assert_eq!(sb.level, 5);
        assert_eq!(sb.max_hp, 42);
        assert_eq!(sb.max_mp, 0);
        assert_eq!(sb.def_bonus, 1);
        assert_eq!(sb.m_def_bonus, 2);
        assert_eq!(sb.rank, "Soldier");
        assert_eq!(sb.species, "Humanoid");
        assert_eq!(sb.traits, "Sneaky, Cowardly");
        assert_eq!(sb.attributes.mig, "d6");
        assert_eq!(sb.attributes.dex, "d10");
        assert_eq!(sb.affinities.fire, "VU");
        assert_eq!(sb.affinities.light, "VU");
        assert_eq!(sb.affinities.dark, "RS");
        assert_eq!(sb.affinities.ice, NO_AFFINITY);
        assert_eq!(sb.description, "A small green creature. Travels in noisy packs.");
        assert_eq!(sb.basic_attacks.len(), 2);
        for a in Affinity::ALL {
            assert!(!sb.affinities.get(a).is_empty());
        }
    }

    #[test]
    fn idempotent() {
        let (page, blocks) = fixture();
        assert_eq!(assemble(&page, &blocks), assemble(&page, &blocks));
    }
}

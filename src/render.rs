use std::fmt::Write;

use crate::notion::model::SearchHit;
use crate::parser::statblock::{Affinity, StatBlock};

/// Plain-text statblock for the terminal.
pub fn stat_block(sb: &StatBlock) -> String {
    let mut out = String::new();
    let name = if sb.name.is_empty() { "(unnamed)" } else { sb.name.as_str() };
    line(&mut out, format_args!("{}", name));
    line(&mut out, format_args!("{}", "=".repeat(name.chars().count())));

    let identity: Vec<String> = [
        Some(format!("Lv {}", sb.level)),
        non_empty(&sb.rank),
        non_empty(&sb.species),
    ]
    .into_iter()
    .flatten()
    .collect();
    line(&mut out, format_args!("{}", identity.join(" · ")));
    if !sb.traits.is_empty() {
        line(&mut out, format_args!("Traits: {}", sb.traits));
    }
    out.push('\n');

    line(
        &mut out,
        format_args!(
            "HP {:>4} | MP {:>4} | Init {:>3} | DEF {:+} | M.DEF {:+} | Crisis {}",
            sb.max_hp, sb.max_mp, sb.initiative, sb.def_bonus, sb.m_def_bonus, sb.crisis
        ),
    );
    line(
        &mut out,
        format_args!(
            "MIG {:<4} DEX {:<4} INS {:<4} WLP {:<4}",
            dash_if_empty(&sb.attributes.mig),
            dash_if_empty(&sb.attributes.dex),
            dash_if_empty(&sb.attributes.ins),
            dash_if_empty(&sb.attributes.wlp),
        ),
    );

    let affinities: Vec<String> = Affinity::ALL
        .iter()
        .map(|a| format!("{} {}", a.label(), sb.affinities.get(*a)))
        .collect();
    line(&mut out, format_args!("{}", affinities.join(" | ")));

    if !sb.description.is_empty() {
        line(&mut out, format_args!("\n{}", sb.description));
    }

    for (title, entries) in [
        ("Basic Attacks", &sb.basic_attacks),
        ("Spells", &sb.spells),
        ("Other Actions", &sb.other_actions),
        ("Special Rules", &sb.special_rules),
    ] {
        if entries.is_empty() {
            continue;
        }
        line(&mut out, format_args!("\n--- {} ---", title));
        for e in entries {
            line(&mut out, format_args!("  {}", e));
        }
    }

    out
}

/// Compact id/name table for search results.
pub fn search_table(hits: &[SearchHit]) -> String {
    let mut out = String::new();
    line(&mut out, format_args!("{:>3} | {:<32} | {}", "#", "Name", "ID"));
    line(&mut out, format_args!("{}", "-".repeat(80)));
    for (i, h) in hits.iter().enumerate() {
        line(&mut out, format_args!("{:>3} | {:<32} | {}", i + 1, truncate(&h.name, 32), h.id));
    }
    out
}

/// Append one formatted line. Writing into a `String` cannot fail.
fn line(out: &mut String, args: std::fmt::Arguments) {
    out.write_fmt(args).unwrap();
    out.push('\n');
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

//! Boss/level/total-damage extraction from a personal damage report.
//!
//! Unlike the participant table, this screen is a loose stack of labeled
//! lines, so recovery is keyword-driven: recognized lines are pre-filtered
//! by keyword, then scanned for the boss name, a "Lv." line, and a "Total
//! Damage" line. OCR regularly garbles the damage label ("Tota/Damage"), so
//! the known misreads are matched too.

use anyhow::Result;
use regex::Regex;

/// Boss names as they appear in the damage report screen.
pub const BOSS_NAMES: [&str; 3] = ["Living Abyss", "Avatar of Destiny", "Red Velvet Dragon"];

/// Label variants for the level line. Case matters: OCR preserves the UI's
/// casing here, and a lowercase "lv" shows up inside ordinary words.
const LEVEL_MARKERS: [&str; 4] = ["Lv.", "LV.", "Lv ", "LV "];

/// Label variants for the damage line, including common OCR misreads.
const DAMAGE_MARKERS: [&str; 4] = ["total damage", "totaldamage", "tota/damage", "tota damage"];

/// Stats recovered from one damage report screenshot. A `None` field means
/// the corresponding line was not recognized; the caller decides severity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DamageStats {
    pub boss: Option<String>,
    pub level: Option<u32>,
    pub damage: Option<u64>,
}

/// Returns true if a recognized line can carry boss, level, or damage info.
pub fn should_keep_line(line: &str) -> bool {
    let line = line.to_lowercase();
    let keywords = "Living Abyss Red Velvet Dragon Avatar Of Destiny Lv Total Damage".to_lowercase();
    keywords.split(' ').any(|keyword| line.contains(keyword))
}

/// Scans recognized lines for boss name, level, and total damage.
pub fn parse_damage_stats<'a, I>(lines: I) -> Result<DamageStats>
where
    I: IntoIterator<Item = &'a str>,
{
    let number = Regex::new(r"\d+")?;
    let non_numeric = Regex::new(r"[^0-9,]")?;

    let mut stats = DamageStats::default();

    for line in lines {
        let line = line.trim();
        let lowered = line.to_lowercase();

        // Boss name lines carry just the name; "Lv." and "HP" lines mention
        // the boss too and must not win.
        for boss in BOSS_NAMES {
            if lowered.contains(&boss.to_lowercase())
                && !line.contains("Lv.")
                && !line.contains("HP")
            {
                stats.boss = Some(boss.to_string());
                break;
            }
        }

        if LEVEL_MARKERS.iter().any(|marker| line.contains(marker)) {
            if let Some(m) = number.find(line) {
                if let Ok(level) = m.as_str().parse() {
                    stats.level = Some(level);
                }
            }
        }

        if DAMAGE_MARKERS.iter().any(|marker| lowered.contains(marker)) {
            // The number is the last digit-bearing part after the label
            let parts: Vec<&str> = non_numeric.split(line).collect();
            let damage_str = parts
                .into_iter()
                .rev()
                .find(|part| part.chars().any(|c| c.is_ascii_digit()));
            if let Some(damage_str) = damage_str {
                if let Ok(damage) = damage_str.replace(',', "").parse() {
                    stats.damage = Some(damage);
                }
            }
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> DamageStats {
        parse_damage_stats(lines.iter().copied()).unwrap()
    }

    #[test]
    fn test_full_report() {
        let stats = parse(&[
            "Red Velvet Dragon",
            "Lv.30",
            "Total Damage: 8,880,000,000",
        ]);
        assert_eq!(stats.boss.as_deref(), Some("Red Velvet Dragon"));
        assert_eq!(stats.level, Some(30));
        assert_eq!(stats.damage, Some(8_880_000_000));
    }

    #[test]
    fn test_boss_line_with_level_marker_does_not_set_boss() {
        let stats = parse(&["Red Velvet Dragon Lv.30"]);
        assert_eq!(stats.boss, None);
        assert_eq!(stats.level, Some(30));
    }

    #[test]
    fn test_boss_line_with_hp_does_not_set_boss() {
        let stats = parse(&["Living Abyss HP 130,000,000"]);
        assert_eq!(stats.boss, None);
    }

    #[test]
    fn test_garbled_damage_label() {
        assert_eq!(parse(&["Tota/Damage:8,880,123,456"]).damage, Some(8_880_123_456));
        assert_eq!(parse(&["TotalDamage 123456"]).damage, Some(123_456));
        assert_eq!(parse(&["Tota Damage: 42"]).damage, Some(42));
    }

    #[test]
    fn test_damage_takes_last_number_on_line() {
        // The "1" in a garbled prefix must not win over the actual value
        let stats = parse(&["P1 Total Damage: 9,999"]);
        assert_eq!(stats.damage, Some(9_999));
    }

    #[test]
    fn test_level_variants() {
        assert_eq!(parse(&["Lv.30"]).level, Some(30));
        assert_eq!(parse(&["LV. 28"]).level, Some(28));
        assert_eq!(parse(&["Lv 15"]).level, Some(15));
        assert_eq!(parse(&["LV 7"]).level, Some(7));
    }

    #[test]
    fn test_unrecognized_lines_leave_fields_empty() {
        let stats = parse(&["Guild Battle", "Rewards"]);
        assert_eq!(stats, DamageStats::default());
    }

    #[test]
    fn test_should_keep_line() {
        assert!(should_keep_line("Red Velvet Dragon"));
        assert!(should_keep_line("total damage: 123"));
        assert!(should_keep_line("Lv.30"));
        assert!(!should_keep_line("Guild Battle Rewards"));
    }
}

//! Skill and stat display names

/// Skill names indexed by skill code
const SKILL_NAMES: [&str; 35] = [
    "Medical",
    "Etiquette",
    "Streetwise",
    "Jumping",
    "Orcish",
    "Harpy",
    "Giantish",
    "Dragonish",
    "Nymph",
    "Daedric",
    "Spriggan",
    "Centaurian",
    "Impish",
    "Lockpicking",
    "Mercantile",
    "Pickpocket",
    "Stealth",
    "Swimming",
    "Climbing",
    "Backstabbing",
    "Dodging",
    "Running",
    "Destruction",
    "Restoration",
    "Illusion",
    "Alteration",
    "Thaumaturgy",
    "Mysticism",
    "Short Blade",
    "Long Blade",
    "Hand-to-Hand",
    "Axe",
    "Blunt Weapon",
    "Archery",
    "Critical Strike",
];

/// Stat names indexed by stat code
const STAT_NAMES: [&str; 8] = [
    "Strength",
    "Intelligence",
    "Willpower",
    "Agility",
    "Endurance",
    "Personality",
    "Speed",
    "Luck",
];

const STAT_ABBREVIATIONS: [&str; 8] = ["STR", "INT", "WIL", "AGI", "END", "PER", "SPD", "LUC"];

/// Legacy text record describing each stat
const STAT_DESCRIPTION_IDS: [i32; 8] = [0, 1, 2, 3, 4, 5, 6, 7];

fn lookup<T: Copy>(table: &[T], code: i32) -> Option<T> {
    usize::try_from(code).ok().and_then(|i| table.get(i)).copied()
}

/// Number of known skills
pub const SKILL_COUNT: usize = SKILL_NAMES.len();

/// Number of known stats
pub const STAT_COUNT: usize = STAT_NAMES.len();

/// Display name of a skill, or `""` for an unknown code
#[must_use]
pub fn skill_display_name(code: i32) -> &'static str {
    lookup(&SKILL_NAMES, code).unwrap_or_default()
}

/// Display name of a stat, or `""` for an unknown code
#[must_use]
pub fn stat_display_name(code: i32) -> &'static str {
    lookup(&STAT_NAMES, code).unwrap_or_default()
}

/// Three-letter stat abbreviation, or `""` for an unknown code
#[must_use]
pub fn abbreviated_stat_name(code: i32) -> &'static str {
    lookup(&STAT_ABBREVIATIONS, code).unwrap_or_default()
}

/// Legacy text record ID describing a stat, or `-1` for an unknown code
#[must_use]
pub fn stat_description_id(code: i32) -> i32 {
    lookup(&STAT_DESCRIPTION_IDS, code).unwrap_or(-1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skills() {
        assert_eq!(SKILL_COUNT, 35);
        assert_eq!(skill_display_name(0), "Medical");
        assert_eq!(skill_display_name(30), "Hand-to-Hand");
        assert_eq!(skill_display_name(34), "Critical Strike");
        assert_eq!(skill_display_name(35), "");
        assert_eq!(skill_display_name(-1), "");
    }

    #[test]
    fn test_stats() {
        assert_eq!(STAT_COUNT, 8);
        assert_eq!(stat_display_name(3), "Agility");
        assert_eq!(abbreviated_stat_name(6), "SPD");
        assert_eq!(stat_description_id(7), 7);
        assert_eq!(stat_description_id(8), -1);
        assert_eq!(stat_description_id(-2), -1);
        assert_eq!(stat_display_name(100), "");
    }
}

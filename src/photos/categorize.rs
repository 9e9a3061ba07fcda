//! Rule-table photo categorisation.

use crate::models::{PhotoCategory, PhotoFacts};

/// One categorisation rule. Rules are tried in order; the first that
/// applies decides the category.
pub struct Rule {
    pub category: PhotoCategory,
    pub applies: fn(&PhotoFacts) -> bool,
}

fn mentions(facts: &PhotoFacts, words: &[&str]) -> bool {
    words.iter().any(|w| facts.text.contains(w))
}

fn trophy_text(facts: &PhotoFacts) -> bool {
    mentions(facts, &["trophy", "runner", "ccpl"])
}

fn award_text(facts: &PhotoFacts) -> bool {
    mentions(facts, &["man of", "award"])
}

fn table_text(facts: &PhotoFacts) -> bool {
    mentions(facts, &["leaderboard", "points", "table"])
}

fn landscape(facts: &PhotoFacts) -> bool {
    facts.aspect_ratio() > 1.3
}

fn bright_portrait(facts: &PhotoFacts) -> bool {
    let [red, green, _] = facts.mean_rgb;
    portrait(facts) && (red > 150.0 || green > 150.0)
}

fn portrait(facts: &PhotoFacts) -> bool {
    facts.aspect_ratio() < 0.9
}

pub const RULES: &[Rule] = &[
    Rule {
        category: PhotoCategory::TrophyCeremony,
        applies: trophy_text,
    },
    Rule {
        category: PhotoCategory::ManOfMatch,
        applies: award_text,
    },
    Rule {
        category: PhotoCategory::Leaderboard,
        applies: table_text,
    },
    Rule {
        category: PhotoCategory::TeamCelebration,
        applies: landscape,
    },
    Rule {
        category: PhotoCategory::IndividualAwards,
        applies: bright_portrait,
    },
    Rule {
        category: PhotoCategory::ActionShot,
        applies: portrait,
    },
];

/// Categorise a photo from its facts. Falls back to `Other`.
pub fn categorize(facts: &PhotoFacts) -> PhotoCategory {
    RULES
        .iter()
        .find(|rule| (rule.applies)(facts))
        .map(|rule| rule.category)
        .unwrap_or(PhotoCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(width: u32, height: u32, rgb: [f64; 3], text: &str) -> PhotoFacts {
        PhotoFacts {
            width,
            height,
            mean_rgb: rgb,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_text_rules_win_over_shape() {
        let wide = |text| facts(1600, 900, [0.0; 3], text);
        assert_eq!(categorize(&wide("ccpl 2025")), PhotoCategory::TrophyCeremony);
        assert_eq!(categorize(&wide("runners up")), PhotoCategory::TrophyCeremony);
        assert_eq!(categorize(&wide("man of the match")), PhotoCategory::ManOfMatch);
        assert_eq!(categorize(&wide("points table")), PhotoCategory::Leaderboard);
    }

    #[test]
    fn test_rule_order() {
        // Mentions both trophy and award; the trophy rule comes first.
        let f = facts(100, 100, [0.0; 3], "trophy award");
        assert_eq!(categorize(&f), PhotoCategory::TrophyCeremony);
    }

    #[test]
    fn test_shape_rules() {
        assert_eq!(
            categorize(&facts(1400, 1000, [0.0; 3], "")),
            PhotoCategory::TeamCelebration
        );
        assert_eq!(
            categorize(&facts(800, 1000, [160.0, 20.0, 20.0], "")),
            PhotoCategory::IndividualAwards
        );
        assert_eq!(
            categorize(&facts(800, 1000, [100.0, 151.0, 20.0], "")),
            PhotoCategory::IndividualAwards
        );
        assert_eq!(
            categorize(&facts(800, 1000, [100.0, 100.0, 250.0], "")),
            PhotoCategory::ActionShot
        );
    }

    #[test]
    fn test_default_other() {
        assert_eq!(
            categorize(&facts(1000, 1000, [200.0; 3], "")),
            PhotoCategory::Other
        );
        assert_eq!(
            categorize(&facts(1300, 1000, [0.0; 3], "")),
            PhotoCategory::Other
        );
        assert_eq!(categorize(&facts(10, 0, [0.0; 3], "")), PhotoCategory::ActionShot);
    }
}

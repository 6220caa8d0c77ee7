pub const NOT_INFORMED: &str = "Not informed";
pub const OTHER_REGION: &str = "Other";

/// Ordered region rules; the first rule with a keyword appearing as a whole
/// word of the lower-cased location wins.
const REGION_RULES: &[(&str, &[&str])] = &[
    (
        "Brazil",
        &[
            "brasil",
            "brazil",
            "minas gerais",
            "são paulo",
            "rio de janeiro",
            "espírito santo",
            "goiás",
            "bahia",
            "mato grosso",
            "pará",
            "amapá",
            "maranhão",
            "tocantins",
            "rondônia",
        ],
    ),
    (
        "North America",
        &[
            "estados unidos",
            "new mexico",
            "united states",
            "eua",
            "usa",
            "canadá",
            "canada",
        ],
    ),
    (
        "Latin America",
        &[
            "argentina",
            "bolívia",
            "bolivia",
            "chile",
            "colômbia",
            "colombia",
            "equador",
            "ecuador",
            "méxico",
            "mexico",
            "paraguai",
            "paraguay",
            "peru",
            "uruguai",
            "uruguay",
            "venezuela",
        ],
    ),
    (
        "Europe",
        &[
            "europa",
            "europe",
            "portugal",
            "espanha",
            "spain",
            "alemanha",
            "germany",
            "frança",
            "france",
            "itália",
            "italy",
            "suécia",
            "sweden",
        ],
    ),
    (
        "Africa",
        &[
            "áfrica",
            "africa",
            "angola",
            "moçambique",
            "mozambique",
            "gana",
            "ghana",
            "guiné",
            "guinea",
        ],
    ),
    (
        "Asia-Pacific",
        &[
            "austrália",
            "australia",
            "indonésia",
            "indonesia",
            "china",
            "índia",
            "india",
            "mongólia",
            "mongolia",
            "filipinas",
            "philippines",
        ],
    ),
];

/// Every region label `classify_region` can return, in rule order.
pub fn region_labels() -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = REGION_RULES.iter().map(|(label, _)| *label).collect();
    labels.push(OTHER_REGION);
    labels.push(NOT_INFORMED);
    labels
}

pub fn classify_region(location: &str) -> &'static str {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        return NOT_INFORMED;
    }
    let lower = trimmed.to_lowercase();
    REGION_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| contains_word(&lower, keyword)))
        .map(|(label, _)| *label)
        .unwrap_or(OTHER_REGION)
}

/// `keyword` occurs in `haystack` with no letter or digit on either side,
/// so "peru" does not match "perugia".
fn contains_word(haystack: &str, keyword: &str) -> bool {
    haystack.match_indices(keyword).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::{classify_region, region_labels, NOT_INFORMED, OTHER_REGION};

    #[test]
    fn classify_known_locations() {
        assert_eq!(classify_region("Parauapebas, Pará"), "Brazil");
        assert_eq!(classify_region("ANTOFAGASTA, CHILE"), "Latin America");
        assert_eq!(classify_region("Perth, Australia"), "Asia-Pacific");
        assert_eq!(classify_region("Luanda - Angola"), "Africa");
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert_eq!(classify_region("Perugia, Itália"), "Europe");
        assert_eq!(classify_region("Santa Fe, New Mexico, USA"), "North America");
        assert_eq!(classify_region("Cidade do México"), "Latin America");
        assert_eq!(classify_region("Indianápolis"), OTHER_REGION);
        assert_eq!(classify_region("Lima/Peru"), "Latin America");
    }

    #[test]
    fn first_rule_wins() {
        assert_eq!(classify_region("Fronteira Brasil / Peru"), "Brazil");
    }

    #[test]
    fn fallback_buckets() {
        assert_eq!(classify_region(""), NOT_INFORMED);
        assert_eq!(classify_region("   "), NOT_INFORMED);
        assert_eq!(classify_region("Atlantis"), OTHER_REGION);
    }

    #[test]
    fn classification_is_total_and_stable() {
        let labels = region_labels();
        for location in ["", "Brasil", "x", "Toronto, Canada", "Madrid, Espanha", "???"] {
            let first = classify_region(location);
            assert!(labels.contains(&first));
            assert_eq!(first, classify_region(location));
        }
    }
}

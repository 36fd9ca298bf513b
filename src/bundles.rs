// Keyword bundle expansion: synonym groups plus phrase templates (محل/متجر,
// shop/store, and restaurant variants for food categories). Runs over the
// merged taxonomy after an import so CSV-derived nodes get bundles too.

use serde::Serialize;
use std::collections::HashSet;

use crate::taxonomy::CategoryNode;

const BUNDLE_CAP: usize = 80;

/// A keyword equal to a group key, or listed among its values, pulls in the
/// whole group.
const AR_SYNONYMS: &[(&str, &[&str])] = &[
    ("مخبز", &["خبز", "مخابز", "مخبوزات", "تميس", "خبز تميس", "تنور"]),
    ("معجنات", &["فطائر", "مناقيش", "باتيه", "كرواسون", "سبرينغ رول"]),
    ("حلويات", &["حلويات شرقية", "بقلاوة", "كنافة", "بسبوسة", "لقيمات"]),
    ("متجر زهور", &["محل ورد", "زهور", "ورد"]),
    ("أحجار كريمة", &["حجر كريم", "ألماس", "ماس", "زمرد", "ياقوت", "سافير", "فيروز", "عقيق"]),
    ("مطعم", &["مطاعم", "مطاعم ومأكولات", "مطاعم فطور", "مطاعم شعبية"]),
    ("فول", &["فلافل", "طعمية", "فول وطعمية"]),
    ("ورق عنب", &["دوالي", "يبرق", "دولمة"]),
];

const EN_SYNONYMS: &[(&str, &[&str])] = &[
    ("bakery", &["bread", "pastries", "bakes"]),
    ("pastry", &["pastries", "croissant", "puff"]),
    ("florist", &["flower shop", "flowers"]),
    ("gemstones", &["gemstone", "diamond", "emerald", "ruby", "sapphire", "turquoise", "agate"]),
    ("restaurant", &["restaurants", "diner", "eatery"]),
    ("beans", &["fava", "falafel"]),
    ("grape leaves", &["dolma", "yaprak", "warak enab"]),
];

/// Food categories get the restaurant/meal phrase templates on top of the
/// generic shop/store ones.
pub fn is_food_category(node: &CategoryNode) -> bool {
    node.code.to_uppercase().starts_with("FB")
        || node.name_ar.contains("مطعم")
        || node.name_ar.contains("مطاعم")
        || node.name_en.contains("Food")
        || node.name_en.contains("Restaurant")
        || node.name_en.contains("Baker")
        || node.name_en.contains("Bakery")
}

fn arabic_variants(keyword: &str, food: bool) -> Vec<String> {
    let mut out = vec![
        format!("محل {}", keyword),
        format!("متجر {}", keyword),
        format!("{} محل", keyword),
        format!("{} متجر", keyword),
    ];
    if food {
        out.push(format!("مطعم {}", keyword));
        out.push(format!("{} مطعم", keyword));
        out.push(format!("{} وجبات", keyword));
        out.push(format!("وجبات {}", keyword));
    }
    out
}

fn english_variants(keyword: &str, food: bool) -> Vec<String> {
    let base = keyword.to_lowercase();
    let mut out = vec![
        format!("{} shop", base),
        format!("{} store", base),
        format!("shop {}", base),
        format!("store {}", base),
    ];
    if food {
        out.push(format!("{} restaurant", base));
        out.push(format!("{} food", base));
        out.push(format!("restaurant {}", base));
    }
    out
}

fn synonym_hits(table: &[(&str, &[&str])], keyword: &str) -> Vec<String> {
    let mut out = Vec::new();
    for (key, values) in table {
        if keyword == *key || values.contains(&keyword) {
            out.extend(values.iter().map(|v| (*v).to_string()));
        }
    }
    out
}

/// Order-preserving dedup of trimmed, non-empty entries.
pub fn uniq(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Expand one node's keyword lists in place: each existing keyword through
/// the synonym groups and phrase templates, then the node's own names.
pub fn expand_node(node: &mut CategoryNode) {
    let food = is_food_category(node);

    let mut ar = node.search_key_words_ar.clone();
    for keyword in node.search_key_words_ar.clone() {
        let base = keyword.trim();
        if base.is_empty() {
            continue;
        }
        ar.extend(synonym_hits(AR_SYNONYMS, base));
        ar.extend(arabic_variants(base, food));
    }

    let mut en = node.search_key_words_en.clone();
    for keyword in node.search_key_words_en.clone() {
        let base = keyword.trim().to_lowercase();
        if base.is_empty() {
            continue;
        }
        en.extend(synonym_hits(EN_SYNONYMS, &base));
        en.extend(english_variants(&base, food));
    }

    let name_ar = node.name_ar.trim().to_string();
    if !name_ar.is_empty() {
        ar.extend(arabic_variants(&name_ar, food));
        if let Some((_, values)) = AR_SYNONYMS.iter().find(|(key, _)| *key == name_ar) {
            ar.extend(values.iter().map(|v| (*v).to_string()));
        }
    }

    let name_en = node.name_en.trim().to_lowercase();
    if !name_en.is_empty() {
        en.extend(english_variants(&name_en, food));
        if let Some((_, values)) = EN_SYNONYMS.iter().find(|(key, _)| *key == name_en) {
            en.extend(values.iter().map(|v| (*v).to_string()));
        }
    }

    let mut ar = uniq(ar);
    ar.truncate(BUNDLE_CAP);
    node.search_key_words_ar = ar;

    let mut en = uniq(en);
    en.truncate(BUNDLE_CAP);
    node.search_key_words_en = en;
}

#[derive(Debug, Clone, Serialize)]
pub struct BundleStats {
    pub ar_before: usize,
    pub ar_after: usize,
    pub en_before: usize,
    pub en_after: usize,
}

pub fn expand_all(nodes: &mut [CategoryNode]) -> BundleStats {
    let ar_before = nodes.iter().map(|n| n.search_key_words_ar.len()).sum();
    let en_before = nodes.iter().map(|n| n.search_key_words_en.len()).sum();

    for node in nodes.iter_mut() {
        expand_node(node);
    }

    BundleStats {
        ar_before,
        ar_after: nodes.iter().map(|n| n.search_key_words_ar.len()).sum(),
        en_before,
        en_after: nodes.iter().map(|n| n.search_key_words_en.len()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with_keywords(name_en: &str, name_ar: &str, ar: &[&str], en: &[&str]) -> CategoryNode {
        let mut node = CategoryNode::auto(1, name_en, name_ar, None);
        node.search_key_words_ar = ar.iter().map(|s| s.to_string()).collect();
        node.search_key_words_en = en.iter().map(|s| s.to_string()).collect();
        node
    }

    #[test]
    fn test_food_detection() {
        let mut node = CategoryNode::auto(1, "Bakery", "مخبز", None);
        assert!(is_food_category(&node)); // "Baker" in the English name

        node = CategoryNode::auto(2, "Florist", "محل ورد", None);
        assert!(!is_food_category(&node));

        node.code = "FB_FLOWERS".to_string();
        assert!(is_food_category(&node));

        let node = CategoryNode::auto(3, "Grill", "مطعم مشويات", None);
        assert!(is_food_category(&node));
    }

    #[test]
    fn test_synonym_group_pulled_by_key_or_value() {
        assert!(synonym_hits(AR_SYNONYMS, "مخبز").contains(&"خبز".to_string()));
        // A value of the group pulls the group too
        assert!(synonym_hits(AR_SYNONYMS, "مخابز").contains(&"تنور".to_string()));
        assert!(synonym_hits(EN_SYNONYMS, "pastries").contains(&"croissant".to_string()));
        assert!(synonym_hits(AR_SYNONYMS, "شيء آخر").is_empty());
    }

    #[test]
    fn test_bundle_expansion_bakery() {
        let mut node = node_with_keywords("Bakery", "مخبز", &["مخبز"], &["bakery"]);
        expand_node(&mut node);

        assert!(node.search_key_words_ar.contains(&"خبز".to_string()));
        assert!(node.search_key_words_ar.contains(&"محل مخبز".to_string()));
        // Food category: restaurant templates apply
        assert!(node.search_key_words_ar.contains(&"مطعم مخبز".to_string()));
        assert!(node.search_key_words_en.contains(&"bread".to_string()));
        assert!(node.search_key_words_en.contains(&"bakery shop".to_string()));
        assert!(node.search_key_words_en.contains(&"bakery restaurant".to_string()));
    }

    #[test]
    fn test_non_food_skips_restaurant_templates() {
        let mut node = node_with_keywords("Florist", "متجر زهور", &["ورد"], &["flowers"]);
        expand_node(&mut node);

        assert!(node.search_key_words_ar.contains(&"محل ورد".to_string()));
        assert!(!node.search_key_words_ar.iter().any(|k| k.starts_with("مطعم ")));
        assert!(node.search_key_words_en.contains(&"flowers store".to_string()));
        assert!(!node.search_key_words_en.iter().any(|k| k.ends_with(" restaurant")));
    }

    #[test]
    fn test_uniq_drops_blanks_and_duplicates() {
        let items = vec![
            "خبز".to_string(),
            " خبز ".to_string(),
            "".to_string(),
            "  ".to_string(),
            "تنور".to_string(),
        ];
        assert_eq!(uniq(items), vec!["خبز".to_string(), "تنور".to_string()]);
    }

    #[test]
    fn test_bundle_cap() {
        let many: Vec<String> = (0..60).map(|i| format!("كلمة {}", i)).collect();
        let mut node = CategoryNode::auto(1, "Bakery", "مخبز", None);
        node.search_key_words_ar = many;
        expand_node(&mut node);
        assert!(node.search_key_words_ar.len() <= BUNDLE_CAP);
    }

    #[test]
    fn test_stats_track_totals() {
        let mut nodes = vec![node_with_keywords("Bakery", "مخبز", &["مخبز"], &["bakery"])];
        let stats = expand_all(&mut nodes);
        assert_eq!(stats.ar_before, 1);
        assert_eq!(stats.en_before, 1);
        assert!(stats.ar_after > stats.ar_before);
        assert!(stats.en_after > stats.en_before);
    }
}

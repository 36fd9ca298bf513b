// Keyword validation: prune keywords that share nothing with their category
// name. Arabic comparison goes through a light normalization (diacritics
// stripped, alef/teh-marbuta/alef-maqsura unified); English is plain
// lowercased substring overlap.
//
// Note the reconciler does NOT use this normalization for name matching -
// taxonomy lookups stay raw-equality on Arabic names.

use serde::Serialize;

use crate::taxonomy::CategoryNode;

/// Tokens too common to say anything about relevance.
const STOP_WORDS: &[&str] = &[
    "و", "في", "من", "إلى", "على", "عن", "أو", "ل", "لل", "ال", "با", "ب",
    "the", "and", "or", "of", "for",
];

const ISSUE_SAMPLE: usize = 5;

/// Lowercase, strip Arabic diacritics (U+064B..U+065F), unify hamza-carrier
/// alefs to bare alef, teh marbuta to heh, alef maqsura to yeh.
pub fn normalize_arabic(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        match ch {
            '\u{064B}'..='\u{065F}' => {}
            'أ' | 'إ' | 'آ' => out.push('ا'),
            'ة' => out.push('ه'),
            'ى' => out.push('ي'),
            _ => out.push(ch),
        }
    }
    out.trim().to_string()
}

/// Split a category name into meaningful words: whitespace and the common
/// separators, single characters and stop words dropped.
pub fn category_words(name: &str) -> Vec<String> {
    name.split(|c: char| c.is_whitespace() || matches!(c, '،' | ',' | '-' | '/'))
        .filter(|w| w.chars().count() > 1)
        .filter(|w| !STOP_WORDS.contains(&normalize_arabic(w).as_str()))
        .map(|w| w.to_string())
        .collect()
}

/// Substring overlap in either direction against the normalized name, or
/// against any name word longer than two characters.
pub fn is_arabic_keyword_relevant(keyword: &str, name_ar: &str, name_words: &[String]) -> bool {
    let keyword_norm = normalize_arabic(keyword);
    let name_norm = normalize_arabic(name_ar);

    if name_norm.contains(&keyword_norm) || keyword_norm.contains(&name_norm) {
        return true;
    }

    for word in name_words {
        let word_norm = normalize_arabic(word);
        if word_norm.chars().count() > 2
            && (keyword_norm.contains(&word_norm) || word_norm.contains(&keyword_norm))
        {
            return true;
        }
    }

    false
}

/// English is more lenient: plain lowercased substring checks.
pub fn is_english_keyword_relevant(keyword: &str, name_en: &str, name_words: &[String]) -> bool {
    let keyword_lower = keyword.to_lowercase();
    let name_lower = name_en.to_lowercase();

    for word in name_words {
        if word.chars().count() > 2 {
            let word_lower = word.to_lowercase();
            if keyword_lower.contains(&word_lower) || word_lower.contains(&keyword_lower) {
                return true;
            }
        }
    }

    keyword_lower.contains(&name_lower) || name_lower.contains(&keyword_lower)
}

// ============================================================================
// VALIDATION PASS
// ============================================================================

/// A node that lost more than half its Arabic keywords; worth a human look.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub id: i64,
    pub name_ar: String,
    pub removed: Vec<String>,
    pub kept: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationStats {
    pub kept_ar: usize,
    pub removed_ar: usize,
    pub kept_en: usize,
    pub removed_en: usize,
}

pub struct ValidationOutcome {
    pub stats: ValidationStats,
    pub issues: Vec<ValidationIssue>,
}

/// Prune every node's keyword lists in place and collect the stats.
pub fn validate_all(nodes: &mut [CategoryNode]) -> ValidationOutcome {
    let mut stats = ValidationStats::default();
    let mut issues = Vec::new();

    for node in nodes.iter_mut() {
        let words_ar = category_words(&node.name_ar);
        let words_en = category_words(&node.name_en);

        if !node.search_key_words_ar.is_empty() {
            let original_len = node.search_key_words_ar.len();
            let mut valid = Vec::new();
            let mut invalid = Vec::new();

            for keyword in node.search_key_words_ar.drain(..) {
                if is_arabic_keyword_relevant(&keyword, &node.name_ar, &words_ar) {
                    valid.push(keyword);
                } else {
                    invalid.push(keyword);
                }
            }

            stats.kept_ar += valid.len();
            stats.removed_ar += invalid.len();

            if !invalid.is_empty() && invalid.len() * 2 > original_len {
                issues.push(ValidationIssue {
                    id: node.id,
                    name_ar: node.name_ar.clone(),
                    removed: invalid.iter().take(ISSUE_SAMPLE).cloned().collect(),
                    kept: valid.iter().take(ISSUE_SAMPLE).cloned().collect(),
                });
            }

            node.search_key_words_ar = valid;
        }

        if !node.search_key_words_en.is_empty() {
            let mut valid = Vec::new();
            let mut invalid = Vec::new();

            for keyword in node.search_key_words_en.drain(..) {
                if is_english_keyword_relevant(&keyword, &node.name_en, &words_en) {
                    valid.push(keyword);
                } else {
                    invalid.push(keyword);
                }
            }

            stats.kept_en += valid.len();
            stats.removed_en += invalid.len();
            node.search_key_words_en = valid;
        }
    }

    ValidationOutcome { stats, issues }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, name_en: &str, name_ar: &str, ar: &[&str], en: &[&str]) -> CategoryNode {
        let mut node = CategoryNode::auto(id, name_en, name_ar, None);
        node.search_key_words_ar = ar.iter().map(|s| s.to_string()).collect();
        node.search_key_words_en = en.iter().map(|s| s.to_string()).collect();
        node
    }

    #[test]
    fn test_normalize_arabic() {
        // Diacritics stripped
        assert_eq!(normalize_arabic("مَخْبَز"), "مخبز");
        // Hamza-carrier alefs unified
        assert_eq!(normalize_arabic("أحمد"), "احمد");
        assert_eq!(normalize_arabic("إلى"), "الي");
        // Teh marbuta and alef maqsura
        assert_eq!(normalize_arabic("صيدلية"), "صيدليه");
        assert_eq!(normalize_arabic("مستشفى"), "مستشفي");
        // Trims
        assert_eq!(normalize_arabic("  خبز  "), "خبز");
    }

    #[test]
    fn test_category_words_drops_stop_words_and_short_tokens() {
        let words = category_words("مطاعم في المدينة");
        assert!(words.contains(&"مطاعم".to_string()));
        assert!(words.contains(&"المدينة".to_string()));
        assert!(!words.contains(&"في".to_string()));

        let words = category_words("Food and Dining");
        assert_eq!(words, vec!["Food".to_string(), "Dining".to_string()]);
    }

    #[test]
    fn test_category_words_splits_on_separators() {
        let words = category_words("Auto-Repair/Service");
        assert_eq!(
            words,
            vec!["Auto".to_string(), "Repair".to_string(), "Service".to_string()]
        );
    }

    #[test]
    fn test_arabic_relevance_by_name_overlap() {
        let words = category_words("مخبز");
        // Variant spelling still overlaps after normalization
        assert!(is_arabic_keyword_relevant("مخبز البلدة", "مخبز", &words));
        assert!(is_arabic_keyword_relevant("مخبز", "مخبز البلدة", &words));
        assert!(!is_arabic_keyword_relevant("سيارات", "مخبز", &words));
    }

    #[test]
    fn test_arabic_relevance_via_name_words() {
        let name = "محل بيع الزهور";
        let words = category_words(name);
        // Shares the word "الزهور" without the full names containing each other
        assert!(is_arabic_keyword_relevant("توصيل الزهور للمنازل", name, &words));
        assert!(!is_arabic_keyword_relevant("قطع غيار", name, &words));
    }

    #[test]
    fn test_english_relevance() {
        let name = "Pet Store";
        let words = category_words(name);
        assert!(is_english_keyword_relevant("pet care", name, &words));
        assert!(is_english_keyword_relevant("STORE", name, &words));
        assert!(!is_english_keyword_relevant("banking", name, &words));
    }

    #[test]
    fn test_validate_prunes_and_counts() {
        let mut nodes = vec![node(
            1,
            "Bakery",
            "مخبز",
            &["مخبز البلدة", "سيارات"],
            &["bakery shop", "insurance"],
        )];
        let outcome = validate_all(&mut nodes);

        assert_eq!(nodes[0].search_key_words_ar, vec!["مخبز البلدة".to_string()]);
        assert_eq!(nodes[0].search_key_words_en, vec!["bakery shop".to_string()]);
        assert_eq!(outcome.stats.kept_ar, 1);
        assert_eq!(outcome.stats.removed_ar, 1);
        assert_eq!(outcome.stats.kept_en, 1);
        assert_eq!(outcome.stats.removed_en, 1);
    }

    #[test]
    fn test_issue_recorded_when_over_half_removed() {
        let mut nodes = vec![node(
            7,
            "",
            "مخبز",
            &["سيارات", "تأمين", "مخبز الحي"],
            &[],
        )];
        let outcome = validate_all(&mut nodes);

        assert_eq!(outcome.issues.len(), 1);
        let issue = &outcome.issues[0];
        assert_eq!(issue.id, 7);
        assert_eq!(issue.removed.len(), 2);
        assert_eq!(issue.kept, vec!["مخبز الحي".to_string()]);
    }

    #[test]
    fn test_no_issue_at_half_or_below() {
        let mut nodes = vec![node(1, "", "مخبز", &["سيارات", "مخبز الحي"], &[])];
        let outcome = validate_all(&mut nodes);
        // Exactly half removed: not an issue
        assert!(outcome.issues.is_empty());
        assert_eq!(outcome.stats.removed_ar, 1);
    }
}

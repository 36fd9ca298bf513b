// Search-keyword expansion from category names. The synonym tables are pure
// configuration data; a table key that appears inside the category name pulls
// the whole term list in. Lists are capped so a node never drowns in
// generated keywords.

use crate::taxonomy::CategoryNode;

const KEYWORD_CAP: usize = 20;

/// English related-term table, keyed by substrings of the lowercased name.
const EN_EXPANSIONS: &[(&str, &[&str])] = &[
    ("store", &["shop", "retail", "outlet", "mart", "market", "vendor", "retailer"]),
    ("restaurant", &["dining", "eatery", "cafe", "bistro", "food service", "cuisine"]),
    ("service", &["services", "provider", "company", "business"]),
    ("center", &["centre", "facility", "complex", "hub"]),
    ("clinic", &["medical center", "health center", "medical clinic", "healthcare"]),
    ("hospital", &["medical facility", "health facility", "medical center"]),
    ("pharmacy", &["drugstore", "chemist", "apothecary", "medication store"]),
    ("gym", &["fitness center", "health club", "fitness club", "workout center"]),
    ("salon", &["beauty salon", "hair salon", "beauty parlor", "styling salon"]),
    ("school", &["educational institution", "academy", "learning center", "institute"]),
    ("bank", &["banking", "financial institution", "finance"]),
    ("hotel", &["accommodation", "lodging", "inn", "resort", "hospitality"]),
    ("repair", &["fix", "maintenance", "service center", "repair shop"]),
    ("rental", &["rent", "lease", "hire", "renting"]),
    ("laundry", &["laundromat", "dry cleaning", "washing service", "cleaning service"]),
    ("bakery", &["bakeshop", "patisserie", "bread shop", "pastry shop"]),
    ("butcher", &["meat shop", "meat market", "butchery", "meat store"]),
    ("coffee", &["cafe", "coffee house", "coffee bar", "espresso bar"]),
    ("pet", &["animal", "pets", "pet care"]),
    ("car", &["auto", "automotive", "vehicle", "automobile"]),
    ("beauty", &["cosmetics", "makeup", "beauty products", "skincare"]),
    ("jewelry", &["jewellery", "jeweler", "gems", "accessories"]),
    ("clothing", &["clothes", "apparel", "fashion", "garments", "wear"]),
    ("furniture", &["furnishings", "home furniture", "decor"]),
    ("electronics", &["electronic", "gadgets", "tech", "technology"]),
    ("book", &["books", "bookstore", "bookshop", "library"]),
    ("toy", &["toys", "toy store", "playthings", "games"]),
    ("sports", &["sporting goods", "athletic", "fitness equipment"]),
    ("garden", &["gardening", "nursery", "plants", "landscaping"]),
    ("hardware", &["tools", "building supplies", "construction"]),
    ("optical", &["eyewear", "glasses", "vision", "optician"]),
    ("dental", &["dentistry", "teeth", "orthodontic", "oral care"]),
    ("insurance", &["coverage", "policy", "insurer", "protection"]),
    ("travel", &["tourism", "tour", "vacation", "trip"]),
    ("massage", &["spa", "therapy", "wellness", "relaxation"]),
    ("printing", &["print shop", "copy center", "printing service"]),
    ("photography", &["photo", "studio", "photographer", "pictures"]),
    ("florist", &["flowers", "flower shop", "floral", "bouquet"]),
    ("paint", &["painting", "paint store", "coatings", "decorating"]),
    ("plumbing", &["plumber", "pipes", "plumbing service"]),
    ("electrical", &["electrician", "electric", "wiring", "electrical service"]),
    ("construction", &["building", "contractor", "builder", "construction company"]),
    ("cleaning", &["cleaners", "cleaning service", "janitorial", "housekeeping"]),
    ("catering", &["caterer", "food service", "event catering", "party service"]),
    ("courier", &["delivery", "shipping", "messenger", "express"]),
    ("taxi", &["cab", "transportation", "ride", "car service"]),
    ("parking", &["car park", "parking lot", "garage"]),
    ("warehouse", &["storage", "depot", "distribution center"]),
];

/// Arabic synonym table, keyed by substrings of the name.
const AR_EXPANSIONS: &[(&str, &[&str])] = &[
    ("متجر", &["محل", "دكان", "مول", "منفذ بيع", "متاجر"]),
    ("مطعم", &["مطاعم", "مأكولات", "طعام", "مقهى"]),
    ("خدمات", &["خدمة", "مزود خدمة", "مقدم خدمة"]),
    ("مركز", &["مراكز", "منشأة", "صالة"]),
    ("عيادة", &["عيادات", "مركز طبي", "مركز صحي"]),
    ("مستشفى", &["مستشفيات", "مرفق طبي", "منشأة صحية"]),
    ("صيدلية", &["صيدليات", "دواء", "أدوية"]),
    ("صالة رياضية", &["نادي رياضي", "جيم", "لياقة بدنية", "فتنس"]),
    ("صالون", &["صالونات", "تجميل", "حلاقة", "عناية"]),
    ("مدرسة", &["مدارس", "تعليم", "أكاديمية", "معهد"]),
    ("بنك", &["بنوك", "مصرف", "مصارف", "خدمات مصرفية"]),
    ("فندق", &["فنادق", "إقامة", "منتجع", "نزل"]),
    ("إصلاح", &["تصليح", "صيانة", "ورشة"]),
    ("تأجير", &["إيجار", "استئجار", "كراء"]),
    ("مغسلة", &["غسيل", "تنظيف جاف", "مغاسل"]),
    ("مخبز", &["مخابز", "معجنات", "خبز", "حلويات"]),
    ("جزارة", &["لحوم", "قصاب", "جزار"]),
    ("قهوة", &["كافيه", "مقهى", "قهوة عربية"]),
    ("حيوانات أليفة", &["حيوانات", "بيطري", "رعاية حيوانات"]),
    ("سيارة", &["سيارات", "مركبة", "مركبات", "أوتو"]),
    ("تجميل", &["مستحضرات تجميل", "عناية بالبشرة", "مكياج"]),
    ("مجوهرات", &["ذهب", "فضة", "حلي", "إكسسوارات"]),
    ("ملابس", &["أزياء", "موضة", "ألبسة", "كسوة"]),
    ("أثاث", &["موبيليا", "عفش", "ديكور"]),
    ("إلكترونيات", &["إلكترونية", "أجهزة", "تقنية", "تكنولوجيا"]),
    ("كتب", &["كتاب", "مكتبة", "قراءة"]),
    ("ألعاب", &["لعب", "ألعاب أطفال", "تسلية"]),
    ("رياضة", &["رياضية", "معدات رياضية", "لياقة"]),
    ("حديقة", &["نباتات", "بستنة", "مشتل"]),
    ("أدوات", &["عدد", "معدات", "بناء"]),
    ("نظارات", &["بصريات", "عيون", "رؤية"]),
    ("أسنان", &["طب أسنان", "تقويم", "عناية بالأسنان"]),
    ("تأمين", &["تأمينات", "وثيقة", "حماية"]),
    ("سفر", &["سياحة", "رحلات", "سفريات"]),
    ("تدليك", &["مساج", "سبا", "استرخاء", "علاج"]),
    ("طباعة", &["طباعه", "نسخ", "مطبعة"]),
    ("تصوير", &["استوديو", "مصور", "صور"]),
    ("زهور", &["ورود", "باقات", "أزهار"]),
    ("دهانات", &["طلاء", "ديكور", "ألوان"]),
    ("سباكة", &["سباك", "أنابيب", "مواسير"]),
    ("كهرباء", &["كهربائي", "كهربائية", "أسلاك"]),
    ("بناء", &["مقاولات", "إنشاءات", "تشييد"]),
    ("تنظيف", &["نظافة", "تعقيم", "خدمات نظافة"]),
    ("تموين", &["طعام", "حفلات", "خدمات طعام"]),
    ("توصيل", &["شحن", "نقل", "ديليفري"]),
    ("تاكسي", &["أجرة", "مواصلات", "نقل"]),
    ("مواقف", &["موقف سيارات", "باركنج", "جراج"]),
    ("مستودع", &["تخزين", "مخزن", "توزيع"]),
];

fn contains_case_insensitive(keywords: &[String], term: &str) -> bool {
    let term = term.to_lowercase();
    keywords.iter().any(|k| k.to_lowercase() == term)
}

/// Expand English keywords for a category name on top of whatever curated
/// keywords already exist.
pub fn expand_english_keywords(name_en: &str, existing: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = existing.to_vec();
    let name_lower = name_en.to_lowercase();

    if !keywords.iter().any(|k| k == name_en) {
        keywords.push(name_en.to_string());
    }

    for (key, terms) in EN_EXPANSIONS {
        if name_lower.contains(key) {
            for term in *terms {
                if !contains_case_insensitive(&keywords, term) {
                    keywords.push((*term).to_string());
                }
            }
        }
    }

    let variations = [
        name_lower.clone(),
        name_en.replace(" and ", " & "),
        name_en.replace('-', " "),
    ];
    for variation in variations {
        if !variation.is_empty() && !contains_case_insensitive(&keywords, &variation) {
            keywords.push(variation);
        }
    }

    // Shopping-intent phrases for retail names
    if name_lower.contains("store") || name_lower.contains("shop") {
        let base = name_lower.replace(" store", "").replace(" shop", "");
        let base = base.trim();
        for descriptor in ["buy", "sell", "shopping", "purchase", "merchant"] {
            let combined = format!("{} {}", descriptor, base);
            if !contains_case_insensitive(&keywords, &combined) && keywords.len() < 15 {
                keywords.push(combined);
            }
        }
    }

    keywords.truncate(KEYWORD_CAP);
    keywords
}

/// Arabic counterpart; dedup is exact since there is no case to fold.
pub fn expand_arabic_keywords(name_ar: &str, existing: &[String]) -> Vec<String> {
    let mut keywords: Vec<String> = existing.to_vec();

    if !keywords.iter().any(|k| k == name_ar) {
        keywords.push(name_ar.to_string());
    }

    for (key, terms) in AR_EXPANSIONS {
        if name_ar.contains(key) {
            for term in *terms {
                if !keywords.iter().any(|k| k == term) {
                    keywords.push((*term).to_string());
                }
            }
        }
    }

    keywords.truncate(KEYWORD_CAP);
    keywords
}

pub fn expand_all(nodes: &mut [CategoryNode]) {
    for node in nodes {
        node.search_key_words_en =
            expand_english_keywords(&node.name_en, &node.search_key_words_en);
        node.search_key_words_ar =
            expand_arabic_keywords(&node.name_ar, &node.search_key_words_ar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_expansion_hits_table() {
        let keywords = expand_english_keywords("Seafood Restaurant", &[]);
        assert!(keywords.contains(&"Seafood Restaurant".to_string()));
        assert!(keywords.contains(&"dining".to_string()));
        assert!(keywords.contains(&"eatery".to_string()));
        // The lowercased-name variation folds into the seeded name
        let name_count = keywords
            .iter()
            .filter(|k| k.eq_ignore_ascii_case("seafood restaurant"))
            .count();
        assert_eq!(name_count, 1);
    }

    #[test]
    fn test_lowercase_variation_survives_only_when_distinct() {
        // Name already lowercase: no separate variation appears
        let keywords = expand_english_keywords("bank", &[]);
        assert_eq!(keywords.iter().filter(|k| *k == "bank").count(), 1);

        // Hyphenated name: the de-hyphenated variation is genuinely new
        let keywords = expand_english_keywords("Dry-Cleaning", &[]);
        assert!(keywords.contains(&"Dry Cleaning".to_string()));
    }

    #[test]
    fn test_english_expansion_caps_at_twenty() {
        // "store" + "pet" both hit; plenty of candidates
        let keywords = expand_english_keywords("Pet Store", &[]);
        assert!(keywords.len() <= 20);
        assert!(keywords.contains(&"pet care".to_string()));
        assert!(keywords.iter().any(|k| k.starts_with("buy ")));
    }

    #[test]
    fn test_english_dedup_is_case_insensitive() {
        let existing = vec!["Dining".to_string()];
        let keywords = expand_english_keywords("Restaurant", &existing);
        let dining_count = keywords
            .iter()
            .filter(|k| k.eq_ignore_ascii_case("dining"))
            .count();
        assert_eq!(dining_count, 1);
    }

    #[test]
    fn test_english_name_not_duplicated() {
        let existing = vec!["Bank".to_string()];
        let keywords = expand_english_keywords("Bank", &existing);
        assert_eq!(keywords.iter().filter(|k| *k == "Bank").count(), 1);
    }

    #[test]
    fn test_arabic_expansion_hits_table() {
        let keywords = expand_arabic_keywords("مخبز الحي", &[]);
        assert!(keywords.contains(&"مخبز الحي".to_string()));
        assert!(keywords.contains(&"مخابز".to_string()));
        assert!(keywords.contains(&"خبز".to_string()));
        assert!(keywords.len() <= 20);
    }

    #[test]
    fn test_arabic_existing_kept_first() {
        let existing = vec!["كلمة محفوظة".to_string()];
        let keywords = expand_arabic_keywords("صيدلية", &existing);
        assert_eq!(keywords[0], "كلمة محفوظة");
        assert!(keywords.contains(&"أدوية".to_string()));
    }

    #[test]
    fn test_expand_all_touches_both_languages() {
        let mut nodes = vec![crate::taxonomy::CategoryNode::auto(1, "Bakery", "مخبز", None)];
        expand_all(&mut nodes);
        assert!(nodes[0].search_key_words_en.contains(&"patisserie".to_string()));
        assert!(nodes[0].search_key_words_ar.contains(&"معجنات".to_string()));
    }
}

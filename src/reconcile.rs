// Taxonomy reconciler - merges the category/subcategory names found in a POI
// CSV into the existing taxonomy and resolves every row to node ids.
//
// All state lives in an explicit `Reconciliation` value that is built once and
// returned; nothing is mutated ambiently. Matching is exact: lowercased
// English names, raw Arabic names.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::poi::{PoiId, PoiRecord, PoiRow, UnmatchedRow};
use crate::taxonomy::{CategoryNode, NodeIndex};

/// The import report keeps a sample of unmatched rows, not all of them.
pub const UNMATCHED_SAMPLE_CAP: usize = 200;

// ============================================================================
// NAME KEYS
// ============================================================================

/// Dedup key for a category name pair: English lowercased, Arabic raw.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub en: String,
    pub ar: String,
}

impl CategoryKey {
    pub fn from_row(category_en: &str, category_ar: &str) -> Self {
        CategoryKey {
            en: category_en.trim().to_lowercase(),
            ar: category_ar.trim().to_string(),
        }
    }
}

/// Dedup key for a subcategory under its category pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubcategoryKey {
    pub category: CategoryKey,
    pub en: String,
    pub ar: String,
}

impl SubcategoryKey {
    pub fn from_row(row: &PoiRow) -> Self {
        SubcategoryKey {
            category: CategoryKey::from_row(&row.category_en, &row.category_ar),
            en: row.sub_category_en.trim().to_lowercase(),
            ar: row.sub_category_ar.trim().to_string(),
        }
    }
}

/// Original-cased names behind a discovery key, for node creation.
#[derive(Debug, Clone)]
struct DiscoveredNames {
    cat_en: String,
    cat_ar: String,
    sub_en: String,
    sub_ar: String,
}

// ============================================================================
// RECONCILIATION STATE
// ============================================================================

/// A category pair whose English and Arabic names matched two different
/// existing nodes. The English match wins; the conflict goes in the report
/// instead of being silently reconciled.
#[derive(Debug, Clone, Serialize)]
pub struct DualMatch {
    pub name_en: String,
    pub name_ar: String,
    pub id_en: i64,
    pub id_ar: i64,
}

/// Result of one reconciliation pass: the merged node list (existing nodes
/// untouched, new ones appended) plus the resolution maps in first-seen order.
pub struct Reconciliation {
    pub nodes: Vec<CategoryNode>,
    next_id: i64,
    pub category_ids: IndexMap<CategoryKey, i64>,
    pub subcategory_ids: IndexMap<SubcategoryKey, i64>,
    pub dual_matches: Vec<DualMatch>,
}

impl Reconciliation {
    fn new(nodes: Vec<CategoryNode>) -> Self {
        let next_id = nodes.iter().map(|n| n.id).max().unwrap_or(0);
        Reconciliation {
            nodes,
            next_id,
            category_ids: IndexMap::new(),
            subcategory_ids: IndexMap::new(),
            dual_matches: Vec::new(),
        }
    }

    /// Ids never collide: the counter starts at the current maximum and only
    /// moves forward.
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Nodes touched by this CSV (matched or created), in first-resolution
    /// order, categories before subcategories.
    pub fn touched_nodes(&self) -> Vec<CategoryNode> {
        let by_id: HashMap<i64, &CategoryNode> =
            self.nodes.iter().map(|n| (n.id, n)).collect();

        let mut seen = HashSet::new();
        let mut touched = Vec::new();
        for &id in self.category_ids.values().chain(self.subcategory_ids.values()) {
            if seen.insert(id) {
                if let Some(node) = by_id.get(&id) {
                    touched.push((*node).clone());
                }
            }
        }
        touched
    }
}

// ============================================================================
// CSV-DRIVEN DERIVATION
// ============================================================================

/// Scan the rows once, dedup the distinct category pairs and subcategory
/// tuples, then look-up-or-create a node for each. Existing nodes are matched
/// by lowercased English name or raw Arabic name (English first); misses get
/// a fresh id and an AUTO_ code.
pub fn derive_from_csv(rows: &[PoiRow], taxonomy: Vec<CategoryNode>) -> Reconciliation {
    // Discovery pass. IndexMap keeps first-seen order so output is
    // deterministic for a given CSV.
    let mut unique_cats: IndexMap<CategoryKey, DiscoveredNames> = IndexMap::new();
    let mut unique_subs: IndexMap<SubcategoryKey, DiscoveredNames> = IndexMap::new();

    for row in rows {
        let names = DiscoveredNames {
            cat_en: row.category_en.trim().to_string(),
            cat_ar: row.category_ar.trim().to_string(),
            sub_en: row.sub_category_en.trim().to_string(),
            sub_ar: row.sub_category_ar.trim().to_string(),
        };

        let cat_key = CategoryKey::from_row(&row.category_en, &row.category_ar);
        unique_cats.entry(cat_key).or_insert_with(|| names.clone());

        if !names.sub_en.is_empty() || !names.sub_ar.is_empty() {
            unique_subs
                .entry(SubcategoryKey::from_row(row))
                .or_insert(names);
        }
    }

    // Name lookups over the taxonomy as it was loaded. Deliberately not
    // refreshed as nodes are appended, so two distinct CSV spellings of a new
    // category stay two nodes.
    let mut by_en: HashMap<String, i64> = HashMap::new();
    let mut by_ar: HashMap<String, i64> = HashMap::new();
    for node in &taxonomy {
        let en = node.name_en.trim().to_lowercase();
        if !en.is_empty() {
            by_en.insert(en, node.id);
        }
        let ar = node.name_ar.trim();
        if !ar.is_empty() {
            by_ar.insert(ar.to_string(), node.id);
        }
    }

    let mut state = Reconciliation::new(taxonomy);

    // Top-level categories
    for (key, names) in &unique_cats {
        let en_hit = by_en.get(&key.en).copied();
        let ar_hit = by_ar.get(&key.ar).copied();

        let cat_id = match (en_hit, ar_hit) {
            (Some(en_id), Some(ar_id)) if en_id != ar_id => {
                state.dual_matches.push(DualMatch {
                    name_en: names.cat_en.clone(),
                    name_ar: names.cat_ar.clone(),
                    id_en: en_id,
                    id_ar: ar_id,
                });
                en_id
            }
            (Some(en_id), _) => en_id,
            (None, Some(ar_id)) => ar_id,
            (None, None) => {
                let id = state.allocate_id();
                state
                    .nodes
                    .push(CategoryNode::auto(id, &names.cat_en, &names.cat_ar, None));
                id
            }
        };
        state.category_ids.insert(key.clone(), cat_id);
    }

    // Subcategories, keyed by (parent id, names) among nodes with that parent
    let mut subs_index: HashMap<(i64, String, String), i64> = HashMap::new();
    for node in &state.nodes {
        if let Some(parent_id) = node.parent_id {
            subs_index.insert(
                (
                    parent_id,
                    node.name_en.trim().to_lowercase(),
                    node.name_ar.trim().to_string(),
                ),
                node.id,
            );
        }
    }

    for (key, names) in unique_subs {
        let parent_id = match state.category_ids.get(&key.category).copied() {
            Some(id) => id,
            None => {
                // Shouldn't happen - discovery derives both sets from the same
                // rows - but create the missing parent rather than drop data.
                let id = state.allocate_id();
                state
                    .nodes
                    .push(CategoryNode::auto(id, &names.cat_en, &names.cat_ar, None));
                state.category_ids.insert(key.category.clone(), id);
                id
            }
        };

        let lookup = (parent_id, key.en.clone(), key.ar.clone());
        let sub_id = match subs_index.get(&lookup).copied() {
            Some(id) => id,
            None => {
                let id = state.allocate_id();
                state.nodes.push(CategoryNode::auto(
                    id,
                    &names.sub_en,
                    &names.sub_ar,
                    Some(parent_id),
                ));
                subs_index.insert(lookup, id);
                id
            }
        };
        state.subcategory_ids.insert(key, sub_id);
    }

    state
}

// ============================================================================
// POI RESOLUTION
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportCounters {
    pub rows: u64,
    pub matched: u64,
    pub matched_sub: u64,
    pub matched_cat_only: u64,
    pub unmatched: u64,
    pub skipped_missing_id: u64,
}

pub struct PoiResolution {
    pub pois: Vec<PoiRecord>,
    pub unmatched: Vec<UnmatchedRow>,
    pub counters: ImportCounters,
}

/// Resolve rows against the maps a reconciliation pass built. Subcategory
/// match preferred; its parent becomes the POI's category.
pub fn resolve_pois(rows: &[PoiRow], reconciliation: &Reconciliation) -> PoiResolution {
    let by_id: HashMap<i64, &CategoryNode> =
        reconciliation.nodes.iter().map(|n| (n.id, n)).collect();

    resolve_rows(rows, |row| {
        let has_sub = !row.sub_category_en.trim().is_empty()
            || !row.sub_category_ar.trim().is_empty();

        if has_sub {
            let sub_key = SubcategoryKey::from_row(row);
            if let Some(&sub_id) = reconciliation.subcategory_ids.get(&sub_key) {
                let sub = by_id.get(&sub_id).copied();
                let cat = sub
                    .and_then(|s| s.parent_id)
                    .and_then(|pid| by_id.get(&pid).copied());
                return (cat, sub);
            }
        }

        let cat_key = CategoryKey::from_row(&row.category_en, &row.category_ar);
        let cat = reconciliation
            .category_ids
            .get(&cat_key)
            .and_then(|id| by_id.get(id).copied());
        (cat, None)
    })
}

/// Resolve rows directly against the taxonomy as given, creating nothing.
/// Subcategory names are tried first (English, then Arabic), falling back to
/// the category names.
pub fn resolve_pois_direct(rows: &[PoiRow], taxonomy: &[CategoryNode]) -> PoiResolution {
    let index = NodeIndex::build(taxonomy);

    resolve_rows(rows, |row| {
        let sub = index.find_by_names(&row.sub_category_en, &row.sub_category_ar);
        if let Some(sub) = sub {
            let cat = sub.parent_id.and_then(|pid| index.by_id.get(&pid).copied());
            return (cat, Some(sub));
        }

        let cat = index.find_by_names(&row.category_en, &row.category_ar);
        (cat, None)
    })
}

fn resolve_rows<'a, F>(rows: &[PoiRow], match_row: F) -> PoiResolution
where
    F: Fn(&PoiRow) -> (Option<&'a CategoryNode>, Option<&'a CategoryNode>),
{
    let mut pois = Vec::new();
    let mut unmatched = Vec::new();
    let mut counters = ImportCounters::default();

    for row in rows {
        counters.rows += 1;

        let poi_id = match PoiId::parse(&row.id) {
            Some(id) => id,
            None => {
                counters.skipped_missing_id += 1;
                continue;
            }
        };

        let (cat, sub) = match_row(row);

        if cat.is_none() && sub.is_none() {
            counters.unmatched += 1;
            unmatched.push(UnmatchedRow {
                id: poi_id,
                name_en: row.name_en.trim().to_string(),
                name_ar: row.name_ar.trim().to_string(),
                category_en: row.category_en.clone(),
                category_ar: row.category_ar.clone(),
                sub_category_en: row.sub_category_en.clone(),
                sub_category_ar: row.sub_category_ar.clone(),
            });
            continue;
        }

        if sub.is_some() {
            counters.matched_sub += 1;
        } else {
            counters.matched_cat_only += 1;
        }
        counters.matched += 1;

        let category_id = match (sub, cat) {
            (Some(sub), _) => sub.parent_id,
            (None, Some(cat)) => Some(cat.id),
            (None, None) => None,
        };

        pois.push(PoiRecord {
            id: poi_id,
            name_en: row.name_en.trim().to_string(),
            name_ar: row.name_ar.trim().to_string(),
            category_id,
            category_name_en: cat.map(|c| c.name_en.clone()),
            category_name_ar: cat.map(|c| c.name_ar.clone()),
            subcategory_id: sub.map(|s| s.id),
            subcategory_name_en: sub.map(|s| s.name_en.clone()),
            subcategory_name_ar: sub.map(|s| s.name_ar.clone()),
        });
    }

    PoiResolution {
        pois,
        unmatched,
        counters,
    }
}

// ============================================================================
// IMPORT REPORT
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub summary: ImportCounters,
    pub dual_matches: Vec<DualMatch>,
    pub unmatched: Vec<UnmatchedRow>,
}

impl ImportReport {
    /// Caps the unmatched sample; the counters still reflect the full count.
    pub fn new(
        summary: ImportCounters,
        dual_matches: Vec<DualMatch>,
        unmatched: Vec<UnmatchedRow>,
    ) -> Self {
        ImportReport {
            summary,
            dual_matches,
            unmatched: unmatched
                .into_iter()
                .take(UNMATCHED_SAMPLE_CAP)
                .collect(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

// Category taxonomy - the two-level category/subcategory tree stored in
// categories.json. Nodes share one id space; a node with parent_id is a
// subcategory of that parent.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Marks codes the importer generated itself, as opposed to curated ones.
pub const AUTO_CODE_PREFIX: &str = "AUTO_";

/// Generated codes are bounded; the prefix is not counted.
const CODE_MAX_LEN: usize = 12;

// ============================================================================
// CATEGORY NODE
// ============================================================================

/// One taxonomy node as persisted in the JSON files.
///
/// Identity: `id` (unique integer across roots and subcategories alike).
/// `created_at`/`updated_at` are carried for round-tripping but never set by
/// any of the batch tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: i64,
    pub name_ar: String,
    pub name_en: String,
    pub code: String,

    #[serde(default)]
    pub search_key_words_ar: Vec<String>,
    #[serde(default)]
    pub search_key_words_en: Vec<String>,

    /// None = top-level category, Some = subcategory of that node.
    pub parent_id: Option<i64>,

    pub description_ar: Option<String>,
    pub description_en: Option<String>,

    #[serde(default)]
    pub related_category: Vec<serde_json::Value>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CategoryNode {
    /// Build a node the importer derived from CSV names. Keyword lists start
    /// empty; the code is generated from the English name, falling back to the
    /// Arabic one.
    pub fn auto(id: i64, name_en: &str, name_ar: &str, parent_id: Option<i64>) -> Self {
        let code_source = if name_en.is_empty() { name_ar } else { name_en };

        CategoryNode {
            id,
            name_ar: name_ar.to_string(),
            name_en: name_en.to_string(),
            code: format!("{}{}", AUTO_CODE_PREFIX, sanitize_code(code_source)),
            search_key_words_ar: Vec::new(),
            search_key_words_en: Vec::new(),
            parent_id,
            description_ar: None,
            description_en: None,
            related_category: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Generate a short code from a display name.
///
/// Uppercase, runs of anything outside [A-Z0-9] collapse to a single `_`,
/// leading/trailing separators dropped, `AUTO` when nothing survives (Arabic
/// names have no ASCII letters), truncated to a bounded length.
pub fn sanitize_code(name: &str) -> String {
    let mut code = String::new();
    let mut gap = false;

    for ch in name.to_uppercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if gap && !code.is_empty() {
                code.push('_');
            }
            code.push(ch);
            gap = false;
        } else {
            gap = true;
        }
    }

    if code.is_empty() {
        code.push_str("AUTO");
    }
    code.truncate(CODE_MAX_LEN);
    code
}

// ============================================================================
// NAME INDEX
// ============================================================================

/// Lookup tables over a node list: by id, by lowercased English name, by raw
/// Arabic name. Arabic is deliberately not normalized further (diacritics,
/// letter unification); name matching uses raw equality.
///
/// Duplicate names keep the last node seen, matching how the JSON files have
/// always been indexed.
pub struct NodeIndex<'a> {
    pub by_id: HashMap<i64, &'a CategoryNode>,
    pub by_en: HashMap<String, &'a CategoryNode>,
    pub by_ar: HashMap<String, &'a CategoryNode>,
}

impl<'a> NodeIndex<'a> {
    pub fn build(nodes: &'a [CategoryNode]) -> Self {
        let mut by_id = HashMap::new();
        let mut by_en = HashMap::new();
        let mut by_ar = HashMap::new();

        for node in nodes {
            by_id.insert(node.id, node);

            let en = node.name_en.trim().to_lowercase();
            if !en.is_empty() {
                by_en.insert(en, node);
            }
            let ar = node.name_ar.trim();
            if !ar.is_empty() {
                by_ar.insert(ar.to_string(), node);
            }
        }

        NodeIndex { by_id, by_en, by_ar }
    }

    /// English lookup first, Arabic second. When both would hit different
    /// nodes the English one wins; callers that care about the conflict check
    /// both maps themselves.
    pub fn find_by_names(&self, name_en: &str, name_ar: &str) -> Option<&'a CategoryNode> {
        let en = name_en.trim().to_lowercase();
        if !en.is_empty() {
            if let Some(node) = self.by_en.get(&en) {
                return Some(node);
            }
        }
        let ar = name_ar.trim();
        if !ar.is_empty() {
            if let Some(node) = self.by_ar.get(ar) {
                return Some(node);
            }
        }
        None
    }
}

// ============================================================================
// FILE I/O
// ============================================================================

pub fn load_nodes(path: &Path) -> Result<Vec<CategoryNode>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let nodes = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse categories from {}", path.display()))?;
    Ok(nodes)
}

pub fn save_nodes(path: &Path, nodes: &[CategoryNode]) -> Result<()> {
    let json = serde_json::to_string_pretty(nodes)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

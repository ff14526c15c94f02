//! OEFOS discipline classification
//!
//! The form keeps a flat list of OEFOS codes. LOM stores them as one
//! classification block with purpose `discipline` holding one taxonpath per
//! code, each path running from the broadest ancestor down to the code.

use crate::{Error, Result};
use lom_ir::{FieldPath, LangString, langstring_text, vocabularify};
use lom_ir::langstring::NO_LANGUAGE;
use lom_vocab::{OEFOS, Vocabulary};
use regex::Regex;
use serde_json::{Value, json};
use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Base URI of OEFOS 2012 taxon identifiers.
pub const OEFOS_BASE_URI: &str = "https://w3id.org/oerbase/vocabs/oefos2012";

/// Classification purpose that holds OEFOS codes.
pub const DISCIPLINE: &str = "discipline";

/// Prefix lengths at which an OEFOS code splits into its ancestors.
pub const TAXON_CUT_LENGTHS: [usize; 4] = [1, 3, 4, 6];

static TAXON_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{}/(\d+)$", regex::escape(OEFOS_BASE_URI)))
        .expect("taxon id pattern is valid")
});

/// Extract the code from a taxon identifier (`<base>/2074` → `2074`).
pub fn code_from_taxon_id(id: &str) -> Option<&str> {
    TAXON_ID
        .captures(id)
        .and_then(|captures| captures.get(1))
        .map(|code| code.as_str())
}

/// Taxon identifier for a code.
pub fn taxon_id(code: &str) -> String {
    format!("{OEFOS_BASE_URI}/{code}")
}

/// Whether a classification block has purpose `discipline`.
pub fn is_discipline(classification: &Value) -> bool {
    FieldPath::dotted("purpose.value")
        .get(classification)
        .and_then(langstring_text)
        == Some(DISCIPLINE)
}

/// Codes held by the first discipline classification.
///
/// Every taxon of every path contributes its code, so ancestors show up
/// alongside the codes they lead to. The result is deduplicated and sorted
/// as strings, which puts `"10"` before `"9"`.
pub fn decode(classifications: &[Value]) -> Vec<String> {
    let Some(discipline) = classifications.iter().find(|c| is_discipline(c)) else {
        return Vec::new();
    };

    let taxonpath = FieldPath::dotted("taxonpath");
    let taxon = FieldPath::dotted("taxon");
    let id = FieldPath::dotted("id");

    let codes: BTreeSet<&str> = taxonpath
        .get_array(discipline)
        .iter()
        .flat_map(|path| taxon.get_array(path))
        .filter_map(|node| id.get_str(node))
        .filter_map(code_from_taxon_id)
        .collect();
    codes.into_iter().map(str::to_string).collect()
}

/// Keep only the most specific codes.
///
/// Empty codes are ignored. A code is dropped when it is a prefix of another
/// kept code (including an identical duplicate). The survivors are returned
/// in ascending string order.
pub fn reduce<'a>(codes: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut candidates: Vec<&str> = codes.into_iter().filter(|code| !code.is_empty()).collect();
    candidates.sort_by_key(|code| (Reverse(code.len()), *code));

    let mut kept: Vec<&str> = Vec::new();
    for code in candidates {
        if kept.iter().any(|longer| longer.starts_with(code)) {
            trace!("Dropping OEFOS code {} covered by a more specific code", code);
            continue;
        }
        kept.push(code);
    }

    kept.sort_unstable();
    kept.into_iter().map(str::to_string).collect()
}

/// Ancestor chain of a code, broadest first (`2074` → `2`, `207`, `2074`).
pub fn taxon_chain(code: &str) -> Vec<&str> {
    TAXON_CUT_LENGTHS
        .iter()
        .filter(|len| **len <= code.len())
        .filter_map(|len| code.get(..*len))
        .collect()
}

/// Build the discipline classification for already-reduced `codes`.
///
/// # Errors
///
/// Returns [`Error::MissingLabel`] for the first chain element without a
/// label in `labels`.
pub fn classification_block(codes: &[String], labels: Option<&Vocabulary>) -> Result<Value> {
    let mut taxonpaths = Vec::with_capacity(codes.len());
    for code in codes {
        let mut taxa = Vec::new();
        for prefix in taxon_chain(code) {
            let label = labels
                .and_then(|vocabulary| vocabulary.label(prefix))
                .ok_or_else(|| Error::missing_label(OEFOS, prefix))?;
            taxa.push(json!({
                "id": taxon_id(prefix),
                "entry": LangString::untagged(label).to_value(),
            }));
        }
        taxonpaths.push(json!({
            "source": LangString::new(OEFOS_BASE_URI, NO_LANGUAGE).to_value(),
            "taxon": taxa,
        }));
    }
    debug!("Built discipline classification with {} taxonpaths", taxonpaths.len());

    Ok(json!({
        "purpose": vocabularify(DISCIPLINE),
        "taxonpath": taxonpaths,
    }))
}

/// Replace every discipline block in `classifications` by `block`, placed
/// first.
pub fn replace_discipline(classifications: &[Value], block: Value) -> Vec<Value> {
    std::iter::once(block)
        .chain(
            classifications
                .iter()
                .filter(|c| !is_discipline(c))
                .cloned(),
        )
        .collect()
}

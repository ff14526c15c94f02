//! Contributor encoding
//!
//! LOM groups contributors by role (`{role, entity: [names..]}`), the form
//! holds one row per person. Decoding expands each entity into its own row;
//! encoding groups rows back by role in order of first appearance.

use crate::form::{ContributorRow, scalar_text};
use lom_ir::{FieldPath, vocabularify};
use lom_vocab::Vocabulary;
use serde_json::{Value, json};
use tracing::{trace, warn};

/// Expand `lifecycle.contribute` entries into form rows.
///
/// Roles missing from `roles` become the empty role; the names are kept.
pub fn decode(contribute: &[Value], roles: Option<&Vocabulary>) -> Vec<ContributorRow> {
    let role_path = FieldPath::dotted("role.value.langstring.#text");
    let entity_path = FieldPath::dotted("entity");

    let mut rows = Vec::new();
    for entry in contribute {
        let mut role = role_path.get(entry).and_then(scalar_text).unwrap_or_default();
        if !roles.is_some_and(|vocabulary| vocabulary.contains(&role)) {
            if !role.is_empty() {
                warn!("Unknown contributor role '{}', clearing it", role);
            }
            role.clear();
        }

        for entity in entity_path.get_array(entry) {
            match scalar_text(entity) {
                Some(name) => rows.push(ContributorRow::new(role.clone(), name)),
                None => trace!("Skipping non-text contributor entity: {}", entity),
            }
        }
    }
    rows
}

/// Group form rows by role into `lifecycle.contribute` entries.
///
/// Groups appear in order of each role's first row; names keep their row
/// order. Rows with an empty name are kept.
pub fn encode(rows: &[ContributorRow]) -> Vec<Value> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for row in rows {
        let role = row.role.value.as_str();
        match groups.iter_mut().find(|(existing, _)| *existing == role) {
            Some((_, names)) => names.push(row.name.as_str()),
            None => groups.push((role, vec![row.name.as_str()])),
        }
    }

    groups
        .into_iter()
        .map(|(role, names)| json!({ "role": vocabularify(role), "entity": names }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lom_vocab::VocabularyEntry;

    fn roles() -> Vocabulary {
        ["Author", "Publisher"]
            .into_iter()
            .map(|role| (role, VocabularyEntry::named(role)))
            .collect()
    }

    fn entry(role: &str, names: &[&str]) -> Value {
        json!({ "role": vocabularify(role), "entity": names })
    }

    #[test]
    fn test_decode_expands_entities() {
        let contribute = vec![
            entry("Author", &["Ada", "Bob", "Cy"]),
            entry("Publisher", &["TU Graz"]),
        ];
        let roles = roles();

        let rows = decode(&contribute, Some(&roles));

        assert_eq!(
            rows,
            vec![
                ContributorRow::new("Author", "Ada"),
                ContributorRow::new("Author", "Bob"),
                ContributorRow::new("Author", "Cy"),
                ContributorRow::new("Publisher", "TU Graz"),
            ]
        );
    }

    #[test]
    fn test_decode_unknown_role_keeps_name() {
        let contribute = vec![entry("nonexistent-role", &["Jane"])];
        let roles = roles();

        let rows = decode(&contribute, Some(&roles));

        assert_eq!(rows, vec![ContributorRow::new("", "Jane")]);
    }

    #[test]
    fn test_decode_without_vocabulary_clears_all_roles() {
        let contribute = vec![entry("Author", &["Ada"])];

        assert_eq!(decode(&contribute, None), vec![ContributorRow::new("", "Ada")]);
    }

    #[test]
    fn test_decode_tolerates_partial_entries() {
        let contribute = vec![
            json!({"entity": ["NoRole"]}),
            json!({"role": vocabularify("Author")}),
            json!({"role": vocabularify("Author"), "entity": [null, "Ada"]}),
        ];
        let roles = roles();

        let rows = decode(&contribute, Some(&roles));

        assert_eq!(
            rows,
            vec![
                ContributorRow::new("", "NoRole"),
                ContributorRow::new("Author", "Ada"),
            ]
        );
    }

    #[test]
    fn test_encode_groups_by_role() {
        let rows = vec![
            ContributorRow::new("Author", "Ada"),
            ContributorRow::new("", "Nobody"),
            ContributorRow::new("Publisher", "TU Graz"),
            ContributorRow::new("Author", "Bob"),
            ContributorRow::new("", ""),
        ];

        let contribute = encode(&rows);

        assert_eq!(
            contribute,
            vec![
                entry("Author", &["Ada", "Bob"]),
                entry("", &["Nobody", ""]),
                entry("Publisher", &["TU Graz"]),
            ]
        );
    }

    #[test]
    fn test_encode_empty() {
        assert!(encode(&[]).is_empty());
    }
}

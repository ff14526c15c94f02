//! Flat form model edited by the deposit UI
//!
//! The UI stores everything it edits under `metadata.form`. Values arrive from
//! widgets that are not strict about types, so reading is lenient: numbers
//! become their decimal string, `null` becomes the empty default, and `null`
//! list rows are dropped.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

/// Flat projection of a LOM record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormModel {
    #[serde(deserialize_with = "lenient_string")]
    pub title: String,

    #[serde(deserialize_with = "null_as_default")]
    pub license: ValueField,

    #[serde(deserialize_with = "null_as_default")]
    pub format: ValueField,

    #[serde(deserialize_with = "null_as_default")]
    pub resourcetype: ValueField,

    #[serde(deserialize_with = "lenient_rows")]
    pub contributor: Vec<ContributorRow>,

    #[serde(deserialize_with = "lenient_rows")]
    pub oefos: Vec<ValueField>,

    #[serde(deserialize_with = "lenient_string")]
    pub description: String,

    #[serde(deserialize_with = "lenient_rows")]
    pub tag: Vec<ValueField>,

    #[serde(deserialize_with = "null_as_default")]
    pub language: ValueField,
}

/// A `{value}` widget slot
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueField {
    #[serde(deserialize_with = "lenient_string")]
    pub value: String,
}

/// One contributor row: a single name holding a single role
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorRow {
    #[serde(deserialize_with = "null_as_default")]
    pub role: ValueField,

    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
}

impl ValueField {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn to_value(&self) -> Value {
        json!({ "value": self.value })
    }
}

impl ContributorRow {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: ValueField::new(role),
            name: name.into(),
        }
    }
}

impl FormModel {
    /// Read a form subtree leniently.
    ///
    /// # Errors
    ///
    /// Fails when the subtree is not an object or a field has an
    /// irreconcilable shape (e.g. `contributor` is a string).
    pub fn from_value(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// JSON form as stored under `metadata.form`.
    pub fn to_value(&self) -> Value {
        json!({
            "title": self.title,
            "license": self.license.to_value(),
            "format": self.format.to_value(),
            "resourcetype": self.resourcetype.to_value(),
            "contributor": self
                .contributor
                .iter()
                .map(|row| json!({ "role": row.role.to_value(), "name": row.name }))
                .collect::<Vec<_>>(),
            "oefos": self.oefos.iter().map(ValueField::to_value).collect::<Vec<_>>(),
            "description": self.description,
            "tag": self.tag.iter().map(ValueField::to_value).collect::<Vec<_>>(),
            "language": self.language.to_value(),
        })
    }
}

/// Text of a scalar: strings as-is, numbers in decimal, anything else `None`.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag.to_string(),
        other => scalar_text(&other).unwrap_or_default(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<Option<T>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_empty_object() {
        let form = FormModel::from_value(&json!({})).unwrap();

        assert_eq!(form, FormModel::default());
    }

    #[test]
    fn test_from_value_is_lenient() {
        let form = FormModel::from_value(&json!({
            "title": null,
            "license": null,
            "format": {"value": null},
            "contributor": [
                {"__key": 0, "role": null, "name": "Ada"},
                null,
                {"role": {"value": "Author"}}
            ],
            "oefos": [{"value": 2074}, {"value": "1"}],
            "tag": null,
            "language": {"value": "de", "label": "Deutsch"}
        }))
        .unwrap();

        assert_eq!(form.title, "");
        assert_eq!(form.license, ValueField::default());
        assert_eq!(form.format.value, "");
        assert_eq!(
            form.contributor,
            vec![
                ContributorRow::new("", "Ada"),
                ContributorRow::new("Author", "")
            ]
        );
        assert_eq!(form.oefos, vec![ValueField::new("2074"), ValueField::new("1")]);
        assert!(form.tag.is_empty());
        assert_eq!(form.language.value, "de");
    }

    #[test]
    fn test_from_value_rejects_wrong_shape() {
        assert!(FormModel::from_value(&json!({"contributor": "Ada"})).is_err());
        assert!(FormModel::from_value(&json!("not a form")).is_err());
    }

    #[test]
    fn test_to_value_round_trips() {
        let form = FormModel {
            title: "Intro".to_string(),
            license: ValueField::new("https://creativecommons.org/licenses/by/4.0"),
            format: ValueField::new("text/plain"),
            resourcetype: ValueField::new("video"),
            contributor: vec![ContributorRow::new("Author", "Ada")],
            oefos: vec![ValueField::new("101")],
            description: "About".to_string(),
            tag: vec![ValueField::new("math")],
            language: ValueField::new("en"),
        };

        let value = form.to_value();

        assert_eq!(value["contributor"][0], json!({"role": {"value": "Author"}, "name": "Ada"}));
        assert_eq!(FormModel::from_value(&value).unwrap(), form);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("x")), Some("x".to_string()));
        assert_eq!(scalar_text(&json!(207)), Some("207".to_string()));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!({"a": 1})), None);
    }
}

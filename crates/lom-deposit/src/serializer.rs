//! Deposit record serializer
//!
//! Converts between persisted LOM records and the flat [`FormModel`] the
//! deposit UI edits under `metadata.form`.

use crate::errors::{ErrorModel, FieldError, RedirectRule, default_redirects, map_errors};
use crate::form::{FormModel, ValueField, scalar_text};
use crate::{Error, Result, contributor, oefos};
use lom_ir::langstring::NO_LANGUAGE;
use lom_ir::{FieldPath, LangString, Record, strip_list_item_keys, vocabularify};
use lom_vocab::{CONTRIBUTOR, OEFOS, Vocabularies};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, trace};

/// Top-level keys kept when loading a record into the form
pub const DESERIALIZE_KEYS: &[&str] = &[
    "access",
    "custom_fields",
    "expanded",
    "files",
    "id",
    "is_published",
    "links",
    "metadata",
    "parent",
    "pids",
    "resource_type",
    "status",
    "ui",
    "versions",
];

/// Top-level keys sent back to the server
pub const SERIALIZE_KEYS: &[&str] = &[
    "access",
    "custom_fields",
    "files",
    "id",
    "links",
    "metadata",
    "parent",
    "pids",
    "resource_type",
];

/// Row key the editing UI adds to list items
pub const LIST_ITEM_KEY: &str = "__key";

/// Creative Commons license URLs start with this
pub const CC_URL_PREFIX: &str = "https://creativecommons.org/";

/// Language tag marking a rights description that is a CC license URL
pub const CC_URL_LANG: &str = "x-t-cc-url";

/// Scheme of `educational.learningresourcetype`
pub const HCRT_SCHEME: &str = "https://w3id.org/kim/hcrt/scheme";

/// Bidirectional serializer for one edit session
///
/// Holds the active locale and the vocabularies; both are read-only once
/// constructed, so a serializer can be shared between threads.
#[derive(Debug, Clone)]
pub struct DepositSerializer {
    locale: String,
    vocabularies: Arc<Vocabularies>,
    redirects: Vec<RedirectRule>,
}

impl DepositSerializer {
    pub fn new(locale: impl Into<String>, vocabularies: impl Into<Arc<Vocabularies>>) -> Self {
        Self {
            locale: locale.into(),
            vocabularies: vocabularies.into(),
            redirects: default_redirects(),
        }
    }

    /// Replace the error redirection rules.
    #[must_use]
    pub fn with_redirects(mut self, redirects: Vec<RedirectRule>) -> Self {
        self.redirects = redirects;
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn vocabularies(&self) -> &Vocabularies {
        &self.vocabularies
    }

    /// Copy of `record` restricted to [`DESERIALIZE_KEYS`] with
    /// `metadata.form` filled from the LOM fields.
    ///
    /// Missing fields never fail; they produce empty form values.
    pub fn deserialize(&self, record: &Record) -> Record {
        let mut output = record.pick(DESERIALIZE_KEYS);
        let form = match record.metadata() {
            Some(metadata) => self.deserialize_form(metadata),
            None => FormModel::default(),
        };
        debug!(
            "Deserialized form with {} contributor row(s) and {} OEFOS code(s)",
            form.contributor.len(),
            form.oefos.len()
        );
        output.set(&FieldPath::dotted("metadata.form"), form.to_value());
        output
    }

    /// Project a `metadata` subtree onto the form.
    pub fn deserialize_form(&self, metadata: &Value) -> FormModel {
        let text = |path: &str| {
            FieldPath::dotted(path)
                .get(metadata)
                .and_then(scalar_text)
                .unwrap_or_default()
        };
        let list = |path: &str| FieldPath::dotted(path).get_array(metadata);
        let langstring_text = FieldPath::dotted("langstring.#text");

        FormModel {
            title: text("general.title.langstring.#text"),
            license: ValueField::new(text("rights.url")),
            format: ValueField::new(text("technical.format.0")),
            resourcetype: ValueField::new(text("educational.learningresourcetype.id")),
            contributor: contributor::decode(
                list("lifecycle.contribute"),
                self.vocabularies.get(CONTRIBUTOR),
            ),
            oefos: oefos::decode(list("classification"))
                .into_iter()
                .map(ValueField::new)
                .collect(),
            description: text("general.description.0.langstring.#text"),
            tag: list("general.keyword")
                .iter()
                .map(|keyword| {
                    ValueField::new(
                        langstring_text
                            .get(keyword)
                            .and_then(scalar_text)
                            .unwrap_or_default(),
                    )
                })
                .collect(),
            language: ValueField::new(text("general.language.0")),
        }
    }

    /// Write `metadata.form` back into the LOM fields and drop it.
    ///
    /// The result is restricted to [`SERIALIZE_KEYS`]; `metadata` is created
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Form`] when `metadata.form` has an unusable shape and
    /// [`Error::MissingLabel`] when an OEFOS code (or one of its ancestors)
    /// has no label.
    pub fn serialize(&self, record: &Record) -> Result<Record> {
        let mut output = record.pick(SERIALIZE_KEYS);
        let location = record
            .get_str(&FieldPath::dotted("links.record_html"))
            .map(str::to_string);

        let metadata = output.metadata_mut();
        let stripped = strip_list_item_keys(metadata, LIST_ITEM_KEY);
        trace!("Stripped {} list item key(s)", stripped);

        let form_path = FieldPath::dotted("form");
        let form = match form_path.get(metadata) {
            Some(form) => FormModel::from_value(form).map_err(Error::Form)?,
            None => FormModel::default(),
        };
        let set = |metadata: &mut Value, path: &str, value: Value| {
            FieldPath::dotted(path).set(metadata, value);
        };

        set(
            metadata,
            "general.title",
            LangString::new(form.title.as_str(), self.locale.as_str()).to_value(),
        );
        set(metadata, "rights", rights(&form.license.value));
        set(metadata, "technical.format.0", json!(form.format.value));
        if let Some(location) = location {
            set(metadata, "technical.location.#text", json!(location));
        }
        set(
            metadata,
            "educational.learningresourcetype",
            json!({
                "source": LangString::new(HCRT_SCHEME, NO_LANGUAGE).to_value(),
                "id": form.resourcetype.value,
            }),
        );

        let contribute = contributor::encode(&form.contributor);
        debug!("Encoded {} contributor group(s)", contribute.len());
        set(metadata, "lifecycle.contribute", Value::Array(contribute));

        let codes = oefos::reduce(form.oefos.iter().map(|field| field.value.as_str()));
        debug!("Retained OEFOS codes: {:?}", codes);
        let block = oefos::classification_block(&codes, self.vocabularies.get(OEFOS))?;
        let classifications =
            oefos::replace_discipline(FieldPath::dotted("classification").get_array(metadata), block);
        set(metadata, "classification", Value::Array(classifications));

        if form.description.is_empty() {
            set(metadata, "general.description", json!([]));
        } else {
            set(metadata, "general.description.0", self.langstring(&form.description));
        }

        let keywords: Vec<Value> = form
            .tag
            .iter()
            .filter(|tag| !tag.is_empty())
            .map(|tag| self.langstring(&tag.value))
            .collect();
        set(metadata, "general.keyword", Value::Array(keywords));

        if form.language.is_empty() {
            set(metadata, "general.language", json!([]));
        } else {
            set(metadata, "general.language.0", json!(form.language.value));
        }

        form_path.remove(metadata);
        Ok(output)
    }

    /// Arrange server validation errors for the form.
    pub fn deserialize_errors(&self, errors: &[FieldError]) -> ErrorModel {
        map_errors(errors, &self.redirects)
    }

    /// [`deserialize`](Self::deserialize) on a raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Record`] when `record` is not a JSON object.
    pub fn deserialize_value(&self, record: Value) -> Result<Value> {
        let record = Record::try_from(record)?;
        Ok(self.deserialize(&record).into_value())
    }

    /// [`serialize`](Self::serialize) on a raw JSON record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Record`] when `record` is not a JSON object, otherwise
    /// whatever [`serialize`](Self::serialize) returns.
    pub fn serialize_value(&self, record: Value) -> Result<Value> {
        let record = Record::try_from(record)?;
        Ok(self.serialize(&record)?.into_value())
    }

    fn langstring(&self, text: &str) -> Value {
        LangString::new(text, self.locale.as_str()).to_value()
    }
}

fn rights(url: &str) -> Value {
    let description = if url.starts_with(CC_URL_PREFIX) {
        LangString::new(url, CC_URL_LANG)
    } else {
        LangString::untagged(url)
    };
    json!({
        "copyrightandotherrestrictions": vocabularify("yes"),
        "url": url,
        "description": description.to_value(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serializer() -> DepositSerializer {
        DepositSerializer::new("de", Vocabularies::builtin())
    }

    #[test]
    fn test_rights_cc_url() {
        let value = rights("https://creativecommons.org/licenses/by/4.0/");

        assert_eq!(value["description"]["langstring"]["lang"], json!("x-t-cc-url"));
        assert_eq!(value["url"], json!("https://creativecommons.org/licenses/by/4.0/"));
        assert_eq!(
            value["copyrightandotherrestrictions"]["value"]["langstring"]["#text"],
            json!("yes")
        );
    }

    #[test]
    fn test_rights_other_url() {
        let value = rights("https://example.org/license");

        assert_eq!(
            value["description"],
            json!({"langstring": {"#text": "https://example.org/license"}})
        );
    }

    #[test]
    fn test_deserialize_empty_record() {
        let output = serializer().deserialize(&Record::new());

        let form = FormModel::from_value(&output.into_value()["metadata"]["form"]).unwrap();
        assert_eq!(form, FormModel::default());
    }

    #[test]
    fn test_deserialize_picks_allowed_keys() {
        let record = Record::try_from(json!({
            "id": "abc-123",
            "status": "draft",
            "revision_id": 4,
            "metadata": {}
        }))
        .unwrap();

        let output = serializer().deserialize(&record);

        assert_eq!(output.keys().collect::<Vec<_>>(), vec!["id", "metadata", "status"]);
    }

    #[test]
    fn test_deserialize_form_fields() {
        let metadata = json!({
            "general": {
                "title": {"langstring": {"#text": "Intro", "lang": "en"}},
                "description": [{"langstring": {"#text": "About", "lang": "en"}}],
                "keyword": [
                    {"langstring": {"#text": "math", "lang": "en"}},
                    {"langstring": {"#text": "algebra", "lang": "en"}}
                ],
                "language": ["en"]
            },
            "rights": {"url": "https://creativecommons.org/licenses/by/4.0"},
            "technical": {"format": ["video/mp4", "text/plain"]},
            "educational": {"learningresourcetype": {"id": "video"}}
        });

        let form = serializer().deserialize_form(&metadata);

        assert_eq!(form.title, "Intro");
        assert_eq!(form.license.value, "https://creativecommons.org/licenses/by/4.0");
        assert_eq!(form.format.value, "video/mp4");
        assert_eq!(form.resourcetype.value, "video");
        assert_eq!(form.description, "About");
        assert_eq!(form.tag, vec![ValueField::new("math"), ValueField::new("algebra")]);
        assert_eq!(form.language.value, "en");
    }

    #[test]
    fn test_serialize_without_metadata() {
        let record = Record::try_from(json!({"id": "x"})).unwrap();

        let output = serializer().serialize(&record).unwrap().into_value();

        assert_eq!(output["metadata"]["general"]["title"]["langstring"]["lang"], json!("de"));
        assert_eq!(output["metadata"]["general"]["keyword"], json!([]));
        assert!(output["metadata"].get("form").is_none());
    }

    #[test]
    fn test_serialize_rejects_bad_form() {
        let record = Record::try_from(json!({"metadata": {"form": {"contributor": "Ada"}}})).unwrap();

        assert!(matches!(serializer().serialize(&record), Err(Error::Form(_))));
    }

    #[test]
    fn test_value_helpers_reject_non_objects() {
        assert!(matches!(
            serializer().deserialize_value(json!([1, 2])),
            Err(Error::Record(_))
        ));
        assert!(matches!(
            serializer().serialize_value(json!("record")),
            Err(Error::Record(_))
        ));
    }

    #[test]
    fn test_custom_redirects() {
        let serializer =
            serializer().with_redirects(vec![RedirectRule::exact("a.b", "metadata.form.title")]);

        let model = serializer.deserialize_errors(&[FieldError::new("a.b", ["oops"])]);

        assert_eq!(model.get(&FieldPath::dotted("metadata.form.title")), Some("oops"));
        assert_eq!(model.get(&FieldPath::dotted("a.b")), Some("oops"));
    }
}

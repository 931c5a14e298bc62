use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use jsonschema::{Draft, Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use tracing::info;

use super::report::Violation;
use super::{file_name, list_files, read_json};
use crate::errors::{HarnessError, HarnessResult};

/// Suffix a schema file must carry to be loaded.
pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// Canonical `$id` of the draft 2020-12 meta-schema. The engine ships it in
/// its built-in registry, so schemas declaring it resolve offline.
pub const DRAFT_2020_12_ID: &str = "https://json-schema.org/draft/2020-12/schema";

/// Returns the discriminator stored at `properties.schema.const`.
pub fn discriminator(schema: &Value) -> Option<&str> {
    schema
        .pointer("/properties/schema/const")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
}

/// Resolves `$ref`s to schemas loaded from disk by their `$id`. Anything else
/// is refused so validation never reaches the network.
struct LocalRetriever {
    by_id: Arc<HashMap<String, Value>>,
}

impl Retrieve for LocalRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        let document = uri.split_once('#').map_or(uri, |(document, _)| document);
        self.by_id
            .get(document)
            .cloned()
            .ok_or_else(|| format!("{uri} is not a loaded schema").into())
    }
}

fn options(by_id: &Arc<HashMap<String, Value>>) -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(Draft::Draft202012);
    opts.should_validate_formats(true);
    opts.with_retriever(LocalRetriever { by_id: Arc::clone(by_id) });
    opts
}

pub struct SchemaEntry {
    file: String,
    validator: Validator,
}

impl SchemaEntry {
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Every violation of `instance` against this schema, empty when valid.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }
}

/// Schemas indexed by discriminator key, each with its compiled validator.
pub struct SchemaIndex {
    entries: HashMap<String, SchemaEntry>,
}

impl SchemaIndex {
    /// Loads every `*.schema.json` file in `dir`.
    pub fn load(dir: &Path) -> HarnessResult<Self> {
        let mut documents = Vec::new();
        for path in list_files(dir, SCHEMA_SUFFIX)? {
            let schema = read_json(&path)?;
            documents.push((file_name(&path), schema));
        }
        Self::from_schemas(documents)
    }

    /// Indexes already parsed schemas given as `(file name, schema)` pairs.
    ///
    /// Every discriminator is checked before anything is compiled, so
    /// cross-schema `$ref`s by `$id` resolve regardless of file order.
    pub fn from_schemas(documents: Vec<(String, Value)>) -> HarnessResult<Self> {
        let mut keyed: Vec<(String, String, Value)> = Vec::with_capacity(documents.len());
        let mut files_by_key: HashMap<String, String> = HashMap::new();
        for (file, schema) in documents {
            let key = discriminator(&schema)
                .ok_or_else(|| HarnessError::SchemaMalformed { file: file.clone() })?
                .to_string();
            if let Some(first) = files_by_key.insert(key.clone(), file.clone()) {
                return Err(HarnessError::DuplicateSchemaKey { key, first, second: file });
            }
            keyed.push((key, file, schema));
        }

        let by_id: HashMap<String, Value> = keyed
            .iter()
            .filter_map(|(_, _, schema)| {
                let id = schema.get("$id")?.as_str()?;
                Some((id.to_string(), schema.clone()))
            })
            .collect();
        let by_id = Arc::new(by_id);

        let mut entries = HashMap::with_capacity(keyed.len());
        for (key, file, schema) in keyed {
            let validator = options(&by_id).build(&schema).map_err(|e| {
                HarnessError::SchemaInvalid { key: key.clone(), reason: e.to_string() }
            })?;
            info!(key = %key, file = %file, "schema loaded");
            entries.insert(key, SchemaEntry { file, validator });
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loaded discriminator keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint_schema(key: &str) -> Value {
        json!({
            "$schema": DRAFT_2020_12_ID,
            "type": "object",
            "required": ["schema", "host", "port"],
            "properties": {
                "schema": { "const": key },
                "host": { "type": "string", "minLength": 1 },
                "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                "contact": { "type": "string", "format": "email" }
            }
        })
    }

    #[test]
    fn discriminator_requires_non_empty_string() {
        assert_eq!(discriminator(&endpoint_schema("foo/v1")), Some("foo/v1"));
        assert_eq!(discriminator(&endpoint_schema("")), None);
        assert_eq!(discriminator(&json!({"properties": {"schema": {"const": 3}}})), None);
        assert_eq!(discriminator(&json!({"type": "object"})), None);
    }

    #[test]
    fn one_entry_per_schema_keyed_by_discriminator() {
        let index = SchemaIndex::from_schemas(vec![
            ("foo.schema.json".into(), endpoint_schema("foo/v1")),
            ("bar.schema.json".into(), endpoint_schema("bar/v2")),
        ])
        .unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.keys(), vec!["bar/v2", "foo/v1"]);
        let entry = index.get("foo/v1").unwrap();
        assert_eq!(entry.file(), "foo.schema.json");
        assert!(index.get("baz/v1").is_none());
    }

    #[test]
    fn missing_discriminator_names_the_file() {
        let err = SchemaIndex::from_schemas(vec![("broken.schema.json".into(), json!({"type": "object"}))])
            .err()
            .unwrap();
        assert_eq!(err.code(), "SchemaMalformed");
        assert!(err.to_string().contains("broken.schema.json"));
    }

    #[test]
    fn duplicate_discriminator_is_rejected() {
        let err = SchemaIndex::from_schemas(vec![
            ("a.schema.json".into(), endpoint_schema("foo/v1")),
            ("b.schema.json".into(), endpoint_schema("foo/v1")),
        ])
        .err()
        .unwrap();
        match err {
            HarnessError::DuplicateSchemaKey { key, first, second } => {
                assert_eq!(key, "foo/v1");
                assert_eq!(first, "a.schema.json");
                assert_eq!(second, "b.schema.json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn collects_every_violation() {
        let index = SchemaIndex::from_schemas(vec![("foo.schema.json".into(), endpoint_schema("foo/v1"))]).unwrap();
        let entry = index.get("foo/v1").unwrap();
        assert!(entry
            .violations(&json!({"schema": "foo/v1", "host": "db", "port": 5432}))
            .is_empty());

        let violations = entry.violations(&json!({"schema": "foo/v1", "host": "", "port": 70000}));
        assert_eq!(violations.len(), 2);
        let paths: Vec<&str> = violations.iter().map(|v| v.instance_path.as_str()).collect();
        assert!(paths.contains(&"/host"));
        assert!(paths.contains(&"/port"));
    }

    #[test]
    fn discriminator_field_is_validated_too() {
        let index = SchemaIndex::from_schemas(vec![("foo.schema.json".into(), endpoint_schema("foo/v1"))]).unwrap();
        let violations = index
            .get("foo/v1")
            .unwrap()
            .violations(&json!({"schema": "foo/v2", "host": "db", "port": 1}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/schema");
    }

    #[test]
    fn string_formats_are_asserted() {
        let index = SchemaIndex::from_schemas(vec![("foo.schema.json".into(), endpoint_schema("foo/v1"))]).unwrap();
        let violations = index
            .get("foo/v1")
            .unwrap()
            .violations(&json!({"schema": "foo/v1", "host": "db", "port": 1, "contact": "not-an-email"}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "/contact");
    }

    #[test]
    fn unknown_keywords_are_ignored() {
        let mut schema = endpoint_schema("foo/v1");
        schema["x-owner"] = json!("connectivity");
        assert!(SchemaIndex::from_schemas(vec![("foo.schema.json".into(), schema)]).is_ok());
    }

    #[test]
    fn cross_schema_refs_resolve_by_id() {
        let address = json!({
            "$id": "https://flowguard.local/schemas/address.schema.json",
            "type": "object",
            "required": ["host"],
            "properties": {
                "schema": { "const": "address/v1" },
                "host": { "type": "string" }
            }
        });
        let link = json!({
            "$id": "https://flowguard.local/schemas/link.schema.json",
            "type": "object",
            "properties": {
                "schema": { "const": "link/v1" },
                "target": { "$ref": "address.schema.json" }
            }
        });
        let index = SchemaIndex::from_schemas(vec![
            ("link.schema.json".into(), link),
            ("address.schema.json".into(), address),
        ])
        .unwrap();
        let entry = index.get("link/v1").unwrap();
        assert!(entry.violations(&json!({"schema": "link/v1", "target": {"host": "a"}})).is_empty());
        assert_eq!(entry.violations(&json!({"schema": "link/v1", "target": {}})).len(), 1);
    }

    #[test]
    fn unresolvable_ref_fails_to_compile() {
        let schema = json!({
            "type": "object",
            "properties": {
                "schema": { "const": "ghost/v1" },
                "x": { "$ref": "https://example.invalid/missing.schema.json" }
            }
        });
        let err = SchemaIndex::from_schemas(vec![("ghost.schema.json".into(), schema)]).err().unwrap();
        assert_eq!(err.code(), "SchemaInvalid");
        assert!(err.to_string().contains("ghost/v1"));
    }
}

//! JSON schema builders for MCP tools.

use serde_json::{Map, Value};

/// Build the schema describing the `upload_and_process` tool input.
pub(crate) fn upload_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "filePath".into(),
        string_schema("Absolute or working-directory-relative path of the local file to upload"),
    );
    properties.insert(
        "splitPages".into(),
        boolean_schema("Split multi-page documents into separate files (default false)"),
    );
    properties.insert(
        "lockSchema".into(),
        boolean_schema("Keep the detected extraction schema fixed (default false)"),
    );

    finalize_object_schema(properties, &["filePath"])
}

/// Build the schema describing the `get_file_details` tool input.
pub(crate) fn file_details_input_schema() -> Map<String, Value> {
    let mut properties = Map::new();
    properties.insert(
        "fileName".into(),
        string_schema("Full or partial file name to look up (case-insensitive)"),
    );

    finalize_object_schema(properties, &["fileName"])
}

/// Build an empty-object schema for tools without parameters.
pub(crate) fn empty_object_schema() -> Map<String, Value> {
    finalize_object_schema(Map::new(), &[])
}

fn string_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("string".into()));
    schema.insert("description".into(), Value::String(description.into()));
    Value::Object(schema)
}

fn boolean_schema(description: &str) -> Value {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("boolean".into()));
    schema.insert("description".into(), Value::String(description.into()));
    schema.insert("default".into(), Value::Bool(false));
    Value::Object(schema)
}

fn finalize_object_schema(properties: Map<String, Value>, required: &[&str]) -> Map<String, Value> {
    let mut schema = Map::new();
    schema.insert("type".into(), Value::String("object".into()));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert(
            "required".into(),
            Value::Array(
                required
                    .iter()
                    .map(|field| Value::String((*field).into()))
                    .collect(),
            ),
        );
    }
    schema.insert("additionalProperties".into(), Value::Bool(false));
    schema
}

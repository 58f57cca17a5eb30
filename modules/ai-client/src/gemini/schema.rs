use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Trait for types that can be requested as Gemini structured output.
///
/// Automatically implemented for any type that implements `JsonSchema + DeserializeOwned`.
pub trait StructuredOutput: JsonSchema + DeserializeOwned {
    /// Generate a Gemini `responseSchema` for this type.
    ///
    /// Gemini accepts an OpenAPI subset:
    /// 1. Upper-case type names (`OBJECT`, `STRING`, `NUMBER`, ...)
    /// 2. `nullable: true` instead of `["T", "null"]` unions
    /// 3. Fully inlined schemas (no `$ref`, no `definitions`)
    /// 4. No `$schema`, `title`, `format` or `additionalProperties` keys
    fn gemini_schema() -> Value {
        let schema = schema_for!(Self);
        let mut value = serde_json::to_value(schema).unwrap_or_default();

        inline_refs(&mut value);

        to_gemini(&value)
    }
}

impl<T: JsonSchema + DeserializeOwned> StructuredOutput for T {}

const KEPT_KEYS: &[&str] = &["required", "enum", "description", "nullable"];

fn to_gemini(value: &Value) -> Value {
    let Value::Object(map) = value else {
        return value.clone();
    };

    if let Some(Value::Array(variants)) = map.get("anyOf") {
        let (nulls, rest): (Vec<&Value>, Vec<&Value>) =
            variants.iter().partition(|v| is_null_type(v));
        if rest.len() == 1 {
            let mut inner = to_gemini(rest[0]);
            if let Value::Object(inner_map) = &mut inner {
                if !nulls.is_empty() {
                    inner_map.insert("nullable".to_string(), Value::Bool(true));
                }
                if let Some(desc) = map.get("description") {
                    inner_map.insert("description".to_string(), desc.clone());
                }
            }
            return inner;
        }
    }

    let mut out = Map::new();

    for (key, v) in map {
        match key.as_str() {
            "type" => match v {
                Value::String(t) => {
                    out.insert("type".to_string(), Value::String(t.to_uppercase()));
                }
                Value::Array(types) => {
                    let mut nullable = false;
                    for t in types.iter().filter_map(Value::as_str) {
                        if t == "null" {
                            nullable = true;
                        } else if !out.contains_key("type") {
                            out.insert("type".to_string(), Value::String(t.to_uppercase()));
                        }
                    }
                    if nullable {
                        out.insert("nullable".to_string(), Value::Bool(true));
                    }
                }
                _ => {}
            },
            "properties" => {
                if let Value::Object(props) = v {
                    let converted = props
                        .iter()
                        .map(|(name, prop)| (name.clone(), to_gemini(prop)))
                        .collect();
                    out.insert("properties".to_string(), Value::Object(converted));
                }
            }
            "items" => {
                out.insert("items".to_string(), to_gemini(v));
            }
            "anyOf" => {
                if let Value::Array(variants) = v {
                    out.insert(
                        "anyOf".to_string(),
                        Value::Array(variants.iter().map(to_gemini).collect()),
                    );
                }
            }
            k if KEPT_KEYS.contains(&k) => {
                out.insert(key.clone(), v.clone());
            }
            _ => {}
        }
    }

    Value::Object(out)
}

fn is_null_type(value: &Value) -> bool {
    value.get("type") == Some(&Value::String("null".to_string()))
}

fn inline_refs(value: &mut Value) {
    let definitions = if let Value::Object(map) = value {
        map.get("definitions").cloned()
    } else {
        None
    };

    if let Some(defs) = definitions {
        inline_refs_recursive(value, &defs);
    }
}

fn inline_refs_recursive(value: &mut Value, definitions: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(ref_path)) = map.get("$ref").cloned() {
                if ref_path.starts_with("#/definitions/") {
                    let type_name = ref_path.trim_start_matches("#/definitions/");
                    if let Some(def) = definitions.get(type_name) {
                        *value = def.clone();
                        inline_refs_recursive(value, definitions);
                        return;
                    }
                }
            }

            if let Some(Value::Array(all_of)) = map.get("allOf").cloned() {
                if let [only] = all_of.as_slice() {
                    *value = only.clone();
                    inline_refs_recursive(value, definitions);
                    return;
                }
            }

            for (_, v) in map.iter_mut() {
                inline_refs_recursive(v, definitions);
            }
        }
        Value::Array(arr) => {
            for item in arr.iter_mut() {
                inline_refs_recursive(item, definitions);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde::Deserialize;

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Ward {
        ward_name: String,
        population: u32,
    }

    #[derive(Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct Assessment {
        /// Urgency from 1 to 10.
        priority_score: f64,
        flagged: bool,
        note: Option<String>,
        ward: Ward,
        tags: Vec<String>,
        nearby: Option<Ward>,
    }

    fn props(schema: &Value) -> &Map<String, Value> {
        schema.get("properties").unwrap().as_object().unwrap()
    }

    #[test]
    fn test_top_level_keys_stripped() {
        let schema = Assessment::gemini_schema();
        let obj = schema.as_object().unwrap();

        assert_eq!(obj.get("type"), Some(&Value::String("OBJECT".to_string())));
        assert!(!obj.contains_key("$schema"));
        assert!(!obj.contains_key("title"));
        assert!(!obj.contains_key("definitions"));
        assert!(!obj.contains_key("additionalProperties"));
    }

    #[test]
    fn test_scalar_types_uppercased() {
        let schema = Assessment::gemini_schema();
        let props = props(&schema);

        assert_eq!(props["priorityScore"]["type"], "NUMBER");
        assert!(props["priorityScore"].get("format").is_none());
        assert_eq!(props["priorityScore"]["description"], "Urgency from 1 to 10.");
        assert_eq!(props["flagged"]["type"], "BOOLEAN");
        assert_eq!(props["tags"]["type"], "ARRAY");
        assert_eq!(props["tags"]["items"]["type"], "STRING");
    }

    #[test]
    fn test_option_becomes_nullable() {
        let schema = Assessment::gemini_schema();
        let props = props(&schema);

        assert_eq!(props["note"]["type"], "STRING");
        assert_eq!(props["note"]["nullable"], true);
        assert!(props["flagged"].get("nullable").is_none());
    }

    #[test]
    fn test_nested_struct_inlined() {
        let schema = Assessment::gemini_schema();
        let props = props(&schema);

        let ward = props["ward"].as_object().unwrap();
        assert!(!ward.contains_key("$ref"));
        assert_eq!(ward["type"], "OBJECT");
        assert_eq!(ward["properties"]["population"]["type"], "INTEGER");

        let nearby = props["nearby"].as_object().unwrap();
        assert_eq!(nearby["type"], "OBJECT");
        assert_eq!(nearby["nullable"], true);
    }

    #[test]
    fn test_required_excludes_optional_fields() {
        let schema = Assessment::gemini_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();

        assert!(required.contains(&"priorityScore"));
        assert!(required.contains(&"ward"));
        assert!(!required.contains(&"note"));
        assert!(!required.contains(&"nearby"));
    }
}

//! Schema adapter: MCP tool descriptors to chat-model tool schemas.
//!
//! The chat interface expects tools in the `{"type": "function", ...}`
//! shape with a flat property map, while MCP servers return a JSON Schema
//! under `inputSchema`. The adapter copies each declared property's `type`
//! and substitutes its `title` as the `description`; the `required` list
//! and the property order pass through verbatim.

use mcp::Tool;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{Error, Result};

/// A tool offering in the chat model's function-calling format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: ParameterSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub required: Vec<String>,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

/// Property map keyed by parameter name, in declared order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyMap(Vec<(String, PropertySchema)>);

impl PropertyMap {
    pub fn insert(&mut self, name: String, property: PropertySchema) {
        self.0.push((name, property));
    }

    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, PropertySchema)> {
        self.0.iter()
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, property) in &self.0 {
            map.serialize_entry(name, property)?;
        }
        map.end()
    }
}

/// Convert one MCP tool descriptor into the chat model's schema shape.
///
/// No well-formedness validation happens beyond the lookups themselves: a
/// descriptor whose input schema lacks `properties` or `required`, or whose
/// property entries lack `type` or `title`, is rejected as malformed.
pub fn adapt(tool: &Tool) -> Result<ToolSchema> {
    let raw_properties = lookup(&tool.name, &tool.input_schema, "properties")?
        .as_object()
        .ok_or_else(|| malformed(&tool.name, "'properties' is not an object"))?;

    let required = lookup(&tool.name, &tool.input_schema, "required")?
        .as_array()
        .ok_or_else(|| malformed(&tool.name, "'required' is not an array"))?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(String::from)
                .ok_or_else(|| malformed(&tool.name, "'required' entry is not a string"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut properties = PropertyMap::default();
    for (name, entry) in raw_properties {
        let kind = property_field(&tool.name, name, entry, "type")?;
        let title = property_field(&tool.name, name, entry, "title")?;
        properties.insert(
            name.clone(),
            PropertySchema {
                kind: kind.to_string(),
                description: title.to_string(),
            },
        );
    }

    Ok(ToolSchema {
        kind: "function".to_string(),
        function: FunctionSchema {
            name: tool.name.clone(),
            description: tool.description.clone().unwrap_or_default(),
            parameters: ParameterSchema {
                kind: "object".to_string(),
                required,
                properties,
            },
        },
    })
}

fn lookup<'a>(tool: &str, value: &'a Value, field: &str) -> Result<&'a Value> {
    value
        .get(field)
        .ok_or_else(|| malformed(tool, &format!("missing '{field}'")))
}

fn property_field<'a>(tool: &str, property: &str, entry: &'a Value, field: &str) -> Result<&'a str> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| malformed(tool, &format!("parameter '{property}' missing '{field}'")))
}

fn malformed(tool: &str, detail: &str) -> Error {
    Error::Schema(format!("tool '{tool}': {detail}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_tool() -> Tool {
        Tool {
            name: "get_weather".to_string(),
            description: Some("Look up the weather for a city".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string", "title": "City"},
                    "unit": {"type": "string", "title": "Temperature unit"}
                },
                "required": ["city"]
            }),
        }
    }

    #[test]
    fn adapts_every_declared_property() {
        let schema = adapt(&weather_tool()).unwrap();
        assert_eq!(schema.kind, "function");
        assert_eq!(schema.function.name, "get_weather");
        assert_eq!(schema.function.parameters.kind, "object");
        assert_eq!(schema.function.parameters.properties.len(), 2);

        let city = schema.function.parameters.properties.get("city").unwrap();
        assert_eq!(city.kind, "string");
        assert_eq!(city.description, "City");
        let unit = schema.function.parameters.properties.get("unit").unwrap();
        assert_eq!(unit.description, "Temperature unit");
    }

    #[test]
    fn required_passes_through_verbatim() {
        let mut tool = weather_tool();
        tool.input_schema["required"] = json!(["unit", "city"]);
        let schema = adapt(&tool).unwrap();
        assert_eq!(schema.function.parameters.required, vec!["unit", "city"]);
    }

    #[test]
    fn properties_keep_declared_order() {
        let tool: Tool = serde_json::from_str(
            r#"{
                "name": "report",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "zip": {"type": "string", "title": "Zip code"},
                        "area": {"type": "string", "title": "Area"}
                    },
                    "required": []
                }
            }"#,
        )
        .unwrap();

        let schema = adapt(&tool).unwrap();
        let names: Vec<&str> = schema
            .function
            .parameters
            .properties
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["zip", "area"]);

        // Order survives serialization too.
        let json = serde_json::to_string(&schema).unwrap();
        assert!(json.find("\"zip\"").unwrap() < json.find("\"area\"").unwrap());
    }

    #[test]
    fn zero_property_tool_adapts_to_empty_map() {
        let tool = Tool {
            name: "ping".to_string(),
            description: None,
            input_schema: json!({"type": "object", "properties": {}, "required": []}),
        };
        let schema = adapt(&tool).unwrap();
        assert!(schema.function.parameters.properties.is_empty());
        assert!(schema.function.parameters.required.is_empty());
        assert_eq!(schema.function.description, "");
    }

    #[test]
    fn missing_properties_is_an_error() {
        let mut tool = weather_tool();
        tool.input_schema = json!({"type": "object", "required": []});
        let err = adapt(&tool).unwrap_err();
        assert!(matches!(err, Error::Schema(_)), "got {err:?}");
    }

    #[test]
    fn missing_required_is_an_error() {
        let mut tool = weather_tool();
        tool.input_schema.as_object_mut().unwrap().remove("required");
        assert!(adapt(&tool).is_err());
    }

    #[test]
    fn property_missing_title_is_an_error() {
        let mut tool = weather_tool();
        tool.input_schema["properties"]["city"] = json!({"type": "string"});
        let err = adapt(&tool).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn property_missing_type_is_an_error() {
        let mut tool = weather_tool();
        tool.input_schema["properties"]["city"] = json!({"title": "City"});
        assert!(adapt(&tool).is_err());
    }

    #[test]
    fn serializes_to_function_calling_shape() {
        let schema = adapt(&weather_tool()).unwrap();
        let value = serde_json::to_value(&schema).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["parameters"]["type"], "object");
        assert_eq!(
            value["function"]["parameters"]["properties"]["city"]["description"],
            "City"
        );
    }
}

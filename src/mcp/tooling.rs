use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct ToolCatalogEntry {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub const SEARCH_PROPERTIES: &str = "search_properties";
pub const EXTRACT_PROPERTY_DATA: &str = "extract_property_data";
pub const ANALYZE_PROPERTIES: &str = "analyze_properties";

pub fn tool_catalog() -> Vec<ToolCatalogEntry> {
    vec![
        ToolCatalogEntry {
            name: SEARCH_PROPERTIES,
            title: "Search Properties",
            description: "Search for properties using Google search via Serper API",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query for properties"
                    }
                },
                "required": ["query"]
            }),
        },
        ToolCatalogEntry {
            name: EXTRACT_PROPERTY_DATA,
            title: "Extract Property Data",
            description: "Extract property data from a webpage using Browserless",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "url": {
                        "type": "string",
                        "description": "URL of the property listing page"
                    }
                },
                "required": ["url"]
            }),
        },
        ToolCatalogEntry {
            name: ANALYZE_PROPERTIES,
            title: "Analyze Properties",
            description: "Analyze property data using Hugging Face",
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "text": {
                        "type": "string",
                        "description": "Property data text to analyze"
                    }
                },
                "required": ["text"]
            }),
        },
    ]
}

pub fn is_known_tool(name: &str) -> bool {
    tool_catalog().iter().any(|tool| tool.name == name)
}

pub fn schema_to_object_map(schema: &Value) -> Arc<Map<String, Value>> {
    match schema {
        Value::Object(map) => Arc::new(map.clone()),
        _ => Arc::new(Map::new()),
    }
}

pub mod analyze_properties;
pub mod common;
pub mod extract_property_data;
pub mod search_properties;

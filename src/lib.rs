pub mod designer;
pub mod draft;
pub mod error;
pub mod id;
pub mod model;
pub mod naming;
pub mod project;
pub mod relationship;
pub mod sql;
pub mod store;

use wasm_bindgen::prelude::*;

pub use designer::Designer;
pub use draft::{RelationshipDraft, TableDraft};
pub use error::SchemaError;
pub use model::{Field, FieldType, Relationship, RelationshipKind, Table};
pub use project::{ImportError, ProjectState, generate_ddl, load_project, serialize_project};
pub use sql::Dialect;
pub use store::SchemaStore;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render a saved project document to CREATE TABLE statements
#[wasm_bindgen(js_name = "projectToDdl")]
pub fn render_project(source: &str, dialect: Option<String>) -> Result<String, String> {
    let state = load_project(source).map_err(|e| e.to_string())?;
    let dialect = designer::parse_dialect(dialect, state.dialect)?;

    Ok(generate_ddl(&state, dialect))
}

/// Column type spellings offered to the field editor
#[wasm_bindgen(js_name = "fieldTypes")]
pub fn field_types() -> Vec<String> {
    FieldType::ALL.iter().map(|t| t.as_sql().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECT: &str = r#"{"tables": [{"id": "t1", "name": "users", "fields": [
        {"id": "f1", "name": "id", "isPrimary": true}
    ]}], "dialect": "mysql"}"#;

    #[test]
    fn test_render_project_blank_dialect_uses_project_dialect() {
        let ddl = render_project(PROJECT, Some(String::new())).unwrap();
        assert!(ddl.contains("CREATE TABLE `users` ("));
        let ddl = render_project(PROJECT, None).unwrap();
        assert!(ddl.contains("-- Dialect: mysql"));
    }

    #[test]
    fn test_render_project_dialect_override() {
        let ddl = render_project(PROJECT, Some("sqlite".into())).unwrap();
        assert!(ddl.contains("CREATE TABLE \"users\" ("));
        let err = render_project(PROJECT, Some("oracle".into())).unwrap_err();
        assert_eq!(err, "Unknown dialect: oracle");
    }

    #[test]
    fn test_field_types() {
        let types = field_types();
        assert_eq!(types.first().map(String::as_str), Some("INTEGER"));
        assert!(types.iter().any(|t| t == "VARCHAR(255)"));
        assert_eq!(types.len(), 9);
    }
}

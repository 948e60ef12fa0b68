//! Persisted project documents and the caller-facing boundary operations.

use crate::model::{Relationship, Table};
use crate::sql::{self, Dialect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Project document has no \"tables\" array")]
    MissingTables,
    #[error("Malformed project document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything a saved project holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub dialect: Dialect,
}

/// Parse a project document.
pub fn load_project(json: &str) -> Result<ProjectState, ImportError> {
    let value: Value = serde_json::from_str(json)?;
    if !value.get("tables").is_some_and(Value::is_array) {
        return Err(ImportError::MissingTables);
    }
    let state: ProjectState = serde_json::from_value(value)?;
    tracing::debug!(
        tables = state.tables.len(),
        relationships = state.relationships.len(),
        dialect = %state.dialect,
        "project loaded"
    );
    Ok(state)
}

pub fn serialize_project(state: &ProjectState) -> serde_json::Result<String> {
    serde_json::to_string_pretty(state)
}

pub fn generate_ddl(state: &ProjectState, dialect: Dialect) -> String {
    sql::generate(&state.tables, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{RelationshipDraft, TableDraft};
    use crate::id::SequentialIds;
    use crate::model::{Field, FieldType, RelationshipKind};
    use crate::store::SchemaStore;

    fn sample_state() -> ProjectState {
        let mut store = SchemaStore::with_ids(SequentialIds::new("id"));
        let users = store
            .create_table(TableDraft::new("users").with_field(Field::new("name", FieldType::Text).with_default("anon")))
            .unwrap();
        let orders = store.create_table(TableDraft::new("orders")).unwrap();
        let tags = store.create_table(TableDraft::new("tags")).unwrap();
        store
            .create_relationship(RelationshipDraft::new(&users.id, &orders.id, RelationshipKind::OneToMany))
            .unwrap();
        store
            .create_relationship(RelationshipDraft::new(&users.id, &tags.id, RelationshipKind::ManyToMany))
            .unwrap();
        store.to_project(Dialect::Mysql)
    }

    #[test]
    fn test_round_trip() {
        let state = sample_state();
        let json = serialize_project(&state).unwrap();
        assert_eq!(load_project(&json).unwrap(), state);
    }

    #[test]
    fn test_missing_tables_rejected() {
        assert!(matches!(
            load_project(r#"{"relationships": []}"#),
            Err(ImportError::MissingTables)
        ));
        assert!(matches!(
            load_project(r#"{"tables": {"users": {}}}"#),
            Err(ImportError::MissingTables)
        ));
        assert!(matches!(load_project("[1, 2"), Err(ImportError::Json(_))));
    }

    #[test]
    fn test_postgresql_spelling_accepted() {
        let state = load_project(r#"{"tables": [], "dialect": "postgresql"}"#).unwrap();
        assert_eq!(state.dialect, Dialect::Postgres);
    }

    #[test]
    fn test_minimal_document_defaults() {
        let state = load_project(r#"{"tables": []}"#).unwrap();
        assert!(state.relationships.is_empty());
        assert_eq!(state.dialect, Dialect::Postgres);
    }

    #[test]
    fn test_loads_hand_written_document() {
        let json = r#"{
            "tables": [
                {"id": "t1", "name": "users", "fields": [
                    {"id": "f1", "name": "id", "type": "INTEGER", "isPrimary": true,
                     "isNull": false, "isUnique": false, "autoIncrement": true,
                     "default": "", "isForeignKey": false, "references": null}
                ]},
                {"id": "t2", "name": "posts", "fields": [
                    {"id": "f2", "name": "id", "type": "INTEGER", "isPrimary": true},
                    {"id": "f3", "name": "users_id", "type": "INTEGER", "isNull": false,
                     "isForeignKey": true, "references": "t1"}
                ]}
            ],
            "relationships": [
                {"id": "r1", "parentTableId": "t1", "childTableId": "t2",
                 "parentField": "id", "childField": "users_id", "type": "ONE_TO_MANY"}
            ],
            "dialect": "sqlite"
        }"#;
        let state = load_project(json).unwrap();
        assert_eq!(state.tables.len(), 2);
        assert_eq!(state.relationships[0].kind, RelationshipKind::OneToMany);
        assert_eq!(state.dialect, Dialect::Sqlite);

        let ddl = generate_ddl(&state, state.dialect);
        assert!(ddl.contains(r#"FOREIGN KEY ("users_id") REFERENCES "users"("id")"#));
    }

    #[test]
    fn test_generate_ddl_uses_requested_dialect() {
        let state = sample_state();
        let ddl = generate_ddl(&state, Dialect::Postgres);
        assert!(ddl.contains("-- Dialect: postgres"));
        assert!(ddl.contains("CREATE TABLE \"users_tags_join\" ("));
    }
}

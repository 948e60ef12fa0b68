//! JSON-in, JSON-out handle over a [`SchemaStore`] for browser callers.

use wasm_bindgen::prelude::*;

use crate::draft::{RelationshipDraft, TableDraft};
use crate::project::{self, ProjectState};
use crate::sql::Dialect;
use crate::store::SchemaStore;

/// Resolve an optional dialect name; blank or absent means `fallback`.
pub(crate) fn parse_dialect(name: Option<String>, fallback: Dialect) -> Result<Dialect, String> {
    match name.as_deref() {
        None | Some("") => Ok(fallback),
        Some(s) => Dialect::from_str(s).ok_or_else(|| format!("Unknown dialect: {}", s)),
    }
}

#[wasm_bindgen]
pub struct Designer {
    store: SchemaStore,
    dialect: Dialect,
}

impl Default for Designer {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Designer {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Designer {
        Designer {
            store: SchemaStore::new(),
            dialect: Dialect::default(),
        }
    }

    /// Replace the current schema with a saved project.
    #[wasm_bindgen(js_name = "loadProject")]
    pub fn load_project(&mut self, json: &str) -> Result<(), String> {
        let state = project::load_project(json).map_err(|e| e.to_string())?;
        self.dialect = state.dialect;
        self.store = SchemaStore::from_project(state);
        Ok(())
    }

    #[wasm_bindgen(js_name = "serializeProject")]
    pub fn serialize_project(&self) -> Result<String, String> {
        project::serialize_project(&self.state()).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(getter)]
    pub fn dialect(&self) -> String {
        self.dialect.name().to_string()
    }

    #[wasm_bindgen(js_name = "setDialect")]
    pub fn set_dialect(&mut self, name: &str) -> Result<(), String> {
        self.dialect = parse_dialect(Some(name.to_string()), self.dialect)?;
        Ok(())
    }

    /// Commit a table draft; returns the committed table as JSON.
    #[wasm_bindgen(js_name = "createTable")]
    pub fn create_table(&mut self, draft_json: &str) -> Result<String, String> {
        let draft: TableDraft = serde_json::from_str(draft_json).map_err(|e| e.to_string())?;
        let table = self.store.create_table(draft).map_err(|e| e.to_string())?;
        serde_json::to_string(&table).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "updateTable")]
    pub fn update_table(&mut self, id: &str, draft_json: &str) -> Result<String, String> {
        let draft: TableDraft = serde_json::from_str(draft_json).map_err(|e| e.to_string())?;
        let table = self.store.update_table(id, draft).map_err(|e| e.to_string())?;
        serde_json::to_string(&table).map_err(|e| e.to_string())
    }

    /// Returns whether a table was removed.
    #[wasm_bindgen(js_name = "deleteTable")]
    pub fn delete_table(&mut self, id: &str) -> bool {
        self.store.delete_table(id).is_some()
    }

    #[wasm_bindgen(js_name = "createRelationship")]
    pub fn create_relationship(&mut self, draft_json: &str) -> Result<String, String> {
        let draft: RelationshipDraft = serde_json::from_str(draft_json).map_err(|e| e.to_string())?;
        let relationship = self.store.create_relationship(draft).map_err(|e| e.to_string())?;
        serde_json::to_string(&relationship).map_err(|e| e.to_string())
    }

    #[wasm_bindgen(js_name = "deleteRelationship")]
    pub fn delete_relationship(&mut self, id: &str) -> bool {
        self.store.delete_relationship(id).is_some()
    }

    /// DDL for the current schema, in `dialect` or the project's own.
    #[wasm_bindgen(js_name = "generateDdl")]
    pub fn generate_ddl(&self, dialect: Option<String>) -> Result<String, String> {
        let dialect = parse_dialect(dialect, self.dialect)?;
        Ok(project::generate_ddl(&self.state(), dialect))
    }
}

impl Designer {
    pub fn store(&self) -> &SchemaStore {
        &self.store
    }

    fn state(&self) -> ProjectState {
        self.store.to_project(self.dialect)
    }
}

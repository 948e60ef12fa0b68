//! The canonical collection of tables and relationships.

use crate::draft::{RelationshipDraft, TableDraft};
use crate::error::SchemaError;
use crate::id::{IdGenerator, UuidIds};
use crate::model::{Field, Relationship, Table};
use crate::naming::names_match;
use crate::project::ProjectState;
use crate::relationship;
use crate::sql::Dialect;
use std::collections::HashSet;

/// Owns every table and relationship. All mutation goes through validated
/// operations; a rejected operation leaves the store untouched.
pub struct SchemaStore {
    pub(crate) tables: Vec<Table>,
    pub(crate) relationships: Vec<Relationship>,
    ids: Box<dyn IdGenerator>,
    issued: HashSet<String>,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore {
    pub fn new() -> Self {
        Self::with_ids(UuidIds)
    }

    pub fn with_ids(ids: impl IdGenerator + 'static) -> Self {
        Self {
            tables: Vec::new(),
            relationships: Vec::new(),
            ids: Box::new(ids),
            issued: HashSet::new(),
        }
    }

    pub fn from_project(state: ProjectState) -> Self {
        Self::from_project_with_ids(state, UuidIds)
    }

    pub fn from_project_with_ids(state: ProjectState, ids: impl IdGenerator + 'static) -> Self {
        let mut store = Self::with_ids(ids);
        store.tables = state.tables;
        store.relationships = state.relationships;
        store
    }

    pub fn to_project(&self, dialect: Dialect) -> ProjectState {
        ProjectState {
            tables: self.tables.clone(),
            relationships: self.relationships.clone(),
            dialect,
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }

    pub(crate) fn table_mut(&mut self, id: &str) -> Option<&mut Table> {
        self.tables.iter_mut().find(|t| t.id == id)
    }

    pub fn table_by_name(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| names_match(&t.name, name))
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn relationships_for<'a>(&'a self, table_id: &'a str) -> impl Iterator<Item = &'a Relationship> {
        self.relationships.iter().filter(move |r| r.involves(table_id))
    }

    /// An id not used by any record in the store nor issued before.
    pub(crate) fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.issued.contains(&id) && !self.id_in_use(&id) {
                self.issued.insert(id.clone());
                return id;
            }
        }
    }

    fn id_in_use(&self, id: &str) -> bool {
        self.tables
            .iter()
            .any(|t| t.id == id || t.fields.iter().any(|f| f.id == id))
            || self.relationships.iter().any(|r| r.id == id)
    }

    fn validate(&self, draft: &TableDraft, editing: Option<&str>) -> Result<String, SchemaError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        let collides = self
            .tables
            .iter()
            .filter(|t| Some(t.id.as_str()) != editing)
            .any(|t| names_match(&t.name, name));
        if collides {
            return Err(SchemaError::DuplicateTableName(name.to_string()));
        }
        draft.check_fields()?;
        Ok(name.to_string())
    }

    /// Assign ids to draft fields. A supplied id survives only if it is not
    /// repeated within the draft and, when editing, already belongs to the
    /// edited table, otherwise when it is unused and was never issued.
    fn commit_fields(&mut self, mut fields: Vec<Field>, editing: Option<&str>) -> Vec<Field> {
        let owned: HashSet<String> = editing
            .and_then(|id| self.table(id))
            .map(|t| t.fields.iter().map(|f| f.id.clone()).collect())
            .unwrap_or_default();

        let mut seen: HashSet<String> = HashSet::new();
        for field in &mut fields {
            let keep = {
                let id = field.id.as_str();
                !id.trim().is_empty()
                    && !seen.contains(id)
                    && match editing {
                        Some(_) => owned.contains(id),
                        None => !self.issued.contains(id) && !self.id_in_use(id),
                    }
            };
            if keep {
                self.issued.insert(field.id.clone());
            } else {
                field.id = self.fresh_id();
            }
            seen.insert(field.id.clone());
        }
        fields
    }

    pub fn create_table(&mut self, draft: TableDraft) -> Result<Table, SchemaError> {
        let name = self.validate(&draft, None)?;
        let fields = self.commit_fields(draft.fields, None);
        let table = Table {
            id: self.fresh_id(),
            name,
            fields,
        };
        self.tables.push(table.clone());
        tracing::debug!(id = %table.id, name = %table.name, "table created");
        Ok(table)
    }

    pub fn update_table(&mut self, id: &str, draft: TableDraft) -> Result<Table, SchemaError> {
        if self.table(id).is_none() {
            return Err(SchemaError::MissingTable(id.to_string()));
        }
        let name = self.validate(&draft, Some(id))?;
        let fields = self.commit_fields(draft.fields, Some(id));

        let table = self
            .table_mut(id)
            .ok_or_else(|| SchemaError::MissingTable(id.to_string()))?;
        table.name = name;
        table.fields = fields;
        tracing::debug!(id = %table.id, name = %table.name, "table updated");
        Ok(table.clone())
    }

    /// Remove a table and every relationship touching it.
    ///
    /// Foreign-key fields on other tables that pointed at it are left in place.
    pub fn delete_table(&mut self, id: &str) -> Option<Table> {
        let index = self.tables.iter().position(|t| t.id == id)?;
        let table = self.tables.remove(index);

        let before = self.relationships.len();
        self.relationships.retain(|r| !r.involves(id));
        tracing::debug!(
            name = %table.name,
            relationships = before - self.relationships.len(),
            "table deleted"
        );
        Some(table)
    }

    pub fn create_relationship(&mut self, draft: RelationshipDraft) -> Result<Relationship, SchemaError> {
        relationship::link(self, &draft)
    }

    pub fn delete_relationship(&mut self, id: &str) -> Option<Relationship> {
        relationship::unlink(self, id)
    }
}

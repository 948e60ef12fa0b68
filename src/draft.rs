//! Editable candidates for tables and relationships.
//!
//! Drafts are plain values owned by the caller. Nothing in the store changes
//! until a draft is handed to [`SchemaStore`](crate::store::SchemaStore) and
//! passes validation.

use crate::error::SchemaError;
use crate::model::{Field, RelationshipKind, Table};
use crate::naming::normalize;
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableDraft {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl TableDraft {
    /// A draft holding the default `id` primary key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![Field::primary_key()],
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Copy of a committed table, ready for editing.
    pub fn from_table(table: &Table) -> Self {
        Self {
            name: table.name.clone(),
            fields: table.fields.clone(),
        }
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Replace the field at `index`. Returns `false` if out of range.
    pub fn update_field(&mut self, index: usize, field: Field) -> bool {
        match self.fields.get_mut(index) {
            Some(slot) => {
                *slot = field;
                true
            }
            None => false,
        }
    }

    pub fn remove_field(&mut self, index: usize) -> Option<Field> {
        if index < self.fields.len() {
            Some(self.fields.remove(index))
        } else {
            None
        }
    }

    /// Move a field to a new position. Returns `false` if either index is out of range.
    pub fn move_field(&mut self, from: usize, to: usize) -> bool {
        if from >= self.fields.len() || to >= self.fields.len() {
            return false;
        }
        let field = self.fields.remove(from);
        self.fields.insert(to, field);
        true
    }

    /// Checks that depend only on the draft itself.
    pub(crate) fn check_fields(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields);
        }
        if self.fields.iter().any(|f| f.name.trim().is_empty()) {
            return Err(SchemaError::EmptyFieldName);
        }
        if !self.fields.iter().any(|f| f.is_primary) {
            return Err(SchemaError::NoPrimaryKey);
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(normalize(&field.name)) {
                return Err(SchemaError::DuplicateFieldName(field.name.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipDraft {
    pub parent_table_id: String,
    pub child_table_id: String,
    /// Explicit foreign-key name on the child. Blank means `{parent}_id`.
    #[serde(default)]
    pub child_field: String,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
}

impl RelationshipDraft {
    pub fn new(
        parent_table_id: impl Into<String>,
        child_table_id: impl Into<String>,
        kind: RelationshipKind,
    ) -> Self {
        Self {
            parent_table_id: parent_table_id.into(),
            child_table_id: child_table_id.into(),
            child_field: String::new(),
            kind,
        }
    }

    pub fn with_child_field(mut self, name: impl Into<String>) -> Self {
        self.child_field = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldType;

    #[test]
    fn test_new_draft_has_default_primary_key() {
        let draft = TableDraft::new("users");
        assert_eq!(draft.fields.len(), 1);
        assert_eq!(draft.fields[0].name, "id");
        assert!(draft.fields[0].is_primary);
        assert!(draft.fields[0].auto_increment);
        assert!(draft.check_fields().is_ok());
    }

    #[test]
    fn test_field_editing() {
        let mut draft = TableDraft::new("users");
        draft.add_field(Field::new("email", FieldType::Varchar));
        draft.add_field(Field::new("name", FieldType::Text));

        assert!(draft.update_field(1, Field::new("mail", FieldType::Text)));
        assert!(!draft.update_field(9, Field::new("x", FieldType::Text)));
        assert!(draft.move_field(2, 0));

        let names: Vec<&str> = draft.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["name", "id", "mail"]);

        assert_eq!(draft.remove_field(0).unwrap().name, "name");
        assert!(draft.remove_field(5).is_none());
        assert_eq!(draft.fields.len(), 2);
    }

    #[test]
    fn test_check_fields_errors() {
        assert_eq!(TableDraft::empty("t").check_fields(), Err(SchemaError::NoFields));

        let no_pk = TableDraft::empty("t").with_field(Field::new("a", FieldType::Text));
        assert_eq!(no_pk.check_fields(), Err(SchemaError::NoPrimaryKey));

        let blank = TableDraft::new("t").with_field(Field::new("  ", FieldType::Text));
        assert_eq!(blank.check_fields(), Err(SchemaError::EmptyFieldName));

        let dup = TableDraft::new("t").with_field(Field::new("ID", FieldType::Text));
        assert_eq!(
            dup.check_fields(),
            Err(SchemaError::DuplicateFieldName("ID".into()))
        );
    }

    #[test]
    fn test_from_table_is_independent_copy() {
        let table = Table {
            id: "t1".into(),
            name: "users".into(),
            fields: vec![Field::primary_key()],
        };
        let mut draft = TableDraft::from_table(&table);
        draft.add_field(Field::new("email", FieldType::Text));
        assert_eq!(table.fields.len(), 1);
        assert_eq!(draft.fields.len(), 2);
    }

    #[test]
    fn test_relationship_draft_from_json() {
        let draft: RelationshipDraft = serde_json::from_str(
            r#"{"parentTableId": "a", "childTableId": "b", "type": "ONE_TO_ONE"}"#,
        )
        .unwrap();
        assert_eq!(draft, RelationshipDraft::new("a", "b", RelationshipKind::OneToOne));
    }
}

//! Schema side effects of declaring and removing relationships.
//!
//! One-to-one and one-to-many links put a foreign key on the child table.
//! Many-to-many links synthesize a join table carrying one foreign key per
//! endpoint and leave both endpoints untouched.

use crate::draft::RelationshipDraft;
use crate::error::SchemaError;
use crate::model::{Field, FieldType, Relationship, RelationshipKind, Table};
use crate::naming::{names_match, unique_name};
use crate::store::SchemaStore;

/// Validate `draft`, apply its mutations and record the relationship.
pub(crate) fn link(
    store: &mut SchemaStore,
    draft: &RelationshipDraft,
) -> Result<Relationship, SchemaError> {
    if draft.parent_table_id == draft.child_table_id {
        return Err(SchemaError::InvalidEndpoints);
    }
    let parent = store
        .table(&draft.parent_table_id)
        .cloned()
        .ok_or_else(|| SchemaError::MissingTable(draft.parent_table_id.clone()))?;
    let child = store
        .table(&draft.child_table_id)
        .cloned()
        .ok_or_else(|| SchemaError::MissingTable(draft.child_table_id.clone()))?;

    let relationship = match draft.kind {
        RelationshipKind::ManyToMany => link_through_join_table(store, &parent, &child),
        kind => link_foreign_key(store, &parent, &child, kind, &draft.child_field),
    };
    store.relationships.push(relationship.clone());

    tracing::debug!(
        id = %relationship.id,
        parent = %parent.name,
        child = %child.name,
        kind = ?relationship.kind,
        "relationship created"
    );
    Ok(relationship)
}

fn foreign_key_name(parent: &Table) -> String {
    format!("{}_id", parent.name).to_lowercase()
}

fn link_through_join_table(store: &mut SchemaStore, parent: &Table, child: &Table) -> Relationship {
    let base = format!("{}_{}_join", parent.name, child.name);
    let name = unique_name(&base, store.tables.iter().map(|t| t.name.as_str()));

    let mut fields = vec![
        Field::primary_key(),
        Field::foreign_key(foreign_key_name(parent), FieldType::Integer, &parent.id),
        Field::foreign_key(foreign_key_name(child), FieldType::Integer, &child.id),
    ];
    for field in &mut fields {
        field.id = store.fresh_id();
    }

    let join = Table {
        id: store.fresh_id(),
        name,
        fields,
    };
    let join_id = join.id.clone();
    tracing::debug!(table = %join.name, "join table synthesized");
    store.tables.push(join);

    Relationship {
        id: store.fresh_id(),
        parent_table_id: parent.id.clone(),
        child_table_id: child.id.clone(),
        parent_field: None,
        child_field: None,
        kind: RelationshipKind::ManyToMany,
        join_table_id: Some(join_id),
    }
}

fn link_foreign_key(
    store: &mut SchemaStore,
    parent: &Table,
    child: &Table,
    kind: RelationshipKind,
    explicit_name: &str,
) -> Relationship {
    let (pk_name, pk_type) = parent
        .primary_key()
        .map(|f| (f.name.clone(), f.typ))
        .unwrap_or_else(|| ("id".to_string(), FieldType::Integer));

    let fk_name = match explicit_name.trim() {
        "" => foreign_key_name(parent),
        name => name.to_string(),
    };
    let one_to_one = kind == RelationshipKind::OneToOne;

    let existing = child.fields.iter().position(|f| names_match(&f.name, &fk_name));

    match existing {
        Some(index) => {
            // Re-linking onto an existing column: only one-to-one tightens it.
            if one_to_one {
                if let Some(child) = store.table_mut(&child.id) {
                    child.fields[index].is_unique = true;
                }
            }
        }
        None => {
            let mut field = Field::foreign_key(fk_name.clone(), pk_type, &parent.id);
            field.id = store.fresh_id();
            field.is_unique = one_to_one;
            if let Some(child) = store.table_mut(&child.id) {
                child.fields.push(field);
            }
        }
    }

    Relationship {
        id: store.fresh_id(),
        parent_table_id: parent.id.clone(),
        child_table_id: child.id.clone(),
        parent_field: Some(pk_name),
        child_field: Some(fk_name),
        kind,
        join_table_id: None,
    }
}

/// Remove relationship `id` and reverse its schema mutations.
pub(crate) fn unlink(store: &mut SchemaStore, id: &str) -> Option<Relationship> {
    let index = store.relationships.iter().position(|r| r.id == id)?;
    let relationship = store.relationships[index].clone();

    match relationship.kind {
        RelationshipKind::ManyToMany => {
            if let Some(join_index) = find_join_table(store, &relationship) {
                let join = store.tables.remove(join_index);
                tracing::debug!(table = %join.name, "join table removed");
            }
        }
        _ => {
            if let Some(child) = store.table_mut(&relationship.child_table_id) {
                child
                    .fields
                    .retain(|f| !f.references_table(&relationship.parent_table_id));
            }
        }
    }

    store.relationships.remove(index);
    tracing::debug!(id = %relationship.id, kind = ?relationship.kind, "relationship deleted");
    Some(relationship)
}

/// Locate the join table of a many-to-many relationship.
///
/// A stored back-reference is authoritative, even when its table is gone.
/// Records without one (older documents) fall back to a structural search that
/// skips both endpoints: first a table referencing both of them, then one
/// referencing either.
fn find_join_table(store: &SchemaStore, relationship: &Relationship) -> Option<usize> {
    if let Some(join_id) = &relationship.join_table_id {
        return store.tables.iter().position(|t| &t.id == join_id);
    }

    let parent = relationship.parent_table_id.as_str();
    let child = relationship.child_table_id.as_str();
    let found = join_candidates(&store.tables, parent, child)
        .find(|(_, t)| t.references_table(parent) && t.references_table(child))
        .or_else(|| {
            join_candidates(&store.tables, parent, child)
                .find(|(_, t)| t.references_table(parent) || t.references_table(child))
        })
        .map(|(i, _)| i);

    if let Some(i) = found {
        tracing::warn!(
            relationship = %relationship.id,
            table = %store.tables[i].name,
            "join table located by foreign keys, no stored reference"
        );
    }
    found
}

fn join_candidates<'a>(
    tables: &'a [Table],
    parent: &'a str,
    child: &'a str,
) -> impl Iterator<Item = (usize, &'a Table)> {
    tables
        .iter()
        .enumerate()
        .filter(move |(_, t)| t.id != parent && t.id != child)
}

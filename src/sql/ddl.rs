//! CREATE TABLE generation.
//!
//! Tables are emitted in the order given; foreign-key dependencies are not
//! sorted, so a script meant to run top to bottom needs parents listed first.

use super::Dialect;
use crate::model::{Field, Table};

const GENERATOR: &str = "schemadraft";

/// Render `tables` as CREATE TABLE statements for `dialect`.
pub fn generate(tables: &[Table], dialect: Dialect) -> String {
    let mut output = String::new();
    output.push_str(&format!("-- Generated by {}\n", GENERATOR));
    output.push_str(&format!("-- Dialect: {}\n", dialect));

    for table in tables {
        output.push('\n');
        render_table(&mut output, table, tables, dialect);
    }

    output
}

fn render_table(output: &mut String, table: &Table, tables: &[Table], dialect: Dialect) {
    let mut lines: Vec<String> = table
        .fields
        .iter()
        .map(|field| render_column(field, dialect))
        .collect();

    for field in table.foreign_keys() {
        if let Some(line) = render_foreign_key(field, tables, dialect) {
            lines.push(line);
        }
    }

    output.push_str(&format!("CREATE TABLE {} (\n", dialect.quote(&table.name)));
    output.push_str(&lines.join(",\n"));
    output.push_str("\n);\n");
}

fn render_column(field: &Field, dialect: Dialect) -> String {
    let mut line = format!("  {} {}", dialect.quote(&field.name), field.typ);

    if field.is_primary {
        line.push_str(" PRIMARY KEY");
    }
    if !field.is_null && !field.is_primary {
        line.push_str(" NOT NULL");
    }
    if field.is_unique {
        line.push_str(" UNIQUE");
    }
    if let Some(value) = field.default_value() {
        line.push_str(&format!(" DEFAULT '{}'", value.replace('\'', "''")));
    }

    line
}

fn render_foreign_key(field: &Field, tables: &[Table], dialect: Dialect) -> Option<String> {
    let target = field.references.as_deref()?;
    let Some(parent) = tables.iter().find(|t| t.id == target) else {
        tracing::warn!(
            field = %field.name,
            references = %target,
            "foreign key references a missing table, constraint skipped"
        );
        return None;
    };

    let parent_pk = parent
        .fields
        .iter()
        .find(|f| f.is_primary)
        .map(|f| f.name.as_str())
        .unwrap_or("id");

    Some(format!(
        "  FOREIGN KEY ({}) REFERENCES {}({})",
        dialect.quote(&field.name),
        dialect.quote(&parent.name),
        dialect.quote(parent_pk)
    ))
}

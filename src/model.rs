use serde::{Deserialize, Serialize};
use std::fmt;

/// Column types a field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FieldType {
    #[default]
    #[serde(rename = "INTEGER")]
    Integer,
    #[serde(rename = "BIGINT")]
    BigInt,
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "VARCHAR(255)")]
    Varchar,
    #[serde(rename = "BOOLEAN")]
    Boolean,
    #[serde(rename = "DATE")]
    Date,
    #[serde(rename = "TIMESTAMP")]
    Timestamp,
    #[serde(rename = "REAL")]
    Real,
    #[serde(rename = "DECIMAL")]
    Decimal,
}

impl FieldType {
    pub const ALL: [FieldType; 9] = [
        Self::Integer,
        Self::BigInt,
        Self::Text,
        Self::Varchar,
        Self::Boolean,
        Self::Date,
        Self::Timestamp,
        Self::Real,
        Self::Decimal,
    ];

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::BigInt => "BIGINT",
            Self::Text => "TEXT",
            Self::Varchar => "VARCHAR(255)",
            Self::Boolean => "BOOLEAN",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::Real => "REAL",
            Self::Decimal => "DECIMAL",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub typ: FieldType,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default = "default_true")]
    pub is_null: bool,
    #[serde(default)]
    pub is_unique: bool,
    #[serde(default)]
    pub auto_increment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default)]
    pub is_foreign_key: bool,
    /// Id of the referenced table when `is_foreign_key` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// A plain nullable column with no constraints.
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            typ,
            is_primary: false,
            is_null: true,
            is_unique: false,
            auto_increment: false,
            default: None,
            is_foreign_key: false,
            references: None,
        }
    }

    /// The `id INTEGER` auto-increment primary key every new table starts with.
    pub fn primary_key() -> Self {
        Self {
            is_primary: true,
            is_null: false,
            auto_increment: true,
            ..Self::new("id", FieldType::Integer)
        }
    }

    /// A NOT NULL foreign key pointing at `table_id`.
    pub fn foreign_key(name: impl Into<String>, typ: FieldType, table_id: &str) -> Self {
        Self {
            is_null: false,
            is_foreign_key: true,
            references: Some(table_id.to_string()),
            ..Self::new(name, typ)
        }
    }

    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self.is_null = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_null = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Default value, if one is set and non-empty.
    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref().filter(|v| !v.is_empty())
    }

    pub fn references_table(&self, table_id: &str) -> bool {
        self.is_foreign_key && self.references.as_deref() == Some(table_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    /// Column order is preserved in generated DDL.
    pub fields: Vec<Field>,
}

impl Table {
    /// First field marked primary, falling back to the first field.
    pub fn primary_key(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.is_primary)
            .or_else(|| self.fields.first())
    }

    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| crate::naming::names_match(&f.name, name))
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_foreign_key)
    }

    pub fn references_table(&self, table_id: &str) -> bool {
        self.fields.iter().any(|f| f.references_table(table_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipKind {
    OneToOne,
    OneToMany,
    ManyToMany,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub parent_table_id: String,
    pub child_table_id: String,
    /// Parent primary-key name. Unset for many-to-many.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_field: Option<String>,
    /// Child foreign-key name. Unset for many-to-many.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_field: Option<String>,
    #[serde(rename = "type")]
    pub kind: RelationshipKind,
    /// Join table synthesized for a many-to-many link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table_id: Option<String>,
}

impl Relationship {
    pub fn involves(&self, table_id: &str) -> bool {
        self.parent_table_id == table_id || self.child_table_id == table_id
    }
}

//! Canonical definition of the `users` entity.
//!
//! The field list here is the single description of what a stored user looks like.
//! Registration validation walks the caller-supplied fields of [`USER_ENTITY`], and the
//! repository renders its column lists from it.

/// Status a freshly registered user is stored with.
pub const DEFAULT_STATUS: &str = "pending";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
  Serial,
  Text,
  Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDefault {
  Text(&'static str),
  Now,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  /// Name used on the wire and in validation errors.
  pub name: &'static str,
  pub column: &'static str,
  pub column_type: ColumnType,
  pub primary_key: bool,
  pub required: bool,
  pub unique: bool,
  pub default: Option<ColumnDefault>,
  /// Whether a caller may provide the value. System-assigned and defaulted fields are not.
  pub caller_supplied: bool,
  pub immutable: bool,
}

impl FieldSpec {
  const fn new(name: &'static str, column: &'static str, column_type: ColumnType) -> Self {
    Self {
      name,
      column,
      column_type,
      primary_key: false,
      required: false,
      unique: false,
      default: None,
      caller_supplied: false,
      immutable: false,
    }
  }

  const fn primary_key(mut self) -> Self {
    self.primary_key = true;
    self.unique = true;
    self.immutable = true;
    self
  }

  const fn required(mut self) -> Self {
    self.required = true;
    self
  }

  const fn unique(mut self) -> Self {
    self.unique = true;
    self
  }

  const fn default_to(mut self, default: ColumnDefault) -> Self {
    self.default = Some(default);
    self
  }

  const fn supplied_by_caller(mut self) -> Self {
    self.caller_supplied = true;
    self
  }

  const fn immutable(mut self) -> Self {
    self.immutable = true;
    self
  }
}

#[derive(Debug)]
pub struct EntityDefinition {
  pub table: &'static str,
  pub fields: &'static [FieldSpec],
}

impl EntityDefinition {
  pub fn field(&self, name: &str) -> Option<&FieldSpec> {
    self.fields.iter().find(|field| field.name == name)
  }

  pub fn caller_fields(&self) -> impl Iterator<Item = &FieldSpec> {
    self.fields.iter().filter(|field| field.caller_supplied)
  }

  /// Comma separated list of every column, in declaration order.
  pub fn column_list(&self) -> String {
    join_columns(self.fields.iter())
  }

  /// `INSERT` of the caller-supplied columns only, returning the full row.
  /// Everything else is left to the column defaults.
  pub fn insert_sql(&self) -> String {
    let placeholders = (1..=self.caller_fields().count())
      .map(|index| format!("${}", index))
      .collect::<Vec<_>>()
      .join(", ");

    format!(
      "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
      self.table,
      join_columns(self.caller_fields()),
      placeholders,
      self.column_list()
    )
  }
}

fn join_columns<'a>(fields: impl Iterator<Item = &'a FieldSpec>) -> String {
  fields.map(|field| field.column).collect::<Vec<_>>().join(", ")
}

pub static USER_ENTITY: EntityDefinition = EntityDefinition {
  table: "users",
  fields: &[
    FieldSpec::new("id", "id", ColumnType::Serial).primary_key(),
    FieldSpec::new("email", "email", ColumnType::Text)
      .required()
      .unique()
      .supplied_by_caller(),
    FieldSpec::new("displayName", "display_name", ColumnType::Text)
      .required()
      .supplied_by_caller(),
    FieldSpec::new("password", "password", ColumnType::Text)
      .required()
      .supplied_by_caller(),
    FieldSpec::new("status", "status", ColumnType::Text)
      .required()
      .default_to(ColumnDefault::Text(DEFAULT_STATUS)),
    FieldSpec::new("createdAt", "created_at", ColumnType::Timestamp)
      .required()
      .default_to(ColumnDefault::Now)
      .immutable(),
  ],
};

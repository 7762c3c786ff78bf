//! Register and login validation.
//!
//! Every field carries an ordered table of independent rules. All rules run on every
//! call so a single response can list every problem with the input.

use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;
use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::{
  model::{LoginInput, RegisterInput},
  schema::USER_ENTITY,
};

pub const PASSWORD_MIN_LENGTH: usize = 8;
pub const DISPLAY_NAME_MIN_LENGTH: usize = 2;
pub const DISPLAY_NAME_MAX_LENGTH: usize = 50;

static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").expect("uppercase pattern"));
static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").expect("lowercase pattern"));
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("digit pattern"));
static SPECIAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("special pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
  Required,
  InvalidType,
  InvalidFormat,
  TooShort,
  TooLong,
  MissingUppercase,
  MissingLowercase,
  MissingDigit,
  MissingSpecial,
}

impl ErrorCode {
  pub fn as_str(&self) -> &'static str {
    match self {
      ErrorCode::Required => "REQUIRED",
      ErrorCode::InvalidType => "INVALID_TYPE",
      ErrorCode::InvalidFormat => "INVALID_FORMAT",
      ErrorCode::TooShort => "TOO_SHORT",
      ErrorCode::TooLong => "TOO_LONG",
      ErrorCode::MissingUppercase => "MISSING_UPPERCASE",
      ErrorCode::MissingLowercase => "MISSING_LOWERCASE",
      ErrorCode::MissingDigit => "MISSING_DIGIT",
      ErrorCode::MissingSpecial => "MISSING_SPECIAL",
    }
  }
}

impl fmt::Display for ErrorCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
  pub code: ErrorCode,
  pub message: &'static str,
}

/// Field name to the ordered list of rules it broke.
///
/// Serializes as `{ "field": ["message", ...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<FieldError>>);

impl FieldErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: &'static str, error: FieldError) {
    self.0.entry(field).or_default().push(error);
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Number of fields with at least one error.
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn get(&self, field: &str) -> &[FieldError] {
    self.0.get(field).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn codes(&self, field: &str) -> Vec<ErrorCode> {
    self.get(field).iter().map(|error| error.code).collect()
  }

  pub fn messages(&self, field: &str) -> Vec<&'static str> {
    self.get(field).iter().map(|error| error.message).collect()
  }

  pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.0.keys().copied()
  }
}

impl fmt::Display for FieldErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut first = true;
    for (field, errors) in &self.0 {
      for error in errors {
        if !first {
          f.write_str("; ")?;
        }
        write!(f, "{}: {}", field, error.message)?;
        first = false;
      }
    }
    Ok(())
  }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.0.len()))?;
    for (field, errors) in &self.0 {
      let messages: Vec<&str> = errors.iter().map(|error| error.message).collect();
      map.serialize_entry(field, &messages)?;
    }
    map.end()
  }
}

/// One predicate over a field value and the error it produces when the predicate fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
  pub code: ErrorCode,
  pub message: &'static str,
  check: fn(&str) -> bool,
}

impl Rule {
  const fn new(code: ErrorCode, message: &'static str, check: fn(&str) -> bool) -> Self {
    Self { code, message, check }
  }

  pub fn passes(&self, value: &str) -> bool {
    (self.check)(value)
  }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
  pub field: &'static str,
  /// Reported when the field is absent or null.
  pub required_message: &'static str,
  pub rules: &'static [Rule],
}

const INVALID_TYPE_MESSAGE: &str = "文字列で入力してください";
const GENERIC_REQUIRED_MESSAGE: &str = "必須項目です";

pub static REGISTER_RULES: &[FieldRules] = &[
  FieldRules {
    field: "email",
    required_message: "Eメールアドレスは必須です",
    rules: &[
      Rule::new(ErrorCode::Required, "Eメールアドレスは必須です", is_present),
      Rule::new(ErrorCode::InvalidFormat, "Eメールアドレスを入力してください", is_email),
    ],
  },
  FieldRules {
    field: "displayName",
    required_message: "表示名は必須です",
    rules: &[
      Rule::new(ErrorCode::TooShort, "表示名は2文字以上でなければなりません", |value| {
        char_len(value) >= DISPLAY_NAME_MIN_LENGTH
      }),
      Rule::new(ErrorCode::TooLong, "表示名は50文字を超えてはいけません", |value| {
        char_len(value) <= DISPLAY_NAME_MAX_LENGTH
      }),
    ],
  },
  FieldRules {
    field: "password",
    required_message: "パスワードは必須です",
    rules: &[
      Rule::new(ErrorCode::TooShort, "パスワードは最低8文字です", |value| {
        char_len(value) >= PASSWORD_MIN_LENGTH
      }),
      Rule::new(
        ErrorCode::MissingUppercase,
        "パスワードには最低一つの大文字が含まれていなければなりません",
        |value| UPPERCASE.is_match(value),
      ),
      Rule::new(
        ErrorCode::MissingLowercase,
        "パスワードには最低一つの小文字が含まれていなければなりません",
        |value| LOWERCASE.is_match(value),
      ),
      Rule::new(
        ErrorCode::MissingDigit,
        "パスワードには最低一つの数字が含まれていなければなりません",
        |value| DIGIT.is_match(value),
      ),
      Rule::new(
        ErrorCode::MissingSpecial,
        "パスワードには最低一つの特殊文字が含まれていなければなりません",
        |value| SPECIAL.is_match(value),
      ),
    ],
  },
];

pub static LOGIN_RULES: &[FieldRules] = &[
  FieldRules {
    field: "email",
    required_message: "Eメールアドレスは必須です",
    rules: &[
      Rule::new(ErrorCode::Required, "Eメールアドレスは必須です", is_present),
      Rule::new(ErrorCode::InvalidFormat, "有効なメールアドレスを入力してください", is_email),
    ],
  },
  FieldRules {
    field: "password",
    required_message: "パスワードは必須です",
    rules: &[Rule::new(ErrorCode::Required, "パスワードは必須です", is_present)],
  },
];

fn char_len(value: &str) -> usize {
  value.chars().count()
}

fn is_present(value: &str) -> bool {
  !value.is_empty()
}

/// `local@domain`. The local part is a dot-atom (no leading, trailing or doubled dots) and
/// the domain has at least two non-empty labels ending in an alphabetic TLD of two or more letters.
pub fn is_email(value: &str) -> bool {
  let Some((local, domain)) = value.rsplit_once('@') else {
    return false;
  };

  let local_ok = !local.is_empty() && !local.starts_with('.') && !local.ends_with('.') && !local.contains("..");

  let labels: Vec<&str> = domain.split('.').collect();
  let domain_ok = labels.len() >= 2
    && labels.iter().all(|label| !label.is_empty())
    && labels
      .last()
      .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

  local_ok && domain_ok && value.validate_email()
}

fn rules_for(table: &'static [FieldRules], field: &str) -> Option<&'static FieldRules> {
  table.iter().find(|rules| rules.field == field)
}

/// Runs one field's rules and returns the value when every rule passed.
fn check_field(
  input: &Map<String, Value>,
  rules: &FieldRules,
  required: bool,
  errors: &mut FieldErrors,
) -> Option<String> {
  let value = match input.get(rules.field) {
    None | Some(Value::Null) => {
      if required {
        errors.add(
          rules.field,
          FieldError {
            code: ErrorCode::Required,
            message: rules.required_message,
          },
        );
      }
      return None;
    }
    Some(Value::String(value)) => value,
    Some(_) => {
      errors.add(
        rules.field,
        FieldError {
          code: ErrorCode::InvalidType,
          message: INVALID_TYPE_MESSAGE,
        },
      );
      return None;
    }
  };

  let mut valid = true;
  for rule in rules.rules {
    if !rule.passes(value) {
      errors.add(
        rules.field,
        FieldError {
          code: rule.code,
          message: rule.message,
        },
      );
      valid = false;
    }
  }

  valid.then(|| value.clone())
}

/// Validates a registration payload.
///
/// The fields checked, and whether each is required, come from the caller-supplied
/// fields of [`USER_ENTITY`]. Unknown keys are dropped.
pub fn validate_register(raw: &Value) -> Result<RegisterInput, FieldErrors> {
  let empty = Map::new();
  let input = raw.as_object().unwrap_or(&empty);
  let mut errors = FieldErrors::new();
  let mut values = BTreeMap::new();

  for field in USER_ENTITY.caller_fields() {
    let fallback = FieldRules {
      field: field.name,
      required_message: GENERIC_REQUIRED_MESSAGE,
      rules: &[],
    };
    let rules = rules_for(REGISTER_RULES, field.name).unwrap_or(&fallback);

    if let Some(value) = check_field(input, rules, field.required, &mut errors) {
      values.insert(field.name, value);
    }
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  let mut take = |name: &'static str| values.remove(name).unwrap_or_default();
  Ok(RegisterInput {
    email: take("email"),
    display_name: take("displayName"),
    password: take("password"),
  })
}

/// Validates a login payload. The password is only checked for presence.
pub fn validate_login(raw: &Value) -> Result<LoginInput, FieldErrors> {
  let empty = Map::new();
  let input = raw.as_object().unwrap_or(&empty);
  let mut errors = FieldErrors::new();
  let mut values = BTreeMap::new();

  for rules in LOGIN_RULES {
    if let Some(value) = check_field(input, rules, true, &mut errors) {
      values.insert(rules.field, value);
    }
  }

  if !errors.is_empty() {
    return Err(errors);
  }

  let mut take = |name: &'static str| values.remove(name).unwrap_or_default();
  Ok(LoginInput {
    email: take("email"),
    password: take("password"),
  })
}

//! JSON template transformation.
//!
//! A template is any JSON value. Strings inside it may reference fields of a
//! data document with `{{path.to.field}}`; array elements are addressed by
//! index (`{{items.0.name}}`).
//!
//! - A string that is exactly one reference becomes the referenced value,
//!   keeping its JSON type. A missing reference yields `null`.
//! - References embedded in longer text are interpolated. Strings are
//!   inserted as-is, other values as compact JSON, missing values and `null`
//!   as nothing.
//! - `{{{{` produces a literal `{{`.
//!
//! Object keys, numbers, booleans and `null` pass through unchanged.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
  #[error("unclosed reference at position {0}")]
  Unclosed(usize),

  #[error("empty reference at position {0}")]
  Empty(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  Literal(String),
  Reference(String),
}

/// Produce a new value from `template` with every reference resolved against `data`.
pub fn transform(template: &Value, data: &Value) -> Result<Value, TransformError> {
  match template {
    Value::String(s) => transform_string(s, data),
    Value::Array(items) => items
      .iter()
      .map(|item| transform(item, data))
      .collect::<Result<Vec<_>, _>>()
      .map(Value::Array),
    Value::Object(fields) => fields
      .iter()
      .map(|(key, value)| Ok((key.clone(), transform(value, data)?)))
      .collect::<Result<Map<_, _>, _>>()
      .map(Value::Object),
    other => Ok(other.clone()),
  }
}

fn transform_string(input: &str, data: &Value) -> Result<Value, TransformError> {
  let segments = parse(input)?;

  if let [Segment::Reference(path)] = segments.as_slice() {
    return Ok(lookup(data, path).cloned().unwrap_or(Value::Null));
  }

  let mut out = String::new();
  for segment in &segments {
    match segment {
      Segment::Literal(text) => out.push_str(text),
      Segment::Reference(path) => match lookup(data, path) {
        None | Some(Value::Null) => {}
        Some(Value::String(s)) => out.push_str(s),
        Some(other) => out.push_str(&other.to_string()),
      },
    }
  }
  Ok(Value::String(out))
}

fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
  path.split('.').try_fold(data, |current, key| match current {
    Value::Object(fields) => fields.get(key),
    Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
    _ => None,
  })
}

fn parse(input: &str) -> Result<Vec<Segment>, TransformError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '{' || !matches!(chars.peek(), Some((_, '{'))) {
      literal.push(ch);
      continue;
    }
    chars.next();

    let rest = &input[pos + 2..];
    if rest.starts_with("{{") {
      // `{{{{` escapes a literal `{{`.
      chars.next();
      chars.next();
      literal.push_str("{{");
      continue;
    }

    let end = rest.find("}}").ok_or(TransformError::Unclosed(pos))?;
    let reference = rest[..end].trim();
    if reference.is_empty() {
      return Err(TransformError::Empty(pos));
    }

    if !literal.is_empty() {
      segments.push(Segment::Literal(std::mem::take(&mut literal)));
    }
    segments.push(Segment::Reference(reference.to_string()));

    let resume = pos + 2 + end + 2;
    while chars.peek().is_some_and(|(i, _)| *i < resume) {
      chars.next();
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }
  Ok(segments)
}

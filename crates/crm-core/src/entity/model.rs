//! Validated payloads and response records.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{EntityKind, FieldKind, FieldSpec, RefSpec};
use crate::error::{CrmError, CrmResult};

/// A typed scalar value, ready to be bound as a query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Null,
}

impl FieldValue {
    /// Check a JSON value against a field's declared kind.
    pub fn from_json(spec: &FieldSpec, value: Value) -> CrmResult<Self> {
        match (spec.kind, value) {
            (_, Value::Null) => Ok(Self::Null),
            (FieldKind::Text, Value::String(s)) => Ok(Self::Text(s)),
            (FieldKind::Email, Value::String(s)) => {
                if is_valid_email(&s) {
                    Ok(Self::Text(s))
                } else {
                    Err(CrmError::validation(format!("{} is not a valid email address", spec.name)))
                }
            }
            (FieldKind::Number, Value::Number(n)) => n
                .as_f64()
                .map(Self::Number)
                .ok_or_else(|| CrmError::validation(format!("{} is out of range", spec.name))),
            (FieldKind::Number, _) => Err(CrmError::validation(format!("{} must be a number", spec.name))),
            (_, _) => Err(CrmError::validation(format!("{} must be a string", spec.name))),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

fn is_valid_email(s: &str) -> bool {
    let mut parts = s.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !s.chars().any(char::is_whitespace)
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
        }
        _ => false,
    }
}

fn into_object(body: Value) -> CrmResult<Map<String, Value>> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(CrmError::validation("Request body must be a JSON object")),
    }
}

/// A validated creation payload.
///
/// `attributes` holds every scalar field of the kind, in schema order, with
/// defaults applied, because creation overwrites the whole node.
/// `references` holds only the slots the caller actually supplied.
#[derive(Debug, Clone)]
pub struct NewEntity {
    pub kind: EntityKind,
    pub id: String,
    pub attributes: Vec<(&'static FieldSpec, FieldValue)>,
    pub references: Vec<(&'static RefSpec, String)>,
}

impl NewEntity {
    pub fn from_json(kind: EntityKind, body: Value) -> CrmResult<Self> {
        let mut map = into_object(body)?;

        let id = match map.remove("id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id,
            Some(Value::String(_)) => return Err(CrmError::validation("id must not be empty")),
            Some(Value::Null) | None => return Err(CrmError::validation("id is required")),
            Some(_) => return Err(CrmError::validation("id must be a string")),
        };

        let mut attributes = Vec::with_capacity(kind.fields().len());
        for spec in kind.fields() {
            let value = match map.remove(spec.name) {
                Some(value) => FieldValue::from_json(spec, value)?,
                None => spec
                    .default
                    .map(|d| FieldValue::Text(d.to_string()))
                    .unwrap_or(FieldValue::Null),
            };
            if spec.required && value.is_null() {
                return Err(CrmError::validation(format!("{} is required", spec.name)));
            }
            attributes.push((spec, value));
        }

        let mut references = Vec::new();
        for spec in kind.references() {
            match map.remove(spec.name) {
                Some(Value::String(target)) => references.push((spec, target)),
                Some(Value::Null) | None if spec.is_required() => {
                    return Err(CrmError::validation(format!("{} is required", spec.name)));
                }
                Some(Value::Null) | None => {}
                Some(_) => return Err(CrmError::validation(format!("{} must be a string", spec.name))),
            }
        }

        reject_unknown(kind, map)?;

        Ok(Self { kind, id, attributes, references })
    }
}

/// A validated partial update: only the fields the caller supplied.
#[derive(Debug, Clone)]
pub struct EntityPatch {
    pub kind: EntityKind,
    pub changes: Vec<(&'static FieldSpec, FieldValue)>,
}

impl EntityPatch {
    pub fn from_json(kind: EntityKind, body: Value) -> CrmResult<Self> {
        let map = into_object(body)?;
        if map.is_empty() {
            return Err(CrmError::validation("No fields to update"));
        }

        let mut changes = Vec::with_capacity(map.len());
        for (key, value) in map {
            let Some(spec) = kind.field(&key) else {
                if key == "id" {
                    return Err(CrmError::validation("id cannot be updated"));
                }
                if kind.reference(&key).is_some() {
                    return Err(CrmError::validation(format!(
                        "{key} is a relationship and cannot be updated; use a link endpoint"
                    )));
                }
                return Err(CrmError::validation(format!("Unknown field for {kind}: {key}")));
            };
            let value = FieldValue::from_json(spec, value)?;
            if spec.required && value.is_null() {
                return Err(CrmError::validation(format!("{} cannot be null", spec.name)));
            }
            changes.push((spec, value));
        }

        Ok(Self { kind, changes })
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.changes.iter().map(|(spec, _)| spec.name).collect()
    }
}

fn reject_unknown(kind: EntityKind, leftover: Map<String, Value>) -> CrmResult<()> {
    match leftover.keys().next() {
        Some(key) => Err(CrmError::validation(format!("Unknown field for {kind}: {key}"))),
        None => Ok(()),
    }
}

/// An entity as returned to API callers.
///
/// Serializes flat: `{"id": ..., "<field>": ..., "<reference>": ...}` with
/// every declared column present, null when unset or unresolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRecord {
    #[serde(skip)]
    pub kind: EntityKind,
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl EntityRecord {
    /// Build a record from a result row keyed by column name.
    pub fn from_columns(kind: EntityKind, mut columns: Map<String, Value>) -> CrmResult<Self> {
        let id = match columns.remove("id") {
            Some(Value::String(id)) => id,
            other => {
                return Err(CrmError::Storage(anyhow::anyhow!(
                    "{kind} row has no string id (got {other:?})"
                )))
            }
        };

        let mut fields = Map::new();
        for column in kind.columns().into_iter().skip(1) {
            fields.insert(column.to_string(), columns.remove(column).unwrap_or(Value::Null));
        }

        Ok(Self { kind, id, fields })
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_entity_applies_defaults_and_nulls() {
        let lead = NewEntity::from_json(EntityKind::Lead, json!({"id": "l1", "name": "Bob"})).unwrap();
        assert_eq!(lead.id, "l1");
        let attrs: Vec<_> = lead.attributes.iter().map(|(s, v)| (s.name, v.clone())).collect();
        assert_eq!(attrs[0], ("name", FieldValue::Text("Bob".into())));
        assert_eq!(attrs[3], ("status", FieldValue::Text("New".into())));
        assert_eq!(attrs[4], ("score", FieldValue::Null));
        assert!(lead.references.is_empty());
    }

    #[test]
    fn test_explicit_null_overrides_default() {
        let deal = NewEntity::from_json(
            EntityKind::Deal,
            json!({"id": "d1", "name": "Big", "opportunity_id": "o1", "status": null}),
        )
        .unwrap();
        let status = deal.attributes.iter().find(|(s, _)| s.name == "status").unwrap();
        assert_eq!(status.1, FieldValue::Null);
    }

    #[test]
    fn test_new_entity_collects_supplied_references_only() {
        let lead = NewEntity::from_json(
            EntityKind::Lead,
            json!({"id": "l1", "name": "Bob", "account_id": "a1", "assigned_to": null}),
        )
        .unwrap();
        let refs: Vec<_> = lead.references.iter().map(|(s, t)| (s.name, t.as_str())).collect();
        assert_eq!(refs, vec![("account_id", "a1")]);
    }

    #[test]
    fn test_required_reference_missing_is_validation_error() {
        let err = NewEntity::from_json(EntityKind::Opportunity, json!({"id": "o1", "name": "Renewal"}))
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "lead_id is required"));
    }

    #[test]
    fn test_required_field_missing() {
        let err = NewEntity::from_json(EntityKind::User, json!({"id": "u1", "name": "Ann"})).unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "role is required"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = NewEntity::from_json(
            EntityKind::Account,
            json!({"id": "a1", "name": "Acme", "`name` = 1 DETACH DELETE a //": 1}),
        )
        .unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
    }

    #[test]
    fn test_type_mismatch() {
        let err = NewEntity::from_json(EntityKind::Account, json!({"id": "a1", "name": "Acme", "revenue": "lots"}))
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "revenue must be a number"));

        let err = NewEntity::from_json(EntityKind::User, json!({"id": "u1", "name": "Ann", "role": 3})).unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "role must be a string"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ann@example.com"));
        assert!(!is_valid_email("ann@example"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ann@@example.com"));
        assert!(!is_valid_email("ann smith@example.com"));
    }

    #[test]
    fn test_empty_patch_rejected() {
        let err = EntityPatch::from_json(EntityKind::Lead, json!({})).unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "No fields to update"));
    }

    #[test]
    fn test_patch_keeps_only_supplied_fields() {
        let patch = EntityPatch::from_json(EntityKind::Lead, json!({"status": "Qualified", "email": null})).unwrap();
        let mut names = patch.field_names();
        names.sort_unstable();
        assert_eq!(names, vec!["email", "status"]);
    }

    #[test]
    fn test_patch_rejects_non_scalar_keys() {
        for body in [json!({"id": "x"}), json!({"account_id": "a1"}), json!({"n.name": "x"})] {
            let err = EntityPatch::from_json(EntityKind::Lead, body).unwrap_err();
            assert!(matches!(err, CrmError::Validation(_)));
        }
    }

    #[test]
    fn test_patch_cannot_null_required_field() {
        let err = EntityPatch::from_json(EntityKind::User, json!({"name": null})).unwrap_err();
        assert!(matches!(err, CrmError::Validation(ref m) if m == "name cannot be null"));
    }

    #[test]
    fn test_record_fills_missing_columns() {
        let mut row = Map::new();
        row.insert("id".into(), json!("u1"));
        row.insert("name".into(), json!("Ann"));
        row.insert("role".into(), json!("rep"));
        let record = EntityRecord::from_columns(EntityKind::User, row).unwrap();
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": "u1", "name": "Ann", "role": "rep", "region": null, "email": null})
        );
    }
}

use serde_json::{Map, Value};

use crate::error::{AppError, AppResult};

/// ===============================
/// Merge a partial update into a stored record
/// ===============================
///
/// Keys in `protected` belong to the service and may not be set by the
/// client. Returns the names of the fields that actually changed.
pub fn merge_patch(
    target: &mut Map<String, Value>,
    patch: &Value,
    protected: &[&str],
) -> AppResult<Vec<String>> {
    let obj = patch
        .as_object()
        .ok_or_else(|| AppError::validation("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(AppError::validation("No fields provided for update"));
    }

    if let Some(key) = obj.keys().find(|k| protected.contains(&k.as_str())) {
        return Err(AppError::validation(format!("Field `{key}` cannot be changed")));
    }

    let mut changed = Vec::new();
    for (key, value) in obj {
        if target.get(key) != Some(value) {
            target.insert(key.clone(), value.clone());
            changed.push(key.clone());
        }
    }

    Ok(changed)
}

/// ===============================
/// Serialize / deserialize through a JSON object
/// ===============================
pub fn to_object<T: serde::Serialize>(record: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(AppError::validation("Record must serialize to a JSON object")),
        Err(e) => Err(AppError::validation(format!("Invalid record: {e}"))),
    }
}

pub fn from_object<T: serde::de::DeserializeOwned>(map: Map<String, Value>) -> AppResult<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::validation(format!("Invalid record: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Map<String, Value> {
        json!({"id": "EMP1001", "department": "Engineering", "salary": "50000"})
            .as_object()
            .cloned()
            .unwrap()
    }

    #[test]
    fn applies_and_reports_changes() {
        let mut target = record();
        let changed = merge_patch(
            &mut target,
            &json!({"department": "Research", "salary": "50000", "badge": 7}),
            &["id"],
        )
        .unwrap();

        assert_eq!(changed, vec!["department".to_string(), "badge".to_string()]);
        assert_eq!(target["department"], json!("Research"));
        assert_eq!(target["badge"], json!(7));
    }

    #[test]
    fn rejects_empty_and_non_object_payloads() {
        let mut target = record();
        assert!(merge_patch(&mut target, &json!({}), &[]).is_err());
        assert!(merge_patch(&mut target, &json!([1, 2]), &[]).is_err());
    }

    #[test]
    fn protected_keys_are_refused() {
        let mut target = record();
        let err = merge_patch(&mut target, &json!({"id": "EMP2000"}), &["id"]).unwrap_err();
        assert_eq!(err.to_string(), "Field `id` cannot be changed");
        assert_eq!(target["id"], json!("EMP1001"));
    }
}

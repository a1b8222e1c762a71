//! CSV rendering of stored records.

use serde_json::Value;

/// Header row is the key set of the first record; every later record is
/// projected onto those columns. Values are always quoted.
pub fn records_to_csv(records: &[Value]) -> String {
    let Some(Value::Object(first)) = records.first() else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|col| header_cell(col))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        lines.push(
            columns
                .iter()
                .map(|col| quote(&cell_text(record.get(col.as_str()))))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    lines.join("\n")
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(other) => other.to_string(),
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

fn header_cell(name: &str) -> String {
    if name.contains([',', '"', '\n', '\r']) {
        quote(name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_collection_exports_nothing() {
        assert_eq!(records_to_csv(&[]), "");
    }

    #[test]
    fn columns_follow_first_record() {
        let records = vec![
            json!({"id": "EMP1001", "firstName": "Ada", "salary": 50000}),
            json!({"id": "EMP1002", "firstName": "Grace", "extra": "ignored"}),
        ];

        assert_eq!(
            records_to_csv(&records),
            "id,firstName,salary\n\
             \"EMP1001\",\"Ada\",\"50000\"\n\
             \"EMP1002\",\"Grace\",\"\""
        );
    }

    #[test]
    fn quotes_are_doubled() {
        let records = vec![json!({"address": "12 \"Main\" St, Kingston"})];
        assert_eq!(
            records_to_csv(&records),
            "address\n\"12 \"\"Main\"\" St, Kingston\""
        );
    }

    #[test]
    fn nested_values_render_as_json() {
        let records = vec![json!({"badge": {"floor": 3}, "note": null})];
        assert_eq!(
            records_to_csv(&records),
            "badge,note\n\"{\"\"floor\"\":3}\",\"\""
        );
    }
}

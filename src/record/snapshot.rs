use crate::core::{RecordError, Result, Row, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Borrowed view of the record state that the JSON snapshot is rendered
/// from: declared fields in declaration order (preceded by the primary key
/// when it is implicit), then the id alias and the derived display name.
pub(crate) struct SnapshotState<'a> {
    pub fields: &'a Row,
    pub field_order: &'static [&'static str],
    pub primary_key: &'static str,
    pub id: &'a Value,
    pub display_name: Option<&'a str>,
}

impl Serialize for SnapshotState<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if !self.field_order.contains(&self.primary_key) {
            let value = self.fields.get(self.primary_key).unwrap_or(&Value::Null);
            map.serialize_entry(self.primary_key, value)?;
        }
        for name in self.field_order {
            let value = self.fields.get(*name).unwrap_or(&Value::Null);
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("id", self.id)?;
        if let Some(display_name) = self.display_name {
            map.serialize_entry("display_name", display_name)?;
        }
        map.end()
    }
}

/// Serialize the state and HTML-entity-escape the result
pub(crate) fn render(state: &SnapshotState<'_>) -> Result<String> {
    let json =
        serde_json::to_string(state).map_err(|e| RecordError::Snapshot(e.to_string()))?;
    Ok(escape_entities(&json))
}

pub(crate) fn escape_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_html_entities() {
        assert_eq!(
            escape_entities(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
        assert_eq!(escape_entities("plain"), "plain");
    }

    #[test]
    fn test_renders_fields_in_declaration_order() {
        let fields = Row::from([
            ("customer_id".to_string(), Value::Integer(7)),
            ("email".to_string(), Value::Text("a@b.com".into())),
            ("first".to_string(), Value::Text("John".into())),
        ]);
        let id = Value::Integer(7);
        let state = SnapshotState {
            fields: &fields,
            field_order: &["customer_id", "first", "email"],
            primary_key: "customer_id",
            id: &id,
            display_name: None,
        };
        let rendered = render(&state).unwrap();
        assert_eq!(
            rendered,
            "{&quot;customer_id&quot;:7,&quot;first&quot;:&quot;John&quot;,\
             &quot;email&quot;:&quot;a@b.com&quot;,&quot;id&quot;:7}"
        );
    }

    #[test]
    fn test_implicit_primary_key_leads_the_snapshot() {
        let fields = Row::from([
            ("pk".to_string(), Value::Integer(3)),
            ("label".to_string(), Value::Null),
        ]);
        let id = Value::Integer(3);
        let state = SnapshotState {
            fields: &fields,
            field_order: &["label"],
            primary_key: "pk",
            id: &id,
            display_name: Some("Label Three"),
        };
        let rendered = render(&state).unwrap();
        assert_eq!(
            rendered,
            "{&quot;pk&quot;:3,&quot;label&quot;:null,&quot;id&quot;:3,\
             &quot;display_name&quot;:&quot;Label Three&quot;}"
        );
    }
}

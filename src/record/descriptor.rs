use crate::core::Value;
use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Static declaration of a lazily-activated capability.
///
/// The body runs at most once per record instance, on the first
/// [`Record::invoke`] of its name; later invocations are free no-ops.
pub struct Capability<E: Entity> {
    pub name: &'static str,
    pub run: fn(&mut Record<E>, &[Value]) -> bool,
}

/// Per-type declaration of table name, primary-key column, and field list.
///
/// Concrete entity types implement this once; everything else (lifecycle,
/// caching, normalization, capability dispatch) comes from [`Record<E>`].
///
/// The primary-key column does not have to appear in `FIELDS`: the live
/// primary-key value is always addressable by its own name, but only
/// `FIELDS` entries are written back by save/insert/update.
pub trait Entity: Sized {
    const TABLE: &'static str;
    const PRIMARY_KEY: &'static str;
    const FIELDS: &'static [&'static str];

    /// Lazily-activated capabilities, declared as an explicit table
    fn capabilities() -> &'static [Capability<Self>] {
        &[]
    }

    /// Runs at the end of every successful populate. Returning `false`
    /// makes populate fail; the default always succeeds.
    fn post_load(_record: &mut Record<Self>) -> bool {
        true
    }
}

/// Serializable runtime snapshot of an entity declaration, for
/// introspection and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub table: String,
    pub primary_key: String,
    pub fields: Vec<String>,
    pub capabilities: Vec<String>,
}

impl EntityDescriptor {
    pub fn of<E: Entity + 'static>() -> Self {
        Self {
            table: E::TABLE.to_string(),
            primary_key: E::PRIMARY_KEY.to_string(),
            fields: E::FIELDS.iter().map(|f| (*f).to_string()).collect(),
            capabilities: E::capabilities()
                .iter()
                .map(|c| c.name.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl Entity for Widget {
        const TABLE: &'static str = "widgets";
        const PRIMARY_KEY: &'static str = "widget_id";
        const FIELDS: &'static [&'static str] = &["widget_id", "label"];
    }

    #[test]
    fn test_descriptor_mirrors_declaration() {
        let descriptor = EntityDescriptor::of::<Widget>();
        assert_eq!(descriptor.table, "widgets");
        assert_eq!(descriptor.primary_key, "widget_id");
        assert_eq!(descriptor.fields, vec!["widget_id", "label"]);
        assert!(descriptor.capabilities.is_empty());
    }

    #[test]
    fn test_descriptor_round_trips_through_json() {
        let descriptor = EntityDescriptor::of::<Widget>();
        let json = serde_json::to_string(&descriptor).unwrap();
        let back: EntityDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
    }
}

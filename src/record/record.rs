use crate::cache::CachedRecord;
use crate::core::{Predicate, RecordError, Result, Row, Value};
use crate::record::capability::{ActivationState, Dispatch};
use crate::record::descriptor::{Entity, EntityDescriptor};
use crate::record::{normalize, snapshot};
use crate::session::Session;
use crate::storage::QueryExecutor;
use log::debug;
use std::marker::PhantomData;

/// Load criteria: a primary-key id (cache-eligible) or an equality
/// predicate (always queries the store, limit 1).
#[derive(Debug, Clone)]
pub enum LoadCriteria {
    ById(i64),
    Matching(Predicate),
}

impl LoadCriteria {
    pub fn matching<I, K>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Matching(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<i64> for LoadCriteria {
    fn from(id: i64) -> Self {
        Self::ById(id)
    }
}

impl From<Predicate> for LoadCriteria {
    fn from(predicate: Predicate) -> Self {
        Self::Matching(predicate)
    }
}

/// One live row of an [`Entity`]'s table.
///
/// Construction initializes every declared field to [`Value::Null`] and
/// registers the entity's capabilities as pending. `load` fills the fields
/// from the session cache or the backing store, `save` writes them back
/// (insert or update depending on the primary key), `delete` removes the
/// row. See the module docs for the populate pipeline.
pub struct Record<E: Entity> {
    fields: Row,
    loaded: bool,
    id: Value,
    display_name: Option<String>,
    json_snapshot: Option<String>,
    activation: ActivationState,
    _entity: PhantomData<E>,
}

impl<E: Entity + 'static> Record<E> {
    pub fn new() -> Self {
        let mut fields = Row::new();
        // The primary key is addressable even when not declared in FIELDS
        fields.insert(E::PRIMARY_KEY.to_string(), Value::Null);
        for name in E::FIELDS {
            fields.insert((*name).to_string(), Value::Null);
        }
        Self {
            fields,
            loaded: false,
            id: Value::Null,
            display_name: None,
            json_snapshot: None,
            activation: ActivationState::new(E::capabilities().iter().map(|c| c.name)),
            _entity: PhantomData,
        }
    }

    /// Construct and load in one step
    pub fn fetch<S: QueryExecutor>(
        session: &mut Session<S>,
        criteria: impl Into<LoadCriteria>,
    ) -> Result<Self> {
        let mut record = Self::new();
        record.load(session, criteria)?;
        Ok(record)
    }

    /// Runtime snapshot of the entity declaration
    pub fn descriptor() -> EntityDescriptor {
        EntityDescriptor::of::<E>()
    }

    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Read-only alias of the primary-key value as of the last populate
    pub fn id(&self) -> &Value {
        &self.id
    }

    /// Derived display name, written only by normalization
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// HTML-entity-escaped JSON rendering of the state, recomputed on
    /// every successful populate
    pub fn json_snapshot(&self) -> Option<&str> {
        self.json_snapshot.as_deref()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        if !self.fields.contains_key(field) {
            return Err(RecordError::UnknownField(
                field.to_string(),
                E::TABLE.to_string(),
            ));
        }
        self.fields.insert(field.to_string(), value.into());
        Ok(())
    }

    pub fn fields(&self) -> &Row {
        &self.fields
    }

    pub fn capability_pending(&self, name: &str) -> bool {
        self.activation.is_pending(name)
    }

    pub fn capability_activated(&self, name: &str) -> bool {
        self.activation.is_activated(name)
    }

    fn primary_key_value(&self) -> Value {
        self.fields
            .get(E::PRIMARY_KEY)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Load the record from the session cache or the backing store.
    ///
    /// The scalar path consults the cache first and feeds a hit back
    /// through [`populate`](Self::populate) — populate always runs, even on
    /// cache hits. Predicate loads bypass the cache entirely. Zero matching
    /// rows fail with [`RecordError::NotFound`] and leave the record
    /// unloaded.
    pub fn load<S: QueryExecutor>(
        &mut self,
        session: &mut Session<S>,
        criteria: impl Into<LoadCriteria>,
    ) -> Result<&mut Self> {
        let row = match criteria.into() {
            LoadCriteria::ById(id) => {
                if let Some(cached) = session.cache().get(E::TABLE, id) {
                    debug!("cache hit for {}#{id}", E::TABLE);
                    cached.fields
                } else {
                    debug!("cache miss for {}#{id}, querying store", E::TABLE);
                    let predicate =
                        Predicate::from([(E::PRIMARY_KEY.to_string(), Value::Integer(id))]);
                    self.fetch_one(session, &predicate)?
                }
            }
            LoadCriteria::Matching(predicate) => self.fetch_one(session, &predicate)?,
        };
        self.populate(session, &row)
    }

    fn fetch_one<S: QueryExecutor>(
        &self,
        session: &Session<S>,
        predicate: &Predicate,
    ) -> Result<Row> {
        let rows = session.store().query(E::TABLE, predicate, 1)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RecordError::NotFound(E::TABLE.to_string()))
    }

    /// Copy a row into the record and run the populate pipeline:
    ///
    /// 1. copy values for known fields (absent columns are left unchanged,
    ///    so stale values survive repeated populates on one instance),
    /// 2. mark loaded and refresh the id alias,
    /// 3. cache a deep copy under `(table, id)` if that key is empty —
    ///    this happens before normalization, so cached snapshots hold raw
    ///    values,
    /// 4. normalize phone/email/name fields and derive the display name,
    /// 5. run the entity's post-load hook; rejection fails the populate
    ///    even though the mutations above stand,
    /// 6. recompute the JSON snapshot.
    pub fn populate<S: QueryExecutor>(
        &mut self,
        session: &mut Session<S>,
        row: &Row,
    ) -> Result<&mut Self> {
        for (column, value) in row {
            if let Some(slot) = self.fields.get_mut(column) {
                *slot = value.clone();
            }
        }
        self.loaded = true;
        self.id = self.primary_key_value();

        if let Some(id) = self.id.as_i64() {
            session.cache_mut().put(
                E::TABLE,
                id,
                CachedRecord {
                    fields: self.fields.clone(),
                    loaded: self.loaded,
                    id: self.id.clone(),
                },
            );
        }

        if let Some(display_name) = normalize::apply(&mut self.fields) {
            self.display_name = Some(display_name);
        }

        if !E::post_load(self) {
            debug!("post-load hook rejected {} record", E::TABLE);
            return Err(RecordError::HookRejected(E::TABLE.to_string()));
        }

        let rendered = {
            let state = snapshot::SnapshotState {
                fields: &self.fields,
                field_order: E::FIELDS,
                primary_key: E::PRIMARY_KEY,
                id: &self.id,
                display_name: self.display_name.as_deref(),
            };
            snapshot::render(&state)?
        };
        self.json_snapshot = Some(rendered);
        Ok(self)
    }

    /// Insert or update depending on the primary key: a positive integer
    /// updates the matching row, anything else inserts and adopts the
    /// store's generated id into the primary-key field.
    pub fn save<S: QueryExecutor>(&mut self, session: &mut Session<S>) -> Result<()> {
        let data = self.output_data();
        match self.primary_key_value().as_i64() {
            Some(id) if id > 0 => {
                debug!("updating {}#{id}", E::TABLE);
                let predicate =
                    Predicate::from([(E::PRIMARY_KEY.to_string(), Value::Integer(id))]);
                session.store_mut().update(E::TABLE, &data, &predicate)?;
            }
            _ => {
                let id = session.store_mut().insert(E::TABLE, &data)?;
                debug!("inserted {}#{id}", E::TABLE);
                self.fields
                    .insert(E::PRIMARY_KEY.to_string(), Value::Integer(id));
            }
        }
        Ok(())
    }

    /// Remove the row matching the current primary key and clear the
    /// primary-key field. Cache entries deliberately survive deletion.
    pub fn delete<S: QueryExecutor>(&mut self, session: &mut Session<S>) -> Result<()> {
        let predicate = Predicate::from([(E::PRIMARY_KEY.to_string(), self.primary_key_value())]);
        let removed = session.store_mut().delete(E::TABLE, &predicate)?;
        debug!("deleted {removed} row(s) from {}", E::TABLE);
        self.fields.insert(E::PRIMARY_KEY.to_string(), Value::Null);
        Ok(())
    }

    /// Dispatch a lazy capability by name.
    ///
    /// The first invocation runs the capability body; the record is
    /// returned for chaining on success. Later invocations are free no-ops
    /// that still chain. A failed first run counts as activated and is not
    /// retried. Unknown names always fail.
    pub fn invoke(&mut self, name: &str, args: &[Value]) -> Result<&mut Self> {
        match self.activation.dispatch(name) {
            Dispatch::Activate(owned) => {
                let capability = E::capabilities()
                    .iter()
                    .find(|c| c.name == owned)
                    .ok_or_else(|| RecordError::UnknownCapability(owned.to_string()))?;
                if (capability.run)(self, args) {
                    Ok(self)
                } else {
                    Err(RecordError::CapabilityFailed(owned.to_string()))
                }
            }
            Dispatch::AlreadyActive => Ok(self),
            Dispatch::Unknown => Err(RecordError::UnknownCapability(name.to_string())),
        }
    }

    /// Declared fields only, nulls written as empty strings
    fn output_data(&self) -> Row {
        E::FIELDS
            .iter()
            .map(|name| {
                let value = match self.fields.get(*name) {
                    Some(Value::Null) | None => Value::Text(String::new()),
                    Some(v) => v.clone(),
                };
                ((*name).to_string(), value)
            })
            .collect()
    }
}

impl<E: Entity + 'static> Default for Record<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> std::fmt::Debug for Record<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record")
            .field("fields", &self.fields)
            .field("loaded", &self.loaded)
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("json_snapshot", &self.json_snapshot)
            .field("activation", &self.activation)
            .finish()
    }
}

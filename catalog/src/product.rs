use crate::company::Company;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

const ID_FIELD: &str = "id";
const COMPANY_FIELD: &str = "company";

/// A product record as returned by a company API.
///
/// The schema is owned by the upstream, so the record is kept as an ordered
/// field map and serialized back exactly as received plus whatever
/// [`Product::ingest`] adds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(IndexMap<String, Value>);

impl Product {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// The product identifier, if the record carries a string `id`.
    pub fn id(&self) -> Option<&str> {
        self.field(ID_FIELD).and_then(Value::as_str)
    }

    pub fn company(&self) -> Option<&Value> {
        self.field(COMPANY_FIELD)
    }

    /// Stamps a freshly generated identifier on the record and tags it with the
    /// supplying company unless the upstream already set one.
    ///
    /// The identifier is random, so ingesting the same upstream record twice
    /// yields two different ids.
    pub fn ingest(mut self, company: Company) -> Self {
        self.0
            .insert(ID_FIELD.to_string(), Value::String(Uuid::new_v4().to_string()));
        self.0
            .entry(COMPANY_FIELD.to_string())
            .or_insert_with(|| Value::String(company.as_str().to_string()));
        self
    }
}

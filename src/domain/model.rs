use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One source record, columns kept in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRow {
    /// Zero-based position in the input table.
    pub index: usize,
    pub fields: Vec<(String, String)>,
}

impl InputRow {
    pub fn new(index: usize, fields: Vec<(String, String)>) -> Self {
        Self { index, fields }
    }

    /// Value of `column`, or the empty string when the row has no such column.
    pub fn get(&self, column: &str) -> &str {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

/// Parameters for a single registry lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupQuery {
    /// Appended to the endpoint URL; `None` queries the endpoint itself.
    pub path_segment: Option<String>,
    pub params: BTreeMap<String, String>,
}

impl LookupQuery {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// A matched registry record as returned by the API.
pub type Entity = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    pub success: bool,
    pub entities: Vec<Entity>,
}

impl LookupResult {
    pub fn matched(entities: Vec<Entity>) -> Self {
        Self {
            success: true,
            entities,
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            entities: Vec::new(),
        }
    }

    /// Pulls the entity list out of a response body.
    ///
    /// A top-level array is the list itself; an object may carry the list under
    /// one of the well-known keys, otherwise a non-empty object is a single entity.
    pub fn from_payload(payload: serde_json::Value) -> Self {
        const LIST_KEYS: [&str; 4] = ["list", "companies", "results", "data"];

        let entities = match payload {
            serde_json::Value::Array(items) => objects_only(items),
            serde_json::Value::Object(mut obj) => {
                let list_key = LIST_KEYS
                    .iter()
                    .copied()
                    .find(|key| obj.get(*key).is_some_and(serde_json::Value::is_array));
                match list_key {
                    Some(key) => match obj.remove(key) {
                        Some(serde_json::Value::Array(items)) => objects_only(items),
                        _ => Vec::new(),
                    },
                    None if obj.is_empty() => Vec::new(),
                    None => vec![obj],
                }
            }
            _ => Vec::new(),
        };

        Self::matched(entities)
    }

    pub fn is_match(&self) -> bool {
        self.success && !self.entities.is_empty()
    }
}

fn objects_only(items: Vec<serde_json::Value>) -> Vec<Entity> {
    items
        .into_iter()
        .filter_map(|item| match item {
            serde_json::Value::Object(obj) => Some(obj),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OutputRow {
    pub index: usize,
    /// One value per column of the owning [`OutputTable`].
    pub values: Vec<String>,
}

/// How a single input row fared during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Matched,
    Unmatched,
    Failed,
}

impl RowOutcome {
    pub fn of(result: &LookupResult) -> Self {
        match (result.success, result.entities.is_empty()) {
            (false, _) => RowOutcome::Failed,
            (true, true) => RowOutcome::Unmatched,
            (true, false) => RowOutcome::Matched,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentStats {
    pub input_rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub failed: usize,
    pub output_rows: usize,
}

impl EnrichmentStats {
    pub fn record(&mut self, outcome: RowOutcome, produced: usize) {
        self.input_rows += 1;
        self.output_rows += produced;
        match outcome {
            RowOutcome::Matched => self.matched += 1,
            RowOutcome::Unmatched => self.unmatched += 1,
            RowOutcome::Failed => self.failed += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<OutputRow>,
    pub stats: EnrichmentStats,
}

impl OutputTable {
    /// Gives the rows contiguous identifiers in their current order.
    pub fn reindex(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.index = index;
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let position = self.columns.iter().position(|c| c == column)?;
        self.rows
            .get(row)
            .and_then(|r| r.values.get(position))
            .map(String::as_str)
    }
}

/// Copies one entity field (dotted path for nested objects) into an output column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub source: String,
    pub column: String,
}

impl MappingEntry {
    pub fn new(source: &str, column: &str) -> Self {
        Self {
            source: source.to_string(),
            column: column.to_string(),
        }
    }
}

/// Ordered entity-field to output-column mapping; its columns are the enrichment columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping(pub Vec<MappingEntry>);

impl FieldMapping {
    pub fn entries(&self) -> &[MappingEntry] {
        &self.0
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.column.as_str())
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self(vec![
            MappingEntry::new("uid", "uid"),
            MappingEntry::new("name", "name"),
            MappingEntry::new("ehraid", "ehraid"),
            MappingEntry::new("chid", "chid"),
            MappingEntry::new("legalSeat", "legalSeat"),
            MappingEntry::new("legalSeatId", "legalSeatId"),
            MappingEntry::new("legalForm.shortName.de", "legalForm"),
            MappingEntry::new("status", "status"),
            MappingEntry::new("address.street", "street"),
            MappingEntry::new("address.houseNumber", "houseNumber"),
            MappingEntry::new("address.swissZipCode", "swissZipCode"),
            MappingEntry::new("address.city", "city"),
            MappingEntry::new("sogcDate", "sogcDate"),
            MappingEntry::new("deletionDate", "deletionDate"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_input_row_defaults_missing_columns_to_empty() {
        let row = InputRow::new(0, vec![("name".to_string(), "Acme AG".to_string())]);
        assert_eq!(row.get("name"), "Acme AG");
        assert_eq!(row.get("legalSeatId"), "");
        assert!(!row.has_column("legalSeatId"));
    }

    #[test]
    fn test_payload_array_is_entity_list() {
        let result = LookupResult::from_payload(json!([
            {"uid": "CHE-1"},
            "not an entity",
            {"uid": "CHE-2"}
        ]));
        assert!(result.success);
        assert_eq!(result.entities.len(), 2);
        assert_eq!(result.entities[1]["uid"], "CHE-2");
    }

    #[test]
    fn test_payload_object_with_list_key() {
        let result = LookupResult::from_payload(json!({
            "total": 1,
            "list": [{"uid": "CHE-1"}]
        }));
        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0]["uid"], "CHE-1");
    }

    #[test]
    fn test_payload_single_object_and_empty_shapes() {
        let single = LookupResult::from_payload(json!({"uid": "CHE-1", "name": "Acme AG"}));
        assert_eq!(single.entities.len(), 1);

        assert!(LookupResult::from_payload(json!({})).entities.is_empty());
        assert!(LookupResult::from_payload(json!(null)).entities.is_empty());
        assert!(LookupResult::from_payload(json!([])).entities.is_empty());
    }

    #[test]
    fn test_row_outcome() {
        assert_eq!(RowOutcome::of(&LookupResult::failed()), RowOutcome::Failed);
        assert_eq!(
            RowOutcome::of(&LookupResult::matched(vec![])),
            RowOutcome::Unmatched
        );
        let entity = json!({"uid": "CHE-1"}).as_object().cloned().unwrap();
        assert_eq!(
            RowOutcome::of(&LookupResult::matched(vec![entity])),
            RowOutcome::Matched
        );
    }

    #[test]
    fn test_reindex_is_contiguous() {
        let mut table = OutputTable {
            columns: vec!["uid".to_string()],
            rows: vec![
                OutputRow { index: 7, values: vec!["a".to_string()] },
                OutputRow { index: 3, values: vec!["b".to_string()] },
            ],
            stats: EnrichmentStats::default(),
        };
        table.reindex();
        assert_eq!(table.rows[0].index, 0);
        assert_eq!(table.rows[1].index, 1);
        assert_eq!(table.value(1, "uid"), Some("b"));
    }
}

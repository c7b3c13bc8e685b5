use crate::domain::model::{Entity, FieldMapping, InputRow, LookupResult, OutputRow};

/// Turns one input row and its lookup result into output rows.
///
/// Every input row yields at least one output row: a failed lookup or one with
/// no entities keeps the row as read, with empty enrichment columns. A match
/// yields one row per entity, in the order the API returned them.
#[derive(Debug, Clone, Default)]
pub struct RowNormalizer {
    mapping: FieldMapping,
}

impl RowNormalizer {
    pub fn new(mapping: FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Output columns: the input columns in order, then each enrichment
    /// column the input does not already have.
    pub fn schema<'a>(&self, input_columns: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut columns: Vec<String> = input_columns.into_iter().map(str::to_string).collect();
        for column in self.mapping.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
        columns
    }

    pub fn normalize(
        &self,
        schema: &[String],
        row: &InputRow,
        result: &LookupResult,
    ) -> Vec<OutputRow> {
        if !result.is_match() {
            let values = schema.iter().map(|c| row.get(c).to_string()).collect();
            return vec![OutputRow {
                index: row.index,
                values,
            }];
        }

        result
            .entities
            .iter()
            .map(|entity| OutputRow {
                index: row.index,
                values: schema
                    .iter()
                    .map(|column| self.merged_value(column, row, entity))
                    .collect(),
            })
            .collect()
    }

    /// The entity's value for a mapped column; the input value when the column
    /// is unmapped or the entity has nothing at that path.
    fn merged_value(&self, column: &str, row: &InputRow, entity: &Entity) -> String {
        let value = self
            .source_for(column)
            .map(|source| entity_value(entity, source))
            .unwrap_or_default();
        if value.is_empty() {
            row.get(column).to_string()
        } else {
            value
        }
    }

    fn source_for(&self, column: &str) -> Option<&str> {
        self.mapping
            .entries()
            .iter()
            .find(|entry| entry.column == column)
            .map(|entry| entry.source.as_str())
    }
}

/// Reads `path` (dot separated for nested objects) from an entity as text.
pub fn entity_value(entity: &Entity, path: &str) -> String {
    let mut segments = path.split('.');
    let first = segments.next().and_then(|key| entity.get(key));
    let value = segments.fold(first, |current, key| current.and_then(|v| v.get(key)));

    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MappingEntry;
    use serde_json::json;

    fn entity(value: serde_json::Value) -> Entity {
        value.as_object().cloned().unwrap()
    }

    fn acme_row() -> InputRow {
        InputRow::new(
            4,
            vec![
                ("name".to_string(), "Acme AG".to_string()),
                ("legalSeatId".to_string(), "261".to_string()),
            ],
        )
    }

    fn small_mapping() -> FieldMapping {
        FieldMapping(vec![
            MappingEntry::new("uid", "uid"),
            MappingEntry::new("name", "name"),
            MappingEntry::new("status", "status"),
            MappingEntry::new("address.city", "city"),
        ])
    }

    #[test]
    fn test_schema_appends_new_enrichment_columns() {
        let normalizer = RowNormalizer::new(small_mapping());
        let schema = normalizer.schema(["name", "legalSeatId"]);
        assert_eq!(schema, vec!["name", "legalSeatId", "uid", "status", "city"]);
    }

    #[test]
    fn test_failed_lookup_keeps_row_with_empty_enrichment() {
        let normalizer = RowNormalizer::new(small_mapping());
        let row = acme_row();
        let schema = normalizer.schema(row.columns());

        let rows = normalizer.normalize(&schema, &row, &LookupResult::failed());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 4);
        assert_eq!(rows[0].values, vec!["Acme AG", "261", "", "", ""]);
    }

    #[test]
    fn test_no_match_is_treated_like_failure() {
        let normalizer = RowNormalizer::new(small_mapping());
        let row = acme_row();
        let schema = normalizer.schema(row.columns());

        let failed = normalizer.normalize(&schema, &row, &LookupResult::failed());
        let empty = normalizer.normalize(&schema, &row, &LookupResult::matched(vec![]));
        assert_eq!(failed, empty);
    }

    #[test]
    fn test_single_match_merges_entity_fields() {
        let normalizer = RowNormalizer::new(small_mapping());
        let row = acme_row();
        let schema = normalizer.schema(row.columns());
        let result = LookupResult::matched(vec![entity(json!({
            "uid": "CHE-123",
            "name": "Acme AG",
            "status": "ACTIVE"
        }))]);

        let rows = normalizer.normalize(&schema, &row, &result);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, vec!["Acme AG", "261", "CHE-123", "ACTIVE", ""]);
    }

    #[test]
    fn test_multiple_matches_fan_out_in_entity_order() {
        let normalizer = RowNormalizer::new(small_mapping());
        let row = acme_row();
        let schema = normalizer.schema(row.columns());
        let result = LookupResult::matched(vec![
            entity(json!({"uid": "CHE-1", "name": "Acme AG", "address": {"city": "Zürich"}})),
            entity(json!({"uid": "CHE-2", "name": "Acme AG in Liquidation"})),
        ]);

        let rows = normalizer.normalize(&schema, &row, &result);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values[2], "CHE-1");
        assert_eq!(rows[0].values[4], "Zürich");
        assert_eq!(rows[1].values[0], "Acme AG in Liquidation");
        assert_eq!(rows[1].values[1], "261");
        assert_eq!(rows[1].values[4], "");
        assert!(rows.iter().all(|r| r.values.len() == schema.len()));
    }

    #[test]
    fn test_default_mapping_keeps_input_value_missing_from_entity() {
        let normalizer = RowNormalizer::new(FieldMapping::default());
        let row = acme_row();
        let schema = normalizer.schema(row.columns());
        let result = LookupResult::matched(vec![entity(json!({
            "uid": "CHE-123",
            "name": "Acme AG",
            "status": "ACTIVE"
        }))]);

        let rows = normalizer.normalize(&schema, &row, &result);
        let value = |column: &str| {
            let position = schema.iter().position(|c| c == column).unwrap();
            rows[0].values[position].as_str()
        };

        assert_eq!(rows.len(), 1);
        assert_eq!(value("name"), "Acme AG");
        assert_eq!(value("legalSeatId"), "261");
        assert_eq!(value("uid"), "CHE-123");
        assert_eq!(value("status"), "ACTIVE");
        assert_eq!(value("city"), "");
    }

    #[test]
    fn test_default_mapping_keeps_uid_when_entity_has_none() {
        let normalizer = RowNormalizer::new(FieldMapping::default());
        let row = InputRow::new(
            0,
            vec![
                ("uid".to_string(), "CHE-999".to_string()),
                ("comment".to_string(), "head office".to_string()),
            ],
        );
        let schema = normalizer.schema(row.columns());
        let result = LookupResult::matched(vec![
            entity(json!({"name": "Beta SA", "legalSeatId": 6621})),
            entity(json!({"uid": "CHE-998", "name": "Beta SA"})),
        ]);

        let rows = normalizer.normalize(&schema, &row, &result);

        assert_eq!(&schema[..2], &["uid", "comment"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values[0], "CHE-999");
        assert_eq!(rows[0].values[1], "head office");
        assert_eq!(rows[1].values[0], "CHE-998");
        assert_eq!(rows[1].values[1], "head office");

        let seat = schema.iter().position(|c| c == "legalSeatId").unwrap();
        assert_eq!(rows[0].values[seat], "6621");
        assert_eq!(rows[1].values[seat], "");
    }

    #[test]
    fn test_entity_value_conversions() {
        let e = entity(json!({
            "ehraid": 12345,
            "active": true,
            "deletionDate": null,
            "legalForm": {"shortName": {"de": "AG", "fr": "SA"}},
            "tags": ["a", "b"]
        }));

        assert_eq!(entity_value(&e, "ehraid"), "12345");
        assert_eq!(entity_value(&e, "active"), "true");
        assert_eq!(entity_value(&e, "deletionDate"), "");
        assert_eq!(entity_value(&e, "legalForm.shortName.de"), "AG");
        assert_eq!(entity_value(&e, "legalForm.shortName.it"), "");
        assert_eq!(entity_value(&e, "tags"), r#"["a","b"]"#);
        assert_eq!(entity_value(&e, "missing.deeply"), "");
    }
}

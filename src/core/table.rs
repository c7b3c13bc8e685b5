use crate::domain::model::{InputRow, OutputTable};
use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::validate_encoding;

/// Decodes a delimited table into rows keyed by its header line.
///
/// Short records are padded with empty values and surplus fields are dropped,
/// so every row carries exactly the header's columns.
pub fn decode_table(bytes: &[u8], delimiter: u8, encoding_label: &str) -> Result<Vec<InputRow>> {
    let encoding = validate_encoding(encoding_label)?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "⚠️ Input contained bytes that are not valid {}; they were replaced",
            used.name()
        );
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    tracing::debug!("Input columns: {:?}", headers);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != headers.len() {
            tracing::debug!(
                "Row {} has {} fields, header has {}",
                index,
                record.len(),
                headers.len()
            );
        }
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, column)| (column.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(InputRow::new(index, fields));
    }

    Ok(rows)
}

/// Encodes the table as UTF-8 with a header line; row identifiers are not written.
pub fn encode_table(table: &OutputTable, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(&row.values)?;
    }

    writer
        .into_inner()
        .map_err(|e| EnrichError::IoError(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EnrichmentStats, OutputRow};

    #[test]
    fn test_decode_semicolon_latin1() {
        // "Zürich" in ISO-8859-1
        let bytes = b"name;legalSeatId;city\nAcme AG;261;Z\xfcrich\n";
        let rows = decode_table(bytes, b';', "ISO-8859-1").unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].index, 0);
        assert_eq!(rows[0].get("name"), "Acme AG");
        assert_eq!(rows[0].get("legalSeatId"), "261");
        assert_eq!(rows[0].get("city"), "Zürich");
    }

    #[test]
    fn test_decode_pads_short_records() {
        let bytes = b"uid;name\nCHE-1\nCHE-2;Beta GmbH;extra\n";
        let rows = decode_table(bytes, b';', "utf-8").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].fields.len(), 2);
        assert_eq!(rows[0].get("name"), "");
        assert_eq!(rows[1].get("name"), "Beta GmbH");
        assert_eq!(rows[1].fields.len(), 2);
    }

    #[test]
    fn test_decode_header_only_and_unknown_encoding() {
        assert!(decode_table(b"uid\n", b';', "utf-8").unwrap().is_empty());
        assert!(matches!(
            decode_table(b"uid\n", b';', "ebcdic-nonsense"),
            Err(EnrichError::UnknownEncodingError { .. })
        ));
    }

    #[test]
    fn test_encode_quotes_and_skips_index() {
        let table = OutputTable {
            columns: vec!["name".to_string(), "uid".to_string()],
            rows: vec![
                OutputRow {
                    index: 0,
                    values: vec!["Acme, AG".to_string(), "CHE-1".to_string()],
                },
                OutputRow {
                    index: 1,
                    values: vec!["Beta".to_string(), String::new()],
                },
            ],
            stats: EnrichmentStats::default(),
        };

        let text = String::from_utf8(encode_table(&table, b',').unwrap()).unwrap();
        assert_eq!(text, "name,uid\n\"Acme, AG\",CHE-1\nBeta,\n");
    }
}

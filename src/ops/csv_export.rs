use crate::models::{Card, FieldSchema};
use crate::ops::error::{export_error, OpsResult};
use chrono::{NaiveDate, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::collections::HashSet;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";
pub const EVENT_HEADER: &str = "Event";
pub const UNKNOWN_EVENT: &str = "Unknown Event";

/// Builds the CSV document for the selected cards.
///
/// Rows come out in the order of `cards`, not `selected_ids`; ids with no
/// matching card are skipped. Every field is quoted, records are separated by
/// `\n` and there is no trailing newline.
pub fn encode(
    selected_ids: &[String],
    cards: &[Card],
    schema: &FieldSchema,
    event_label: Option<&str>,
) -> OpsResult<String> {
    let selected: HashSet<&str> = selected_ids.iter().map(String::as_str).collect();
    let event = event_label.unwrap_or(UNKNOWN_EVENT);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(false)
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(schema.len() + 1);
    header.push(EVENT_HEADER);
    header.extend(schema.labels());
    writer.write_record(&header)?;

    for card in cards.iter().filter(|card| selected.contains(card.id.as_str())) {
        let mut record = Vec::with_capacity(schema.len() + 1);
        record.push(event);
        record.extend(schema.ids().map(|id| card.field(id).unwrap_or("")));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| export_error(&format!("Failed to flush CSV: {}", e)))?;
    let mut text =
        String::from_utf8(bytes).map_err(|e| export_error(&format!("CSV is not UTF-8: {}", e)))?;

    if text.ends_with('\n') {
        text.pop();
    }

    Ok(text)
}

/// `card_data_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("card_data_{}.csv", date.format("%Y-%m-%d"))
}

pub fn export_file_name_today() -> String {
    export_file_name(Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_encode_doubles_embedded_quotes() {
        let cards = vec![Card::new("1").with_field("a", "x\"y")];
        let schema = FieldSchema::new().with_field("a", "A");

        let csv = encode(&ids(&["1"]), &cards, &schema, Some("Fall")).unwrap();
        assert_eq!(csv, "\"Event\",\"A\"\n\"Fall\",\"x\"\"y\"");
    }

    #[test]
    fn test_encode_columns_follow_schema_order() {
        let cards = vec![Card::new("1")
            .with_field("a", "first")
            .with_field("z", "last")
            .with_field("m", "middle")];
        let schema = FieldSchema::new()
            .with_field("z", "Zed")
            .with_field("a", "Ay")
            .with_field("m", "Em");

        let csv = encode(&ids(&["1"]), &cards, &schema, Some("Spring")).unwrap();
        assert_eq!(
            csv,
            "\"Event\",\"Zed\",\"Ay\",\"Em\"\n\"Spring\",\"last\",\"first\",\"middle\""
        );
    }

    #[test]
    fn test_encode_rows_follow_card_order() {
        let cards = vec![
            Card::new("1").with_field("n", "one"),
            Card::new("2").with_field("n", "two"),
            Card::new("3").with_field("n", "three"),
        ];
        let schema = FieldSchema::new().with_field("n", "N");

        let csv = encode(&ids(&["3", "1"]), &cards, &schema, Some("E")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["\"Event\",\"N\"", "\"E\",\"one\"", "\"E\",\"three\""]);
    }

    #[test]
    fn test_encode_unknown_id_adds_no_row() {
        let cards = vec![Card::new("1").with_field("a", "x")];
        let schema = FieldSchema::new().with_field("a", "A");

        let csv = encode(&ids(&["404"]), &cards, &schema, Some("Fall")).unwrap();
        assert_eq!(csv, "\"Event\",\"A\"");
    }

    #[test]
    fn test_encode_missing_field_and_event() {
        let cards = vec![Card::new("1").with_field("a", "42")];
        let schema = FieldSchema::new().with_field("a", "A").with_field("b", "B");

        let csv = encode(&ids(&["1"]), &cards, &schema, None).unwrap();
        assert_eq!(csv, "\"Event\",\"A\",\"B\"\n\"Unknown Event\",\"42\",\"\"");
    }

    #[test]
    fn test_encode_keeps_commas_and_newlines_inside_quotes() {
        let cards = vec![Card::new("1").with_field("note", "a, b\nc")];
        let schema = FieldSchema::new().with_field("note", "Note");

        let csv = encode(&ids(&["1"]), &cards, &schema, Some("Fall")).unwrap();
        assert_eq!(csv, "\"Event\",\"Note\"\n\"Fall\",\"a, b\nc\"");
    }

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "card_data_2024-03-09.csv");
        assert!(export_file_name_today().starts_with("card_data_"));
    }
}

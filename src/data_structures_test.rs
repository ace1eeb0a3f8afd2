/// Tests for data structures serialization
///
/// These tests ensure store documents deserialize into the shapes the
/// projector expects, and rows serialize with their column order intact.

#[cfg(test)]
mod tests {
    use crate::types::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_report_type_serialization() {
        for report_type in ReportType::ALL {
            let json = serde_json::to_string(&report_type).unwrap();
            assert_eq!(json, format!("\"{}\"", report_type.as_str()));
            let deserialized: ReportType = serde_json::from_str(&json).unwrap();
            assert_eq!(report_type, deserialized);
        }
    }

    #[test]
    fn test_field_value_variants() {
        let record: RawRecord = serde_json::from_str(
            r#"{
                "id": "u1",
                "isHypertensive": true,
                "weight": 72.5,
                "height": 170,
                "createdAt": {"_seconds": 1705320000, "_nanoseconds": 500},
                "medications": ["Metformina", "Insulina"],
                "name": "Ana",
                "address": {"city": "Recife"},
                "notes": null
            }"#,
        )
        .unwrap();

        assert_eq!(record.id, "u1");
        assert_eq!(record.get("isHypertensive"), Some(&FieldValue::Bool(true)));
        assert_eq!(record.get("weight"), Some(&FieldValue::Number(72.5)));
        assert_eq!(record.get("height"), Some(&FieldValue::Number(170.0)));
        assert_eq!(
            record.get("createdAt"),
            Some(&FieldValue::Timestamp(StoredTimestamp { seconds: 1705320000, nanoseconds: 500 }))
        );
        assert_eq!(
            record.get("medications"),
            Some(&FieldValue::List(vec!["Metformina".to_string(), "Insulina".to_string()]))
        );
        assert_eq!(record.get("name"), Some(&FieldValue::Text("Ana".to_string())));
        assert!(matches!(record.get("address"), Some(FieldValue::Other(_))));
        assert!(matches!(record.get("notes"), Some(FieldValue::Other(serde_json::Value::Null))));
    }

    #[test]
    fn test_record_accessors_follow_truthiness() {
        let record: RawRecord = serde_json::from_str(
            r#"{"id": "x", "weight": 0, "height": "172", "email": "", "isFollowedUp": false, "carbs100": 28}"#,
        )
        .unwrap();

        assert_eq!(record.text("weight"), "");
        assert_eq!(record.number("weight"), None);
        assert_eq!(record.number("height"), Some(172.0));
        assert_eq!(record.text("email"), "");
        assert!(!record.flag("isFollowedUp"));
        assert_eq!(record.text("carbs100"), "28");
        assert_eq!(record.text("missing"), "");
    }

    #[test]
    fn test_created_at_from_timestamp_or_string() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();

        let stored: RawRecord = serde_json::from_str(r#"{"createdAt": {"seconds": 1705320000}}"#).unwrap();
        assert_eq!(stored.created_at(), Some(expected));
        assert_eq!(stored.id, "");

        let text: RawRecord = serde_json::from_str(r#"{"createdAt": "2024-01-15T09:00:00-03:00"}"#).unwrap();
        assert_eq!(text.created_at(), Some(expected));

        let bad: RawRecord = serde_json::from_str(r#"{"createdAt": "ontem"}"#).unwrap();
        assert_eq!(bad.created_at(), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(65.0), "65");
        assert_eq!(format_number(65.5), "65.5");
        assert_eq!(format_number(-2.0), "-2");
    }

    #[test]
    fn test_row_serializes_id_first_in_column_order() {
        let row = Row {
            id: "m1".to_string(),
            cells: vec![("nomeGenerico", "Metformina".to_string()), ("concentracao", "500mg".to_string())],
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"id":"m1","nomeGenerico":"Metformina","concentracao":"500mg"}"#);
        assert_eq!(row.get("concentracao"), "500mg");
        assert_eq!(row.get("descricao"), "");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["nomeGenerico", "concentracao"]);
    }

    #[test]
    fn test_window_instants() {
        let window = ReportWindow::new(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        );
        assert_eq!(window.start_instant().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(window.end_instant().to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
        assert!(window.contains(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
        assert!(!window.contains(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    }
}

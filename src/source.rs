/// Record source - the read-only fetch capability the engine consumes
///
/// The live store is not part of this crate; `SnapshotSource` answers the same
/// queries over a JSON export of it (one array per collection).
use crate::error::ReportError;
use crate::types::{RawRecord, ReportType, ReportWindow};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Query sent to the store for one report run.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    /// Required value of the `role` field, if any.
    pub role: Option<&'static str>,
    /// Creation timestamp range, widened to whole UTC days.
    pub window: ReportWindow,
}

impl RecordFilter {
    pub fn for_report(report_type: ReportType, window: &ReportWindow) -> Self {
        let role = match report_type {
            ReportType::Users => Some("user"),
            ReportType::Medications | ReportType::Foods | ReportType::Complications => None,
        };
        RecordFilter { role, window: *window }
    }

    /// Store semantics: a range condition never matches a document lacking the field.
    pub fn matches(&self, record: &RawRecord) -> bool {
        if let Some(role) = self.role
            && record.text("role") != role
        {
            return false;
        }
        record.created_at().is_some_and(|created| self.window.contains(created))
    }
}

pub trait RecordSource {
    fn fetch_records(&self, collection: &str, filter: &RecordFilter) -> Result<Vec<RawRecord>, ReportError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Collections(BTreeMap<String, Vec<RawRecord>>),
    Documents(Vec<RawRecord>),
}

/// In-memory store snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    collections: BTreeMap<String, Vec<RawRecord>>,
    /// Documents from a bare-array snapshot; served for any collection.
    loose: Option<Vec<RawRecord>>,
    origin: Option<PathBuf>,
}

impl SnapshotSource {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let parsed: SnapshotFile = serde_json::from_str(text)?;
        Ok(match parsed {
            SnapshotFile::Collections(collections) => SnapshotSource { collections, loose: None, origin: None },
            SnapshotFile::Documents(docs) => {
                SnapshotSource { collections: BTreeMap::new(), loose: Some(docs), origin: None }
            }
        })
    }

    /// Load a snapshot file. Any read or parse failure is a fetch error.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let origin = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|e| ReportError::fetch(&origin, e))?;
        let mut source = Self::from_json(&text).map_err(|e| ReportError::fetch(&origin, e))?;
        source.origin = Some(path.to_path_buf());
        Ok(source)
    }

    #[cfg(test)]
    pub fn with_collection(mut self, name: &str, records: Vec<RawRecord>) -> Self {
        self.collections.insert(name.to_string(), records);
        self
    }
}

impl RecordSource for SnapshotSource {
    fn fetch_records(&self, collection: &str, filter: &RecordFilter) -> Result<Vec<RawRecord>, ReportError> {
        let docs = match (self.collections.get(collection), &self.loose) {
            (Some(docs), _) => docs,
            (None, Some(loose)) => loose,
            (None, None) => {
                let origin = self.origin.as_ref().map(|p| p.display().to_string()).unwrap_or_default();
                return Err(ReportError::fetch(collection, format!("collection not present in snapshot {}", origin)));
            }
        };

        for record in docs.iter().filter(|r| r.get("createdAt").is_some() && r.created_at().is_none()) {
            warn!("Document '{}' in '{}' has an unreadable createdAt; it never matches a window", record.id, collection);
        }

        let matched: Vec<RawRecord> = docs.iter().filter(|r| filter.matches(r)).cloned().collect();
        debug!("Fetched {} of {} documents from '{}'", matched.len(), docs.len(), collection);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldValue, StoredTimestamp};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn january() -> ReportWindow {
        ReportWindow::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
    }

    fn user(id: &str, role: &str, y: i32, m: u32, d: u32) -> RawRecord {
        let created = Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap();
        RawRecord::new(id)
            .with("role", FieldValue::Text(role.to_string()))
            .with("createdAt", FieldValue::Timestamp(StoredTimestamp::from(created)))
    }

    #[test]
    fn test_users_filter_requires_role_and_window() {
        let filter = RecordFilter::for_report(ReportType::Users, &january());
        assert!(filter.matches(&user("a", "user", 2024, 1, 15)));
        assert!(!filter.matches(&user("b", "admin", 2024, 1, 15)));
        assert!(!filter.matches(&user("c", "user", 2024, 2, 1)));
        assert!(!filter.matches(&RawRecord::new("d").with("role", FieldValue::Text("user".into()))));
    }

    #[test]
    fn test_window_bounds_are_inclusive_to_the_millisecond() {
        let filter = RecordFilter::for_report(ReportType::Foods, &january());
        let first = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let last = january().end_instant();
        let after = last + chrono::Duration::milliseconds(1);
        for (instant, expected) in [(first, true), (last, true), (after, false)] {
            let record = RawRecord::new("x").with("createdAt", FieldValue::Timestamp(StoredTimestamp::from(instant)));
            assert_eq!(filter.matches(&record), expected, "{}", instant);
        }
    }

    #[test]
    fn test_filter_agrees_with_window() {
        let window = january();
        let filter = RecordFilter::for_report(ReportType::Complications, &window);
        assert_eq!(filter.window, window);
        for instant in [
            window.start_instant() - chrono::Duration::milliseconds(1),
            window.start_instant(),
            Utc.with_ymd_and_hms(2024, 1, 20, 8, 0, 0).unwrap(),
            window.end_instant(),
            window.end_instant() + chrono::Duration::seconds(1),
        ] {
            let record = RawRecord::new("c").with("createdAt", FieldValue::Timestamp(StoredTimestamp::from(instant)));
            assert_eq!(filter.matches(&record), window.contains(instant), "{}", instant);
        }
    }

    #[test]
    fn test_snapshot_collections_and_missing_collection() {
        let json = r#"{
            "foods": [
                {"id": "f1", "name": "Arroz", "createdAt": {"seconds": 1705320000, "nanoseconds": 0}},
                {"id": "f2", "name": "Feijão", "createdAt": "2023-06-01T10:00:00Z"}
            ]
        }"#;
        let source = SnapshotSource::from_json(json).unwrap();
        let filter = RecordFilter::for_report(ReportType::Foods, &january());
        let foods = source.fetch_records("foods", &filter).unwrap();
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].id, "f1");

        let err = source.fetch_records("medications", &filter).unwrap_err();
        assert!(matches!(err, ReportError::Fetch { .. }));
    }

    #[test]
    fn test_load_missing_file_is_fetch_error() {
        let err = SnapshotSource::load(Path::new("/nonexistent/dados.json")).unwrap_err();
        assert!(matches!(err, ReportError::Fetch { .. }));
        assert_eq!(err.to_string(), "Erro ao gerar relatório. Tente novamente.");
    }
}

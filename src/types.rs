/// Core data structures for report runs
///
/// This module defines the data that flows through one report run: the report
/// type selector, the raw store documents, projected rows, and the assembled
/// dataset handed to the exporters.
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// Which collection a report run is built from.
///
/// Every per-type table (projection keys, width baselines, PDF layout) matches
/// on this enum exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Users,
    Medications,
    Foods,
    Complications,
}

impl ReportType {
    #[cfg(test)]
    pub const ALL: [ReportType; 4] =
        [ReportType::Users, ReportType::Medications, ReportType::Foods, ReportType::Complications];

    /// Stable identifier, used for the collection name and artifact file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Users => "users",
            ReportType::Medications => "medications",
            ReportType::Foods => "foods",
            ReportType::Complications => "complications",
        }
    }

    /// Store collection the records are fetched from.
    pub fn collection(&self) -> &'static str {
        self.as_str()
    }

    /// Column keys produced by the projector, in output order.
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            ReportType::Users => &[
                "nome",
                "email",
                "genero",
                "diabetes",
                "duracao",
                "peso",
                "altura",
                "imc",
                "acompanhamento",
                "hipertenso",
                "possuiComplicacoes",
                "descricaoComplicacoes",
                "medicamentos",
                "status",
                "dataCadastro",
            ],
            ReportType::Medications => &[
                "nomeGenerico",
                "nomeComercial",
                "concentracao",
                "formaFarmaceutica",
                "viaAdministracao",
                "descricao",
                "dataCadastro",
            ],
            ReportType::Foods => &[
                "nome",
                "classificacaoNova",
                "carboidratosPor100g",
                "carboidratosPorPorcao",
                "descricaoPorcao",
                "dataCadastro",
            ],
            ReportType::Complications => &["nome", "palavrasChave", "instrucoes", "dataCadastro"],
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp as the document store exports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTimestamp {
    #[serde(alias = "_seconds")]
    pub seconds: i64,
    #[serde(alias = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

impl StoredTimestamp {
    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

impl From<DateTime<Utc>> for StoredTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        StoredTimestamp { seconds: value.timestamp(), nanoseconds: value.timestamp_subsec_nanos() }
    }
}

/// A single field of a store document.
///
/// Variant order matters: serde tries them top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Timestamp(StoredTimestamp),
    List(Vec<String>),
    Text(String),
    /// Anything else (null, nested maps, mixed lists); projected as missing.
    Other(serde_json::Value),
}

impl FieldValue {
    /// Truthiness as the console evaluates it: empty text, zero, NaN, false and null are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Bool(b) => *b,
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Timestamp(_) => true,
            FieldValue::List(_) => true,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Other(v) => !v.is_null(),
        }
    }
}

/// Format a number the way a spreadsheet user expects to read it back (65 → "65", 65.5 → "65.5").
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One document as fetched from the store. Never mutated by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    #[cfg(test)]
    pub fn new(id: impl Into<String>) -> Self {
        RawRecord { id: id.into(), fields: BTreeMap::new() }
    }

    #[cfg(test)]
    pub fn with(mut self, key: &str, value: FieldValue) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Field rendered as text, or "" when missing or falsy.
    pub fn text(&self, key: &str) -> String {
        match self.get(key) {
            Some(value) if value.is_truthy() => match value {
                FieldValue::Text(s) => s.clone(),
                FieldValue::Number(n) => format_number(*n),
                FieldValue::Bool(_) => "true".to_string(),
                FieldValue::List(items) => items.join(","),
                FieldValue::Timestamp(ts) => ts.to_utc().map(|t| t.to_rfc3339()).unwrap_or_default(),
                FieldValue::Other(_) => String::new(),
            },
            _ => String::new(),
        }
    }

    /// Boolean flag; any truthy value counts as set.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldValue::is_truthy)
    }

    /// Numeric field, accepting numbers stored as text. Zero and unparseable values are `None`.
    pub fn number(&self, key: &str) -> Option<f64> {
        let n = match self.get(key)? {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
            _ => return None,
        };
        if n == 0.0 || !n.is_finite() { None } else { Some(n) }
    }

    /// Creation timestamp from either a stored timestamp or an RFC 3339 string.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.get("createdAt")? {
            FieldValue::Timestamp(ts) => ts.to_utc(),
            FieldValue::Text(s) => DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }
}

/// Row as produced by the projector: keyed cells plus the creation timestamp used for ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedRow {
    pub id: String,
    pub cells: Vec<(&'static str, String)>,
    pub created_at: Option<DateTime<Utc>>,
}

impl ProjectedRow {
    /// Drop the ordering timestamp; only the public row survives assembly.
    pub fn into_row(self) -> Row {
        Row { id: self.id, cells: self.cells }
    }
}

/// One exported record: synthetic identifier plus ordered, labeled-by-key cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<(&'static str, String)>,
}

impl Row {
    /// Cell value for a column key; "" when the key is absent.
    pub fn get(&self, key: &str) -> &str {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str()).unwrap_or("")
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(k, _)| *k)
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("id", &self.id)?;
        for (key, value) in &self.cells {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Inclusive calendar-date window selected by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        ReportWindow { start, end }
    }

    /// `start` widened to 00:00:00.000 UTC.
    pub fn start_instant(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::MIN))
    }

    /// `end` widened to 23:59:59.999 UTC.
    pub fn end_instant(&self) -> DateTime<Utc> {
        let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
        Utc.from_utc_datetime(&self.end.and_time(last_milli))
    }

    /// Whether `instant` falls inside the widened window, both ends inclusive.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start_instant() && instant <= self.end_instant()
    }
}

/// Output of one report run's assembly step.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub report_type: ReportType,
    pub window: ReportWindow,
    pub generated_at: DateTime<FixedOffset>,
    pub rows: Vec<Row>,
}

impl Dataset {
    /// Column keys of this dataset, identifier excluded.
    pub fn columns(&self) -> &'static [&'static str] {
        self.report_type.columns()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of pages for a given page size (at least one, so an empty dataset still has a page to show).
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 { 1 } else { self.rows.len().div_ceil(page_size).max(1) }
    }

    /// 1-based page view over the rows. Out-of-range pages are empty.
    pub fn page(&self, page: usize, page_size: usize) -> &[Row] {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        if start >= self.rows.len() {
            return &[];
        }
        let end = (start + page_size).min(self.rows.len());
        &self.rows[start..end]
    }
}

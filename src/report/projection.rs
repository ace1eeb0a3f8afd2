//! Row projection - raw store documents to flat, ordered report rows.
//!
//! Each report type has a fixed key set (see [`ReportType::columns`]).
//! Projection never fails: missing or falsy source fields degrade to "" or "-".

use crate::labels::{self, yes_no};
use crate::locale;
use crate::types::{FieldValue, ProjectedRow, RawRecord, ReportType, format_number};
use chrono::FixedOffset;

/// Text used by the complications description when the flag is set but no text was given.
pub const UNSPECIFIED: &str = "Não especificado";

/// Projects records of one report type, rendering dates in the run's display offset.
#[derive(Debug, Clone, Copy)]
pub struct RowProjector {
    report_type: ReportType,
    offset: FixedOffset,
}

impl RowProjector {
    pub fn new(report_type: ReportType, offset: FixedOffset) -> Self {
        RowProjector { report_type, offset }
    }

    pub fn project(&self, record: &RawRecord) -> ProjectedRow {
        let mut cells = match self.report_type {
            ReportType::Users => project_user(record),
            ReportType::Medications => project_medication(record),
            ReportType::Foods => project_food(record),
            ReportType::Complications => project_complication(record),
        };

        let created_at = record.created_at();
        let created_label = created_at.map(|t| locale::format_instant_date(t, &self.offset)).unwrap_or_default();
        cells.push(("dataCadastro", created_label));

        debug_assert_eq!(cells.iter().map(|(k, _)| *k).collect::<Vec<_>>(), self.report_type.columns());

        ProjectedRow { id: record.id.clone(), cells, created_at }
    }
}

/// BMI = weight / (height in m)², one decimal; "" when either input is missing or zero.
///
/// Ties round away from zero (22.25 reads "22.3").
pub fn body_mass_index(weight_kg: Option<f64>, height_cm: Option<f64>) -> String {
    match (weight_kg, height_cm) {
        (Some(weight), Some(height)) => {
            let meters = height / 100.0;
            let bmi = weight / (meters * meters);
            format!("{:.1}", (bmi * 10.0).round() / 10.0)
        }
        _ => String::new(),
    }
}

/// List fields join with ", "; a plain string passes through; anything else is `missing`.
fn joined_list(record: &RawRecord, key: &str, missing: &str) -> String {
    match record.get(key) {
        Some(FieldValue::List(items)) => items.join(", "),
        Some(value) if value.is_truthy() => record.text(key),
        _ => missing.to_string(),
    }
}

/// Numeric-or-text field as it should read in a cell.
fn measure(record: &RawRecord, key: &str) -> String {
    match record.get(key) {
        Some(FieldValue::Number(n)) if *n != 0.0 && n.is_finite() => format_number(*n),
        _ => record.text(key),
    }
}

fn project_user(record: &RawRecord) -> Vec<(&'static str, String)> {
    let has_complications = record.flag("hasChronicComplications");
    let complications = if has_complications {
        let text = record.text("chronicComplicationsDescription");
        if text.is_empty() { UNSPECIFIED.to_string() } else { text }
    } else {
        "-".to_string()
    };
    let status = if record.text("status") == "active" { "Ativo" } else { "Inativo" };

    vec![
        ("nome", record.text("name")),
        ("email", record.text("email")),
        ("genero", labels::gender_label(&record.text("gender"))),
        ("diabetes", labels::diabetes_type_label(&record.text("diabetesType"))),
        ("duracao", measure(record, "diabetesDuration")),
        ("peso", measure(record, "weight")),
        ("altura", measure(record, "height")),
        ("imc", body_mass_index(record.number("weight"), record.number("height"))),
        ("acompanhamento", yes_no(record.flag("isFollowedUp")).to_string()),
        ("hipertenso", yes_no(record.flag("isHypertensive")).to_string()),
        ("possuiComplicacoes", yes_no(has_complications).to_string()),
        ("descricaoComplicacoes", complications),
        ("medicamentos", joined_list(record, "medications", "-")),
        ("status", status.to_string()),
    ]
}

fn project_medication(record: &RawRecord) -> Vec<(&'static str, String)> {
    vec![
        ("nomeGenerico", record.text("genericName")),
        ("nomeComercial", record.text("commercialName")),
        ("concentracao", record.text("concentration")),
        ("formaFarmaceutica", record.text("pharmaceuticalForm")),
        ("viaAdministracao", record.text("administrationRoute")),
        ("descricao", record.text("description")),
    ]
}

fn project_food(record: &RawRecord) -> Vec<(&'static str, String)> {
    vec![
        ("nome", record.text("name")),
        ("classificacaoNova", labels::nova_class_label(&record.text("classification"))),
        ("carboidratosPor100g", measure(record, "carbs100")),
        ("carboidratosPorPorcao", measure(record, "carbsPortion")),
        ("descricaoPorcao", record.text("portionDesc")),
    ]
}

fn project_complication(record: &RawRecord) -> Vec<(&'static str, String)> {
    vec![
        ("nome", record.text("name")),
        ("palavrasChave", joined_list(record, "keywords", "")),
        ("instrucoes", record.text("instructions")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StoredTimestamp;
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn project(report_type: ReportType, record: &RawRecord) -> ProjectedRow {
        RowProjector::new(report_type, utc()).project(record)
    }

    fn cell<'a>(row: &'a ProjectedRow, key: &str) -> &'a str {
        row.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str()).unwrap()
    }

    #[test]
    fn test_bmi_from_weight_and_height() {
        let record = RawRecord::new("u1").with("weight", FieldValue::Number(65.0)).with("height", FieldValue::Number(170.0));
        assert_eq!(cell(&project(ReportType::Users, &record), "imc"), "22.5");
    }

    #[test]
    fn test_bmi_empty_when_weight_zero_or_missing() {
        let zero = RawRecord::new("u1").with("weight", FieldValue::Number(0.0)).with("height", FieldValue::Number(170.0));
        assert_eq!(cell(&project(ReportType::Users, &zero), "imc"), "");
        let missing = RawRecord::new("u2").with("height", FieldValue::Number(170.0));
        assert_eq!(cell(&project(ReportType::Users, &missing), "imc"), "");
    }

    #[test]
    fn test_bmi_rounds_ties_up() {
        // 89 / 2.0² = 22.25 exactly
        assert_eq!(body_mass_index(Some(89.0), Some(200.0)), "22.3");
        assert_eq!(body_mass_index(Some(65.0), Some(170.0)), "22.5");
        assert_eq!(body_mass_index(Some(100.0), Some(200.0)), "25.0");
    }

    #[test]
    fn test_bmi_accepts_numbers_stored_as_text() {
        assert_eq!(body_mass_index(Some(80.0), Some(180.0)), "24.7");
        let record = RawRecord::new("u1")
            .with("weight", FieldValue::Text("80".into()))
            .with("height", FieldValue::Text("180".into()));
        assert_eq!(cell(&project(ReportType::Users, &record), "imc"), "24.7");
    }

    #[test]
    fn test_user_flags_and_complications() {
        let flagged = RawRecord::new("u1")
            .with("hasChronicComplications", FieldValue::Bool(true))
            .with("isHypertensive", FieldValue::Bool(true));
        let row = project(ReportType::Users, &flagged);
        assert_eq!(cell(&row, "possuiComplicacoes"), "Sim");
        assert_eq!(cell(&row, "descricaoComplicacoes"), UNSPECIFIED);
        assert_eq!(cell(&row, "hipertenso"), "Sim");
        assert_eq!(cell(&row, "acompanhamento"), "Não");

        let described = flagged.clone().with("chronicComplicationsDescription", FieldValue::Text("Retinopatia".into()));
        assert_eq!(cell(&project(ReportType::Users, &described), "descricaoComplicacoes"), "Retinopatia");

        let clear = RawRecord::new("u2").with("chronicComplicationsDescription", FieldValue::Text("ignorado".into()));
        let row = project(ReportType::Users, &clear);
        assert_eq!(cell(&row, "possuiComplicacoes"), "Não");
        assert_eq!(cell(&row, "descricaoComplicacoes"), "-");
    }

    #[test]
    fn test_user_medications_status_and_labels() {
        let record = RawRecord::new("u1")
            .with("medications", FieldValue::List(vec!["Metformina".into(), "Insulina NPH".into()]))
            .with("status", FieldValue::Text("active".into()))
            .with("gender", FieldValue::Text("feminino".into()))
            .with("diabetesType", FieldValue::Text("type2".into()));
        let row = project(ReportType::Users, &record);
        assert_eq!(cell(&row, "medicamentos"), "Metformina, Insulina NPH");
        assert_eq!(cell(&row, "status"), "Ativo");
        assert_eq!(cell(&row, "genero"), "Feminino");
        assert_eq!(cell(&row, "diabetes"), "Tipo 2");

        let bare = project(ReportType::Users, &RawRecord::new("u2"));
        assert_eq!(cell(&bare, "medicamentos"), "-");
        assert_eq!(cell(&bare, "status"), "Inativo");
        assert_eq!(cell(&bare, "genero"), labels::NOT_INFORMED);
        assert_eq!(cell(&bare, "nome"), "");
        assert_eq!(cell(&bare, "dataCadastro"), "");
    }

    #[test]
    fn test_every_type_produces_its_column_order() {
        for report_type in ReportType::ALL {
            let row = project(report_type, &RawRecord::new("x"));
            let keys: Vec<&str> = row.cells.iter().map(|(k, _)| *k).collect();
            assert_eq!(keys, report_type.columns());
            assert_eq!(row.id, "x");
        }
    }

    #[test]
    fn test_food_and_complication_projection() {
        let created = Utc.with_ymd_and_hms(2024, 3, 9, 15, 0, 0).unwrap();
        let food = RawRecord::new("f1")
            .with("name", FieldValue::Text("Pão francês".into()))
            .with("classification", FieldValue::Text("g3".into()))
            .with("carbs100", FieldValue::Number(58.6))
            .with("carbsPortion", FieldValue::Number(29.0))
            .with("createdAt", FieldValue::Timestamp(StoredTimestamp::from(created)));
        let row = project(ReportType::Foods, &food);
        assert_eq!(cell(&row, "classificacaoNova"), "Grupo 3 - Processados");
        assert_eq!(cell(&row, "carboidratosPor100g"), "58.6");
        assert_eq!(cell(&row, "carboidratosPorPorcao"), "29");
        assert_eq!(cell(&row, "descricaoPorcao"), "");
        assert_eq!(cell(&row, "dataCadastro"), "09/03/2024");
        assert_eq!(row.created_at, Some(created));

        let complication = RawRecord::new("c1")
            .with("name", FieldValue::Text("Neuropatia".into()))
            .with("keywords", FieldValue::List(vec!["pés".into(), "formigamento".into()]));
        let row = project(ReportType::Complications, &complication);
        assert_eq!(cell(&row, "palavrasChave"), "pés, formigamento");
        assert_eq!(cell(&row, "instrucoes"), "");
    }
}

/// Label dictionary
///
/// Pure lookups from raw store codes and column keys to the Portuguese strings
/// shown in exported reports. Every lookup has an explicit fallback: unmapped
/// keys come back unchanged.
use crate::types::ReportType;

/// Shown when a coded field is empty.
pub const NOT_INFORMED: &str = "Não informado";

/// Fixed system caption used in PDF header bands and footers.
pub const SYSTEM_CAPTION: &str = "Sistema de Gestão Diabetes";

/// Human-readable title of a report type.
pub fn report_type_label(report_type: ReportType) -> &'static str {
    match report_type {
        ReportType::Users => "Usuários cadastrados no sistema",
        ReportType::Medications => "Medicações cadastradas",
        ReportType::Foods => "Alimentos cadastrados",
        ReportType::Complications => "Complicações cadastradas",
    }
}

/// Header label for a column key, falling back to the key itself.
pub fn column_label(key: &str) -> &str {
    match key {
        "nome" => "Nome",
        "email" => "E-mail",
        "genero" => "Gênero",
        "diabetes" => "Tipo Diabetes",
        "duracao" => "Duração",
        "peso" => "Peso (kg)",
        "altura" => "Altura (cm)",
        "imc" => "IMC",
        "acompanhamento" => "Acompanhamento",
        "hipertenso" => "Hipertenso",
        "possuiComplicacoes" => "Possui Complicações",
        "descricaoComplicacoes" => "Descrição das Complicações",
        "medicamentos" => "Medicamentos",
        "status" => "Status",
        "dataCadastro" => "Data Cadastro",
        "nomeGenerico" => "Nome Genérico",
        "nomeComercial" => "Nome Comercial",
        "concentracao" => "Concentração",
        "formaFarmaceutica" => "Forma Farmacêutica",
        "viaAdministracao" => "Via de Administração",
        "descricao" => "Descrição",
        "classificacaoNova" => "Classificação NOVA",
        "carboidratosPor100g" => "Carboidratos (100g)",
        "carboidratosPorPorcao" => "Carboidratos por Porção",
        "descricaoPorcao" => "Descrição da Porção",
        "palavrasChave" => "Palavras-chave",
        "instrucoes" => "Instruções",
        other => other,
    }
}

/// Mapped label, else the raw code, else [`NOT_INFORMED`].
fn coded_label(code: &str, mapped: Option<&'static str>) -> String {
    match mapped {
        Some(label) => label.to_string(),
        None if code.is_empty() => NOT_INFORMED.to_string(),
        None => code.to_string(),
    }
}

pub fn gender_label(code: &str) -> String {
    let mapped = match code {
        "masculino" => Some("Masculino"),
        "feminino" => Some("Feminino"),
        "outro" => Some("Outro"),
        _ => None,
    };
    coded_label(code, mapped)
}

pub fn diabetes_type_label(code: &str) -> String {
    let mapped = match code {
        "type1" => Some("Tipo 1"),
        "type2" => Some("Tipo 2"),
        "gestational" => Some("Gestacional"),
        "other" => Some("Outro"),
        _ => None,
    };
    coded_label(code, mapped)
}

/// NOVA food-processing group for a classification code (`g1`..`g4`).
pub fn nova_class_label(code: &str) -> String {
    let mapped = match code {
        "g1" => Some("Grupo 1 - In natura/Minimamente processados"),
        "g2" => Some("Grupo 2 - Ingredientes culinários"),
        "g3" => Some("Grupo 3 - Processados"),
        "g4" => Some("Grupo 4 - Ultraprocessados"),
        _ => None,
    };
    coded_label(code, mapped)
}

/// Short gender label for the dense users table. Works on already-labeled values.
pub fn abbreviate_gender(label: &str) -> &str {
    match label {
        "Masculino" => "Masc",
        "Feminino" => "Fem",
        other => other,
    }
}

/// Short diabetes-type label for the dense users table. Works on already-labeled values.
pub fn abbreviate_diabetes(label: &str) -> &str {
    match label {
        "Gestacional" => "Gest",
        other => other,
    }
}

/// "Sim"/"Não" rendering of a flag.
pub fn yes_no(flag: bool) -> &'static str {
    if flag { "Sim" } else { "Não" }
}

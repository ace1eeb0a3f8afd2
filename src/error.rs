/// Error taxonomy for a report run
///
/// Validation errors surface before any fetch, fetch errors carry the detail
/// for the log but show the generic console message, export errors cover the
/// serializers, and I/O errors cover writing artifacts to disk.
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingReportType,
    MissingDates,
    InvalidDate(String),
    StartAfterEnd,
    FutureDate,
    InvalidOffset(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingReportType => write!(f, "Selecione o tipo de relatório"),
            ValidationError::MissingDates => write!(f, "Data inicial e final são obrigatórias"),
            ValidationError::InvalidDate(raw) => write!(f, "Data inválida: '{}' (use AAAA-MM-DD)", raw),
            ValidationError::StartAfterEnd => write!(f, "Data inicial deve ser menor ou igual à data final"),
            ValidationError::FutureDate => write!(f, "Não é permitido selecionar datas futuras"),
            ValidationError::InvalidOffset(raw) => write!(f, "Fuso horário inválido: '{}' (use ±HH:MM)", raw),
        }
    }
}

#[derive(Debug)]
pub enum ReportError {
    Validation(ValidationError),
    Fetch { collection: String, detail: String },
    Export { format: &'static str, detail: String },
    Io { path: PathBuf, source: std::io::Error },
}

impl ReportError {
    pub fn export(format: &'static str, detail: impl fmt::Display) -> Self {
        ReportError::Export { format, detail: detail.to_string() }
    }

    pub fn fetch(collection: &str, detail: impl fmt::Display) -> Self {
        ReportError::Fetch { collection: collection.to_string(), detail: detail.to_string() }
    }

    /// Detailed description for logs; `Display` is the user-facing text.
    pub fn detail(&self) -> String {
        match self {
            ReportError::Validation(e) => e.to_string(),
            ReportError::Fetch { collection, detail } => format!("fetch '{}' failed: {}", collection, detail),
            ReportError::Export { format, detail } => format!("{} export failed: {}", format, detail),
            ReportError::Io { path, source } => format!("{}: {}", path.display(), source),
        }
    }
}

impl fmt::Display for ReportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportError::Validation(e) => write!(f, "{}", e),
            ReportError::Fetch { .. } => write!(f, "Erro ao gerar relatório. Tente novamente."),
            ReportError::Export { format, .. } => write!(f, "Erro ao exportar relatório em {}", format),
            ReportError::Io { path, source } => write!(f, "Falha ao gravar {}: {}", path.display(), source),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReportError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationError> for ReportError {
    fn from(value: ValidationError) -> Self {
        ReportError::Validation(value)
    }
}

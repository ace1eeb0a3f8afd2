//! Column width allocation under a fixed budget.
//!
//! Each report type carries a baseline width per column key. The allocator
//! grows or shrinks the known columns proportionally so the plan fits the
//! budget; columns without a baseline share what growth leaves over. Widths
//! are floored to whole units, so a plan may fall a few units short of the
//! budget but never exceeds it.

use crate::types::ReportType;
use log::debug;

/// Landscape A4 (297 mm) minus 2 mm margins on each side.
pub const PDF_TABLE_WIDTH_MM: u32 = 293;

/// Smallest share handed to a column without a baseline when there is room for it.
pub const MIN_UNKNOWN_WIDTH: u32 = 20;

/// Baseline width of `key` for `report_type`, in budget units.
pub fn baseline_width(report_type: ReportType, key: &str) -> Option<u32> {
    let width = match report_type {
        ReportType::Users => match key {
            "nome" => 35,
            "email" => 38,
            "genero" => 18,
            "diabetes" => 18,
            "duracao" => 18,
            "peso" => 15,
            "altura" => 15,
            "imc" => 12,
            "acompanhamento" => 22,
            "hipertenso" => 18,
            "possuiComplicacoes" => 22,
            "descricaoComplicacoes" => 55,
            "medicamentos" => 55,
            "status" => 15,
            "dataCadastro" => 22,
            _ => return None,
        },
        ReportType::Medications => match key {
            "nomeGenerico" => 35,
            "nomeComercial" => 35,
            "concentracao" => 22,
            "formaFarmaceutica" => 28,
            "viaAdministracao" => 28,
            "descricao" => 55,
            "dataCadastro" => 22,
            _ => return None,
        },
        ReportType::Foods => match key {
            "nome" => 35,
            "classificacaoNova" => 35,
            "carboidratosPor100g" => 22,
            "carboidratosPorPorcao" => 22,
            "descricaoPorcao" => 28,
            "dataCadastro" => 22,
            _ => return None,
        },
        ReportType::Complications => match key {
            "nome" => 35,
            "palavrasChave" => 45,
            "instrucoes" => 55,
            "dataCadastro" => 22,
            _ => return None,
        },
    };
    Some(width)
}

/// Width assigned to each column, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnWidthPlan {
    widths: Vec<(String, u32)>,
    budget: u32,
}

impl ColumnWidthPlan {
    pub fn width(&self, key: &str) -> Option<u32> {
        self.widths.iter().find(|(k, _)| k == key).map(|(_, w)| *w)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.widths.iter().map(|(k, w)| (k.as_str(), *w))
    }

    pub fn total(&self) -> u32 {
        self.widths.iter().map(|(_, w)| *w).sum()
    }
}

/// Distribute `budget` over `keys` using `report_type`'s baseline table.
///
/// - no baselines at all: every column gets `budget / n`
/// - baselines below budget: unknown columns reserve an equal share of the
///   spare room (at least [`MIN_UNKNOWN_WIDTH`] when it fits), then known
///   columns grow by `(budget - reserve) / used`
/// - baselines at or above budget: known columns shrink by `budget / used`,
///   unknown columns get nothing
///
/// Every width depends only on the key set, so the plan does not depend on key order.
pub fn allocate<K: AsRef<str>>(report_type: ReportType, keys: &[K], budget: u32) -> ColumnWidthPlan {
    let baselines: Vec<Option<u32>> = keys.iter().map(|k| baseline_width(report_type, k.as_ref())).collect();
    let used: u64 = baselines.iter().flatten().map(|w| *w as u64).sum();
    let unknown = baselines.iter().filter(|b| b.is_none()).count() as u64;
    let total = keys.len() as u64;
    let budget_u = budget as u64;

    let (known_target, unknown_share) = if total == 0 {
        (0, 0)
    } else if used == 0 {
        (0, budget_u / total)
    } else if used < budget_u {
        let spare = budget_u - used;
        let mut share = if unknown > 0 { (spare / total).max(MIN_UNKNOWN_WIDTH as u64) } else { 0 };
        if share * unknown > spare {
            // Growth alone would absorb the budget; split only the spare room.
            share = spare / unknown;
        }
        (budget_u - share * unknown, share)
    } else {
        (budget_u, 0)
    };

    let widths: Vec<(String, u32)> = keys
        .iter()
        .zip(&baselines)
        .map(|(key, baseline)| {
            let width = match baseline {
                Some(base) => (*base as u64 * known_target / used.max(1)) as u32,
                None => unknown_share as u32,
            };
            (key.as_ref().to_string(), width)
        })
        .collect();

    let plan = ColumnWidthPlan { widths, budget };
    debug!("Width plan for {} ({} columns): {} of {} units", report_type, plan.widths.len(), plan.total(), plan.budget);
    plan
}

use crate::rewriter::fold_accents;
use serde::{Deserialize, Serialize};

/// Department tag of private documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    CallCenter,
    Branch,
    Hr,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CallCenter => "call_center",
            Self::Branch => "branch",
            Self::Hr => "hr",
        }
    }
}

// Checked in order; first match wins. Keywords are accent-folded.
const TAXONOMY: &[(Department, &[&str])] = &[
    (
        Department::CallCenter,
        &["call center", "llamadas", "telefono", "atencion telefonica", "cliente llamo"],
    ),
    (
        Department::Branch,
        &["sucursal", "ventanilla", "caja", "cajero", "oficina", "presencial", "branch"],
    ),
    (
        Department::Hr,
        &[
            "recursos humanos",
            "rrhh",
            "empleado",
            "nomina",
            "vacaciones",
            "licencia",
            "personal",
            "hr",
            "human resources",
        ],
    ),
];

pub fn detect_department(query: &str) -> Option<Department> {
    let folded = fold_accents(&query.to_lowercase());
    TAXONOMY
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
        .map(|(department, _)| *department)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_department() {
        assert_eq!(detect_department("Problemas con la NÓMINA"), Some(Department::Hr));
        assert_eq!(detect_department("horario de la sucursal"), Some(Department::Branch));
        assert_eq!(detect_department("guion de atención telefónica"), Some(Department::CallCenter));
        assert_eq!(detect_department("motor diesel mantenimiento"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // mentions both call center and branch keywords
        assert_eq!(
            detect_department("llamadas a la sucursal"),
            Some(Department::CallCenter)
        );
    }
}

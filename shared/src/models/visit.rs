//! Visit record model
//!
//! Read-only snapshot fetched for the workbook export; the console
//! never mutates these.

use serde::{Deserialize, Serialize};

/// Visit lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    #[default]
    Pendiente,
    EnCurso,
    Completada,
    Cancelada,
}

impl VisitStatus {
    pub fn display_name(&self) -> &'static str {
        match self {
            VisitStatus::Pendiente => "Pendiente",
            VisitStatus::EnCurso => "En curso",
            VisitStatus::Completada => "Completada",
            VisitStatus::Cancelada => "Cancelada",
        }
    }
}

/// Fixed checklist filled by the technician during a visit
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VisitChecklist {
    pub antivirus: bool,
    pub disks: bool,
    pub backups: bool,
    pub updates: bool,
    pub printers: bool,
    pub email: bool,
    pub network: bool,
    pub server: bool,
    pub ups: bool,
    pub licenses: bool,
    pub firewall: bool,
    pub cleaning: bool,
}

/// One technician visit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: i64,
    pub company_name: String,
    pub technician_name: String,
    /// Display name of the linked requester record, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<String>,
    /// Free-text requester name, the fallback when no record is linked
    #[serde(default)]
    pub requester_name: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: VisitStatus,
    #[serde(default)]
    pub checklist: VisitChecklist,
    /// Gates `other_detail`
    #[serde(default)]
    pub other_requirements: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_detail: Option<String>,
}

impl VisitRecord {
    /// Requester display name: linked record first, free-text fallback
    pub fn requester_display(&self) -> &str {
        match &self.requester {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.requester_name,
        }
    }
}

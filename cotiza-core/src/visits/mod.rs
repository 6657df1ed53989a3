//! Pure aggregations over visit records, feeding the workbook export

use chrono::Local;
use shared::models::VisitRecord;
use shared::util::format_date_dmy;
use std::collections::BTreeMap;

/// One (label, count) row of a summary block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRow {
    pub label: String,
    pub count: u32,
}

impl CountRow {
    fn new(label: impl Into<String>, count: u32) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Checklist flags in the order the summary sheet presents them
const CHECKLIST_LABELS: [&str; 8] = [
    "Antivirus actualizado",
    "Estado de discos",
    "Respaldos verificados",
    "Actualizaciones instaladas",
    "Impresoras revisadas",
    "Correo revisado",
    "Red revisada",
    "Servidor revisado",
];

pub const OTROS_LABELS: [&str; 2] = ["Solicitudes adicionales", "Solicitud Programada"];

/// Visits per calendar day (local time), ascending by date
pub fn count_by_day(records: &[VisitRecord]) -> Vec<CountRow> {
    // BTreeMap on the NaiveDate keeps chronological order; the label is
    // formatted only on the way out.
    let mut by_day = BTreeMap::new();
    for record in records {
        let day = record.started_at.with_timezone(&Local).date_naive();
        *by_day.entry(day).or_insert(0u32) += 1;
    }
    by_day
        .into_iter()
        .map(|(day, count)| CountRow::new(format_date_dmy(day), count))
        .collect()
}

/// How many visits ticked each checklist flag, in fixed display order.
/// Every flag appears even at count zero.
pub fn count_checklist(records: &[VisitRecord]) -> Vec<CountRow> {
    let mut counts = [0u32; 8];
    for record in records {
        let c = &record.checklist;
        let flags = [
            c.antivirus, c.disks, c.backups, c.updates, c.printers, c.email, c.network, c.server,
        ];
        for (slot, flag) in counts.iter_mut().zip(flags) {
            if flag {
                *slot += 1;
            }
        }
    }
    CHECKLIST_LABELS
        .iter()
        .zip(counts)
        .map(|(label, count)| CountRow::new(*label, count))
        .collect()
}

/// Binary split on the "other requirements" flag; the two rows always
/// sum to the record count
pub fn count_otros(records: &[VisitRecord]) -> Vec<CountRow> {
    let with = records.iter().filter(|r| r.other_requirements).count() as u32;
    let without = records.len() as u32 - with;
    vec![
        CountRow::new(OTROS_LABELS[0], with),
        CountRow::new(OTROS_LABELS[1], without),
    ]
}

/// Visits per requester display name, descending by count with
/// alphabetical tie-breaking
pub fn count_by_requester(records: &[VisitRecord]) -> Vec<CountRow> {
    let mut by_name: BTreeMap<String, u32> = BTreeMap::new();
    for record in records {
        *by_name
            .entry(record.requester_display().to_string())
            .or_insert(0) += 1;
    }
    let mut rows: Vec<CountRow> = by_name
        .into_iter()
        .map(|(label, count)| CountRow { label, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}

/// Record lists per company name, companies in alphabetical order
pub fn partition_by_company(records: &[VisitRecord]) -> Vec<(String, Vec<&VisitRecord>)> {
    let mut by_company: BTreeMap<String, Vec<&VisitRecord>> = BTreeMap::new();
    for record in records {
        by_company
            .entry(record.company_name.clone())
            .or_default()
            .push(record);
    }
    by_company.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::{VisitChecklist, VisitStatus};

    fn make_visit(company: &str, requester: &str, day: u32) -> VisitRecord {
        VisitRecord {
            id: day as i64,
            company_name: company.to_string(),
            technician_name: "Pedro Soto".to_string(),
            requester: None,
            requester_name: requester.to_string(),
            started_at: Utc.with_ymd_and_hms(2025, 6, day, 12, 0, 0).unwrap(),
            ended_at: None,
            status: VisitStatus::Completada,
            checklist: VisitChecklist::default(),
            other_requirements: false,
            other_detail: None,
        }
    }

    #[test]
    fn test_day_counts_cover_all_records() {
        let visits = vec![
            make_visit("ACME", "Ana", 3),
            make_visit("ACME", "Ana", 3),
            make_visit("ACME", "Ana", 5),
        ];
        let rows = count_by_day(&visits);
        let total: u32 = rows.iter().map(|r| r.count).sum();
        assert_eq!(total, visits.len() as u32);
        // Ascending by date
        assert!(rows[0].label < rows[1].label || rows.len() == 1);
    }

    #[test]
    fn test_otros_split_sums_to_total() {
        let mut visits: Vec<VisitRecord> = (1..=10).map(|d| make_visit("ACME", "Ana", d)).collect();
        for visit in visits.iter_mut().take(6) {
            visit.other_requirements = true;
        }
        let rows = count_otros(&visits);
        assert_eq!(rows[0], CountRow::new("Solicitudes adicionales", 6));
        assert_eq!(rows[1], CountRow::new("Solicitud Programada", 4));
    }

    #[test]
    fn test_checklist_fixed_order_with_zeros() {
        let mut visit = make_visit("ACME", "Ana", 1);
        visit.checklist.backups = true;
        visit.checklist.network = true;
        let rows = count_checklist(&[visit]);

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].label, "Antivirus actualizado");
        assert_eq!(rows[0].count, 0);
        assert_eq!(rows[2], CountRow::new("Respaldos verificados", 1));
        assert_eq!(rows[6], CountRow::new("Red revisada", 1));
    }

    #[test]
    fn test_requester_sorted_desc_with_alpha_ties() {
        let visits = vec![
            make_visit("ACME", "Beatriz", 1),
            make_visit("ACME", "Ana", 2),
            make_visit("ACME", "Beatriz", 3),
            make_visit("ACME", "Carla", 4),
        ];
        let rows = count_by_requester(&visits);
        assert_eq!(rows[0], CountRow::new("Beatriz", 2));
        assert_eq!(rows[1], CountRow::new("Ana", 1));
        assert_eq!(rows[2], CountRow::new("Carla", 1));
    }

    #[test]
    fn test_requester_falls_back_to_free_text() {
        let mut visit = make_visit("ACME", "Nombre Manual", 1);
        visit.requester = None;
        let rows = count_by_requester(&[visit]);
        assert_eq!(rows[0].label, "Nombre Manual");
    }

    #[test]
    fn test_partition_by_company() {
        let visits = vec![
            make_visit("Zeta SpA", "Ana", 1),
            make_visit("ACME", "Ana", 2),
            make_visit("Zeta SpA", "Ana", 3),
        ];
        let groups = partition_by_company(&visits);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "ACME");
        assert_eq!(groups[1].1.len(), 2);
    }
}

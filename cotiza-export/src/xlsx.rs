//! Visit workbook builder
//!
//! Builds the export workbook programmatically: a "Resumen" sheet with
//! four pivot-style count blocks at fixed column anchors, a legacy
//! "Hoja1" mirror of the same blocks, and one 19-column detail sheet
//! per company.

use chrono::{Datelike, Local, NaiveDate};
use cotiza_core::visits::{
    count_by_day, count_by_requester, count_checklist, count_otros, CountRow,
};
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatBorder, Workbook, Worksheet};
use shared::models::VisitRecord;
use std::collections::HashSet;
use tracing::debug;

use crate::ExportResult;

// Column anchors of the four summary blocks (A, F, K, P)
const BLOCK_ANCHORS: [u16; 4] = [0, 5, 10, 15];

const SHEET_NAME_MAX: usize = 31;
const SHADE: Color = Color::RGB(0xF2F2F2);

const DETAIL_HEADERS: [&str; 19] = [
    "N°",
    "Empresa",
    "Técnico",
    "Solicitante",
    "Fecha visita",
    "Estado",
    "Antivirus actualizado",
    "Estado de discos",
    "Respaldos verificados",
    "Actualizaciones instaladas",
    "Impresoras revisadas",
    "Correo revisado",
    "Red revisada",
    "Servidor revisado",
    "UPS revisada",
    "Licencias vigentes",
    "Firewall revisado",
    "Limpieza de equipos",
    "Otros requerimientos",
];

/// Builder over one visit snapshot
pub struct VisitWorkbook<'a> {
    records: &'a [VisitRecord],
}

impl<'a> VisitWorkbook<'a> {
    pub fn new(records: &'a [VisitRecord]) -> Self {
        Self { records }
    }

    /// Build the workbook and serialize it to XLSX bytes
    pub fn build(&self) -> ExportResult<Vec<u8>> {
        let mut workbook = Workbook::new();

        let blocks = self.summary_blocks();
        for name in ["Resumen", "Hoja1"] {
            let sheet = workbook.add_worksheet();
            sheet.set_name(name)?;
            write_summary_blocks(sheet, &blocks)?;
        }

        let mut used_names = HashSet::new();
        used_names.insert("resumen".to_string());
        used_names.insert("hoja1".to_string());

        for (company, visits) in cotiza_core::visits::partition_by_company(self.records) {
            let name = unique_sheet_name(&company, &mut used_names);
            debug!(%company, sheet = %name, rows = visits.len(), "writing company sheet");
            let sheet = workbook.add_worksheet();
            sheet.set_name(&name)?;
            write_company_sheet(sheet, &visits)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    fn summary_blocks(&self) -> [(String, Vec<CountRow>); 4] {
        [
            ("Visitas por día".to_string(), count_by_day(self.records)),
            ("Checklist".to_string(), count_checklist(self.records)),
            (
                "Otros requerimientos".to_string(),
                count_otros(self.records),
            ),
            (
                "Visitas por solicitante".to_string(),
                count_by_requester(self.records),
            ),
        ]
    }
}

fn write_summary_blocks(
    sheet: &mut Worksheet,
    blocks: &[(String, Vec<CountRow>); 4],
) -> ExportResult<()> {
    let header = Format::new().set_bold().set_border(FormatBorder::Thin);
    let label = Format::new().set_border(FormatBorder::Thin);
    let count = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("#,##0");

    for (anchor, (title, rows)) in BLOCK_ANCHORS.iter().zip(blocks) {
        sheet.write_string_with_format(0, *anchor, title, &header)?;
        sheet.write_string_with_format(0, anchor + 1, "Cantidad", &header)?;
        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string_with_format(r, *anchor, &row.label, &label)?;
            sheet.write_number_with_format(r, anchor + 1, row.count as f64, &count)?;
        }
        sheet.set_column_width(*anchor, 24.0)?;
        sheet.set_column_width(anchor + 1, 10.0)?;
    }
    Ok(())
}

fn write_company_sheet(sheet: &mut Worksheet, visits: &[&VisitRecord]) -> ExportResult<()> {
    let header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_background_color(Color::RGB(0xD9E1F2));
    let plain = Format::new().set_border(FormatBorder::Thin);
    let shaded = Format::new()
        .set_border(FormatBorder::Thin)
        .set_background_color(SHADE);
    let date_plain = Format::new()
        .set_border(FormatBorder::Thin)
        .set_num_format("dd/mm/yyyy");
    let date_shaded = Format::new()
        .set_border(FormatBorder::Thin)
        .set_background_color(SHADE)
        .set_num_format("dd/mm/yyyy");

    for (col, title) in DETAIL_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &header)?;
    }
    sheet.set_column_width(1, 28.0)?;
    sheet.set_column_width(2, 20.0)?;
    sheet.set_column_width(3, 20.0)?;
    sheet.set_column_width(4, 12.0)?;
    sheet.set_column_width(18, 30.0)?;

    for (i, visit) in visits.iter().enumerate() {
        let row = i as u32 + 1;
        let format = if i % 2 == 1 { &shaded } else { &plain };

        sheet.write_number_with_format(row, 0, (i + 1) as f64, format)?;
        sheet.write_string_with_format(row, 1, &visit.company_name, format)?;
        sheet.write_string_with_format(row, 2, &visit.technician_name, format)?;
        sheet.write_string_with_format(row, 3, visit.requester_display(), format)?;
        let date_format = if i % 2 == 1 { &date_shaded } else { &date_plain };
        let date = excel_date(visit.started_at.with_timezone(&Local).date_naive())?;
        sheet.write_datetime_with_format(row, 4, &date, date_format)?;
        sheet.write_string_with_format(row, 5, visit.status.display_name(), format)?;

        let c = &visit.checklist;
        let flags = [
            c.antivirus, c.disks, c.backups, c.updates, c.printers, c.email, c.network, c.server,
            c.ups, c.licenses, c.firewall, c.cleaning,
        ];
        for (j, flag) in flags.iter().enumerate() {
            sheet.write_string_with_format(row, 6 + j as u16, yes_no(*flag), format)?;
        }

        let otros = if visit.other_requirements {
            visit.other_detail.as_deref().unwrap_or("Sí")
        } else {
            "No"
        };
        sheet.write_string_with_format(row, 18, otros, format)?;
    }
    Ok(())
}

/// Real date cell so spreadsheet tooling can sort and filter the
/// "Fecha visita" column
fn excel_date(date: NaiveDate) -> ExportResult<ExcelDateTime> {
    Ok(ExcelDateTime::from_ymd(
        date.year() as u16,
        date.month() as u8,
        date.day() as u8,
    )?)
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sí"
    } else {
        "No"
    }
}

/// Sanitize a company name into a legal sheet name, truncate to the
/// format's 31-character limit and de-duplicate with `_2`, `_3`, …
/// suffixes (sheet names are case-insensitive)
fn unique_sheet_name(company: &str, used: &mut HashSet<String>) -> String {
    let mut base: String = company
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' | '\'' => '_',
            c => c,
        })
        .collect();
    base = base.trim().to_string();
    if base.is_empty() {
        base = "Empresa".to_string();
    }
    base = truncate_chars(&base, SHEET_NAME_MAX);

    let mut candidate = base.clone();
    let mut suffix = 2;
    while !used.insert(candidate.to_lowercase()) {
        let tag = format!("_{suffix}");
        candidate = format!(
            "{}{}",
            truncate_chars(&base, SHEET_NAME_MAX - tag.chars().count()),
            tag
        );
        suffix += 1;
    }
    candidate
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

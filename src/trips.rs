//! Trip spreadsheet ingestion
//!
//! Reads delivery-trip spreadsheets (CSV or XLSX), normalizes column names
//! and coerces cell values into [`TripRecord`]s. Rows missing a date, vehicle
//! type or plate are dropped and counted in the [`IngestReport`].

use crate::error::{FleetError, Result};
use crate::vehicle_types::{canonical_vehicle_type, fold_label};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One delivery trip after cleaning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub date: NaiveDate,
    pub vehicle_type: String,
    pub plate: String,
    pub weight: Option<f64>,
    pub destination: Option<String>,
}

/// Headers plus string cells, as read from the file
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub rows: usize,
    pub kept: usize,
    pub dropped: usize,
    pub missing_weight: usize,
    pub has_destination_column: bool,
    pub has_weight_column: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TripDataset {
    pub records: Vec<TripRecord>,
    pub report: IngestReport,
}

// ============================================================================
// Column normalization
// ============================================================================

const DATE_ALIASES: &[&str] = &["data", "date", "data entrega", "dia"];
const VEHICLE_TYPE_ALIASES: &[&str] = &["tipo veiculo", "tipo de veiculo", "vehicle type", "tipo", "veiculo"];
const PLATE_ALIASES: &[&str] = &["placa", "plate", "vehicle id"];
const WEIGHT_ALIASES: &[&str] = &["peso", "peso (kg)", "peso kg", "weight", "kg"];
const DESTINATION_ALIASES: &[&str] = &["cidade", "destino", "cidade destino", "municipio", "destination", "city"];

fn normalize_header(header: &str) -> String {
    fold_label(&header.replace('_', " "))
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    aliases
        .iter()
        .find_map(|alias| headers.iter().position(|h| h == alias))
}

#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    date: usize,
    vehicle_type: usize,
    plate: usize,
    weight: Option<usize>,
    destination: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        Ok(Self {
            date: find_column(&normalized, DATE_ALIASES).ok_or(FleetError::MissingColumn("date"))?,
            vehicle_type: find_column(&normalized, VEHICLE_TYPE_ALIASES)
                .ok_or(FleetError::MissingColumn("vehicle type"))?,
            plate: find_column(&normalized, PLATE_ALIASES).ok_or(FleetError::MissingColumn("plate"))?,
            weight: find_column(&normalized, WEIGHT_ALIASES),
            destination: find_column(&normalized, DESTINATION_ALIASES),
        })
    }
}

// ============================================================================
// Value coercion
// ============================================================================

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a date cell: ISO or day-first dates, optionally with a time part,
/// or an Excel serial day number
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
    {
        return Some(date);
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
    {
        return Some(dt.date());
    }
    excel_serial_date(value)
}

fn excel_serial_date(value: &str) -> Option<NaiveDate> {
    let serial: f64 = value.parse().ok()?;
    // 1900-01-01 .. 9999-12-31
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Parse a weight cell. Accepts `1234.5`, `1234,5`, `1.234,5`, `1,234.5`
/// and an optional `kg` suffix. Negative weights are rejected.
pub fn parse_weight(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic())
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok().filter(|w| w.is_finite() && *w >= 0.0)
}

/// Upper-case and drop separators, so `abc-1d23` and `ABC 1D23` compare equal
pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Accent- and case-folded, so `São Paulo` and `SAO  PAULO` are one destination
fn normalize_destination(value: &str) -> Option<String> {
    let folded = fold_label(value);
    (!folded.is_empty()).then(|| folded.to_uppercase())
}

// ============================================================================
// Readers
// ============================================================================

/// Read CSV text. The delimiter (`,` or `;`) is taken from the header line.
pub fn read_csv_table<R: Read>(mut reader: R) -> Result<RawTable> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let text = text.trim_start_matches('\u{feff}');

    let header_line = text.lines().next().unwrap_or_default();
    let delimiter = if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    };

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let row: Vec<String> = record.iter().map(|v| v.trim().to_string()).collect();
        if row.iter().all(|v| v.is_empty()) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Read the first worksheet of an Excel workbook
pub fn read_excel_table(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path).map_err(|e| FleetError::Spreadsheet(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| FleetError::Spreadsheet("workbook has no worksheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| FleetError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| FleetError::Spreadsheet(format!("worksheet '{}' is empty", sheet_name)))?
        .iter()
        .map(cell_to_string)
        .collect();

    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|v| !v.is_empty()))
        .collect();

    Ok(RawTable { headers, rows })
}

/// Read a spreadsheet file, picking the reader from the extension
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "csv" | "txt" => read_csv_table(std::fs::File::open(path)?),
        "xlsx" | "xlsm" | "xls" => read_excel_table(path),
        _ => Err(FleetError::UnsupportedFormat(ext)),
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Turn a raw table into trip records, dropping rows without the required fields
pub fn normalize_table(table: &RawTable) -> Result<TripDataset> {
    let columns = ColumnMap::resolve(&table.headers)?;
    debug!(?columns, "resolved trip columns");

    let mut report = IngestReport {
        rows: table.rows.len(),
        has_destination_column: columns.destination.is_some(),
        has_weight_column: columns.weight.is_some(),
        ..Default::default()
    };
    let mut records = Vec::with_capacity(table.rows.len());

    for (i, row) in table.rows.iter().enumerate() {
        let date = parse_date(cell(row, columns.date));
        let vehicle_type = cell(row, columns.vehicle_type).trim();
        let plate = normalize_plate(cell(row, columns.plate));

        let (Some(date), false, false) = (date, vehicle_type.is_empty(), plate.is_empty()) else {
            if report.dropped < 5 {
                warn!("Dropping row {}: missing or unparseable date, vehicle type or plate", i + 2);
            }
            report.dropped += 1;
            continue;
        };

        let weight = columns.weight.and_then(|idx| parse_weight(cell(row, idx)));
        if weight.is_none() {
            report.missing_weight += 1;
        }
        let destination = columns
            .destination
            .and_then(|idx| normalize_destination(cell(row, idx)));

        records.push(TripRecord {
            date,
            vehicle_type: canonical_vehicle_type(vehicle_type),
            plate,
            weight,
            destination,
        });
    }

    report.kept = records.len();
    Ok(TripDataset { records, report })
}

/// Load and normalize a trip spreadsheet from disk
pub fn load_trips(path: impl AsRef<Path>) -> Result<TripDataset> {
    let path = path.as_ref();
    let dataset = normalize_table(&read_table(path)?)?;
    info!(
        "Loaded {} trips from {:?} ({} rows dropped)",
        dataset.report.kept,
        path,
        dataset.report.dropped
    );
    Ok(dataset)
}

/// Load and normalize CSV text, e.g. an uploaded file body
pub fn read_trips<R: Read>(reader: R) -> Result<TripDataset> {
    normalize_table(&read_csv_table(reader)?)
}

// ============================================================================
// Filters
// ============================================================================

/// Date-range and vehicle-type filter applied before any aggregation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub vehicle_types: Vec<String>,
}

impl TripFilter {
    pub fn matches(&self, record: &TripRecord) -> bool {
        if self.from.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| record.date > to) {
            return false;
        }
        self.vehicle_types.is_empty()
            || self
                .vehicle_types
                .iter()
                .any(|t| canonical_vehicle_type(t) == record.vehicle_type)
    }

    pub fn apply(&self, records: &[TripRecord]) -> Vec<TripRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("05/03/2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("2024-03-05 14:30:00"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("05/03/2024 08:15"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("45356"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_weight_formats() {
        assert_eq!(parse_weight("1234.5"), Some(1234.5));
        assert_eq!(parse_weight("1234,5"), Some(1234.5));
        assert_eq!(parse_weight("1.234,5"), Some(1234.5));
        assert_eq!(parse_weight("1,234.5"), Some(1234.5));
        assert_eq!(parse_weight(" 800 kg"), Some(800.0));
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("n/a"), None);
        assert_eq!(parse_weight("-500"), None);
        assert_eq!(parse_weight("-1.200,5"), None);
        assert_eq!(parse_weight("0"), Some(0.0));
    }

    #[test]
    fn test_negative_weight_counts_as_missing() {
        let csv = "data,tipo,placa,peso\n\
                   2024-01-02,VUC,AAA1111,-500\n\
                   2024-01-02,VUC,BBB2222,700\n";
        let dataset = read_trips(csv.as_bytes()).unwrap();
        assert_eq!(dataset.report.kept, 2);
        assert_eq!(dataset.report.missing_weight, 1);
        assert_eq!(dataset.records[0].weight, None);
        assert_eq!(dataset.records[1].weight, Some(700.0));
    }

    #[test]
    fn test_destination_spellings_fold_together() {
        let csv = "data;tipo;placa;cidade\n\
                   2024-01-02;VUC;AAA1111;São Paulo\n\
                   2024-01-02;VUC;BBB2222;SAO  PAULO\n\
                   2024-01-02;VUC;CCC3333;sao paulo\n\
                   2024-01-02;VUC;DDD4444;Jundiaí\n";
        let dataset = read_trips(csv.as_bytes()).unwrap();
        let destinations: std::collections::HashSet<_> =
            dataset.records.iter().filter_map(|r| r.destination.as_deref()).collect();
        assert_eq!(destinations.len(), 2);
        assert!(destinations.contains("SAO PAULO"));
        assert!(destinations.contains("JUNDIAI"));
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" abc-1d23 "), "ABC1D23");
    }

    #[test]
    fn test_read_semicolon_csv_with_aliases() {
        let csv = "\u{feff} Data ;Tipo Veículo; Placa ;Peso (kg);Cidade Destino\n\
                   05/03/2024;semi leve;abc-1d23;1.200,5;  São   Paulo \n\
                   05/03/2024;VUC;XYZ9A87;;Campinas\n";
        let dataset = read_trips(csv.as_bytes()).unwrap();

        assert_eq!(dataset.report.rows, 2);
        assert_eq!(dataset.report.kept, 2);
        assert_eq!(dataset.report.missing_weight, 1);
        assert!(dataset.report.has_destination_column);

        let first = &dataset.records[0];
        assert_eq!(first.date, date(2024, 3, 5));
        assert_eq!(first.vehicle_type, "Semi Leve");
        assert_eq!(first.plate, "ABC1D23");
        assert_eq!(first.weight, Some(1200.5));
        assert_eq!(first.destination.as_deref(), Some("SAO PAULO"));
        assert_eq!(dataset.records[1].weight, None);
    }

    #[test]
    fn test_rows_missing_required_fields_are_dropped() {
        let csv = "date,vehicle_type,plate,weight,city\n\
                   2024-01-02,3/4,AAA1111,3000,Santos\n\
                   bad-date,3/4,AAA1111,3000,Santos\n\
                   2024-01-02,,AAA1111,3000,Santos\n\
                   2024-01-02,VUC,,3000,Santos\n\
                   ,,,,\n";
        let dataset = read_trips(csv.as_bytes()).unwrap();

        assert_eq!(dataset.report.rows, 4);
        assert_eq!(dataset.report.kept, 1);
        assert_eq!(dataset.report.dropped, 3);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,weight\n2024-01-02,100\n";
        let err = read_trips(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, FleetError::MissingColumn("vehicle type")));
    }

    #[test]
    fn test_optional_columns_absent() {
        let csv = "placa,data,tipo\nAAA1111,2024-01-02,Fiorino\n";
        let dataset = read_trips(csv.as_bytes()).unwrap();
        assert!(!dataset.report.has_weight_column);
        assert!(!dataset.report.has_destination_column);
        assert_eq!(dataset.records[0].weight, None);
        assert_eq!(dataset.records[0].destination, None);
    }

    #[test]
    fn test_load_trips_from_file() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "date,vehicle_type,plate,weight").unwrap();
        writeln!(file, "2024-01-02,VUC,AAA1111,1500").unwrap();
        let dataset = load_trips(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        let err = load_trips(file.path()).unwrap_err();
        assert!(matches!(err, FleetError::UnsupportedFormat(ext) if ext == "pdf"));
    }

    enum XlsxCell<'a> {
        Text(&'a str),
        Number(f64),
        /// Serial day number styled with the built-in date format
        Date(f64),
        Blank,
    }

    const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
    const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Minimal single-sheet workbook: shared strings plus one date style
    fn write_xlsx(rows: &[Vec<XlsxCell>]) -> tempfile::NamedTempFile {
        let mut strings: Vec<&str> = Vec::new();
        let mut sheet = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet.push_str(&format!("<row r=\"{}\">", r + 1));
            for (c, cell) in row.iter().enumerate() {
                let reference = format!("{}{}", (b'A' + c as u8) as char, r + 1);
                match cell {
                    XlsxCell::Text(text) => {
                        strings.push(*text);
                        sheet.push_str(&format!("<c r=\"{}\" t=\"s\"><v>{}</v></c>", reference, strings.len() - 1));
                    }
                    XlsxCell::Number(n) => sheet.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, n)),
                    XlsxCell::Date(n) => sheet.push_str(&format!("<c r=\"{}\" s=\"1\"><v>{}</v></c>", reference, n)),
                    XlsxCell::Blank => {}
                }
            }
            sheet.push_str("</row>");
        }
        let shared: String = strings.iter().map(|s| format!("<si><t>{}</t></si>", s)).collect();

        let parts = [
            (
                "[Content_Types].xml",
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                 <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
                 <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
                 <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
                 <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>\
                 <Override PartName=\"/xl/worksheets/sheet1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>\
                 <Override PartName=\"/xl/sharedStrings.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml\"/>\
                 <Override PartName=\"/xl/styles.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml\"/>\
                 </Types>"
                    .to_string(),
            ),
            (
                "_rels/.rels",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                     <Relationship Id=\"rId1\" Type=\"{}/officeDocument\" Target=\"xl/workbook.xml\"/>\
                     </Relationships>",
                    REL_NS
                ),
            ),
            (
                "xl/workbook.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <workbook xmlns=\"{}\" xmlns:r=\"{}\">\
                     <sheets><sheet name=\"Viagens\" sheetId=\"1\" r:id=\"rId1\"/></sheets></workbook>",
                    SPREADSHEET_NS, REL_NS
                ),
            ),
            (
                "xl/_rels/workbook.xml.rels",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
                     <Relationship Id=\"rId1\" Type=\"{0}/worksheet\" Target=\"worksheets/sheet1.xml\"/>\
                     <Relationship Id=\"rId2\" Type=\"{0}/sharedStrings\" Target=\"sharedStrings.xml\"/>\
                     <Relationship Id=\"rId3\" Type=\"{0}/styles\" Target=\"styles.xml\"/>\
                     </Relationships>",
                    REL_NS
                ),
            ),
            (
                "xl/styles.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <styleSheet xmlns=\"{}\"><cellXfs count=\"2\">\
                     <xf numFmtId=\"0\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\"/>\
                     <xf numFmtId=\"14\" fontId=\"0\" fillId=\"0\" borderId=\"0\" xfId=\"0\" applyNumberFormat=\"1\"/>\
                     </cellXfs></styleSheet>",
                    SPREADSHEET_NS
                ),
            ),
            (
                "xl/sharedStrings.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <sst xmlns=\"{}\" count=\"{2}\" uniqueCount=\"{2}\">{1}</sst>",
                    SPREADSHEET_NS,
                    shared,
                    strings.len()
                ),
            ),
            (
                "xl/worksheets/sheet1.xml",
                format!(
                    "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
                     <worksheet xmlns=\"{}\"><sheetData>{}</sheetData></worksheet>",
                    SPREADSHEET_NS, sheet
                ),
            ),
        ];

        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut archive = zip::ZipWriter::new(file.as_file());
        let options = zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, body) in parts {
            archive.start_file(name, options).unwrap();
            archive.write_all(body.as_bytes()).unwrap();
        }
        archive.finish().unwrap();
        drop(archive);
        file
    }

    #[test]
    fn test_load_trips_from_xlsx() {
        use XlsxCell::*;
        let file = write_xlsx(&[
            vec![Text("Data"), Text("Tipo Veículo"), Text("Placa"), Text("Peso (kg)"), Text("Cidade")],
            vec![Date(45356.0), Text("semi leve"), Text("abc-1d23"), Number(1200.5), Text("São Paulo")],
            vec![Number(45357.0), Text("VUC"), Text("XYZ 9A87"), Text("1.500,0"), Text("Santos")],
            vec![Text("07/03/2024"), Text("Fiorino"), Text("FIO0001"), Blank, Text("Campinas")],
            vec![Text("sem data"), Text("VUC"), Text("XYZ9A87"), Number(10.0), Blank],
            vec![Blank, Blank, Blank, Blank, Blank],
        ]);

        let dataset = load_trips(file.path()).unwrap();
        assert_eq!(dataset.report.rows, 4);
        assert_eq!(dataset.report.kept, 3);
        assert_eq!(dataset.report.dropped, 1);
        assert_eq!(dataset.report.missing_weight, 1);

        let first = &dataset.records[0];
        assert_eq!(first.date, date(2024, 3, 5));
        assert_eq!(first.vehicle_type, "Semi Leve");
        assert_eq!(first.plate, "ABC1D23");
        assert_eq!(first.weight, Some(1200.5));
        assert_eq!(first.destination.as_deref(), Some("SAO PAULO"));

        let second = &dataset.records[1];
        assert_eq!(second.date, date(2024, 3, 6));
        assert_eq!(second.plate, "XYZ9A87");
        assert_eq!(second.weight, Some(1500.0));

        assert_eq!(dataset.records[2].date, date(2024, 3, 7));
        assert_eq!(dataset.records[2].weight, None);
    }

    #[test]
    fn test_excel_date_cell_becomes_serial_number() {
        let file = write_xlsx(&[vec![XlsxCell::Text("data")], vec![XlsxCell::Date(45356.0)]]);
        let table = read_excel_table(file.path()).unwrap();
        assert_eq!(table.headers, vec!["data".to_string()]);
        assert_eq!(table.rows, vec![vec!["45356".to_string()]]);
    }

    #[test]
    fn test_broken_workbook_is_spreadsheet_error() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        let err = load_trips(file.path()).unwrap_err();
        assert!(matches!(err, FleetError::Spreadsheet(_)));
    }

    #[test]
    fn test_filter_by_range_and_type() {
        let record = |d: NaiveDate, t: &str| TripRecord {
            date: d,
            vehicle_type: t.to_string(),
            plate: "AAA1111".to_string(),
            weight: None,
            destination: None,
        };
        let records = vec![
            record(date(2024, 1, 1), "VUC"),
            record(date(2024, 1, 15), "VUC"),
            record(date(2024, 1, 15), "3/4"),
            record(date(2024, 2, 1), "VUC"),
        ];

        let filter = TripFilter {
            from: Some(date(2024, 1, 10)),
            to: Some(date(2024, 1, 31)),
            vehicle_types: vec!["vuc".to_string()],
        };
        let filtered = filter.apply(&records);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].date, date(2024, 1, 15));

        assert_eq!(TripFilter::default().apply(&records).len(), 4);
    }
}

use std::path::Path;

use crate::error::{Result, TallyError};
use crate::models::{Record, RecordDate};

pub const CSV_HEADER: [&str; 3] = ["category", "amount", "date"];
#[cfg(feature = "xlsx")]
pub const XLSX_HEADER: [&str; 3] = ["Category", "Amount", "Date"];
#[cfg(feature = "xlsx")]
pub const XLSX_SHEET: &str = "Expenses";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Whole-number amounts only; "12.5" and "1,500" are rejected.
pub fn parse_amount(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

#[cfg(any(feature = "xlsx", test))]
pub fn excel_serial_to_date(serial: f64) -> Option<chrono::NaiveDate> {
    // Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug)
    let base = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(chrono::TimeDelta::try_days(serial.floor() as i64)?)
}

/// Where the required columns live, found by header name.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Columns {
    category: usize,
    amount: usize,
    date: Option<usize>,
}

impl Columns {
    fn from_header<I, S>(header: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = header
            .into_iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();
        let find = |name: &str| names.iter().position(|n| n == name);
        Some(Self {
            category: find("category")?,
            amount: find("amount")?,
            date: find("date"),
        })
    }
}

/// A row becomes a record only if it satisfies the record invariants.
fn candidate(category: Option<String>, amount: Option<i64>, date: RecordDate) -> Option<Record> {
    let category = category?.trim().to_string();
    let record = Record::new(category, amount?, date);
    record.is_valid().then_some(record)
}

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Format {
    Csv,
    #[cfg(feature = "xlsx")]
    Xlsx,
}

const ALL_FORMATS: &[Format] = &[
    Format::Csv,
    #[cfg(feature = "xlsx")]
    Format::Xlsx,
];

impl Format {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            #[cfg(feature = "xlsx")]
            Self::Xlsx => "xlsx",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            #[cfg(feature = "xlsx")]
            Self::Xlsx => "Excel",
        }
    }

    /// Extensions this format reads. Writing always produces the first.
    fn extensions(&self) -> &[&str] {
        match self {
            Self::Csv => &["csv"],
            #[cfg(feature = "xlsx")]
            Self::Xlsx => &["xlsx", "xlsm", "xls", "ods"],
        }
    }

    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        ALL_FORMATS
            .iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
            .copied()
    }

    /// An explicit `--format` wins over the file extension.
    pub fn resolve(path: &Path, key: Option<&str>) -> Result<Self> {
        if let Some(key) = key {
            return ALL_FORMATS
                .iter()
                .find(|f| f.key().eq_ignore_ascii_case(key))
                .copied()
                .ok_or_else(|| TallyError::UnknownFormat(key.to_string()));
        }
        Self::detect(path).ok_or_else(|| TallyError::UnknownFormat(path.display().to_string()))
    }

    pub fn read(&self, path: &Path) -> Result<ParsedFile> {
        match self {
            Self::Csv => read_csv(path),
            #[cfg(feature = "xlsx")]
            Self::Xlsx => read_xlsx(path),
        }
    }

    pub fn write(&self, path: &Path, records: &[Record]) -> Result<()> {
        if records.is_empty() {
            return Err(TallyError::NothingToExport);
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        match self {
            Self::Csv => write_csv(path, records),
            #[cfg(feature = "xlsx")]
            Self::Xlsx => write_xlsx(path, records),
        }
    }
}

/// Valid records found in a file, plus how many rows were dropped.
#[derive(Debug, Default)]
pub struct ParsedFile {
    pub records: Vec<Record>,
    pub skipped: usize,
}

impl ParsedFile {
    fn push(&mut self, record: Option<Record>) {
        match record {
            Some(r) => self.records.push(r),
            None => self.skipped += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<ParsedFile> {
    let file = std::fs::File::open(path)?;
    read_csv_from(std::io::BufReader::new(file))
}

fn read_csv_from<R: std::io::Read>(reader: R) -> Result<ParsedFile> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = Columns::from_header(rdr.headers()?.iter());

    let mut parsed = ParsedFile::default();
    for result in rdr.records() {
        let (Ok(row), Some(cols)) = (result, columns) else {
            parsed.skipped += 1;
            continue;
        };
        let date = cols
            .date
            .and_then(|i| row.get(i))
            .map(RecordDate::parse)
            .unwrap_or_default();
        parsed.push(candidate(
            row.get(cols.category).map(str::to_string),
            row.get(cols.amount).and_then(parse_amount),
            date,
        ));
    }
    tracing::debug!("csv: {} rows kept, {} skipped", parsed.records.len(), parsed.skipped);
    Ok(parsed)
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CSV_HEADER)?;
    for r in records {
        wtr.write_record([r.category.clone(), r.amount.to_string(), r.date.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Spreadsheets (feature-gated)
// ---------------------------------------------------------------------------

#[cfg(feature = "xlsx")]
fn read_xlsx(path: &Path) -> Result<ParsedFile> {
    use calamine::{Data, Reader};

    let mut workbook = calamine::open_workbook_auto(path)
        .map_err(|e| TallyError::Spreadsheet(format!("Failed to open {}: {e}", path.display())))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| TallyError::Spreadsheet("workbook has no sheets".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| TallyError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let columns = rows
        .next()
        .and_then(|header| Columns::from_header(header.iter().map(|c| c.to_string())));

    let amount = |cell: &Data| match cell {
        Data::Int(i) => Some(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= crate::models::MAX_AMOUNT as f64 => Some(*f as i64),
        Data::String(s) => parse_amount(s),
        _ => None,
    };
    let date = |cell: &Data| match cell {
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(RecordDate::Known)
            .unwrap_or_default(),
        Data::DateTimeIso(s) | Data::String(s) => RecordDate::parse(s),
        _ => RecordDate::Unknown,
    };
    let category = |cell: &Data| match cell {
        Data::Empty | Data::Error(_) => None,
        other => Some(other.to_string()),
    };

    let mut parsed = ParsedFile::default();
    for row in rows {
        let Some(cols) = columns else {
            parsed.skipped += 1;
            continue;
        };
        parsed.push(candidate(
            row.get(cols.category).and_then(category),
            row.get(cols.amount).and_then(amount),
            cols.date.and_then(|i| row.get(i)).map(date).unwrap_or_default(),
        ));
    }
    tracing::debug!("{sheet}: {} rows kept, {} skipped", parsed.records.len(), parsed.skipped);
    Ok(parsed)
}

#[cfg(feature = "xlsx")]
fn write_xlsx(path: &Path, records: &[Record]) -> Result<()> {
    use rust_xlsxwriter::{Format as CellFormat, Workbook};

    let xlsx_err = |e: rust_xlsxwriter::XlsxError| TallyError::Spreadsheet(e.to_string());

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(XLSX_SHEET).map_err(xlsx_err)?;

    let bold = CellFormat::new().set_bold();
    for (col, title) in (0u16..).zip(XLSX_HEADER) {
        sheet.write_string_with_format(0, col, title, &bold).map_err(xlsx_err)?;
    }
    for (row, r) in (1u32..).zip(records) {
        sheet.write_string(row, 0, r.category.as_str()).map_err(xlsx_err)?;
        sheet.write_number(row, 1, r.amount as f64).map_err(xlsx_err)?;
        sheet.write_string(row, 2, r.date.to_string()).map_err(xlsx_err)?;
    }
    sheet.autofit();

    workbook.save(path).map_err(xlsx_err)?;
    Ok(())
}

//! Dataset loading and column validation
//!
//! The input is a tab-separated export with a header row. Six columns are
//! required; everything else is carried along untouched so that category
//! panels can still be pointed at it.

pub mod dates;

use crate::error::{DashError, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TRIBUNAL: &str = "Tribunal";
pub const FILED_ON: &str = "Dat. preenchimento";
pub const CLASSE: &str = "Classe do Processo";
pub const MUNICIPIO: &str = "Município";
pub const ASSUNTO: &str = "Assunto Principal do Processo";
pub const UNIDADE: &str = "Unidade";

/// Columns that must exist after load, in reporting order.
pub const REQUIRED_COLUMNS: [&str; 6] = [TRIBUNAL, FILED_ON, CLASSE, MUNICIPIO, ASSUNTO, UNIDADE];

/// One row of the export. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Record {
    pub tribunal: Option<String>,
    /// `None` when the cell was blank or not a day-first date.
    pub filed_on: Option<NaiveDate>,
    pub classe: Option<String>,
    pub municipio: Option<String>,
    pub assunto: Option<String>,
    pub unidade: Option<String>,
    /// Columns outside the required set, keyed by header.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    /// Text value of a categorical column, by header name.
    pub fn value(&self, column: &str) -> Option<&str> {
        match column {
            TRIBUNAL => self.tribunal.as_deref(),
            CLASSE => self.classe.as_deref(),
            MUNICIPIO => self.municipio.as_deref(),
            ASSUNTO => self.assunto.as_deref(),
            UNIDADE => self.unidade.as_deref(),
            _ => self.extra.get(column).map(String::as_str),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    source: Option<PathBuf>,
    headers: Vec<String>,
    records: Vec<Record>,
    unparsed_dates: usize,
}

impl Dataset {
    /// Read a tab-separated file and validate its columns.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| DashError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dataset = Self::from_reader(file)?;
        dataset.source = Some(path.to_path_buf());

        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Parse tab-separated content from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
                h.trim().to_string()
            })
            .collect();

        let missing = missing_columns(&headers);
        if !missing.is_empty() {
            return Err(DashError::MissingColumns(missing));
        }

        // First occurrence wins on duplicate headers
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.as_str()).or_insert(i);
        }
        let col = |name: &str| index[name];
        let (tribunal_ix, date_ix) = (col(TRIBUNAL), col(FILED_ON));
        let (classe_ix, municipio_ix, assunto_ix, unidade_ix) =
            (col(CLASSE), col(MUNICIPIO), col(ASSUNTO), col(UNIDADE));

        let mut records = Vec::new();
        let mut unparsed_dates = 0;

        for row in rdr.records() {
            let row = row?;
            // Surrounding whitespace is dropped so "TJ-A " and "TJ-A" count as one value
            let cell = |ix: usize| -> Option<String> {
                row.get(ix)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            let raw_date = cell(date_ix);
            let filed_on = raw_date.as_deref().and_then(dates::parse_day_first);
            if filed_on.is_none() {
                unparsed_dates += 1;
                if let Some(ref raw) = raw_date {
                    debug!(value = %raw, "unparseable date treated as missing");
                }
            }

            let mut extra = BTreeMap::new();
            for (i, h) in headers.iter().enumerate() {
                if REQUIRED_COLUMNS.contains(&h.as_str()) || index[h.as_str()] != i {
                    continue;
                }
                if let Some(v) = cell(i) {
                    extra.insert(h.clone(), v);
                }
            }

            records.push(Record {
                tribunal: cell(tribunal_ix),
                filed_on,
                classe: cell(classe_ix),
                municipio: cell(municipio_ix),
                assunto: cell(assunto_ix),
                unidade: cell(unidade_ix),
                extra,
            });
        }

        if unparsed_dates > 0 {
            info!(rows = unparsed_dates, "rows without a usable '{}'", FILED_ON);
        }

        Ok(Self {
            source: None,
            headers,
            records,
            unparsed_dates,
        })
    }

    /// Build a dataset from already-parsed records.
    pub fn from_records(headers: Vec<String>, records: Vec<Record>) -> Self {
        let unparsed_dates = records.iter().filter(|r| r.filed_on.is_none()).count();
        Self {
            source: None,
            headers,
            records,
            unparsed_dates,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rows whose date was blank or unparseable.
    pub fn unparsed_dates(&self) -> usize {
        self.unparsed_dates
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Required columns absent from `headers`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_columns(headers: &[String]) -> Vec<String> {
    REQUIRED_COLUMNS
        .iter()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .map(|c| c.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "Tribunal\tDat. preenchimento\tClasse do Processo\tMunicípio\tAssunto Principal do Processo\tUnidade\tNúmero";

    fn parse(body: &str) -> Result<Dataset> {
        Dataset::from_reader(body.as_bytes())
    }

    // ==========================================================================
    // COLUMN VALIDATION
    // ==========================================================================
    //
    // A missing required column is fatal. The error lists exactly the missing
    // names, in the order of REQUIRED_COLUMNS, regardless of header order.
    // ==========================================================================

    #[test]
    fn test_missing_columns_reported_in_required_order() {
        let body = "Unidade\tTribunal\tClasse do Processo\nX\tTJ-A\tY\n";
        match parse(body) {
            Err(DashError::MissingColumns(missing)) => assert_eq!(
                missing,
                vec!["Dat. preenchimento", "Município", "Assunto Principal do Processo"]
            ),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_columns_helper_empty_when_complete() {
        let headers: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        assert!(missing_columns(&headers).is_empty());
    }

    #[test]
    fn test_bom_and_padding_stripped_from_headers() {
        let body = format!("\u{feff}Tribunal \t{}\n", REQUIRED_COLUMNS[1..].join("\t"));
        let ds = parse(&body).unwrap();
        assert!(ds.has_column("Tribunal"));
        assert!(ds.is_empty());
    }

    // ==========================================================================
    // ROW PARSING
    // ==========================================================================

    #[test]
    fn test_rows_parsed_with_day_first_dates() {
        let body = format!(
            "{}\nTJ-A\t05/03/2023\tAção Civil\tRecife\tDano Moral\t1ª Vara\t001\n",
            HEADER
        );
        let ds = parse(&body).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records()[0];
        assert_eq!(r.tribunal.as_deref(), Some("TJ-A"));
        assert_eq!(r.filed_on, NaiveDate::from_ymd_opt(2023, 3, 5));
        assert_eq!(r.value(MUNICIPIO), Some("Recife"));
        assert_eq!(r.value("Número"), Some("001"));
    }

    #[test]
    fn test_cell_padding_trimmed_so_values_merge() {
        let body = format!(
            "{}\nTJ-A \t01/01/2023\tA\tB\tC\tD\t1\nTJ-A\t02/01/2023\tA\tB\tC\tD\t2\n",
            HEADER
        );
        let ds = parse(&body).unwrap();
        assert!(ds.records().iter().all(|r| r.tribunal.as_deref() == Some("TJ-A")));
    }

    #[test]
    fn test_bad_dates_become_null_not_fatal() {
        let body = format!(
            "{}\nTJ-A\tontem\tA\tB\tC\tD\t1\nTJ-B\t\tA\tB\tC\tD\t2\nTJ-C\t01/01/2023\tA\tB\tC\tD\t3\n",
            HEADER
        );
        let ds = parse(&body).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records()[0].filed_on, None);
        assert_eq!(ds.records()[1].filed_on, None);
        assert!(ds.records()[2].filed_on.is_some());
        assert_eq!(ds.unparsed_dates(), 2);
    }

    #[test]
    fn test_blank_and_short_rows_are_null() {
        let body = format!("{}\n  \t01/01/2023\tA\n", HEADER);
        let ds = parse(&body).unwrap();
        let r = &ds.records()[0];
        assert_eq!(r.tribunal, None);
        assert_eq!(r.classe.as_deref(), Some("A"));
        assert_eq!(r.municipio, None);
        assert_eq!(r.unidade, None);
    }

    // ==========================================================================
    // FILE LOADING
    // ==========================================================================

    #[test]
    fn test_load_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Dataset::load(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, DashError::Open { .. }));
    }

    #[test]
    fn test_load_from_disk_records_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "{}", HEADER).unwrap();
        writeln!(f, "TJ-A\t10/01/2023\tA\tB\tC\tD\t1").unwrap();
        drop(f);

        let ds = Dataset::load(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.source(), Some(path.as_path()));
    }
}

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};

use super::model::{CellValue, Column, ColumnKind, Table};
use crate::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Upload inputs
// ---------------------------------------------------------------------------

/// Field separators the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
    Pipe,
    Tab,
}

impl Separator {
    pub const ALL: [Separator; 4] = [
        Separator::Comma,
        Separator::Semicolon,
        Separator::Pipe,
        Separator::Tab,
    ];

    pub fn as_byte(self) -> u8 {
        match self {
            Separator::Comma => b',',
            Separator::Semicolon => b';',
            Separator::Pipe => b'|',
            Separator::Tab => b'\t',
        }
    }

    pub fn as_char(self) -> char {
        self.as_byte() as char
    }

    pub fn label(self) -> &'static str {
        match self {
            Separator::Comma => ",",
            Separator::Semicolon => ";",
            Separator::Pipe => "|",
            Separator::Tab => "tab",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identity of an uploaded file, assigned by the upload provider.
///
/// Two uploads with the same id are assumed to carry the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadId(pub String);

/// Raw uploaded bytes. Immutable once supplied; cheap to clone.
#[derive(Debug, Clone)]
pub struct Upload {
    pub id: UploadId,
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl Upload {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Upload {
            id: UploadId(id.into()),
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// A parsed table plus the soft warning produced while parsing it, if any.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Arc<Table>,
    pub warning: Option<String>,
}

// ---------------------------------------------------------------------------
// TableLoader – parse-once cache keyed by (upload, separator)
// ---------------------------------------------------------------------------

/// Parses uploads and memoizes the result per `(UploadId, Separator)`.
///
/// An entry is only inserted after a parse has completed successfully, so a
/// loader dropped mid-parse or a failed parse never leaves a partial entry.
#[derive(Debug, Default)]
pub struct TableLoader {
    cache: HashMap<(UploadId, Separator), LoadedTable>,
    parse_count: usize,
}

impl TableLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the table for `upload` split on `separator`, parsing only on a cache miss.
    pub fn load(&mut self, upload: &Upload, separator: Separator) -> DataResult<LoadedTable> {
        let key = (upload.id.clone(), separator);
        if let Some(hit) = self.cache.get(&key) {
            debug!("cache hit for {:?} with separator {separator}", upload.id);
            return Ok(hit.clone());
        }

        self.parse_count += 1;
        let loaded = parse_delimited(&upload.bytes, separator)?;
        info!(
            "Parsed '{}': {} rows, columns {:?} (separator {separator})",
            upload.name,
            loaded.table.row_count(),
            loaded.table.column_names()
        );
        if let Some(w) = &loaded.warning {
            warn!("{w}");
        }

        self.cache.insert(key, loaded.clone());
        Ok(loaded)
    }

    /// Number of actual parses performed (cache misses that reached the parser).
    pub fn parse_count(&self) -> usize {
        self.parse_count
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached table (session end).
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Tokens read as a missing value, on top of the empty field.
const MISSING_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Split `bytes` into a rectangular table with inferred column kinds.
pub fn parse_delimited(bytes: &[u8], separator: Separator) -> DataResult<LoadedTable> {
    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(DataError::EmptyInput);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(separator.as_byte())
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let raw_headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if raw_headers.is_empty() {
        return Err(DataError::EmptyInput);
    }
    let headers = normalize_headers(&raw_headers);

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::Parse(format!("row {}: {e}", row_no + 1)))?;
        for (col, field) in raw_columns.iter_mut().zip(record.iter()) {
            col.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, raw)| infer_column(name, &raw))
        .collect();
    let table = Table::new(columns)?;

    let warning = degenerate_column_warning(&table, separator);
    Ok(LoadedTable {
        table: Arc::new(table),
        warning,
    })
}

/// Blank names become `Unnamed: {i}`; repeats get `.1`, `.2`, … suffixes.
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(raw.len());
    for (i, name) in raw.iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name.clone()
        };
        let mut candidate = base.clone();
        let mut suffix = 1;
        while used.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        used.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

fn is_missing_token(s: &str) -> bool {
    s.is_empty() || MISSING_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Pick the narrowest kind every non-missing field fits, then convert.
fn infer_column(name: String, raw: &[String]) -> Column {
    let present: Vec<&str> = raw
        .iter()
        .map(String::as_str)
        .filter(|s| !is_missing_token(s))
        .collect();

    let kind = if raw.is_empty() {
        ColumnKind::Text
    } else if present.iter().all(|s| s.trim().parse::<i64>().is_ok()) {
        // An all-missing column lands here with no values; treat it as float.
        if present.is_empty() {
            ColumnKind::Float
        } else {
            ColumnKind::Integer
        }
    } else if present.iter().all(|s| s.trim().parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Text
    };

    let values = raw
        .iter()
        .map(|s| convert_cell(s, kind))
        .collect();
    Column::new(name, kind, values)
}

fn convert_cell(s: &str, kind: ColumnKind) -> CellValue {
    if is_missing_token(s) {
        return CellValue::Missing;
    }
    let parsed = match kind {
        ColumnKind::Integer => s.trim().parse::<i64>().ok().map(CellValue::Integer),
        ColumnKind::Float => s.trim().parse::<f64>().ok().map(CellValue::Float),
        ColumnKind::Boolean => parse_bool(s).map(CellValue::Bool),
        ColumnKind::Text => None,
    };
    parsed.unwrap_or_else(|| CellValue::Text(s.to_string()))
}

/// A single column whose header contains another supported separator usually
/// means the wrong separator was chosen.
fn degenerate_column_warning(table: &Table, separator: Separator) -> Option<String> {
    if table.column_count() != 1 {
        return None;
    }
    let header = &table.columns()[0].name;
    Separator::ALL
        .into_iter()
        .filter(|s| *s != separator)
        .find(|s| header.contains(s.as_char()))
        .map(|suggested| {
            format!(
                "only one column was found using separator '{separator}'; \
                 the header contains '{suggested}', try that separator instead"
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(id: &str, text: &str) -> Upload {
        Upload::new(id, format!("{id}.csv"), text.as_bytes().to_vec())
    }

    #[test]
    fn test_parses_header_and_infers_kinds() {
        let loaded = parse_delimited(b"city,visitors,rating\nRio,100,4.5\nSP,200,3\n", Separator::Comma)
            .unwrap();
        let t = &loaded.table;
        assert_eq!(t.column_names(), vec!["city", "visitors", "rating"]);
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.columns()[0].kind, ColumnKind::Text);
        assert_eq!(t.columns()[1].kind, ColumnKind::Integer);
        assert_eq!(t.columns()[2].kind, ColumnKind::Float);
        assert_eq!(t.columns()[2].values[1], CellValue::Float(3.0));
        assert!(loaded.warning.is_none());
    }

    #[test]
    fn test_semicolon_and_tab_separators() {
        let semi = parse_delimited(b"a;b\n1;2\n", Separator::Semicolon).unwrap();
        assert_eq!(semi.table.column_names(), vec!["a", "b"]);
        let tab = parse_delimited(b"a\tb\n1\t2\n", Separator::Tab).unwrap();
        assert_eq!(tab.table.column_count(), 2);
    }

    #[test]
    fn test_ragged_rows_fail() {
        let err = parse_delimited(b"a,b\n1,2\n3\n", Separator::Comma).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(
            parse_delimited(b"", Separator::Comma),
            Err(DataError::EmptyInput)
        ));
        assert!(matches!(
            parse_delimited(b"  \n", Separator::Comma),
            Err(DataError::EmptyInput)
        ));
    }

    #[test]
    fn test_wrong_separator_warns_but_loads() {
        let loaded = parse_delimited(b"a;b\n1;2\n", Separator::Comma).unwrap();
        assert_eq!(loaded.table.column_count(), 1);
        let warning = loaded.warning.unwrap();
        assert!(warning.contains("';'"));
    }

    #[test]
    fn test_missing_markers_and_bool_columns() {
        let t = parse_delimited(b"n,flag,empty\n1,true,\nNA,False,\n", Separator::Comma)
            .unwrap()
            .table;
        assert_eq!(t.columns()[0].kind, ColumnKind::Integer);
        assert_eq!(t.columns()[0].values[1], CellValue::Missing);
        assert_eq!(t.columns()[1].kind, ColumnKind::Boolean);
        assert_eq!(t.columns()[1].values[1], CellValue::Bool(false));
        assert_eq!(t.columns()[2].kind, ColumnKind::Float);
        assert!(t.columns()[2].values.iter().all(CellValue::is_missing));
    }

    #[test]
    fn test_duplicate_and_blank_headers_are_renamed() {
        let t = parse_delimited(b"a,a,\n1,2,3\n", Separator::Comma).unwrap().table;
        assert_eq!(t.column_names(), vec!["a", "a.1", "Unnamed: 2"]);
    }

    #[test]
    fn test_header_only_file_has_text_columns() {
        let t = parse_delimited(b"a,b\n", Separator::Comma).unwrap().table;
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.columns()[0].kind, ColumnKind::Text);
    }

    #[test]
    fn test_cache_hit_skips_parse() {
        let mut loader = TableLoader::new();
        let up = upload("u1", "a,b\n1,2\n");
        let first = loader.load(&up, Separator::Comma).unwrap();
        let second = loader.load(&up, Separator::Comma).unwrap();
        assert_eq!(loader.parse_count(), 1);
        assert!(Arc::ptr_eq(&first.table, &second.table));
    }

    #[test]
    fn test_separator_change_is_a_miss() {
        let mut loader = TableLoader::new();
        let up = upload("u1", "a,b\n1,2\n");
        loader.load(&up, Separator::Comma).unwrap();
        loader.load(&up, Separator::Semicolon).unwrap();
        assert_eq!(loader.parse_count(), 2);
        assert_eq!(loader.cached_entries(), 2);
    }

    #[test]
    fn test_failed_parse_is_not_cached() {
        let mut loader = TableLoader::new();
        let up = upload("bad", "a,b\n1\n");
        assert!(loader.load(&up, Separator::Comma).is_err());
        assert_eq!(loader.cached_entries(), 0);
        assert!(loader.load(&up, Separator::Comma).is_err());
        assert_eq!(loader.parse_count(), 2);
    }
}

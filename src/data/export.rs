use log::info;

use super::model::Table;
use crate::error::{DataError, DataResult};

/// File name offered for the downloaded view.
pub const EXPORT_FILE_NAME: &str = "dados_turismo_filtrados.csv";
/// MIME type of the exported artifact.
pub const EXPORT_MIME: &str = "text/csv";

/// Serialize `view` as UTF-8 CSV: header row, no index column, comma separated
/// whatever separator the upload used.
pub fn to_csv(view: &Table) -> DataResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(view.column_names())
        .map_err(|e| DataError::Export(e.to_string()))?;
    for i in 0..view.row_count() {
        let fields = view.columns().iter().map(|c| c.values[i].to_field());
        writer
            .write_record(fields)
            .map_err(|e| DataError::Export(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| DataError::Export(e.to_string()))?;
    info!(
        "Exported {} rows x {} columns ({} bytes)",
        view.row_count(),
        view.column_count(),
        bytes.len()
    );
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{parse_delimited, Separator};

    #[test]
    fn test_export_is_comma_separated_without_index() {
        let table = parse_delimited(b"city;visitors;rate\nRio;100;1.0\nSP;;2.5\n", Separator::Semicolon)
            .unwrap()
            .table;
        let out = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(out, "city,visitors,rate\nRio,100,1.0\nSP,,2.5\n");
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let table = parse_delimited(b"name|n\nRio, RJ|1\n", Separator::Pipe).unwrap().table;
        let out = String::from_utf8(to_csv(&table).unwrap()).unwrap();
        assert_eq!(out, "name,n\n\"Rio, RJ\",1\n");
    }

    #[test]
    fn test_header_only_view() {
        let table = parse_delimited(b"a,b\n", Separator::Comma).unwrap().table;
        assert_eq!(to_csv(&table).unwrap(), b"a,b\n");
    }
}

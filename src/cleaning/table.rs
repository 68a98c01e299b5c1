use std::io::Read;

use log::warn;

use crate::error::Result;

// ---------------------------------------------------------------------------
// RawTable – untyped cells as read from the export
// ---------------------------------------------------------------------------

/// Untyped, in-memory listings table. Every pipeline step before type
/// coercion works on this shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    /// One entry per row, each padded to `headers.len()`.
    pub rows: Vec<Vec<String>>,
}

/// Tokens a spreadsheet export uses for "no value".
const MISSING_TOKENS: [&str; 5] = ["", "na", "n/a", "nan", "null"];

/// Whether a raw cell carries no value.
pub fn is_missing(cell: &str) -> bool {
    let t = cell.trim();
    MISSING_TOKENS.iter().any(|tok| t.eq_ignore_ascii_case(tok))
}

fn decode_cell(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl RawTable {
    /// Parse a comma-separated table with a header row.
    ///
    /// Ragged rows are tolerated: short rows are padded with empty cells,
    /// long rows are truncated to the header width. Bytes that are not valid
    /// UTF-8 are replaced with U+FFFD rather than failing the whole read.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader.byte_headers()?.iter().map(decode_cell).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut lossy_rows = 0usize;
        for record in reader.byte_records() {
            let record = record?;
            if std::str::from_utf8(record.as_slice()).is_err() {
                lossy_rows += 1;
            }
            let mut row: Vec<String> = record.iter().take(width).map(decode_cell).collect();
            row.resize(width, String::new());
            rows.push(row);
        }
        if lossy_rows > 0 {
            warn!("{lossy_rows} row(s) contained invalid UTF-8; bad bytes were replaced");
        }

        Ok(RawTable { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value, `None` when the column is absent or the cell is missing.
    pub fn cell<'a>(&'a self, row: &'a [String], column: Option<usize>) -> Option<&'a str> {
        let value = row.get(column?)?;
        if is_missing(value) {
            None
        } else {
            Some(value.trim())
        }
    }

    /// Count of non-missing cells in a column.
    pub fn filled(&self, column: usize) -> usize {
        self.rows
            .iter()
            .filter(|row| row.get(column).is_some_and(|c| !is_missing(c)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_pads_short_rows() {
        let csv = "id,price,room_type\n1,$10,Private room\n2,$20\n";
        let table = RawTable::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(table.headers, vec!["id", "price", "room_type"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1], vec!["2", "$20", ""]);
    }

    #[test]
    fn missing_tokens_read_as_none() {
        let csv = "id,name\n1,N/A\n2, Loft \n";
        let table = RawTable::from_reader(csv.as_bytes()).unwrap();
        let name = table.column("name");

        assert_eq!(table.cell(&table.rows[0], name), None);
        assert_eq!(table.cell(&table.rows[1], name), Some("Loft"));
        assert_eq!(table.cell(&table.rows[1], None), None);
        assert_eq!(table.filled(1), 1);
    }

    #[test]
    fn invalid_utf8_row_is_decoded_lossily() {
        let csv: &[u8] = b"id,name\n1,ok\n2,Caf\xE9 del Mar\n3,x\n";
        let table = RawTable::from_reader(csv).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[1][0], "2");
        assert_eq!(table.rows[1][1], "Caf\u{FFFD} del Mar");
        assert_eq!(table.rows[2], vec!["3", "x"]);
    }
}

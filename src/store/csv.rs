//! Minimal CSV reader producing a [`Dataset`].
//!
//! Supports a header line, comma separators, and double-quoted fields with
//! `""` escapes. Quoted fields may not span lines.
use super::error::DatasetError;
use super::table::Dataset;
use super::types::{Cell, Column};
use std::fs;
use std::path::Path;

pub fn read_path(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
    let text = fs::read_to_string(path)?;
    read_str(&text)
}

/// Parses CSV text. A leading UTF-8 byte order mark is ignored.
pub fn read_str(text: &str) -> Result<Dataset, DatasetError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.strip_suffix('\r').unwrap_or(l)))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Ok(Dataset::default());
    };
    let names = split_record(header, header_line)?;
    let mut columns: Vec<Column> = names
        .into_iter()
        .map(|n| Column::new(n.trim().to_string(), Vec::new()))
        .collect();

    for (line_no, line) in lines {
        let fields = split_record(line, line_no)?;
        if fields.len() != columns.len() {
            return Err(DatasetError::RaggedRow {
                line: line_no,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        for (col, raw) in columns.iter_mut().zip(fields) {
            col.cells.push(Cell::parse(&raw));
        }
    }

    Dataset::new(columns)
}

fn split_record(line: &str, line_no: usize) -> Result<Vec<String>, DatasetError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut field_start = true;

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field_start => in_quotes = true,
            '"' => {
                return Err(DatasetError::Parse {
                    line: line_no,
                    msg: "unexpected quote inside unquoted field".to_string(),
                })
            }
            ',' if !in_quotes => {
                fields.push(std::mem::take(&mut current));
                field_start = true;
                continue;
            }
            other => current.push(other),
        }
        field_start = false;
    }

    if in_quotes {
        return Err(DatasetError::Parse { line: line_no, msg: "unterminated quoted field".to_string() });
    }
    fields.push(current);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TITANIC_HEAD: &str = "PassengerId,Survived,Pclass,Name,Sex,Age,Fare\r\n\
        1,0,3,\"Braund, Mr. Owen Harris\",male,22,7.25\r\n\
        2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs \"\"Th\"\")\",female,38,71.2833\r\n\
        3,1,3,\"Heikkinen, Miss. Laina\",female,,7.925\r\n\
        \r\n";

    #[test]
    fn test_reads_quoted_fields_and_blanks() {
        let ds = read_str(TITANIC_HEAD).unwrap();
        assert_eq!(ds.n_rows(), 3);
        assert_eq!(ds.column_names(), vec!["PassengerId", "Survived", "Pclass", "Name", "Sex", "Age", "Fare"]);
        assert_eq!(ds.get(0, "Name"), Some(&Cell::from("Braund, Mr. Owen Harris")));
        assert_eq!(
            ds.get(1, "Name"),
            Some(&Cell::from("Cumings, Mrs. John Bradley (Florence Briggs \"Th\")"))
        );
        assert_eq!(ds.get(2, "Age"), Some(&Cell::Missing));
        assert_eq!(ds.get(1, "Fare"), Some(&Cell::Number(71.2833)));
    }

    #[test]
    fn test_leading_byte_order_mark_is_dropped() {
        let ds = read_str("\u{feff}PassengerId,Sex\n1,male\n").unwrap();
        assert_eq!(ds.column_names(), vec!["PassengerId", "Sex"]);
        assert_eq!(ds.get(0, "PassengerId"), Some(&Cell::Number(1.0)));

        let quoted = read_str("\u{feff}\"PassengerId\",Sex\n1,male\n").unwrap();
        assert!(quoted.has_column("PassengerId"));
    }

    #[test]
    fn test_ragged_row_reports_line() {
        let err = read_str("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { line: 3, expected: 2, found: 1 }));
    }

    #[test]
    fn test_unterminated_quote() {
        let err = read_str("a,b\n\"1,2\n").unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_empty_input_is_empty_dataset() {
        let ds = read_str("").unwrap();
        assert!(ds.is_empty());
        assert_eq!(ds.n_columns(), 0);
    }

    #[test]
    fn test_read_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", TITANIC_HEAD).unwrap();
        let ds = read_path(file.path()).unwrap();
        assert_eq!(ds.n_rows(), 3);
    }
}

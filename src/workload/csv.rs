//! Reader and writer for the generator's CSV layout (a header
//! `OP,A1,...,An` followed by one row per operation), plus the experiment
//! results export.

use std::io::{BufRead, Write};

use crate::workload::{
    errors::WorkloadError,
    op::Operation,
    runner::{ExperimentResult, REPORT_COLUMNS},
};

/// Parses a whole workload. The number of fields comes from the header.
pub fn read_operations<R: BufRead>(reader: R) -> Result<Vec<Operation>, WorkloadError> {
    let mut lines = reader.lines().enumerate();

    let num_fields = match lines.next() {
        Some((_, header)) => parse_header(&header?)?,
        None => return Ok(Vec::new()),
    };

    let mut ops = Vec::new();
    for (idx, line) in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        ops.push(parse_row(idx + 1, line, num_fields)?);
    }

    Ok(ops)
}

fn parse_header(header: &str) -> Result<usize, WorkloadError> {
    let cols: Vec<&str> = header.trim().split(',').map(str::trim).collect();

    if cols.first() != Some(&"OP") {
        return Err(WorkloadError::Parse {
            line: 1,
            reason: "header must start with OP".into(),
        });
    }

    for (i, col) in cols.iter().enumerate().skip(1) {
        if *col != format!("A{}", i) {
            return Err(WorkloadError::Parse {
                line: 1,
                reason: format!("expected column A{}, found '{}'", i, col),
            });
        }
    }

    if cols.len() < 2 {
        return Err(WorkloadError::Parse {
            line: 1,
            reason: "no attribute columns".into(),
        });
    }

    Ok(cols.len() - 1)
}

fn parse_row(line: usize, row: &str, num_fields: usize) -> Result<Operation, WorkloadError> {
    let parse_err = |reason: String| WorkloadError::Parse { line, reason };

    let mut cols = row.split(',').map(str::trim);
    let tag = cols.next().unwrap_or_default();

    let fields = cols
        .map(|c| {
            c.parse::<i32>()
                .map_err(|e| parse_err(format!("bad field '{}': {}", c, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if fields.len() != num_fields {
        return Err(parse_err(format!(
            "expected {} fields, found {}",
            num_fields,
            fields.len()
        )));
    }

    Operation::from_fields(tag, fields).map_err(parse_err)
}

/// Writes operations in the same layout. Deletes and searches repeat the
/// key in every column.
pub fn write_operations<W: Write>(
    mut w: W,
    ops: &[Operation],
    num_fields: usize,
) -> Result<(), WorkloadError> {
    let header: Vec<String> = (1..=num_fields).map(|i| format!("A{}", i)).collect();
    writeln!(w, "OP,{}", header.join(","))?;

    for op in ops {
        let fields: Vec<String> = match op {
            Operation::Insert(r) => r.fields().iter().map(|f| f.to_string()).collect(),
            _ => vec![op.key().to_string(); num_fields],
        };
        writeln!(w, "{},{}", op.tag(), fields.join(","))?;
    }

    Ok(())
}

/// Experiment results as CSV: a `REPORT_COLUMNS` header, then one row per
/// result.
pub fn write_results<W: Write>(mut w: W, results: &[ExperimentResult]) -> Result<(), WorkloadError> {
    writeln!(w, "{}", REPORT_COLUMNS.join(","))?;
    for r in results {
        writeln!(w, "{}", r.columns().join(","))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::common::record::Record;

    #[test]
    fn reads_generator_output() {
        let data = "OP,A1,A2,A3\n+,10,5,6\n?,10,10,10\n-,10,10,10\n";
        let ops = read_operations(Cursor::new(data)).unwrap();

        assert_eq!(
            ops,
            vec![
                Operation::Insert(Record::new(vec![10, 5, 6])),
                Operation::Search(10),
                Operation::Delete(10),
            ]
        );
    }

    #[test]
    fn rejects_short_rows() {
        let data = "OP,A1,A2\n+,1\n";
        match read_operations(Cursor::new(data)) {
            Err(WorkloadError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_tag_and_bad_header() {
        assert!(read_operations(Cursor::new("OP,A1\n*,1\n")).is_err());
        assert!(read_operations(Cursor::new("KEY,A1\n+,1\n")).is_err());
        assert!(read_operations(Cursor::new("OP,A2\n+,1\n")).is_err());
    }

    #[test]
    fn written_rows_read_back() {
        let ops = vec![
            Operation::Insert(Record::new(vec![3, 7])),
            Operation::Delete(3),
        ];
        let mut buf = Vec::new();
        write_operations(&mut buf, &ops, 2).unwrap();

        assert_eq!(String::from_utf8(buf.clone()).unwrap(), "OP,A1,A2\n+,3,7\n-,3,3\n");
        assert_eq!(read_operations(Cursor::new(buf)).unwrap(), ops);
    }
}

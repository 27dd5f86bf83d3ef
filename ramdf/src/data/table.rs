use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ramcore::data::series::RamanSeries;
use ramcore::data::trace::PotentialTrace;
use ramcore::error::PipelineError;

/// Splits a flat table into rows of f64 fields.
///
/// The first physical line is always a header and skipped, blank lines
/// are skipped, `#` starts a comment running to the end of the line.
/// Remaining lines must hold exactly `columns` whitespace separated
/// numeric fields; a malformed line reports its 1-based position. A table
/// with zero data rows is `PipelineError::EmptyInput`.
fn parse_table<R: BufRead>(reader: R, columns: usize) -> Result<Vec<Vec<f64>>, Box<dyn Error>> {
    let mut rows = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if number == 0 {
            continue;
        }
        let content = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        if content.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = content.split_whitespace().collect();
        if fields.len() != columns {
            return Err(format!(
                "line {}: expected {} columns, found {}",
                number + 1,
                columns,
                fields.len()
            )
            .into());
        }

        let mut row = Vec::with_capacity(columns);
        for field in fields {
            let value: f64 = field.parse().map_err(|_| {
                format!("line {}: cannot parse '{}' as a number", number + 1, field)
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(Box::new(PipelineError::EmptyInput));
    }

    Ok(rows)
}

/// Parses a three column spectra table (time, Raman shift, intensity)
/// into a `RamanSeries`, keeping the rows in file order.
pub fn parse_raman_table<R: BufRead>(reader: R) -> Result<RamanSeries, Box<dyn Error>> {
    let rows = parse_table(reader, 3)?;

    let mut time = Vec::with_capacity(rows.len());
    let mut shift = Vec::with_capacity(rows.len());
    let mut intensity = Vec::with_capacity(rows.len());
    for row in rows {
        time.push(row[0]);
        shift.push(row[1]);
        intensity.push(row[2]);
    }

    Ok(RamanSeries::new(time, shift, intensity))
}

/// Parses a two column potential table (time, volts) into a
/// `PotentialTrace`.
pub fn parse_potential_table<R: BufRead>(reader: R) -> Result<PotentialTrace, Box<dyn Error>> {
    let rows = parse_table(reader, 2)?;

    let mut time = Vec::with_capacity(rows.len());
    let mut potential = Vec::with_capacity(rows.len());
    for row in rows {
        time.push(row[0]);
        potential.push(row[1]);
    }

    Ok(PotentialTrace::new(time, potential))
}

pub fn read_raman_table(path: &Path) -> Result<RamanSeries, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    parse_raman_table(reader)
}

pub fn read_potential_table(path: &Path) -> Result<PotentialTrace, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    parse_potential_table(reader)
}

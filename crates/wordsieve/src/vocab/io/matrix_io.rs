//! # Dense Matrix IO
//!
//! One matrix row per line, values separated by whitespace.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{WSResult, WordsieveError},
    math::DenseMatrix,
    vocab::io::{fields, numbered_lines, parse_field},
};

/// Load a [`DenseMatrix`] from a text file.
pub fn load_matrix_path<P: AsRef<Path>>(path: P) -> WSResult<DenseMatrix> {
    let reader = BufReader::new(File::open(path)?);
    read_matrix(reader)
}

/// Read a [`DenseMatrix`] from a [`BufRead`] stream.
///
/// The shape is inferred: one row per non-blank line, and the column count
/// of the first row, which every other row must match.
pub fn read_matrix<R: BufRead>(reader: R) -> WSResult<DenseMatrix> {
    let mut data = Vec::new();
    let mut rows = 0;
    let mut cols = None;

    for line in numbered_lines(reader) {
        let (line_no, line) = line?;
        let start = data.len();
        for part in fields(&line) {
            data.push(parse_field::<f32>(part, line_no)?);
        }
        let width = data.len() - start;
        if width == 0 {
            continue;
        }
        match cols {
            None => cols = Some(width),
            Some(c) if c != width => {
                return Err(WordsieveError::MalformedLine {
                    line: line_no,
                    reason: format!("expected {c} values, found {width}"),
                });
            }
            _ => {}
        }
        rows += 1;
    }

    DenseMatrix::from_vec(rows, cols.unwrap_or(0), data)
}

/// Read a [`DenseMatrix`] that must have the given shape.
///
/// Too few rows is a [`WordsieveError::PrematureEof`]; any other
/// disagreement is a [`WordsieveError::ShapeMismatch`].
pub fn read_matrix_with_shape<R: BufRead>(
    reader: R,
    rows: usize,
    cols: usize,
) -> WSResult<DenseMatrix> {
    let matrix = read_matrix(reader)?;
    if matrix.rows() < rows {
        return Err(WordsieveError::PrematureEof {
            expected: rows,
            found: matrix.rows(),
        });
    }
    if matrix.shape() != (rows, cols) {
        return Err(WordsieveError::ShapeMismatch(format!(
            "expected a {rows}x{cols} matrix, found {}x{}",
            matrix.rows(),
            matrix.cols()
        )));
    }
    Ok(matrix)
}

/// Save a [`DenseMatrix`] to a text file.
pub fn save_matrix_path<P: AsRef<Path>>(
    matrix: &DenseMatrix,
    path: P,
) -> WSResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_matrix(matrix, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`DenseMatrix`] to a [`Write`] writer, one row per line.
pub fn write_matrix<W: Write>(
    matrix: &DenseMatrix,
    writer: &mut W,
) -> WSResult<()> {
    for row in matrix.iter_rows() {
        let mut sep = "";
        for v in row {
            write!(writer, "{sep}{v}")?;
            sep = " ";
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

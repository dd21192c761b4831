//! # Embeddings IO
//!
//! The `word2vec` / `fastText` text format:
//!
//! ```text
//! 3 2
//! dog 0.1 0.2
//! cat 0.1 0.3
//! runs -0.5 0.0
//! ```

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{WSResult, WordsieveError},
    math::DenseMatrix,
    types::display_token,
    vocab::{
        Embeddings,
        Vocab,
        io::{fields, numbered_lines, parse_field},
    },
};

/// Load [`Embeddings`] from a text embeddings file.
///
/// # Arguments
/// * `path` - the path to the embeddings file.
pub fn load_embeddings_path<P: AsRef<Path>>(path: P) -> WSResult<Embeddings> {
    let reader = BufReader::new(File::open(path)?);
    read_embeddings(reader)
}

/// Read [`Embeddings`] from a text embeddings [`BufRead`] stream.
///
/// Lines after the declared row count are ignored.
pub fn read_embeddings<R: BufRead>(reader: R) -> WSResult<Embeddings> {
    let mut lines = numbered_lines(reader);

    let (count, dim) = match lines.next() {
        None => {
            return Err(WordsieveError::MalformedLine {
                line: 1,
                reason: "missing `count dim` header".to_string(),
            });
        }
        Some(header) => {
            let (line_no, header) = header?;
            let parts: Vec<&[u8]> = fields(&header).collect();
            if parts.len() != 2 {
                return Err(WordsieveError::MalformedLine {
                    line: line_no,
                    reason: "expected `count dim` header".to_string(),
                });
            }
            (
                parse_field::<usize>(parts[0], line_no)?,
                parse_field::<usize>(parts[1], line_no)?,
            )
        }
    };

    let mut vocab = Vocab::default();
    let mut data = Vec::with_capacity(count * dim);

    for line in lines.take(count) {
        let (line_no, line) = line?;
        let mut parts = fields(&line);

        let token = parts.next().ok_or_else(|| WordsieveError::MalformedLine {
            line: line_no,
            reason: "empty embedding line".to_string(),
        })?;
        if vocab.contains(token) {
            return Err(WordsieveError::DuplicateEntry {
                entry: display_token(token),
                line: line_no,
            });
        }
        vocab.get_or_insert(token);

        let start = data.len();
        for part in parts {
            data.push(parse_field::<f32>(part, line_no)?);
        }
        if data.len() - start != dim {
            return Err(WordsieveError::MalformedLine {
                line: line_no,
                reason: format!("expected {dim} values, found {}", data.len() - start),
            });
        }
    }

    if vocab.len() != count {
        return Err(WordsieveError::PrematureEof {
            expected: count,
            found: vocab.len(),
        });
    }

    log::debug!("read {count} embeddings of dimension {dim}");
    Embeddings::new(vocab, DenseMatrix::from_vec(count, dim, data)?)
}

/// Save [`Embeddings`] to a text embeddings file.
pub fn save_embeddings_path<P: AsRef<Path>>(
    embeddings: &Embeddings,
    path: P,
) -> WSResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_embeddings(embeddings, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write [`Embeddings`] to a [`Write`] writer in the text embeddings format.
pub fn write_embeddings<W: Write>(
    embeddings: &Embeddings,
    writer: &mut W,
) -> WSResult<()> {
    writeln!(writer, "{} {}", embeddings.len(), embeddings.dim())?;
    for (id, token) in embeddings.vocab().iter() {
        writer.write_all(token)?;
        for v in embeddings.row(id) {
            write!(writer, " {v}")?;
        }
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_embeddings() {
        let data = b"3 2\ndog 0.1 0.2\ncat 0.1 0.3\nruns -0.5 0\n".as_slice();
        let emb = read_embeddings(data).unwrap();

        assert_eq!(emb.len(), 3);
        assert_eq!(emb.dim(), 2);
        assert_eq!(emb.row_of(b"runs"), Some(&[-0.5, 0.0][..]));
    }

    #[test]
    fn test_save_load_embeddings() {
        let vocab = Vocab::from_tokens(["a", "bc"]).unwrap();
        let matrix = DenseMatrix::from_rows(&[vec![0.25, -1.5, 3.0], vec![1e-7, 0.0, 2.5]]).unwrap();
        let emb = Embeddings::new(vocab, matrix).unwrap();

        tempdir::TempDir::new("embeddings_test")
            .and_then(|dir| {
                let path = dir.path().join("emb.vec");

                save_embeddings_path(&emb, &path).expect("Failed to save embeddings");
                let loaded = load_embeddings_path(&path).expect("Failed to load embeddings");

                assert_eq!(loaded, emb);

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_premature_eof() {
        let err = read_embeddings(b"3 1\na 1\nb 2\n".as_slice()).unwrap_err();
        assert!(matches!(
            err,
            WordsieveError::PrematureEof {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_short_row() {
        let err = read_embeddings(b"2 2\na 1 2\nb 2\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::MalformedLine { line: 3, .. }));
    }

    #[test]
    fn test_duplicate_word() {
        let err = read_embeddings(b"2 1\na 1\na 2\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::DuplicateEntry { line: 3, .. }));
    }
}

//! # Vocabulary IO

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{WSResult, WordsieveError},
    types::display_token,
    vocab::{Vocab, io::numbered_lines},
};

/// Load a [`Vocab`] from a one-token-per-line file.
///
/// # Arguments
/// * `path` - the path to the vocabulary file.
pub fn load_vocab_path<P: AsRef<Path>>(path: P) -> WSResult<Vocab> {
    let reader = BufReader::new(File::open(path)?);
    read_vocab(reader)
}

/// Read a [`Vocab`] from a one-token-per-line [`BufRead`] stream.
///
/// A repeated token is a fatal [`WordsieveError::DuplicateEntry`];
/// an empty line is a [`WordsieveError::MalformedLine`].
pub fn read_vocab<R: BufRead>(reader: R) -> WSResult<Vocab> {
    let mut vocab = Vocab::default();
    for line in numbered_lines(reader) {
        let (line_no, token) = line?;
        if token.is_empty() {
            return Err(WordsieveError::MalformedLine {
                line: line_no,
                reason: "empty token".to_string(),
            });
        }
        if vocab.contains(&token) {
            return Err(WordsieveError::DuplicateEntry {
                entry: display_token(&token),
                line: line_no,
            });
        }
        vocab.get_or_insert(&token);
    }
    log::debug!("read vocabulary of {} tokens", vocab.len());
    Ok(vocab)
}

/// Save a [`Vocab`] to a one-token-per-line file.
pub fn save_vocab_path<P: AsRef<Path>>(
    vocab: &Vocab,
    path: P,
) -> WSResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_vocab(vocab, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`Vocab`] to a [`Write`] writer, one token per line.
pub fn write_vocab<W: Write>(
    vocab: &Vocab,
    writer: &mut W,
) -> WSResult<()> {
    for (_, token) in vocab.iter() {
        writer.write_all(token)?;
        writer.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_load_vocab() {
        let vocab = Vocab::from_tokens([b"ab".as_slice(), b"c".as_slice(), &[0xE2, 0x98][..]]).unwrap();

        tempdir::TempDir::new("vocab_test")
            .and_then(|dir| {
                let path = dir.path().join("subwords.txt");

                save_vocab_path(&vocab, &path).expect("Failed to save vocab");
                let loaded = load_vocab_path(&path).expect("Failed to load vocab");

                assert_eq!(loaded, vocab);
                assert_eq!(loaded.lookup(&[0xE2, 0x98]), Some(2));

                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_duplicate_line() {
        let err = read_vocab(b"a\nb\nc\nb\n".as_slice()).unwrap_err();
        assert!(matches!(
            err,
            WordsieveError::DuplicateEntry { line: 4, .. }
        ));
    }

    #[test]
    fn test_empty_line() {
        let err = read_vocab(b"a\n\nb\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::MalformedLine { line: 2, .. }));
    }
}

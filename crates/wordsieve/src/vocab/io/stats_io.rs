//! # Unigram / Bigram Statistics IO

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    errors::{WSResult, WordsieveError},
    types::{WSHashMap, display_token},
    vocab::io::{fields, numbered_lines, parse_field},
};

/// `token -> count`.
pub type UnigramTable = WSHashMap<Vec<u8>, u64>;

/// `left -> right -> count`.
pub type BigramTable = WSHashMap<Vec<u8>, WSHashMap<Vec<u8>, u64>>;

/// Unigram counts plus their total mass (the corpus token count, not the vocabulary size).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnigramStats {
    /// The per-token counts.
    pub counts: UnigramTable,

    /// The sum of all counts.
    pub total: u64,
}

/// Load [`UnigramStats`] from a `token count` file.
pub fn load_unigram_stats_path<P: AsRef<Path>>(path: P) -> WSResult<UnigramStats> {
    let reader = BufReader::new(File::open(path)?);
    read_unigram_stats(reader)
}

/// Read [`UnigramStats`] from a `token count` [`BufRead`] stream.
///
/// Blank lines are skipped; a repeated token is a [`WordsieveError::DuplicateEntry`].
/// Counts must be positive: a zero count is a [`WordsieveError::MalformedLine`].
pub fn read_unigram_stats<R: BufRead>(reader: R) -> WSResult<UnigramStats> {
    let mut stats = UnigramStats::default();
    for line in numbered_lines(reader) {
        let (line_no, line) = line?;
        let parts: Vec<&[u8]> = fields(&line).collect();
        match parts.as_slice() {
            [] => continue,
            [token, count] => {
                let count: u64 = parse_field(count, line_no)?;
                if count == 0 {
                    return Err(WordsieveError::MalformedLine {
                        line: line_no,
                        reason: format!("zero count for {:?}", display_token(token)),
                    });
                }
                if stats.counts.insert(token.to_vec(), count).is_some() {
                    return Err(WordsieveError::DuplicateEntry {
                        entry: display_token(token),
                        line: line_no,
                    });
                }
                stats.total += count;
            }
            _ => {
                return Err(WordsieveError::MalformedLine {
                    line: line_no,
                    reason: "expected `token count`".to_string(),
                });
            }
        }
    }
    log::debug!(
        "read {} unigrams with total mass {}",
        stats.counts.len(),
        stats.total
    );
    Ok(stats)
}

/// Load a [`BigramTable`] from a `left right count` file.
pub fn load_bigram_stats_path<P: AsRef<Path>>(path: P) -> WSResult<BigramTable> {
    let reader = BufReader::new(File::open(path)?);
    read_bigram_stats(reader)
}

/// Read a [`BigramTable`] from a `left right count` [`BufRead`] stream.
pub fn read_bigram_stats<R: BufRead>(reader: R) -> WSResult<BigramTable> {
    let mut table = BigramTable::default();
    let mut entries = 0_usize;
    for line in numbered_lines(reader) {
        let (line_no, line) = line?;
        let parts: Vec<&[u8]> = fields(&line).collect();
        match parts.as_slice() {
            [] => continue,
            [left, right, count] => {
                let count: u64 = parse_field(count, line_no)?;
                let row = table.entry(left.to_vec()).or_default();
                if row.insert(right.to_vec(), count).is_some() {
                    return Err(WordsieveError::DuplicateEntry {
                        entry: format!("{} {}", display_token(left), display_token(right)),
                        line: line_no,
                    });
                }
                entries += 1;
            }
            _ => {
                return Err(WordsieveError::MalformedLine {
                    line: line_no,
                    reason: "expected `left right count`".to_string(),
                });
            }
        }
    }
    log::debug!("read {entries} bigrams");
    Ok(table)
}

/// Write `token count` lines.
pub fn write_unigram_stats<'a, W, I>(
    entries: I,
    writer: &mut W,
) -> WSResult<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a [u8], u64)>,
{
    for (token, count) in entries {
        writer.write_all(token)?;
        writeln!(writer, " {count}")?;
    }
    Ok(())
}

/// Write `left right count` lines.
pub fn write_bigram_stats<'a, W, I>(
    entries: I,
    writer: &mut W,
) -> WSResult<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a [u8], &'a [u8], u64)>,
{
    for (left, right, count) in entries {
        writer.write_all(left)?;
        writer.write_all(b" ")?;
        writer.write_all(right)?;
        writeln!(writer, " {count}")?;
    }
    Ok(())
}

/// Save `token count` lines to a file.
pub fn save_unigram_stats_path<'a, P, I>(
    entries: I,
    path: P,
) -> WSResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'a [u8], u64)>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_unigram_stats(entries, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Save `left right count` lines to a file.
pub fn save_bigram_stats_path<'a, P, I>(
    entries: I,
    path: P,
) -> WSResult<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'a [u8], &'a [u8], u64)>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write_bigram_stats(entries, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unigrams() {
        let stats = read_unigram_stats(b"a 10\nb 5\n\nab 3\n".as_slice()).unwrap();
        assert_eq!(stats.total, 18);
        assert_eq!(stats.counts.get(b"ab".as_slice()), Some(&3));

        let err = read_unigram_stats(b"a 1\na 2\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::DuplicateEntry { line: 2, .. }));

        let err = read_unigram_stats(b"a\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::MalformedLine { line: 1, .. }));

        // zero counts are rejected.
        let err = read_unigram_stats(b"a 3\nb 0\n".as_slice()).unwrap_err();
        assert!(matches!(err, WordsieveError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_save_load_stats() {
        let unigrams = [
            (b"a".as_slice(), 10_u64),
            (b"b".as_slice(), 5),
            (b"ab".as_slice(), 3),
        ];
        let bigrams = [
            (b"a".as_slice(), b"b".as_slice(), 2_u64),
            (b"b".as_slice(), b"a".as_slice(), 1),
        ];

        tempdir::TempDir::new("stats_test")
            .and_then(|dir| {
                let uni_path = dir.path().join("unigrams.txt");
                let bi_path = dir.path().join("bigrams.txt");

                save_unigram_stats_path(unigrams.iter().copied(), &uni_path)
                    .expect("Failed to save unigrams");
                save_bigram_stats_path(bigrams.iter().copied(), &bi_path)
                    .expect("Failed to save bigrams");

                let uni = load_unigram_stats_path(&uni_path).expect("Failed to load unigrams");
                assert_eq!(uni.total, 18);
                assert_eq!(uni.counts.len(), 3);
                assert_eq!(uni.counts.get(b"a".as_slice()), Some(&10));

                let bi = load_bigram_stats_path(&bi_path).expect("Failed to load bigrams");
                let count = |l: &[u8], r: &[u8]| bi.get(l).and_then(|row| row.get(r)).copied();
                assert_eq!(count(b"a", b"b"), Some(2));
                assert_eq!(count(b"b", b"a"), Some(1));
                assert!(!bi.contains_key(b"ab".as_slice()));

                Ok(())
            })
            .unwrap();
    }
}

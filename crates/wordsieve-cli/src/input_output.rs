use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
};

fn squash_standard_io(path: &Option<String>) -> Option<String> {
    match path {
        Some(p) if p == "-" => None,
        Some(p) => Some(p.clone()),
        None => None,
    }
}

/// Open `path` for reading; "-" is stdin.
pub fn open_path_reader(path: &str) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
    Ok(match squash_standard_io(&Some(path.to_string())) {
        None => Box::new(BufReader::new(std::io::stdin().lock())),
        Some(p) => Box::new(BufReader::new(File::open(p)?)),
    })
}

/// Input argument group.
#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Optional input file; "-" may be used to indicate stdin.
    #[clap(long, default_value = None)]
    pub input: Option<String>,
}

impl InputArgs {
    /// Open a reader for the input.
    pub fn open_reader(&self) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
        Ok(match squash_standard_io(&self.input) {
            None => Box::new(BufReader::new(std::io::stdin().lock())),
            Some(p) => Box::new(BufReader::new(File::open(p)?)),
        })
    }
}

/// Output argument group.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Optional output file; "-" may be used to indicate stdout.
    #[clap(long, default_value = None)]
    pub output: Option<String>,
}

impl OutputArgs {
    /// Open a writer for the output.
    pub fn open_writer(&self) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
        Ok(match squash_standard_io(&self.output) {
            Some(p) => Box::new(BufWriter::new(File::create(p)?)),
            None => Box::new(BufWriter::new(std::io::stdout().lock())),
        })
    }
}

/// Read up to `max_lines` lines into `batch`, without line terminators.
///
/// Returns the number of lines read; `0` at end of input.
pub fn read_line_batch(
    reader: &mut dyn BufRead,
    max_lines: usize,
    batch: &mut Vec<Vec<u8>>,
) -> std::io::Result<usize> {
    batch.clear();
    while batch.len() < max_lines {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        batch.push(line);
    }
    Ok(batch.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_line_batch() {
        let mut reader: &[u8] = b"a b\r\nc\n\nd";
        let mut batch = Vec::new();

        assert_eq!(read_line_batch(&mut reader, 2, &mut batch).unwrap(), 2);
        assert_eq!(batch, vec![b"a b".to_vec(), b"c".to_vec()]);

        assert_eq!(read_line_batch(&mut reader, 5, &mut batch).unwrap(), 2);
        assert_eq!(batch, vec![b"".to_vec(), b"d".to_vec()]);

        assert_eq!(read_line_batch(&mut reader, 5, &mut batch).unwrap(), 0);
    }
}

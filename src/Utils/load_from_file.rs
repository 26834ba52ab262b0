use crate::errors::Model2Error;
use log::{debug, info};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

/// Checks that an input file exists before any stage touches it.
pub fn ensure_exists(path: &Path) -> Result<(), Model2Error> {
    if !path.exists() {
        return Err(Model2Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Opens an input file for buffered reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>, Model2Error> {
    ensure_exists(path)?;
    let file = File::open(path).map_err(|e| Model2Error::io(path, e))?;
    Ok(BufReader::new(file))
}

/// Reads every line of a text file, with line terminators (`\n` or `\r\n`) removed.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Model2Error> {
    let reader = open_input(path)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        let mut line = line.map_err(|e| Model2Error::io(path, e))?;
        if line.ends_with('\r') {
            line.pop();
        }
        lines.push(line);
    }
    info!("Read {} lines from '{}'", lines.len(), path.display());
    Ok(lines)
}

/// Creates (or truncates) an output file, creating missing parent directories first.
pub fn create_output(path: &Path) -> Result<BufWriter<File>, Model2Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Model2Error::io(parent, e))?;
            debug!("Created output directory '{}'", parent.display());
        }
    }
    let file = File::create(path).map_err(|e| Model2Error::io(path, e))?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, tempdir};

    #[test]
    fn test_read_lines_strips_terminators() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "A => B\t1\r\n% comment\n\nlast").unwrap();

        let lines = read_lines(temp_file.path()).unwrap();
        assert_eq!(lines, vec!["A => B\t1", "% comment", "", "last"]);
    }

    #[test]
    fn test_read_lines_file_not_found() {
        let result = read_lines(Path::new("non_existent_file.model2"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_create_output_makes_parent_dirs() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("results").join("nested").join("out.txt");
        {
            let mut writer = create_output(&target).unwrap();
            writeln!(writer, "hello").unwrap();
        }
        assert_eq!(fs::read_to_string(&target).unwrap(), "hello\n");
    }
}

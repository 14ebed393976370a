//! CSV output for extracted transactions.

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::OutputError;
use crate::models::transaction::Transaction;

/// Fixed output header.
pub const HEADER: [&str; 5] = [
    "Transaction Date",
    "Card Number",
    "Description",
    "Debits (€)",
    "Credits (€)",
];

/// Result type for output operations.
pub type Result<T> = std::result::Result<T, OutputError>;

/// Writes transactions as UTF-8 CSV with the fixed header.
#[derive(Debug, Clone, Copy)]
pub struct CsvOutput {
    delimiter: u8,
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOutput {
    /// Comma-delimited output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use another single-byte ASCII delimiter.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self> {
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(OutputError::InvalidDelimiter(delimiter));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Write the header and one row per transaction to `writer`.
    pub fn write_to<W: Write>(&self, writer: W, transactions: &[Transaction]) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        wtr.write_record(HEADER)?;
        for tx in transactions {
            wtr.write_record(tx.fields())?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// Write transactions to `path`, replacing any existing file.
    ///
    /// Rows go to a temporary file next to `path` which is then renamed over
    /// it, so a failed write never leaves a file that looks complete. A new
    /// file gets the usual umask-filtered mode; a replaced file keeps its
    /// permissions.
    pub fn write_file(&self, path: &Path, transactions: &[Transaction]) -> Result<()> {
        let io_err = |source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut builder = tempfile::Builder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(fs::Permissions::from_mode(0o666));
        }
        let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;
        if let Ok(existing) = fs::metadata(path) {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(io_err)?;
        }

        self.write_to(tmp.as_file_mut(), transactions)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;

        debug!("Wrote {} rows to {}", transactions.len(), path.display());
        Ok(())
    }
}

/// Write transactions to `path` as comma-delimited CSV.
pub fn write_transactions(path: &Path, transactions: &[Transaction]) -> Result<()> {
    CsvOutput::new().write_file(path, transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tx(description: &str, debit: &str, credit: &str) -> Transaction {
        Transaction {
            date: "01/03/2024".to_string(),
            card: "1234".to_string(),
            description: description.to_string(),
            debit: debit.to_string(),
            credit: credit.to_string(),
        }
    }

    fn render(output: CsvOutput, transactions: &[Transaction]) -> String {
        let mut buf = Vec::new();
        output.write_to(&mut buf, transactions).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let csv = render(
            CsvOutput::new(),
            &[tx("GROCERY STORE", "45.20", ""), tx("SALARY", "", "1500.00")],
        );

        assert_eq!(
            csv,
            "Transaction Date,Card Number,Description,Debits (€),Credits (€)\n\
             01/03/2024,1234,GROCERY STORE,45.20,\n\
             01/03/2024,1234,SALARY,,1500.00\n"
        );
    }

    #[test]
    fn test_quotes_delimiters_and_non_ascii() {
        let csv = render(CsvOutput::new(), &[tx("CAFÉ, \"EL SOL\"", "3.50", "")]);
        assert!(csv.ends_with("01/03/2024,1234,\"CAFÉ, \"\"EL SOL\"\"\",3.50,\n"));
    }

    #[test]
    fn test_custom_delimiter() {
        let output = CsvOutput::new().with_delimiter(';').unwrap();
        let csv = render(output, &[tx("A;B", "1.00", "")]);
        assert!(csv.starts_with("Transaction Date;Card Number;"));
        assert!(csv.ends_with("01/03/2024;1234;\"A;B\";1.00;\n"));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        assert!(matches!(
            CsvOutput::new().with_delimiter('€'),
            Err(OutputError::InvalidDelimiter('€'))
        ));
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents that are much longer than the new file\n").unwrap();

        write_transactions(&path, &[tx("SHOP", "1.00", "")]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("Transaction Date,"));
        assert!(!written.contains("stale"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_new_file_gets_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("reference.txt");
        std::fs::File::create(&reference).unwrap();
        let path = dir.path().join("out.csv");

        write_transactions(&path, &[tx("SHOP", "1.00", "")]).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&reference));
    }

    #[cfg(unix)]
    #[test]
    fn test_overwrite_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "old\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_transactions(&path, &[tx("SHOP", "1.00", "")]).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_write_file_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = write_transactions(&path, &[tx("SHOP", "1.00", "")]).unwrap_err();

        assert!(matches!(err, OutputError::Io { .. }));
        assert!(!path.exists());
    }
}

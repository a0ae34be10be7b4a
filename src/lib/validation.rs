//! Validation of command-line inputs.
//!
//! Functions return [`DemuxError`] variants so failures carry the offending path or value.

use std::path::Path;

use crate::errors::{DemuxError, Result};
use crate::quality::MAX_PHRED;

/// Validate that a file exists.
///
/// # Errors
/// Returns [`DemuxError::InvalidFileFormat`] if the file does not exist.
///
/// # Example
/// ```
/// use fqdemux_lib::validation::validate_file_exists;
///
/// let result = validate_file_exists("/nonexistent/reads.fq.gz", "Read 1 FASTQ");
/// assert!(result.is_err());
/// ```
pub fn validate_file_exists<P: AsRef<Path>>(path: P, description: &str) -> Result<()> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(DemuxError::InvalidFileFormat {
            file_type: description.to_string(),
            path: path.display().to_string(),
            reason: "File does not exist".to_string(),
        });
    }
    Ok(())
}

/// Validate that every `(path, description)` names an existing file.
///
/// # Errors
/// Returns an error for the first file that does not exist.
pub fn validate_files_exist<P: AsRef<Path>>(files: &[(P, &str)]) -> Result<()> {
    for (path, desc) in files {
        validate_file_exists(path, desc)?;
    }
    Ok(())
}

/// Validate a Phred quality cutoff (0 to 93).
///
/// # Errors
/// Returns [`DemuxError::InvalidQuality`] if the value exceeds 93.
pub fn validate_quality_score(quality: u8) -> Result<()> {
    if quality > MAX_PHRED {
        return Err(DemuxError::InvalidQuality { value: quality, max: MAX_PHRED });
    }
    Ok(())
}

/// Validate that `output` is a directory or does not exist yet.
///
/// # Errors
/// Returns [`DemuxError::InvalidParameter`] if `output` exists and is not a directory.
pub fn validate_output_dir<P: AsRef<Path>>(output: P, parameter: &str) -> Result<()> {
    let output = output.as_ref();
    if output.exists() && !output.is_dir() {
        return Err(DemuxError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: format!("'{}' exists and is not a directory", output.display()),
        });
    }
    Ok(())
}

// File: src/error.rs
// Purpose: Scan-level error taxonomy

use std::path::PathBuf;

/// A file the scanner could not read or parse. Fatal to the scan run: a
/// malformed source file is reported, never silently dropped. Invalid
/// declaration shapes are *not* errors; they are skips.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

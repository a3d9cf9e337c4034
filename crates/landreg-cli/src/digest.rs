//! # Digest Subcommand
//!
//! Prints the SHA-256 fingerprint a registrar records on the ledger when a
//! deed is registered, computed over the file's exact bytes. With
//! `--expect`, compares against a declared digest in any accepted notation
//! (`0x`/`sha256:` prefix, either case).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use landreg_core::{digests_match, Sha256Digest};

use crate::EXIT_NOT_AUTHENTIC;

/// Arguments for the `landreg digest` subcommand.
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// File to fingerprint.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Declared digest to check the file against.
    #[arg(long, value_name = "DIGEST")]
    pub expect: Option<String>,
}

/// Execute the digest subcommand.
pub fn run_digest(args: &DigestArgs) -> Result<u8> {
    let digest = file_digest(&args.file)?;

    match &args.expect {
        None => {
            println!("{digest}  {}", args.file.display());
            Ok(0)
        }
        Some(expected) if digests_match(&digest, expected) => {
            println!("OK: {} matches {digest}", args.file.display());
            Ok(0)
        }
        Some(expected) => {
            println!(
                "MISMATCH: {} is {digest}, expected {}",
                args.file.display(),
                expected.trim()
            );
            Ok(EXIT_NOT_AUTHENTIC)
        }
    }
}

/// Digest of a file's exact bytes.
pub fn file_digest(path: &Path) -> Result<Sha256Digest> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(Sha256Digest::of(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HELLO_WORLD: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    fn hello_file() -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello world").unwrap();
        f
    }

    #[test]
    fn file_digest_is_over_exact_bytes() {
        let f = hello_file();
        assert_eq!(file_digest(f.path()).unwrap().to_hex(), HELLO_WORLD);
    }

    #[test]
    fn expect_accepts_prefixed_uppercase() {
        let f = hello_file();
        let args = DigestArgs {
            file: f.path().to_path_buf(),
            expect: Some(format!("0x{}", HELLO_WORLD.to_uppercase())),
        };
        assert_eq!(run_digest(&args).unwrap(), 0);
    }

    #[test]
    fn expect_mismatch_exits_two() {
        let f = hello_file();
        let args = DigestArgs {
            file: f.path().to_path_buf(),
            expect: Some(Sha256Digest::of(b"other").to_hex()),
        };
        assert_eq!(run_digest(&args).unwrap(), EXIT_NOT_AUTHENTIC);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = DigestArgs {
            file: dir.path().join("absent.pdf"),
            expect: None,
        };
        assert!(run_digest(&args).is_err());
    }
}

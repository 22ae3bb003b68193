//! Archive extraction capability
use std::{fs::File, path::Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("bad archive {path}: {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },
    #[error("archive {path} failed integrity check")]
    Integrity { path: String },
}

pub trait Archive: Send + Sync {
    /// Unpacks all entries of `archive` into `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ArchiveError>;

    /// Returns true if archive is structurally valid and all checksums match.
    fn validate(&self, archive: &Path) -> bool;

    /// Like `validate`, but reports failure as `ArchiveError::Integrity`.
    fn check(&self, archive: &Path) -> Result<(), ArchiveError> {
        if self.validate(archive) {
            Ok(())
        } else {
            Err(ArchiveError::Integrity {
                path: archive.display().to_string(),
            })
        }
    }
}

/// Zip support backed by `zip` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiveTool;

fn open(archive: &Path) -> Result<zip::ZipArchive<File>, ArchiveError> {
    let file = File::open(archive).map_err(|source| ArchiveError::Io {
        path: archive.display().to_string(),
        source,
    })?;
    zip::ZipArchive::new(file).map_err(|source| ArchiveError::Zip {
        path: archive.display().to_string(),
        source,
    })
}

impl Archive for ZipArchiveTool {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), ArchiveError> {
        let mut zip = open(archive)?;
        zip.extract(dest).map_err(|source| ArchiveError::Zip {
            path: archive.display().to_string(),
            source,
        })
    }

    fn validate(&self, archive: &Path) -> bool {
        let mut zip = match open(archive) {
            Ok(z) => z,
            Err(err) => {
                tracing::debug!(error = %err, "archive can not be opened");
                return false;
            }
        };
        for i in 0..zip.len() {
            let mut entry = match zip.by_index(i) {
                Ok(e) => e,
                Err(_) => return false,
            };
            // reading entry till the end verifies its crc32
            if std::io::copy(&mut entry, &mut std::io::sink()).is_err() {
                return false;
            }
        }
        true
    }
}

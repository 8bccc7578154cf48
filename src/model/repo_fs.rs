//! Filesystem access to the model artefact.

use std::fs;
use std::path::Path;

use crate::common::error::StartupError;
use crate::common::ids::Fingerprint;

/// Raw artefact bytes plus their fingerprint.
#[derive(Debug)]
pub struct ArtefactFile {
    pub bytes: Vec<u8>,
    pub fingerprint: String,
}

/// Read the artefact at `path` in full.
pub fn read_artefact(path: &Path) -> Result<ArtefactFile, StartupError> {
    let bytes = fs::read(path).map_err(|source| StartupError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let fingerprint = Fingerprint::of(&bytes).finish_hex();
    Ok(ArtefactFile { bytes, fingerprint })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::ErrorCode;
    use std::io::Write;

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("absent.json");
        let err = read_artefact(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ModelMissing);
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn fingerprint_depends_on_content() {
        let mut a = tempfile::NamedTempFile::new().expect("tmp file");
        a.write_all(b"{\"a\":1}").unwrap();
        let mut b = tempfile::NamedTempFile::new().expect("tmp file");
        b.write_all(b"{\"a\":2}").unwrap();

        let fa = read_artefact(a.path()).unwrap();
        let fb = read_artefact(b.path()).unwrap();
        assert_eq!(fa.bytes, b"{\"a\":1}");
        assert_ne!(fa.fingerprint, fb.fingerprint);
        assert_eq!(fa.fingerprint, read_artefact(a.path()).unwrap().fingerprint);
    }
}

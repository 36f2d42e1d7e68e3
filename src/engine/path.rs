//! Path translation for POSIX emulation layers on Windows.
//!
//! Under Cygwin the runtime is a native Windows program, so every path it
//! receives goes through `cygpath -w` first.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ValidatorError};

/// Translate one path with `converter -w <path>`.
pub fn translate(converter: &Path, path: &Path) -> Result<PathBuf> {
    let program = converter.display().to_string();
    let output = Command::new(converter)
        .arg("-w")
        .arg(path)
        .output()
        .map_err(|e| ValidatorError::launch(&program, e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ValidatorError::launch(
            program,
            io::Error::other(format!(
                "could not convert {}: {}",
                path.display(),
                stderr.trim()
            )),
        ));
    }

    let converted = String::from_utf8_lossy(&output.stdout);
    Ok(PathBuf::from(converted.trim()))
}

pub fn translate_all(converter: &Path, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    paths.iter().map(|p| translate(converter, p)).collect()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_converter(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fakepath");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_translate_trims_output() {
        let dir = TempDir::new().unwrap();
        let converter = fake_converter(&dir, r#"printf 'C:%s  \n' "$2""#);
        let translated = translate(&converter, Path::new("/tmp/a.html")).unwrap();
        assert_eq!(translated, PathBuf::from("C:/tmp/a.html"));
    }

    #[test]
    fn test_translate_failure_is_launch_error() {
        let dir = TempDir::new().unwrap();
        let converter = fake_converter(&dir, "echo nope >&2; exit 1");
        let err = translate(&converter, Path::new("/tmp/a.html")).unwrap_err();
        assert!(matches!(err, ValidatorError::ProcessLaunch { .. }));
    }

    #[test]
    fn test_missing_converter_is_launch_error() {
        let err = translate(Path::new("/nonexistent/cygpath"), Path::new("a")).unwrap_err();
        assert!(matches!(err, ValidatorError::ProcessLaunch { .. }));
    }
}

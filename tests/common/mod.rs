//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use html5_validator::{Validator, ValidatorOptions};

/// A stand-in for `java` that records its arguments and replays canned
/// checker output on stderr: `json` output when `--format json` is passed,
/// `text` output otherwise.
pub struct FakeEngine {
    pub dir: TempDir,
    pub runtime: PathBuf,
    pub args_file: PathBuf,
}

impl FakeEngine {
    pub fn new(text: &str, json: &str) -> Self {
        Self::with_script(text, json, "")
    }

    /// `extra` runs before any output is produced
    pub fn with_script(text: &str, json: &str, extra: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let text_file = dir.path().join("out.txt");
        let json_file = dir.path().join("out.json");
        let args_file = dir.path().join("args.txt");
        fs::write(&text_file, text).expect("write text output");
        fs::write(&json_file, json).expect("write json output");

        let script = format!(
            "#!/bin/sh\n\
             printf '%s\\n' \"$@\" > '{args}'\n\
             {extra}\n\
             case \" $* \" in\n\
             *' --format json '*) cat '{json}' >&2 ;;\n\
             *) cat '{text}' >&2 ;;\n\
             esac\n\
             exit 1\n",
            args = args_file.display(),
            json = json_file.display(),
            text = text_file.display(),
        );
        let runtime = dir.path().join("fake-java");
        fs::write(&runtime, script).expect("write fake runtime");
        make_executable(&runtime);

        Self {
            dir,
            runtime,
            args_file,
        }
    }

    pub fn options(&self) -> ValidatorOptions {
        ValidatorOptions {
            runtime: self.runtime.clone(),
            engine_jar: PathBuf::from("/opt/vnu/vnu.jar"),
            translate_paths: false,
            ..Default::default()
        }
    }

    /// A `cygpath` stand-in that prefixes `C:` to the path it is given
    pub fn path_converter(&self) -> PathBuf {
        let converter = self.dir.path().join("fake-cygpath");
        fs::write(&converter, "#!/bin/sh\nprintf 'C:%s\\n' \"$2\"\n").expect("write converter");
        make_executable(&converter);
        converter
    }

    pub fn validator(&self, options: ValidatorOptions) -> Validator {
        Validator::new(options).expect("valid options")
    }

    /// Arguments of the most recent run, one per line
    pub fn recorded_args(&self) -> Vec<String> {
        fs::read_to_string(&self.args_file)
            .expect("engine ran")
            .lines()
            .map(str::to_string)
            .collect()
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}

/// Create `rel` below `root` with `content`
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(&path, content).expect("write file");
    path
}

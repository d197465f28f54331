//! Small file helpers used alongside the directory copier

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::domain::{render_template, DomainError};

const FILE_MODE: u32 = 0o644;

/// Check if a path exists
///
/// Only a not-found stat result counts as absent; any other stat failure
/// (e.g. permission denied on a parent) reports the path as present.
pub fn exists(path: impl AsRef<Path>) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}

/// Create a directory (and its parents) unless the path already exists
pub fn create_if_not_exists(dir: impl AsRef<Path>, mode: u32) -> Result<(), DomainError> {
    let dir = dir.as_ref();

    if exists(dir) {
        return Ok(());
    }

    debug!(path = %dir.display(), mode = %format!("{:o}", mode), "Creating directory");

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    set_dir_mode(&mut builder, mode);

    builder.create(dir).map_err(|e| DomainError::io(dir, e))
}

/// Check whether a path is a directory, following symlinks
pub fn is_dir(path: impl AsRef<Path>) -> Result<bool, DomainError> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| DomainError::io(path, e))?;
    Ok(metadata.is_dir())
}

/// Names of the immediate subdirectories of `root`
pub fn get_directories(root: impl AsRef<Path>) -> Result<Vec<String>, DomainError> {
    let root = root.as_ref();
    let mut directories = Vec::new();

    for entry in fs::read_dir(root).map_err(|e| DomainError::io(root, e))? {
        let entry = entry.map_err(|e| DomainError::io(root, e))?;
        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(|e| DomainError::io(&path, e))?;

        if metadata.is_dir() {
            directories.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    Ok(directories)
}

/// Append content to a file, creating it if needed
pub fn append(path: impl AsRef<Path>, content: &str) -> Result<(), DomainError> {
    let path = path.as_ref();
    let mut file = open_for_append(path)?;

    file.write_all(content.as_bytes())
        .map_err(|e| DomainError::io(path, e))
}

/// Render a template and write it to `path`, replacing existing content
pub fn write_template(
    path: impl AsRef<Path>,
    template: &str,
    values: &HashMap<String, String>,
) -> Result<(), DomainError> {
    let path = path.as_ref();
    let rendered = render_template(template, values)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    set_file_mode(&mut options, FILE_MODE);

    let mut file = options.open(path).map_err(|e| DomainError::io(path, e))?;
    write_and_sync(&mut file, path, &rendered)
}

/// Render a template and append it to `path`
pub fn append_template(
    path: impl AsRef<Path>,
    template: &str,
    values: &HashMap<String, String>,
) -> Result<(), DomainError> {
    let path = path.as_ref();
    let rendered = render_template(template, values)?;

    let mut file = open_for_append(path)?;
    write_and_sync(&mut file, path, &rendered)
}

fn open_for_append(path: &Path) -> Result<fs::File, DomainError> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    set_file_mode(&mut options, FILE_MODE);

    options.open(path).map_err(|e| DomainError::io(path, e))
}

fn write_and_sync(file: &mut fs::File, path: &Path, content: &str) -> Result<(), DomainError> {
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .map_err(|e| DomainError::io(path, e))
}

#[cfg(unix)]
pub(super) fn set_file_mode(options: &mut OpenOptions, mode: u32) {
    use std::os::unix::fs::OpenOptionsExt;
    options.mode(mode);
}

#[cfg(not(unix))]
pub(super) fn set_file_mode(_options: &mut OpenOptions, _mode: u32) {}

#[cfg(unix)]
fn set_dir_mode(builder: &mut fs::DirBuilder, mode: u32) {
    use std::os::unix::fs::DirBuilderExt;
    builder.mode(mode);
}

#[cfg(not(unix))]
fn set_dir_mode(_builder: &mut fs::DirBuilder, _mode: u32) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_exists() {
        let dir = TempDir::new().unwrap();
        assert!(exists(dir.path()));
        assert!(!exists(dir.path().join("missing")));
    }

    #[test]
    fn test_create_if_not_exists_creates_parents() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b/c");

        create_if_not_exists(&nested, 0o755).unwrap();
        assert!(is_dir(&nested).unwrap());

        // Second call is a no-op
        create_if_not_exists(&nested, 0o700).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_create_if_not_exists_leaves_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("keep");
        fs::create_dir(&target).unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o700)).unwrap();

        create_if_not_exists(&target, 0o755).unwrap();

        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o700);
    }

    #[test]
    fn test_is_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        assert!(is_dir(dir.path()).unwrap());
        assert!(!is_dir(&file).unwrap());
        assert!(is_dir(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_get_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("one")).unwrap();
        fs::create_dir(dir.path().join("two")).unwrap();
        fs::write(dir.path().join("file.txt"), "x").unwrap();

        let mut names = get_directories(dir.path()).unwrap();
        names.sort();
        assert_eq!(names, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_get_directories_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = get_directories(dir.path().join("missing"));
        assert_eq!(
            result.unwrap_err().io_kind(),
            Some(std::io::ErrorKind::NotFound)
        );
    }

    #[test]
    fn test_append_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("log.txt");

        append(&file, "first\n").unwrap();
        append(&file, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_write_template_truncates() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("service.conf");
        fs::write(&file, "old content that is longer").unwrap();

        write_template(&file, "name=${var:name}\n", &vars(&[("name", "api")])).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "name=api\n");
    }

    #[test]
    fn test_append_template() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("hosts");

        append_template(&file, "${var:ip} ${var:host}\n", &vars(&[("ip", "10.0.0.1"), ("host", "a")]))
            .unwrap();
        append_template(&file, "${var:ip} ${var:host:b}\n", &vars(&[("ip", "10.0.0.2")])).unwrap();

        assert_eq!(
            fs::read_to_string(&file).unwrap(),
            "10.0.0.1 a\n10.0.0.2 b\n"
        );
    }

    #[test]
    fn test_write_template_missing_variable_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("service.conf");
        fs::write(&file, "original").unwrap();

        let result = write_template(&file, "${var:required}", &HashMap::new());
        assert!(matches!(result, Err(DomainError::Template(_))));
        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }
}

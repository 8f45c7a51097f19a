//! Persisted instance identity
//!
//! The identity file holds a single `instanceId: <uuid>` line. It is created
//! on first use, or when its directory or the file is missing, or the file is
//! empty. A non-empty file is never rewritten.

use std::fs::{self, File};
use std::io::{self, ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use crate::error::IdentityError;

/// Default location of the identity file
pub const DEFAULT_IDENTITY_FILE: &str = "/usr/local/percona/telemetry_uuid";
/// Key of the instance id inside the identity file
pub const INSTANCE_ID_KEY: &str = "instanceId";

/// How a freshly written identity file replaces the path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Publish {
    /// Fail if another process created the file first
    NoClobber,
    /// Replace an existing (empty) file
    Replace,
}

/// Return the instance id stored at `path`, creating it if needed.
///
/// A non-empty file without an `instanceId` line yields an empty string and
/// is left untouched.
///
/// # Errors
/// Returns an error if the directory or file cannot be created or written,
/// or if the file exists but cannot be read.
#[instrument(skip(path), fields(file = %path.display()))]
pub fn get_instance_id(path: &Path) -> Result<String, IdentityError> {
    debug!("processing identity file");

    let dir = parent_dir(path);
    if let Err(e) = fs::metadata(dir)
        && e.kind() == ErrorKind::NotFound
    {
        create_dir(dir)?;
        return create_identity(path, Publish::NoClobber);
    }

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return create_identity(path, Publish::NoClobber);
        }
        Err(e) => return Err(read_error(path, e)),
    };

    let len = file.metadata().map_err(|e| read_error(path, e))?.len();
    if len == 0 {
        return create_identity(path, Publish::Replace);
    }

    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| read_error(path, e))?;

    let instance_id = parse_instance_id(&String::from_utf8_lossy(&content));
    if instance_id.is_empty() {
        error!("failed to get instance id, it is empty");
    }
    Ok(instance_id)
}

/// Value of the first `instanceId: <value>` line, trimmed
fn parse_instance_id(content: &str) -> String {
    content
        .split('\n')
        .find_map(|line| match line.split_once(':') {
            Some((key, value)) if key == INSTANCE_ID_KEY => Some(value.trim().to_string()),
            _ => None,
        })
        .unwrap_or_default()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}

fn create_dir(dir: &Path) -> Result<(), IdentityError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }

    builder.create(dir).map_err(|source| {
        error!(directory = %dir.display(), error = %source, "can't create directory");
        IdentityError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }
    })
}

/// Generate a new id and publish it at `path` in one step.
///
/// The content is written to a private temporary file next to `path` and
/// then moved into place, so readers never observe a partial file.
fn create_identity(path: &Path, publish: Publish) -> Result<String, IdentityError> {
    let instance_id = Uuid::new_v4().to_string();

    let mut builder = tempfile::Builder::new();
    builder.prefix(".instance-id");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o600));
    }

    let mut tmp = builder
        .tempfile_in(parent_dir(path))
        .map_err(|e| write_error(path, e))?;
    tmp.write_all(format!("{INSTANCE_ID_KEY}: {instance_id}").as_bytes())
        .map_err(|e| write_error(path, e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| write_error(path, e))?;

    match publish {
        Publish::Replace => {
            tmp.persist(path).map_err(|e| write_error(path, e.error))?;
        }
        Publish::NoClobber => match tmp.persist_noclobber(path) {
            Ok(_) => {}
            Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                debug!("identity file was created concurrently, reading it back");
                return get_instance_id(path);
            }
            Err(e) => return Err(write_error(path, e.error)),
        },
    }

    info!(instance_id = %instance_id, "created identity file");
    Ok(instance_id)
}

fn read_error(path: &Path, source: io::Error) -> IdentityError {
    error!(error = %source, "failed to read identity file");
    IdentityError::Read {
        path: path.to_path_buf(),
        source,
    }
}

fn write_error(path: &Path, source: io::Error) -> IdentityError {
    error!(error = %source, "failed to write identity file");
    IdentityError::Write {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use tempfile::TempDir;

    use super::*;

    fn assert_uuid_v4(id: &str) {
        let parsed = Uuid::parse_str(id).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.to_string(), id);
    }

    #[test]
    fn test_creates_missing_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("percona/nested/telemetry_uuid");

        let id = get_instance_id(&path).unwrap();

        assert_uuid_v4(&id);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("instanceId: {id}")
        );
        assert_eq!(get_instance_id(&path).unwrap(), id);
    }

    #[test]
    fn test_creates_missing_file_in_existing_directory() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("telemetry_uuid");

        let id = get_instance_id(&path).unwrap();

        assert_uuid_v4(&id);
        assert_eq!(get_instance_id(&path).unwrap(), id);
        // only the identity file is left behind
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_created_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("telemetry_uuid");
        get_instance_id(&path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn test_empty_file_is_regenerated() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("telemetry_uuid");
        fs::write(&path, "").unwrap();

        let id = get_instance_id(&path).unwrap();

        assert_uuid_v4(&id);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("instanceId: {id}")
        );
    }

    #[test]
    fn test_reads_existing_id() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("telemetry_uuid");
        fs::write(
            &path,
            "# managed by installer\ninstanceId:  1bed5f0d-cc3a-11ee-bd8a-c84bd64e0277 \r\nother: x\n",
        )
        .unwrap();

        assert_eq!(
            get_instance_id(&path).unwrap(),
            "1bed5f0d-cc3a-11ee-bd8a-c84bd64e0277"
        );
    }

    #[test]
    fn test_unrelated_content_is_left_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("telemetry_uuid");
        let content = b"hostId: abc\n instanceId: indented-key-does-not-count\n";
        fs::write(&path, content).unwrap();

        assert_eq!(get_instance_id(&path).unwrap(), "");
        assert_eq!(fs::read(&path).unwrap(), content);
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let not_a_dir = tmp.path().join("file");
        fs::write(&not_a_dir, "x").unwrap();

        let result = get_instance_id(&not_a_dir.join("telemetry_uuid"));

        assert!(matches!(result, Err(IdentityError::Read { .. })));
    }

    #[test]
    fn test_concurrent_first_use_agrees_on_one_id() {
        let tmp = TempDir::new().unwrap();
        let path = Arc::new(tmp.path().join("new/telemetry_uuid"));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let path = Arc::clone(&path);
                thread::spawn(move || get_instance_id(&path).unwrap())
            })
            .collect();
        let ids: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(ids.iter().all(|id| id == &ids[0]));
        assert_eq!(
            fs::read_to_string(path.as_ref()).unwrap(),
            format!("instanceId: {}", ids[0])
        );
    }

    #[test]
    fn test_parse_instance_id() {
        assert_eq!(parse_instance_id("instanceId: abc"), "abc");
        assert_eq!(parse_instance_id("a: b\ninstanceId:xyz\n"), "xyz");
        assert_eq!(parse_instance_id("instanceId: a:b"), "a:b");
        assert_eq!(parse_instance_id("instanceId"), "");
        assert_eq!(parse_instance_id(""), "");
    }
}

//! On-disk layout of a provisioned server.
//!
//! Every operation here is safe to repeat: directories are created only when
//! absent, files are overwritten in place.

use std::fs;
use std::path::Path;

use crate::error::{ProvisionError, Result};

pub const PLUGINS_DIR: &str = "plugins";
pub const EULA_FILE: &str = "eula.txt";
const EULA_ACCEPTED: &str = "eula=true\n";

/// Create `server_dir` and `server_dir/plugins` if absent.
pub fn ensure_server_skeleton(server_dir: &Path) -> Result<()> {
    let plugins = server_dir.join(PLUGINS_DIR);
    fs::create_dir_all(&plugins).map_err(|e| ProvisionError::io(&plugins, e))
}

/// Write the marker file accepting the upstream EULA.
pub fn write_eula_acceptance(server_dir: &Path) -> Result<()> {
    let path = server_dir.join(EULA_FILE);
    fs::write(&path, EULA_ACCEPTED).map_err(|e| ProvisionError::io(&path, e))
}

/// Write a fetched artifact, replacing whatever was there.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ProvisionError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| ProvisionError::io(path, e))
}

/// Recursively copy every file under `template_root` into `server_dir`.
///
/// Relative paths are preserved and existing files are overwritten. A
/// missing template directory is a configuration error; an empty one copies
/// nothing. Returns the number of files copied.
pub fn copy_template_tree(template_root: &Path, server_dir: &Path) -> Result<usize> {
    if !template_root.is_dir() {
        return Err(ProvisionError::Configuration(format!(
            "Template directory not found: {}",
            template_root.display()
        )));
    }
    copy_tree(template_root, server_dir)
}

fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    let mut copied = 0;
    fs::create_dir_all(dst).map_err(|e| ProvisionError::io(dst, e))?;

    for entry in fs::read_dir(src).map_err(|e| ProvisionError::io(src, e))? {
        let entry = entry.map_err(|e| ProvisionError::io(src, e))?;
        let from = entry.path();
        let to = dst.join(entry.file_name());
        let ty = entry.file_type().map_err(|e| ProvisionError::io(&from, e))?;

        if ty.is_dir() {
            copied += copy_tree(&from, &to)?;
        } else if ty.is_file() {
            fs::copy(&from, &to).map_err(|e| ProvisionError::io(&to, e))?;
            copied += 1;
        } else if ty.is_symlink() {
            return Err(ProvisionError::Configuration(format!(
                "Symlinks are not supported in templates: {}",
                from.display()
            )));
        } else {
            return Err(ProvisionError::io(
                &from,
                std::io::Error::other("Unsupported filesystem entry type"),
            ));
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create_dir_all should succeed in test temp dirs");
        }
        fs::write(path, content).expect("write should succeed in test temp dirs");
    }

    #[test]
    fn skeleton_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let server = tmp.path().join("lobby");

        ensure_server_skeleton(&server).unwrap();
        ensure_server_skeleton(&server).unwrap();

        let dirs: Vec<_> = fs::read_dir(&server)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(dirs, vec![std::ffi::OsString::from(PLUGINS_DIR)]);
        assert!(server.join(PLUGINS_DIR).is_dir());
    }

    #[test]
    fn eula_marker_is_overwritten() {
        let tmp = TempDir::new().unwrap();
        write_file(&tmp.path().join(EULA_FILE), "eula=false\n");

        write_eula_acceptance(tmp.path()).unwrap();

        let content = fs::read_to_string(tmp.path().join(EULA_FILE)).unwrap();
        assert_eq!(content, "eula=true\n");
    }

    #[test]
    fn template_copy_preserves_relative_paths() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("templates").join("base");
        write_file(&template.join("server.properties"), "motd=hi");
        write_file(&template.join("config").join("paper-global.yml"), "a: 1");
        let server = tmp.path().join("server");

        let copied = copy_template_tree(&template, &server).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(
            fs::read_to_string(server.join("server.properties")).unwrap(),
            "motd=hi"
        );
        assert_eq!(
            fs::read_to_string(server.join("config").join("paper-global.yml")).unwrap(),
            "a: 1"
        );
    }

    #[test]
    fn template_copy_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("base");
        write_file(&template.join("server.properties"), "motd=new");
        let server = tmp.path().join("server");
        write_file(&server.join("server.properties"), "motd=old");
        write_file(&server.join("keep.txt"), "untouched");

        copy_template_tree(&template, &server).unwrap();

        assert_eq!(
            fs::read_to_string(server.join("server.properties")).unwrap(),
            "motd=new"
        );
        assert_eq!(fs::read_to_string(server.join("keep.txt")).unwrap(), "untouched");
    }

    #[test]
    fn empty_template_copies_nothing() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("empty");
        fs::create_dir_all(&template).unwrap();
        let server = tmp.path().join("server");
        ensure_server_skeleton(&server).unwrap();

        assert_eq!(copy_template_tree(&template, &server).unwrap(), 0);
        assert_eq!(fs::read_dir(&server).unwrap().count(), 1);
    }

    #[test]
    fn missing_template_is_configuration_error() {
        let tmp = TempDir::new().unwrap();
        let err = copy_template_tree(&tmp.path().join("nope"), tmp.path()).unwrap_err();
        assert!(matches!(err, ProvisionError::Configuration(_)));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_in_template_is_rejected_without_recursing() {
        let tmp = TempDir::new().unwrap();
        let template = tmp.path().join("looped");
        write_file(&template.join("server.properties"), "motd=hi");
        std::os::unix::fs::symlink(".", template.join("loop")).unwrap();
        let server = tmp.path().join("server");

        let err = copy_template_tree(&template, &server).unwrap_err();

        assert!(matches!(err, ProvisionError::Configuration(_)));
        assert!(!server.join("loop").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_file_in_template_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let outside = tmp.path().join("secret.txt");
        write_file(&outside, "secret");
        let template = tmp.path().join("linked");
        fs::create_dir_all(&template).unwrap();
        std::os::unix::fs::symlink(&outside, template.join("secret.txt")).unwrap();

        let err = copy_template_tree(&template, &tmp.path().join("server")).unwrap_err();
        assert!(matches!(err, ProvisionError::Configuration(_)));
    }

    #[test]
    fn write_artifact_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plugins").join("a.jar");
        write_artifact(&path, b"jar").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"jar");
    }
}

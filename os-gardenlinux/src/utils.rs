use std::{
  fs::{self, File, OpenOptions},
  io::{BufReader, Write},
  os::unix::fs::OpenOptionsExt,
  path::{Component, Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read a YAML or JSON manifest from disk
pub fn read_manifest<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
  let path = path.as_ref();
  let file = File::open(path).with_context(|| format!("Unable to open {}", path.display()))?;
  let reader = BufReader::new(file);

  // YAML is a superset of JSON
  serde_yaml::from_reader(reader).with_context(|| format!("Unable to parse {}", path.display()))
}

/// Join an absolute node path beneath `root`, e.g. `/opt/x` under `/tmp/out` becomes `/tmp/out/opt/x`
pub fn rooted<P: AsRef<Path>>(root: &Path, path: P) -> PathBuf {
  path
    .as_ref()
    .components()
    .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
    .fold(root.to_path_buf(), |acc, c| acc.join(c))
}

/// Write a file to disk, creating parent directories and setting the file mode
pub fn write_file<P: AsRef<Path>>(contents: &[u8], path: P, mode: Option<u32>) -> Result<()> {
  let path = path.as_ref();
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }

  // The mode is only applied on creation
  if path.is_file() {
    fs::remove_file(path)?;
  }

  let mut file = OpenOptions::new()
    .write(true)
    .create(true)
    .mode(mode.unwrap_or(0o644))
    .open(path)
    .with_context(|| format!("Unable to write {}", path.display()))?;
  file.write_all(contents)?;

  Ok(())
}

#[cfg(test)]
mod tests {
  use std::os::unix::fs::PermissionsExt;

  use tempfile::tempdir;

  use super::*;
  use crate::resource::Shoot;

  #[test]
  fn it_roots_absolute_paths() {
    let root = Path::new("/tmp/out");
    assert_eq!(
      rooted(root, "/opt/gardener/bin/script.sh"),
      PathBuf::from("/tmp/out/opt/gardener/bin/script.sh")
    );
    assert_eq!(rooted(Path::new("/"), "/etc/systemd"), PathBuf::from("/etc/systemd"));
  }

  #[test]
  fn it_writes_files_with_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("opt").join("script.sh");

    write_file(b"#!/bin/bash\n", &path, Some(0o755)).unwrap();
    // Overwriting replaces the content entirely
    write_file(b"#!/bin/sh\n", &path, Some(0o755)).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "#!/bin/sh\n");
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    // umask may only clear bits
    assert_eq!(mode & 0o700, 0o700);
  }

  #[test]
  fn it_reads_manifests() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("shoot.json");
    fs::write(&path, r#"{"spec": {"provider": {"type": "aws", "workers": []}}}"#).unwrap();

    let shoot: Shoot = read_manifest(&path).unwrap();
    assert_eq!(shoot.spec.provider.type_, "aws");
  }

  #[test]
  fn it_fails_on_missing_manifests() {
    let dir = tempdir().unwrap();
    let result = read_manifest::<Shoot, _>(dir.path().join("missing.yaml"));
    assert!(result.is_err());
  }
}

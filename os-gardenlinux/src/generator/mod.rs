mod netfilter;

use std::path::{Path, PathBuf};

pub use netfilter::{
  configure_net_filter_backend, render_net_filter_backend, DEFAULT_NET_FILTER_BACKEND, NF_BACKEND_SCRIPT_PATH,
  NF_BACKEND_UNIT_NAME,
};
use rust_embed::RustEmbed;

use crate::{Error, Result};

/// Directory on the node holding scripts installed by Gardener
pub const SCRIPT_LOCATION: &str = "/opt/gardener/bin";

/// Scripts are executable by everyone, writable by root only
pub const SCRIPT_PERMISSIONS: u32 = 0o755;

/// Embeds the contents of the `templates/` directory into the binary
#[derive(RustEmbed)]
#[folder = "src/generator/templates/"]
pub struct Templates;

impl Templates {
  /// Read a template as UTF-8 text
  ///
  /// In debug builds `rust-embed` reads the file from disk on every call
  pub(crate) fn read(name: &str) -> Result<String> {
    let file = Templates::get(name).ok_or_else(|| Error::template(name, "template not found"))?;
    let text = std::str::from_utf8(file.data.as_ref()).map_err(|e| Error::template(name, e))?;

    Ok(text.to_owned())
  }
}

/// A file written to the node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct File {
  pub path: PathBuf,
  pub content: Vec<u8>,
  pub permissions: Option<u32>,
}

impl File {
  pub fn new<P: AsRef<Path>>(path: P, content: Vec<u8>, permissions: Option<u32>) -> Self {
    File {
      path: path.as_ref().to_path_buf(),
      content,
      permissions,
    }
  }
}

/// A systemd unit installed and enabled on the node
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
  pub name: String,
  pub content: Vec<u8>,
}

impl Unit {
  /// Where the unit file lives on the node
  pub fn path(&self) -> PathBuf {
    Path::new("/etc/systemd/system").join(&self.name)
  }
}

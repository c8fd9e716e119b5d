use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;

use crate::{
  decoder::SchemeDecoder,
  generator::{self, File, Unit},
  resource::OperatingSystemConfig,
  utils,
};

#[derive(Args, Debug)]
pub struct GenerateInput {
  /// Path to the OperatingSystemConfig manifest, YAML or JSON
  #[arg(long)]
  pub osc: PathBuf,

  /// Directory the node's filesystem is rooted at
  #[arg(long, default_value = "/")]
  pub output_dir: PathBuf,

  /// Print the rendered files instead of writing them
  #[arg(long)]
  pub dry_run: bool,
}

impl GenerateInput {
  pub fn generate(&self) -> Result<()> {
    let osc: OperatingSystemConfig = utils::read_manifest(&self.osc)?;
    let (file, unit) = generator::configure_net_filter_backend(&osc, &SchemeDecoder::new())?;

    match self.dry_run {
      true => {
        print_file(&file);
        print_unit(&unit);
      }
      false => {
        let file_path = utils::rooted(&self.output_dir, &file.path);
        utils::write_file(&file.content, &file_path, file.permissions)?;
        info!("Wrote {}", file_path.display());

        let unit_path = utils::rooted(&self.output_dir, unit.path());
        utils::write_file(&unit.content, &unit_path, Some(0o644))?;
        info!("Wrote {}", unit_path.display());
      }
    }

    Ok(())
  }
}

fn print_file(file: &File) {
  println!("# {}", file.path.display());
  println!("{}", String::from_utf8_lossy(&file.content));
}

fn print_unit(unit: &Unit) {
  println!("# {}", unit.path().display());
  println!("{}", String::from_utf8_lossy(&unit.content));
}

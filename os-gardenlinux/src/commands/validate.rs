use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Args;
use tracing::{error, info};

use crate::{
  admission::{ShootValidator, Validator},
  decoder::SchemeDecoder,
  resource::Shoot,
  utils, Error,
};

#[derive(Args, Debug)]
pub struct ValidateShootInput {
  /// Path to the Shoot manifest, YAML or JSON
  #[arg(long)]
  pub shoot: PathBuf,
}

impl ValidateShootInput {
  pub fn validate(&self) -> Result<()> {
    let shoot: Shoot = utils::read_manifest(&self.shoot)?;
    let validator = ShootValidator::new(SchemeDecoder::new());

    match validator.validate(&shoot, None) {
      Ok(()) => {
        info!("Validation succeeded");
        Ok(())
      }
      Err(Error::Invalid(errs)) => {
        for err in errs.iter() {
          error!("{err}");
        }
        Err(anyhow!("Validation failed with {} error(s)", errs.len()))
      }
      Err(err) => Err(err.into()),
    }
  }
}

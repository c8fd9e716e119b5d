use tracing::debug;

use crate::{
  config::OperatingSystemConfiguration,
  decoder::Decoder,
  resource::{Object, Shoot},
  validation::{validate_operating_system_configuration, ErrorList, FieldPath},
  Error, Result, OS_TYPE_GARDEN_LINUX,
};

/// Validator admits or rejects a create/update of an API object
pub trait Validator {
  fn validate(&self, new: &dyn Object, old: Option<&dyn Object>) -> Result<()>;
}

/// A decoded Garden Linux provider config and the path it was found at
#[derive(Clone, Debug, PartialEq)]
pub struct GardenLinuxOsConfig {
  pub config: OperatingSystemConfiguration,
  pub path: FieldPath,
}

/// Validates the Garden Linux provider configs of a Shoot
#[derive(Clone, Debug, Default)]
pub struct ShootValidator<D> {
  decoder: D,
}

impl<D: Decoder> ShootValidator<D> {
  pub fn new(decoder: D) -> Self {
    ShootValidator { decoder }
  }

  /// Extracts every Garden Linux provider config from the workers of the Shoot, in declaration order
  ///
  /// Workers running another image or without a provider config are skipped. A config that fails to
  /// decode aborts the extraction.
  pub fn extract_operating_system_configurations(&self, shoot: &Shoot) -> Result<Vec<GardenLinuxOsConfig>> {
    let workers = FieldPath::new("spec").child("provider").child("workers");
    let mut configs = Vec::new();

    for (index, worker) in shoot.spec.provider.workers.iter().enumerate() {
      let image = match &worker.machine.image {
        Some(image) if image.name == OS_TYPE_GARDEN_LINUX => image,
        _ => {
          debug!("Skipping worker {index} ({}): not a Garden Linux image", worker.name);
          continue;
        }
      };

      let raw = match &image.provider_config {
        Some(provider_config) => &provider_config.raw,
        None => {
          debug!("Skipping worker {index} ({}): no provider config", worker.name);
          continue;
        }
      };

      let worker_path = match worker.name.is_empty() {
        true => workers.index(index),
        false => workers.key(&worker.name),
      };
      let path = worker_path.child("machine").child("image").child("providerConfig");

      let config: OperatingSystemConfiguration = self.decoder.decode(raw).map_err(|source| Error::Decode {
        location: path.to_string(),
        source,
      })?;

      configs.push(GardenLinuxOsConfig { config, path });
    }

    Ok(configs)
  }

  fn validate_shoot(&self, shoot: &Shoot) -> Result<()> {
    let configs = self.extract_operating_system_configurations(shoot)?;
    if configs.is_empty() {
      debug!("Shoot {} has no Garden Linux provider config", shoot.metadata.name);
      return Ok(());
    }

    let mut all_errs = ErrorList::new();
    for osc in &configs {
      all_errs.extend(validate_operating_system_configuration(&osc.config, &osc.path));
    }

    all_errs.into_result()
  }
}

impl<D: Decoder> Validator for ShootValidator<D> {
  fn validate(&self, new: &dyn Object, old: Option<&dyn Object>) -> Result<()> {
    let shoot = new
      .as_any()
      .downcast_ref::<Shoot>()
      .ok_or_else(|| Error::TypeMismatch(new.kind().to_owned()))?;

    // The old Shoot is only type checked, configs are validated as a whole on every update
    if let Some(old) = old {
      if old.as_any().downcast_ref::<Shoot>().is_none() {
        return Err(Error::TypeMismatch(format!("{} for old object", old.kind())));
      }
    }

    self.validate_shoot(shoot)
  }
}

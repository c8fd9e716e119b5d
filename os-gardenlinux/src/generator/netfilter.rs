use std::path::Path;

use handlebars::Handlebars;
use serde_json::json;
use tracing::debug;

use super::{File, Templates, Unit, SCRIPT_LOCATION, SCRIPT_PERMISSIONS};
use crate::{
  config::{NetFilterBackend, OperatingSystemConfiguration},
  decoder::Decoder,
  resource::OperatingSystemConfig,
  Error, Result,
};

/// The netfilter backend to fall back to when the provider config does not name one
pub const DEFAULT_NET_FILTER_BACKEND: NetFilterBackend = NetFilterBackend::IpTables;

pub const NF_BACKEND_SCRIPT_PATH: &str = "/opt/gardener/bin/configure_netfilter_backend.sh";
pub const NF_BACKEND_UNIT_NAME: &str = "gardener-configure-nfbackend.service";

const NF_BACKEND_SCRIPT_NAME: &str = "configure_netfilter_backend.sh";
const NF_BACKEND_TEMPLATE: &str = "configure_netfilter_backend.sh.tpl";

const NF_BACKEND_UNIT_CONTENT: &str = "[Unit]
Description=Configure netfilter backend for Gardener
After=cloud-config-downloader.service
Before=gardener-restart-system.service kubelet.service

[Install]
WantedBy=multi-user.target

[Service]
Type=oneshot
ExecStart=/opt/gardener/bin/configure_netfilter_backend.sh
RemainAfterExit=true
StandardOutput=journal
";

/// Render the netfilter backend script and unit for an OperatingSystemConfig
///
/// The provider config is optional, without one the default backend is configured.
pub fn configure_net_filter_backend<D: Decoder>(osc: &OperatingSystemConfig, decoder: &D) -> Result<(File, Unit)> {
  let config: Option<OperatingSystemConfiguration> = match &osc.spec.provider_config {
    Some(provider_config) => Some(decoder.decode(&provider_config.raw).map_err(|source| Error::Decode {
      location: format!("OperatingSystemConfig {}", osc.metadata.name),
      source,
    })?),
    None => None,
  };

  render_net_filter_backend(config.as_ref())
}

/// Render the netfilter backend script and unit from an already decoded configuration
///
/// The backend is used as given; validation happens at admission time, not here.
pub fn render_net_filter_backend(config: Option<&OperatingSystemConfiguration>) -> Result<(File, Unit)> {
  let nf_backend = config
    .and_then(|c| c.net_filter_backend.as_ref())
    .filter(|backend| !backend.is_empty())
    .cloned()
    .unwrap_or(DEFAULT_NET_FILTER_BACKEND);
  debug!("Configuring netfilter backend {nf_backend}");

  let tmpl = Templates::read(NF_BACKEND_TEMPLATE)?;

  let mut handlebars = Handlebars::new();
  handlebars.set_strict_mode(true);
  handlebars.register_escape_fn(handlebars::no_escape);
  handlebars
    .register_template_string(NF_BACKEND_TEMPLATE, tmpl)
    .map_err(|e| Error::template(NF_BACKEND_TEMPLATE, e))?;

  let data = json!({ "netFilterBackend": nf_backend.as_str() });
  let script = handlebars
    .render(NF_BACKEND_TEMPLATE, &data)
    .map_err(|e| Error::template(NF_BACKEND_TEMPLATE, e))?;

  let file = File::new(
    Path::new(SCRIPT_LOCATION).join(NF_BACKEND_SCRIPT_NAME),
    script.into_bytes(),
    Some(SCRIPT_PERMISSIONS),
  );
  let unit = Unit {
    name: NF_BACKEND_UNIT_NAME.to_owned(),
    content: NF_BACKEND_UNIT_CONTENT.as_bytes().to_vec(),
  };

  Ok((file, unit))
}

use kube::Config;

use crate::prelude::*;

/// Where the configuration for reaching the cluster comes from.
pub trait ConfigSource {
	/// Discovers the configuration. Takes no parameters; everything is read
	/// from the environment the process runs in.
	fn discover(&self) -> Result<Config, AppError>;
}

/// Reads the service account token and API server address that are mounted
/// into every pod.
#[derive(Debug, Clone, Copy, Default)]
pub struct InClusterConfig;

impl ConfigSource for InClusterConfig {
	fn discover(&self) -> Result<Config, AppError> {
		Config::incluster().map_err(|err| AppError::ConfigDiscovery(err.to_string()))
	}
}

/// Discovers the config and hands it to `create_client`, which is
/// `Client::try_from` outside of tests and must then be called from within a
/// tokio runtime. A failed discovery is logged, and client construction then
/// fails with the discovery error as its cause.
#[instrument(skip_all)]
pub fn connect<C>(
	source: &impl ConfigSource,
	create_client: impl FnOnce(Config) -> Result<C, kube::Error>,
) -> Result<C, AppError> {
	let config = match source.discover() {
		Ok(config) => {
			debug!("Using cluster at {}", config.cluster_url);
			config
		}
		Err(err) => {
			error!("{}", err);
			return Err(AppError::MissingConfig(Box::new(err)));
		}
	};

	trace!("Creating client");
	create_client(config).map_err(AppError::ClientConstruction)
}

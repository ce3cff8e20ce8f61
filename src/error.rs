use thiserror::Error;

/// Everything that can go wrong while provisioning the chat server.
#[derive(Debug, Error)]
pub enum AppError {
	/// The settings could not be read from the config file or environment.
	#[error("failed to load settings: {0}")]
	Settings(#[from] config::ConfigError),
	/// The in-cluster configuration could not be discovered.
	#[error("failed to get in-cluster config: {0}")]
	ConfigDiscovery(String),
	/// There was no configuration to build a client from, because discovering
	/// it failed.
	#[error("cannot create cluster client without a config: {0}")]
	MissingConfig(#[source] Box<AppError>),
	/// The Kubernetes client could not be built from the configuration.
	#[error("failed to create cluster client: {0}")]
	ClientConstruction(#[source] kube::Error),
	/// A create call against the cluster failed.
	#[error("failed to create {kind} `{name}`: {source}")]
	Create {
		/// The kind of resource that was being created.
		kind: &'static str,
		/// The name of the resource that was being created.
		name: String,
		/// The error returned by the API server.
		#[source]
		source: kube::Error,
	},
}

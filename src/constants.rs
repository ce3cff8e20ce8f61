//! Every literal that ends up in a submitted resource lives here, grouped per
//! [`Profile`](crate::models::Profile). Nothing in this module is derived from
//! configuration.

/// The namespace every resource is created in.
pub const NAMESPACE: &str = "default";

/// The label key used to tie the pods of the workload to its service.
pub const APP_LABEL_KEY: &str = "app";

/// The number of replicas of the chat server that are run.
pub const REPLICAS: i32 = 1;

/// The port the chat server listens on inside the container.
pub const CONTAINER_PORT: i32 = 8000;

/// The name of the container port.
pub const CONTAINER_PORT_NAME: &str = "http";

/// The protocol used by all ports.
pub const PORT_PROTOCOL: &str = "TCP";

/// Environment variable holding the Slack bot token.
pub const SLACK_TOKEN_ENV: &str = "SLACK_TOKEN";
/// Environment variable holding the Slack verification token.
pub const VERIFICATION_TOKEN_ENV: &str = "VERIFICATION_TOKEN";
/// Environment variable holding the Maya server address.
pub const MAYA_SERVER_IP_ENV: &str = "MAYA_SERVER_IP";
/// Environment variable holding the Slack incoming web hook.
pub const SLACK_INCOMING_WEB_HOOK_ENV: &str = "SLACK_INCOMING_WEB_HOOK";
/// Environment variable holding the API key for the Maya server.
pub const API_KEY_ENV: &str = "API_KEY";

/// The fixed parts of the workload for a single profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadDefaults {
	/// The full image reference, including the tag.
	pub image: &'static str,
	/// The name of the only container in the pod.
	pub container_name: &'static str,
	/// The value of the [`APP_LABEL_KEY`] label on the pods.
	pub app_label: &'static str,
}

/// The fixed parts of the service exposing the workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExposureDefaults {
	/// Appended to the deployment name to get the service name.
	pub name_suffix: &'static str,
	/// The service type.
	pub service_type: &'static str,
	/// The name of the service port.
	pub port_name: &'static str,
	/// The port the service listens on.
	pub port: i32,
	/// The port opened on every node.
	pub node_port: i32,
}

/// Workload of the minimal profile, deployed without a service.
pub const MINIMAL_WORKLOAD: WorkloadDefaults = WorkloadDefaults {
	image: "mulebot/chatserver:v02",
	container_name: "chatserver",
	app_label: "chatserver",
};

/// Workload of the exposed profile, deployed along with a service.
pub const EXPOSED_WORKLOAD: WorkloadDefaults = WorkloadDefaults {
	image: "mulebot/chat-server:v03",
	container_name: "chat-server",
	app_label: "chat-server",
};

/// Service of the exposed profile.
pub const EXPOSED_SERVICE: ExposureDefaults = ExposureDefaults {
	name_suffix: "-service",
	service_type: "NodePort",
	port_name: "chatserver-port",
	port: CONTAINER_PORT,
	node_port: 30550,
};

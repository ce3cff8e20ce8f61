use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{self, ExposureDefaults, WorkloadDefaults};

/// Everything the user provides about the chat server that is deployed. All
/// fields are passed through as-is, empty strings included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSpec {
	/// The name of the deployment. The service is named after it.
	#[serde(deserialize_with = "scalar_as_string")]
	pub deployment_name: String,
	/// The Slack bot token.
	#[serde(deserialize_with = "scalar_as_string")]
	pub slack_token: String,
	/// The token Slack signs its requests with.
	#[serde(deserialize_with = "scalar_as_string")]
	pub verification_token: String,
	/// The Maya server address, including the scheme and port
	/// (e.g. `http://192.168.0.0:8000`).
	#[serde(deserialize_with = "scalar_as_string")]
	pub maya_server_ip: String,
	/// The Slack incoming web hook. Only used by [`Profile::Exposed`].
	#[serde(deserialize_with = "scalar_as_string")]
	pub slack_web_hook: String,
	/// The API key used to authenticate with the Maya server.
	#[serde(deserialize_with = "scalar_as_string")]
	pub api_key: String,
	/// The external IP of the service. Only used by [`Profile::Exposed`].
	#[serde(deserialize_with = "scalar_as_string")]
	pub external_ip: String,
}

impl DeploymentSpec {
	/// The environment variables of the chat server container for the given
	/// profile, in the order they are declared on the container.
	pub fn environment(&self, profile: Profile) -> Vec<(&'static str, &str)> {
		let mut variables = vec![
			(constants::SLACK_TOKEN_ENV, self.slack_token.as_str()),
			(
				constants::VERIFICATION_TOKEN_ENV,
				self.verification_token.as_str(),
			),
			(constants::MAYA_SERVER_IP_ENV, self.maya_server_ip.as_str()),
		];
		if profile == Profile::Exposed {
			variables.push((
				constants::SLACK_INCOMING_WEB_HOOK_ENV,
				self.slack_web_hook.as_str(),
			));
		}
		variables.push((constants::API_KEY_ENV, self.api_key.as_str()));
		variables
	}
}

/// Any scalar a config file or environment can hold, for fields that are only
/// ever passed on as strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
	String(String),
	Boolean(bool),
	Integer(i64),
	Unsigned(u64),
	Float(f64),
}

/// Reads an unquoted `api_key = 12345` the same as `api_key = "12345"`.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Scalar::deserialize(deserializer)? {
		Scalar::String(value) => value,
		Scalar::Boolean(value) => value.to_string(),
		Scalar::Integer(value) => value.to_string(),
		Scalar::Unsigned(value) => value.to_string(),
		Scalar::Float(value) => value.to_string(),
	})
}

/// The shape of what gets deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
	/// Only the deployment, running `mulebot/chatserver:v02`.
	#[default]
	Minimal,
	/// The deployment running `mulebot/chat-server:v03`, with the web hook
	/// variable, and a NodePort service in front of it.
	Exposed,
}

impl Profile {
	/// Picks the profile based on the `--expose` flag.
	pub fn from_expose(expose: bool) -> Self {
		if expose {
			Self::Exposed
		} else {
			Self::Minimal
		}
	}

	/// The fixed parts of the workload.
	pub fn workload(self) -> WorkloadDefaults {
		match self {
			Self::Minimal => constants::MINIMAL_WORKLOAD,
			Self::Exposed => constants::EXPOSED_WORKLOAD,
		}
	}

	/// The fixed parts of the service, if this profile has one.
	pub fn exposure(self) -> Option<ExposureDefaults> {
		match self {
			Self::Minimal => None,
			Self::Exposed => Some(constants::EXPOSED_SERVICE),
		}
	}
}

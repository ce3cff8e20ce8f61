use std::fmt::{Display, Formatter};

use config::{Config, ConfigError, Environment, File, Source};
use serde::{Deserialize, Serialize};

use crate::{args::AppArgs, models::DeploymentSpec};

/// The prefix of environment variables read into the settings, e.g.
/// `DEPLOYER_SLACK_TOKEN`.
const ENV_PREFIX: &str = "DEPLOYER";

/// The environment variable naming the config file. Without it no file is
/// read at all.
const CONFIG_FILE_ENV: &str = "DEPLOYER_CONFIG";

/// The settings of a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployerSettings {
	/// The environment the deployer is running in. Only changes how much is
	/// logged.
	pub environment: RunningEnvironment,
	/// What gets deployed.
	#[serde(flatten)]
	pub deployment: DeploymentSpec,
}

impl DeployerSettings {
	/// Layers, from lowest to highest precedence: empty defaults, the config
	/// file named by `DEPLOYER_CONFIG` (only if set), `DEPLOYER_*`
	/// environment variables, and the flags given on the command line.
	pub fn parse(args: &AppArgs) -> Result<Self, ConfigError> {
		Self::from_environment(
			args,
			std::env::var(CONFIG_FILE_ENV).ok(),
			Environment::with_prefix(ENV_PREFIX).prefix_separator("_"),
		)
	}

	/// Same as [`DeployerSettings::parse`], with the config file path and the
	/// environment given explicitly. A given path must exist.
	fn from_environment(
		args: &AppArgs,
		config_file: Option<String>,
		environment: Environment,
	) -> Result<Self, ConfigError> {
		Self::from_sources(
			args,
			config_file.map(|path| File::with_name(&path).required(true)),
			environment,
		)
	}

	/// Builds the settings out of already constructed sources.
	pub(crate) fn from_sources<F>(
		args: &AppArgs,
		file: Option<F>,
		environment: Environment,
	) -> Result<Self, ConfigError>
	where
		F: Source + Send + Sync + 'static,
	{
		let mut builder = Config::builder().set_default("environment", "production")?;
		if let Some(file) = file {
			builder = builder.add_source(file);
		}

		args.overrides()
			.into_iter()
			.try_fold(builder.add_source(environment), |builder, (key, value)| {
				builder.set_override(key, value)
			})?
			.build()?
			.try_deserialize()
	}
}

/// The environment the application is running in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RunningEnvironment {
	/// The application is running in development mode
	#[serde(alias = "dev")]
	Development,
	/// The application is running in production mode
	#[serde(alias = "prod")]
	Production,
}

impl Display for RunningEnvironment {
	fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			formatter,
			"{}",
			match self {
				RunningEnvironment::Development => "Development",
				RunningEnvironment::Production => "Production",
			}
		)
	}
}

#[cfg(test)]
mod tests {
	use std::{fs, path::PathBuf};

	use config::{FileFormat, FileSourceString, Map};

	use super::*;

	fn environment(vars: &[(&str, &str)]) -> Environment {
		Environment::with_prefix(ENV_PREFIX)
			.prefix_separator("_")
			.source(Some(
				vars.iter()
					.map(|(key, value)| (key.to_string(), value.to_string()))
					.collect::<Map<_, _>>(),
			))
	}

	fn file(contents: &str) -> Option<File<FileSourceString, FileFormat>> {
		Some(File::from_str(contents, FileFormat::Toml))
	}

	/// Removes the file it was created for when dropped.
	struct TempFile(PathBuf);

	impl TempFile {
		fn write(path: PathBuf, contents: &str) -> Self {
			fs::write(&path, contents).unwrap();
			Self(path)
		}
	}

	impl Drop for TempFile {
		fn drop(&mut self) {
			_ = fs::remove_file(&self.0);
		}
	}

	#[test]
	fn everything_defaults_to_empty() {
		let settings =
			DeployerSettings::from_sources(&AppArgs::default(), file(""), environment(&[]))
				.unwrap();

		assert_eq!(settings.environment, RunningEnvironment::Production);
		assert_eq!(settings.deployment, DeploymentSpec::default());
	}

	#[test]
	fn flags_override_environment_and_file() {
		let args = AppArgs {
			slack_token: Some("from-flag".to_owned()),
			..AppArgs::default()
		};
		let settings = DeployerSettings::from_sources(
			&args,
			file("slack_token = \"from-file\"\napi_key = \"file-key\"\ndeployment_name = \"chat1\""),
			environment(&[
				("DEPLOYER_SLACK_TOKEN", "from-env"),
				("DEPLOYER_API_KEY", "env-key"),
			]),
		)
		.unwrap();

		assert_eq!(settings.deployment.slack_token, "from-flag");
		assert_eq!(settings.deployment.api_key, "env-key");
		assert_eq!(settings.deployment.deployment_name, "chat1");
	}

	#[test]
	fn empty_flag_still_overrides() {
		let args = AppArgs {
			external_ip: Some(String::new()),
			..AppArgs::default()
		};
		let settings = DeployerSettings::from_sources(
			&args,
			file(""),
			environment(&[("DEPLOYER_EXTERNAL_IP", "10.0.0.1")]),
		)
		.unwrap();

		assert_eq!(settings.deployment.external_ip, "");
	}

	#[test]
	fn environment_can_be_development() {
		let settings = DeployerSettings::from_sources(
			&AppArgs::default(),
			file(""),
			environment(&[("DEPLOYER_ENVIRONMENT", "dev")]),
		)
		.unwrap();

		assert_eq!(settings.environment, RunningEnvironment::Development);
	}

	#[test]
	fn file_in_working_directory_is_not_read_unless_named() {
		let _file = TempFile::write(
			PathBuf::from("deployer.toml"),
			"slack_token = \"from-cwd-file\"",
		);

		let settings =
			DeployerSettings::from_environment(&AppArgs::default(), None, environment(&[]))
				.unwrap();

		assert_eq!(settings.deployment.slack_token, "");
	}

	#[test]
	fn named_config_file_is_read() {
		let file = TempFile::write(
			std::env::temp_dir().join(format!("deployer-{}.toml", std::process::id())),
			"slack_token = \"from-named-file\"\napi_key = 12345",
		);

		let settings = DeployerSettings::from_environment(
			&AppArgs::default(),
			Some(file.0.to_string_lossy().into_owned()),
			environment(&[]),
		)
		.unwrap();

		assert_eq!(settings.deployment.slack_token, "from-named-file");
		assert_eq!(settings.deployment.api_key, "12345");
	}

	#[test]
	fn missing_named_config_file_is_an_error() {
		let result = DeployerSettings::from_environment(
			&AppArgs::default(),
			Some("/nonexistent/deployer.toml".to_owned()),
			environment(&[]),
		);

		assert!(result.is_err());
	}
}

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::all)]

//! Provisions the chat server on the Kubernetes cluster this runs in. The
//! deployment (and, with `--expose`, a NodePort service in front of it) is
//! built from the flags passed in, created once in the `default` namespace,
//! and whatever the API server returns is printed. Nothing is retried or
//! reconciled afterwards.

use std::{io::Write, process::ExitCode};

use config::ConfigError;
use kube::{Client, Config};
use tracing::{Dispatch, Level};
use tracing_subscriber::{
	filter::LevelFilter,
	fmt::{format::FmtSpan, Layer as FmtLayer},
	layer::SubscriberExt,
	prelude::*,
};

use crate::{
	args::AppArgs,
	cluster::{ConfigSource, InClusterConfig},
	models::Profile,
	prelude::*,
	settings::{DeployerSettings, RunningEnvironment},
	submit::{ClusterApi, Resources},
};

/// A prelude that re-exports commonly used items.
pub mod prelude {
	pub use tracing::{debug, error, info, instrument, trace, warn};

	pub use crate::error::AppError;
}

/// The command line arguments.
mod args;
/// Getting a client for the cluster out of the in-cluster config.
mod cluster;
/// All the fixed values of the resources that are created.
mod constants;
/// The error type used across the crate.
mod error;
/// The deployment spec and the profiles it can be deployed with.
mod models;
/// Building the Kubernetes resources out of the deployment spec.
mod resources;
/// Layered settings: config file, environment and flags.
mod settings;
/// Creating the resources on the cluster and reporting the outcome.
mod submit;
/// Fakes of the cluster and its config shared by the tests.
#[cfg(test)]
mod test_utils;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = AppArgs::parse_normalized(std::env::args_os());
	let settings = DeployerSettings::parse(&args);
	if let Ok(settings) = &settings {
		init_tracing(settings.environment);
	}

	run(
		&args,
		settings,
		&InClusterConfig,
		Client::try_from,
		std::io::stdout(),
	)
	.await
}

/// Builds the resources out of the settings, connects to the cluster found
/// through `source` and submits them there. Results and errors go to `writer`.
///
/// Only a failure to load the settings or to get a client exits with a
/// failure. Failed creates are reported and still exit successfully.
async fn run<C: ClusterApi>(
	args: &AppArgs,
	settings: Result<DeployerSettings, ConfigError>,
	source: &impl ConfigSource,
	create_client: impl FnOnce(Config) -> Result<C, kube::Error>,
	mut writer: impl Write,
) -> ExitCode {
	let settings = match settings {
		Ok(settings) => settings,
		Err(err) => {
			print_error(&mut writer, &AppError::from(err));
			return ExitCode::FAILURE;
		}
	};
	debug!("Settings loaded. Running in {}", settings.environment);

	let profile = Profile::from_expose(args.expose);
	info!(
		"Deploying `{}` with the {:?} profile",
		settings.deployment.deployment_name, profile
	);

	let resources = Resources {
		deployment: resources::build_workload(&settings.deployment, profile),
		service: resources::build_exposure(&settings.deployment, profile),
	};

	let client = match cluster::connect(source, create_client) {
		Ok(client) => client,
		Err(err) => {
			print_error(&mut writer, &err);
			return ExitCode::FAILURE;
		}
	};

	match submit::submit(&client, &resources, &mut writer).await {
		Ok(submissions) => {
			for submission in submissions {
				debug!(
					"{} `{}` ended up {:?}",
					submission.kind, submission.name, submission.state
				);
			}
		}
		Err(err) => {
			error!("Failed to write the results: {}", err);
		}
	}

	ExitCode::SUCCESS
}

fn print_error(writer: &mut impl Write, err: &AppError) {
	if let Err(io_err) = writeln!(writer, "[Error]: {}", err) {
		error!("Failed to write the error: {}", io_err);
	}
}

/// Sets up the global subscriber. Logs go to stderr so that stdout only has
/// the created objects and errors on it.
fn init_tracing(environment: RunningEnvironment) {
	tracing::dispatcher::set_global_default(Dispatch::new(
		tracing_subscriber::registry().with(
			FmtLayer::new()
				.with_writer(std::io::stderr)
				.with_span_events(FmtSpan::NONE)
				.event_format(
					tracing_subscriber::fmt::format()
						.with_ansi(true)
						.with_file(false)
						.without_time()
						.compact(),
				)
				.with_filter(
					tracing_subscriber::filter::Targets::new()
						.with_target(env!("CARGO_CRATE_NAME"), LevelFilter::TRACE)
						.with_target("kube", LevelFilter::WARN),
				)
				.with_filter(LevelFilter::from_level(
					if environment == RunningEnvironment::Development {
						Level::TRACE
					} else {
						Level::INFO
					},
				)),
		),
	))
	.expect("Failed to set global default subscriber");
}

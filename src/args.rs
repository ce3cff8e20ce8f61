use std::ffi::OsString;

use clap::{CommandFactory, Parser};

/// Provisions the chat server on the cluster this runs in.
#[derive(Debug, Clone, Default, Parser)]
#[command(author, version, about)]
pub struct AppArgs {
	/// Deployment name
	#[arg(long = "deploy", value_name = "NAME")]
	pub deployment_name: Option<String>,
	/// Slack Token
	#[arg(long)]
	pub slack_token: Option<String>,
	/// Slack Verification Token
	#[arg(long = "verify-token")]
	pub verification_token: Option<String>,
	/// Maya server IP with port (e.g. http://192.168.0.0:8000)
	#[arg(long)]
	pub maya_server_ip: Option<String>,
	/// Slack incoming web hook. Only used with --expose
	#[arg(long)]
	pub slack_web_hook: Option<String>,
	/// API Key to authenticate with Maya Server
	#[arg(long)]
	pub api_key: Option<String>,
	/// External IP for chat server. Only used with --expose
	#[arg(long)]
	pub external_ip: Option<String>,
	/// Also create a NodePort service for the chat server
	#[arg(long)]
	pub expose: bool,
}

impl AppArgs {
	/// Parses the arguments, accepting `-flag` as well as `--flag` for every
	/// long option.
	pub fn parse_normalized<I, T>(args: I) -> Self
	where
		I: IntoIterator<Item = T>,
		T: Into<OsString>,
	{
		Self::parse_from(normalize_long_flags(args))
	}

	/// The values given on the command line, keyed the way the settings name
	/// them. Flags that weren't passed are left out.
	pub fn overrides(&self) -> Vec<(&'static str, String)> {
		[
			("deployment_name", &self.deployment_name),
			("slack_token", &self.slack_token),
			("verification_token", &self.verification_token),
			("maya_server_ip", &self.maya_server_ip),
			("slack_web_hook", &self.slack_web_hook),
			("api_key", &self.api_key),
			("external_ip", &self.external_ip),
		]
		.into_iter()
		.filter_map(|(key, value)| Some((key, value.clone()?)))
		.collect()
	}
}

/// Rewrites `-deploy=chat1` and `-deploy chat1` into `--deploy=chat1` and
/// `--deploy chat1`. Only names of known long options are rewritten, so values
/// that start with a dash are left alone.
fn normalize_long_flags<I, T>(args: I) -> Vec<OsString>
where
	I: IntoIterator<Item = T>,
	T: Into<OsString>,
{
	let command = AppArgs::command();
	let long_flags = command
		.get_arguments()
		.filter_map(|arg| arg.get_long())
		.chain(["help", "version"])
		.collect::<Vec<_>>();

	args.into_iter()
		.map(Into::into)
		.enumerate()
		.map(|(index, arg)| {
			let rewritten = arg
				.to_str()
				.filter(|_| index > 0)
				.and_then(|text| {
					let flag = text.strip_prefix('-').filter(|rest| !rest.starts_with('-'))?;
					let name = flag.split_once('=').map_or(flag, |(name, _)| name);
					long_flags.contains(&name).then(|| format!("-{}", text))
				});
			rewritten.map(OsString::from).unwrap_or(arg)
		})
		.collect()
}

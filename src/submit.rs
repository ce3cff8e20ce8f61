use std::{fmt::Debug, future::Future, io::Write};

use k8s_openapi::api::{apps::v1::Deployment as KubeDeployment, core::v1::Service};
use kube::{api::PostParams, Api, Client};
use serde::Serialize;

use crate::{constants, prelude::*};

/// The create operations used against the cluster.
pub trait ClusterApi {
	/// Creates a deployment in the given namespace, returning the object the
	/// API server stored.
	fn create_deployment(
		&self,
		namespace: &str,
		deployment: &KubeDeployment,
	) -> impl Future<Output = Result<KubeDeployment, kube::Error>>;

	/// Creates a service in the given namespace, returning the object the API
	/// server stored.
	fn create_service(
		&self,
		namespace: &str,
		service: &Service,
	) -> impl Future<Output = Result<Service, kube::Error>>;
}

impl ClusterApi for Client {
	async fn create_deployment(
		&self,
		namespace: &str,
		deployment: &KubeDeployment,
	) -> Result<KubeDeployment, kube::Error> {
		Api::<KubeDeployment>::namespaced(self.clone(), namespace)
			.create(&PostParams::default(), deployment)
			.await
	}

	async fn create_service(
		&self,
		namespace: &str,
		service: &Service,
	) -> Result<Service, kube::Error> {
		Api::<Service>::namespaced(self.clone(), namespace)
			.create(&PostParams::default(), service)
			.await
	}
}

/// The resources that are submitted, in order.
#[derive(Debug, Clone)]
pub struct Resources {
	/// The chat server deployment. Always submitted.
	pub deployment: KubeDeployment,
	/// The service in front of it, if the profile has one.
	pub service: Option<Service>,
}

/// Where a single resource is in its submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
	/// Not sent yet.
	Idle,
	/// The create call is in flight.
	Submitting,
	/// The API server created the resource.
	Done,
	/// The create call failed.
	Failed,
}

/// The outcome of submitting one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
	/// The kind of the resource, e.g. `Deployment`.
	pub kind: &'static str,
	/// The name the resource was submitted with.
	pub name: String,
	/// The last state the submission reached.
	pub state: SubmissionState,
}

impl Submission {
	fn new(kind: &'static str, name: Option<&str>) -> Self {
		Self {
			kind,
			name: name.unwrap_or_default().to_string(),
			state: SubmissionState::Idle,
		}
	}
}

/// Creates every resource in the `default` namespace, one after the other.
/// The created objects and any errors are written to `writer`. A failure
/// only affects its own resource; the next one is still submitted and nothing
/// that was already created is rolled back.
pub async fn submit(
	cluster: &impl ClusterApi,
	resources: &Resources,
	mut writer: impl Write,
) -> std::io::Result<Vec<Submission>> {
	let mut submissions = Vec::with_capacity(2);

	let mut deployment = Submission::new(
		"Deployment",
		resources.deployment.metadata.name.as_deref(),
	);
	deployment.state = SubmissionState::Submitting;
	debug!("Creating deployment `{}`", deployment.name);
	let result = cluster
		.create_deployment(constants::NAMESPACE, &resources.deployment)
		.await;
	deployment.state = report(&deployment, result, &mut writer)?;
	submissions.push(deployment);

	if let Some(service_object) = &resources.service {
		let mut service = Submission::new("Service", service_object.metadata.name.as_deref());
		service.state = SubmissionState::Submitting;
		debug!("Creating service `{}`", service.name);
		let result = cluster
			.create_service(constants::NAMESPACE, service_object)
			.await;
		service.state = report(&service, result, &mut writer)?;
		submissions.push(service);
	}

	Ok(submissions)
}

/// Writes out the result of a create call and returns the state the
/// submission ends up in.
fn report<K>(
	submission: &Submission,
	result: Result<K, kube::Error>,
	writer: &mut impl Write,
) -> std::io::Result<SubmissionState>
where
	K: Serialize + Debug,
{
	match result {
		Ok(created) => {
			info!("{} `{}` created", submission.kind, submission.name);
			let details = serde_json::to_string_pretty(&created)
				.unwrap_or_else(|_| format!("{:#?}", created));
			writeln!(writer, "{} details:\n{}", submission.kind, details)?;
			Ok(SubmissionState::Done)
		}
		Err(source) => {
			let err = AppError::Create {
				kind: submission.kind,
				name: submission.name.clone(),
				source,
			};
			warn!("{}", err);
			writeln!(writer, "[Error]: {}", err)?;
			Ok(SubmissionState::Failed)
		}
	}
}

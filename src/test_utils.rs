use std::{cell::{Cell, RefCell}, rc::Rc};

use http::Uri;
use k8s_openapi::api::{apps::v1::Deployment as KubeDeployment, core::v1::Service};
use kube::{error::ErrorResponse, Config};

use crate::{cluster::ConfigSource, error::AppError, submit::ClusterApi};

/// A cluster that records every create call and answers with the object it was
/// given, or with a conflict for the kinds set to fail. Clones share the
/// recorded calls.
#[derive(Debug, Clone, Default)]
pub struct FakeCluster {
	pub fail_deployment: bool,
	pub fail_service: bool,
	/// `(kind, namespace, name)` of every create call, in order.
	pub calls: Rc<RefCell<Vec<(&'static str, String, String)>>>,
}

pub fn conflict(name: &str) -> kube::Error {
	kube::Error::Api(ErrorResponse {
		status: "Failure".to_owned(),
		message: format!("\"{}\" already exists", name),
		reason: "AlreadyExists".to_owned(),
		code: 409,
	})
}

impl ClusterApi for FakeCluster {
	async fn create_deployment(
		&self,
		namespace: &str,
		deployment: &KubeDeployment,
	) -> Result<KubeDeployment, kube::Error> {
		let name = deployment.metadata.name.clone().unwrap_or_default();
		self.calls
			.borrow_mut()
			.push(("Deployment", namespace.to_owned(), name.clone()));
		if self.fail_deployment {
			Err(conflict(&name))
		} else {
			Ok(deployment.clone())
		}
	}

	async fn create_service(
		&self,
		namespace: &str,
		service: &Service,
	) -> Result<Service, kube::Error> {
		let name = service.metadata.name.clone().unwrap_or_default();
		self.calls
			.borrow_mut()
			.push(("Service", namespace.to_owned(), name.clone()));
		if self.fail_service {
			Err(conflict(&name))
		} else {
			Ok(service.clone())
		}
	}
}

/// Fails discovery the way running outside a pod does.
#[derive(Debug, Default)]
pub struct FailingSource {
	pub called: Cell<bool>,
}

impl ConfigSource for FailingSource {
	fn discover(&self) -> Result<Config, AppError> {
		self.called.set(true);
		Err(AppError::ConfigDiscovery(
			"KUBERNETES_SERVICE_HOST is not set".to_owned(),
		))
	}
}

/// Always discovers the same cluster.
#[derive(Debug, Default)]
pub struct StaticSource;

impl ConfigSource for StaticSource {
	fn discover(&self) -> Result<Config, AppError> {
		Ok(Config::new(Uri::from_static("https://10.96.0.1:443")))
	}
}

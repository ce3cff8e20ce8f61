use std::collections::BTreeMap;

use k8s_openapi::{
	api::{
		apps::v1::{Deployment as KubeDeployment, DeploymentSpec as KubeDeploymentSpec},
		core::v1::{
			Container,
			ContainerPort,
			EnvVar,
			PodSpec,
			PodTemplateSpec,
			Service,
			ServicePort,
			ServiceSpec,
		},
	},
	apimachinery::pkg::apis::meta::v1::LabelSelector,
};
use kube::core::ObjectMeta;

use crate::{
	constants,
	models::{DeploymentSpec, Profile},
};

/// The labels put on the pods of the workload. The service selects on exactly
/// these.
pub fn pod_labels(profile: Profile) -> BTreeMap<String, String> {
	[(
		constants::APP_LABEL_KEY.to_string(),
		profile.workload().app_label.to_string(),
	)]
	.into()
}

/// Builds the single-replica, single-container deployment running the chat
/// server.
pub fn build_workload(spec: &DeploymentSpec, profile: Profile) -> KubeDeployment {
	let workload = profile.workload();
	let labels = pod_labels(profile);

	KubeDeployment {
		metadata: ObjectMeta {
			name: Some(spec.deployment_name.clone()),
			..ObjectMeta::default()
		},
		spec: Some(KubeDeploymentSpec {
			replicas: Some(constants::REPLICAS),
			selector: LabelSelector {
				match_expressions: None,
				match_labels: Some(labels.clone()),
			},
			template: PodTemplateSpec {
				metadata: Some(ObjectMeta {
					labels: Some(labels),
					..ObjectMeta::default()
				}),
				spec: Some(PodSpec {
					containers: vec![Container {
						name: workload.container_name.to_string(),
						image: Some(workload.image.to_string()),
						ports: Some(vec![ContainerPort {
							name: Some(constants::CONTAINER_PORT_NAME.to_string()),
							protocol: Some(constants::PORT_PROTOCOL.to_string()),
							container_port: constants::CONTAINER_PORT,
							..ContainerPort::default()
						}]),
						env: Some(
							spec.environment(profile)
								.into_iter()
								.map(|(name, value)| EnvVar {
									name: name.to_string(),
									value: Some(value.to_string()),
									..EnvVar::default()
								})
								.collect(),
						),
						..Container::default()
					}],
					..PodSpec::default()
				}),
			},
			..KubeDeploymentSpec::default()
		}),
		..KubeDeployment::default()
	}
}

/// Builds the service exposing the workload on a node port. Returns `None`
/// for profiles that aren't exposed.
pub fn build_exposure(spec: &DeploymentSpec, profile: Profile) -> Option<Service> {
	let exposure = profile.exposure()?;
	let labels = pod_labels(profile);

	Some(Service {
		metadata: ObjectMeta {
			name: Some(format!("{}{}", spec.deployment_name, exposure.name_suffix)),
			labels: Some(labels.clone()),
			..ObjectMeta::default()
		},
		spec: Some(ServiceSpec {
			type_: Some(exposure.service_type.to_string()),
			ports: Some(vec![ServicePort {
				name: Some(exposure.port_name.to_string()),
				port: exposure.port,
				node_port: Some(exposure.node_port),
				protocol: Some(constants::PORT_PROTOCOL.to_string()),
				..ServicePort::default()
			}]),
			// An empty external IP is rejected by the API server
			external_ips: (!spec.external_ip.is_empty()).then(|| vec![spec.external_ip.clone()]),
			selector: Some(labels),
			..ServiceSpec::default()
		}),
		..Service::default()
	})
}

//! The custom resource kinds exposed as Terraform resources.

use crate::resource::{ManifestResource, Resource};

pub mod cert_manager;
pub mod certificate;
pub mod challenge;
pub mod che_cluster;
pub mod cluster_issuer;
pub mod service_monitor;

pub use certificate::Certificate;
pub use challenge::Challenge;
pub use che_cluster::CheCluster;
pub use cluster_issuer::ClusterIssuer;
pub use service_monitor::ServiceMonitor;

/// Every resource the provider registers, one per kind.
pub fn resources() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(ManifestResource::<Challenge>::new()),
        Box::new(ManifestResource::<Certificate>::new()),
        Box::new(ManifestResource::<ClusterIssuer>::new()),
        Box::new(ManifestResource::<ServiceMonitor>::new()),
        Box::new(ManifestResource::<CheCluster>::new()),
    ]
}

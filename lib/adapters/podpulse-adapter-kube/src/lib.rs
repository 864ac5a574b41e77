//! Cluster state adapter backed by kube-rs.

mod cluster;
pub mod mapping;

pub use cluster::KubeCluster;

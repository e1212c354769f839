//! netcensus - census of GCP networking resources
//!
//! Counts VPN tunnels, VPCs, DNS zones, Cloud Routers, VPC peerings,
//! firewalls, and private-service-access ranges across a set of projects,
//! and reports each count to the process log, Cloud Logging, and/or a Cloud
//! Storage object. A separate flow manages the `vpc_count` custom metric.

pub mod collector;
pub mod config;
pub mod gcp;
pub mod metric;
pub mod report;
pub mod resource;
pub mod sink;

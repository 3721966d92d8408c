#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter-and-aggregate pipeline for complaint records.
//!
//! [`pipeline::run`] applies the year filter, then the category filter,
//! then computes the aggregates over what is left. Everything here is a
//! pure function of its inputs: no state is kept between calls and no
//! condition is treated as an error. Degenerate inputs come back as empty
//! results plus [`complaint_dashboard_analytics_models::DashboardWarning`]s.

pub mod aggregate;
pub mod filters;
pub mod pipeline;

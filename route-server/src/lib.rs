//! Multi-modal route optimizer server.
//!
//! A web application that answers: "what is the best way to get from A to
//! B, by road, rail or air, for the trade-off between distance, time, cost
//! and emissions that I care about?"
//!
//! Road candidates come from third-party routing providers; rail and flight
//! candidates are estimated from hub catalogs. Every candidate carries the
//! same four KPIs and is ranked by a min-max normalized weighted score.

pub mod cache;
pub mod config;
pub mod domain;
pub mod geo;
pub mod hubs;
pub mod kpi;
pub mod places;
pub mod planner;
pub mod providers;
pub mod web;

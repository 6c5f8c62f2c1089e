//! Application services for projects.

mod dashboard;

pub use dashboard::{CreateProjectRequest, DashboardError, DashboardResult, ProjectDashboard};

//! Users, projects, tasks and task assignments

pub mod ports;
pub mod service;

pub use ports::{AssignmentRepository, ProjectRepository, TaskRepository, UserRepository};
pub use service::{AssignmentService, ProjectService, TaskService, UserService};

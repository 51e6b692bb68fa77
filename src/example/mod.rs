//! Demo domain driven by the CLI: a counting repository feeding a sleepy service.

pub mod hooks;
pub mod model;
pub mod repository;
pub mod service;
pub mod use_case;

pub use model::Model;
pub use repository::Repository;
pub use service::DomainService;
pub use use_case::{UseCase, fail_on_first_error};

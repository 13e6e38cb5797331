pub mod entity;
pub mod expand;
pub mod partition;
pub mod route;
pub mod vector;

pub use entity::Entities;
pub use partition::Partition;
pub use route::RouteDecision;

#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod group_service;
pub mod model;
pub mod ports;

pub use error::{GroupServiceError, StoreError};
pub use group_service::GroupService;
pub use model::SettlementOptions;
pub use ports::GroupStore;

pub mod app;
pub mod config;
pub mod error;
pub mod model;
pub mod resolver;

pub use error::PresentationError;
pub use model::{Chat, ChatRecord, Participant, UserId};
pub use resolver::{ChatPresentation, ChatPresenter, find_counterpart};

use thiserror::Error;
use tokio::task::JoinError;

use crate::channel::ChannelError;

pub type Result<T> = std::result::Result<T, DemoError>;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error("task did not run to completion: {0}")]
    Join(#[from] JoinError),

    #[error("this function returns an error")]
    Requested,

    #[error("failed to read config file: {0}")]
    ConfigRead(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

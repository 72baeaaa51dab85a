use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Bridge(#[from] bridge_traits::BridgeError),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("No books selected for syncing")]
    NoBooksSelected,

    #[error("Invalid sync status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;

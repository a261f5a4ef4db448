pub mod auth;
pub mod report;

pub use auth::{Authenticator, AUTHENTICATE_PATH};
pub use report::{Reporter, PLAYERDATA_PATH};

/// 1回の通信の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Ok,
    Failed,
}

/// Core error type for the calculator bot.
///
/// The messaging adapter maps its transport errors into this type so the
/// core flows can tell a bad-request-class failure (formatting rejected,
/// edit to identical content, malformed chat id) apart from everything else.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;

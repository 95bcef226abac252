pub type BerthResult<T> = Result<T, BerthError>;

#[derive(thiserror::Error, Debug)]
pub enum BerthError {
    #[error("invalid rect: {0}")]
    InvalidRect(String),

    #[error("invalid component: {0}")]
    InvalidComponent(String),

    #[error("reference cycle: {0}")]
    ReferenceCycle(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BerthError {
    pub fn invalid_rect(msg: impl Into<String>) -> Self {
        Self::InvalidRect(msg.into())
    }

    pub fn invalid_component(msg: impl Into<String>) -> Self {
        Self::InvalidComponent(msg.into())
    }

    pub fn reference_cycle(msg: impl Into<String>) -> Self {
        Self::ReferenceCycle(msg.into())
    }
}

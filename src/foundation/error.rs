pub type OgResult<T> = Result<T, OgError>;

/// Error taxonomy shared by every stage of card generation.
///
/// `Input` and `Render` are scoped to a single record; `Asset` is raised while loading the
/// shared background and fonts and aborts the whole run.
#[derive(thiserror::Error, Debug)]
pub enum OgError {
    #[error("input error: {0}")]
    Input(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("asset error: {0}")]
    Asset(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OgError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Wrap an `anyhow` chain as an asset error, keeping the full context in the message.
    pub fn asset_from(err: anyhow::Error) -> Self {
        Self::Asset(format!("{err:#}"))
    }
}

/// Pipeline stage a per-record failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Input,
    Layout,
    Render,
    Encode,
    Write,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stage::Input => "input",
            Stage::Layout => "layout",
            Stage::Render => "render",
            Stage::Encode => "encode",
            Stage::Write => "write",
        };
        f.write_str(s)
    }
}

/// A single record's failure, carrying the record identifier and the stage it failed in.
#[derive(thiserror::Error, Debug)]
#[error("record '{id}' failed at {stage} stage: {source}")]
pub struct RecordError {
    pub id: String,
    pub stage: Stage,
    #[source]
    pub source: OgError,
}

impl RecordError {
    pub fn new(id: impl Into<String>, stage: Stage, source: OgError) -> Self {
        Self {
            id: id.into(),
            stage,
            source,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

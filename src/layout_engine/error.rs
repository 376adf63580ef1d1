use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Event log I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Event log is empty")]
    EmptyLog,
    #[error("Could not parse line {line} of the event log: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Could not serialize event: {0}")]
    Serialize(#[from] ron::Error),
}

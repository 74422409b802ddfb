use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("Empty catalog: load movies before building an index")]
	EmptyCatalog,
	#[error("Missing column: {0}")]
	MissingColumn(String),
	#[error("CSV error: {0}")]
	Csv(String),
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl From<csv::Error> for EngineError {
	fn from(e: csv::Error) -> Self {
		EngineError::Csv(e.to_string())
	}
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Collaborator '{source_name}' unavailable: {reason}")]
    CollaboratorUnavailable { source_name: String, reason: String },

    #[error("Invalid rate {operation}.{metric}: {value}")]
    InvalidRate { operation: String, metric: String, value: f64 },

    #[error("Invalid forecast field '{field}': {value}")]
    InvalidForecast { field: String, value: f64 },

    #[error("Headcount for '{role}' overflows ({minutes} workload minutes)")]
    HeadcountOverflow { role: String, minutes: f64 },

    #[error("Employee '{id}' not found")]
    EmployeeNotFound { id: String },

    #[error("Employee '{id}' has malformed data: {reason}")]
    MalformedEmployee { id: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PlanResult<T> = Result<T, PlanError>;

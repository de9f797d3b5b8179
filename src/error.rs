use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Driver error with operation context attached.
    Database(String),
    /// Raw sqlx error that carries no extra context.
    Sqlx(sqlx::Error),
    /// The (account, group, role) triple already exists.
    UniqueViolation(String),
    /// An account or group with live membership rows was deleted.
    ForeignKeyViolation(String),
    Configuration(String),
    Internal(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Database(e) => write!(f, "Database error: {}", e),
            EngineError::Sqlx(e) => write!(f, "Database error: {}", e),
            EngineError::UniqueViolation(e) => write!(f, "Uniqueness violation: {}", e),
            EngineError::ForeignKeyViolation(e) => {
                write!(f, "Referential-integrity violation: {}", e)
            }
            EngineError::Configuration(e) => write!(f, "Configuration error: {}", e),
            EngineError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Sqlx(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        // Constraint failures are part of the public contract and must stay
        // distinguishable from transport/driver errors.
        if let sqlx::Error::Database(ref db) = err {
            match db.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return EngineError::UniqueViolation(db.message().to_string());
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return EngineError::ForeignKeyViolation(db.message().to_string());
                }
                _ => {}
            }
        }
        EngineError::Sqlx(err)
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    /// Whether the caller can recover by changing its own behavior
    /// (retry after cleanup, treat duplicate add as merge, etc.).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            EngineError::UniqueViolation(_) | EngineError::ForeignKeyViolation(_)
        )
    }
}

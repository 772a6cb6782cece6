//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use timesync_domain::TimeSyncError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TimeSyncError);

impl From<InfraError> for TimeSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TimeSyncError> for InfraError {
    fn from(value: TimeSyncError) -> Self {
        InfraError(value)
    }
}

/// Shorthand for `InfraError::from(err).into()` in `map_err` chains.
pub trait IntoDomainError {
    fn into_domain(self) -> TimeSyncError;
}

impl<E> IntoDomainError for E
where
    InfraError: From<E>,
{
    fn into_domain(self) -> TimeSyncError {
        InfraError::from(self).0
    }
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → TimeSyncError */
/* -------------------------------------------------------------------------- */

fn map_sql_error(error: SqlError) -> TimeSyncError {
    use rusqlite::ffi::ErrorCode;
    use rusqlite::Error as RE;

    match error {
        RE::SqliteFailure(err, maybe_message) => {
            let message = maybe_message.unwrap_or_default();
            match (err.code, err.extended_code) {
                (ErrorCode::DatabaseBusy, _) => TimeSyncError::Database("database is busy".into()),
                (ErrorCode::DatabaseLocked, _) => {
                    TimeSyncError::Database("database is locked".into())
                }
                // SQLITE_CONSTRAINT_UNIQUE
                (ErrorCode::ConstraintViolation, 2067) => {
                    TimeSyncError::InvalidInput(format!("unique constraint violation: {message}"))
                }
                // SQLITE_CONSTRAINT_FOREIGNKEY
                (ErrorCode::ConstraintViolation, 787) => {
                    TimeSyncError::InvalidInput("referenced record does not exist".into())
                }
                // SQLITE_CONSTRAINT_CHECK
                (ErrorCode::ConstraintViolation, 275) => {
                    TimeSyncError::InvalidInput(format!("check constraint failed: {message}"))
                }
                _ => TimeSyncError::Database(format!(
                    "sqlite failure {:?} (code {}): {}",
                    err.code, err.extended_code, message
                )),
            }
        }
        RE::QueryReturnedNoRows => TimeSyncError::NotFound("no rows returned by query".into()),
        RE::FromSqlConversionFailure(_, _, cause) => {
            TimeSyncError::Database(format!("failed to convert sqlite value: {cause}"))
        }
        RE::InvalidColumnType(_, _, ty) => {
            TimeSyncError::Database(format!("invalid column type: {ty}"))
        }
        RE::Utf8Error(_) => TimeSyncError::Database("invalid UTF-8 returned from sqlite".into()),
        RE::InvalidParameterName(parameter_name) => {
            TimeSyncError::Database(format!("invalid parameter name: {parameter_name}"))
        }
        RE::InvalidPath(path) => TimeSyncError::Database(format!(
            "invalid database path: {}",
            path.to_string_lossy()
        )),
        RE::InvalidQuery => TimeSyncError::Database("invalid SQL query".into()),
        other => TimeSyncError::Database(other.to_string()),
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(map_sql_error(value))
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → TimeSyncError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(TimeSyncError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → TimeSyncError */
/* -------------------------------------------------------------------------- */

fn map_http_error(error: HttpError) -> TimeSyncError {
    if error.is_timeout() {
        return TimeSyncError::Network("HTTP request timed out".into());
    }

    if error.is_connect() {
        return TimeSyncError::Network("HTTP connection failure".into());
    }

    if error.is_builder() {
        return TimeSyncError::Config(format!("invalid HTTP request: {error}"));
    }

    if let Some(status) = error.status() {
        let code = status.as_u16();
        let message =
            format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

        return match code {
            401 | 403 => TimeSyncError::Auth(message),
            404 => TimeSyncError::NotFound(message),
            400..=499 => TimeSyncError::InvalidInput(message),
            _ => TimeSyncError::Network(message),
        };
    }

    TimeSyncError::Network(error.to_string())
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(map_http_error(value))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        match err.into_domain() {
            TimeSyncError::Database(msg) => assert!(msg.contains("busy")),
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[test]
    fn foreign_key_violation_is_invalid_input() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 787 },
            Some("FOREIGN KEY constraint failed".into()),
        );

        assert!(matches!(err.into_domain(), TimeSyncError::InvalidInput(_)));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert!(matches!(SqlError::QueryReturnedNoRows.into_domain(), TimeSyncError::NotFound(_)));
    }

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED.as_u16()))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        match error.into_domain() {
            TimeSyncError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {other:?}"),
        }
    }
}

use std::error::Error;
use std::fmt::Display;

use tonic::{Code, Status};

use crate::operation_error::OperationError;

/// Error returned by every service endpoint.
///
/// `Validation` and `Internal` are shared across operations; everything an
/// operation can fail with on its own goes into `Operation(E)`.
#[derive(Debug)]
pub enum EndpointError<E: OperationError> {
    Validation(String),
    Internal,
    Operation(E),
}

impl<E: OperationError> EndpointError<E> {
    pub fn validation(msg: impl Into<String>) -> Self {
        EndpointError::Validation(msg.into())
    }

    pub fn internal() -> Self {
        EndpointError::Internal
    }

    pub fn operation(err: E) -> Self {
        EndpointError::Operation(err)
    }

    fn kind(&self) -> &'static str {
        match self {
            EndpointError::Validation(_) => "Validation",
            EndpointError::Internal => "Internal",
            EndpointError::Operation(_) => "Operation",
        }
    }
}

impl<E: OperationError> OperationError for EndpointError<E> {
    fn code(&self) -> Code {
        match self {
            EndpointError::Validation(_) => Code::InvalidArgument,
            EndpointError::Internal => Code::Internal,
            EndpointError::Operation(e) => e.code(),
        }
    }
}

impl<E: OperationError> Error for EndpointError<E> {}

impl<E: OperationError> Display for EndpointError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            EndpointError::Validation(msg) => msg.clone(),
            EndpointError::Internal => String::from("Internal server error."),
            EndpointError::Operation(err) => err.to_string(),
        };

        write!(f, "{}: {}", self.kind(), msg)
    }
}

impl<E: OperationError> From<EndpointError<E>> for Status {
    fn from(err: EndpointError<E>) -> Status {
        Status::new(err.code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;

    #[test]
    fn status_conversion_keeps_code_and_message() {
        let err = EndpointError::<Infallible>::validation("Title is required.");
        let status: Status = err.into();

        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "Validation: Title is required.");
    }

    #[test]
    fn internal_error_has_generic_message() {
        let err = EndpointError::<Infallible>::internal();
        assert_eq!(err.to_string(), "Internal: Internal server error.");
    }
}

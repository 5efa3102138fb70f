//! Request handlers, grouped by resource.

pub mod ai;
pub mod auth;
pub mod downloads;

use crate::error::AppError;
use clookit_core::error::CoreError;

/// Convert request-DTO validation failures into a 400 response.
pub(crate) fn validation_error(errors: validator::ValidationErrors) -> AppError {
    AppError::Core(CoreError::Validation(errors.to_string()))
}

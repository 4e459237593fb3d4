//! Conversions from external infrastructure errors into domain errors.

use image::ImageError;
use lopdf::Error as PdfError;
use recarga_domain::DashboardError;
use tokio_postgres::Error as PgError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DashboardError);

impl From<InfraError> for DashboardError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DashboardError> for InfraError {
    fn from(value: DashboardError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDashboardError {
    fn into_dashboard(self) -> DashboardError;
}

/* -------------------------------------------------------------------------- */
/* tokio_postgres::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for PgError {
    fn into_dashboard(self) -> DashboardError {
        if let Some(db) = self.as_db_error() {
            return DashboardError::DataSource(format!(
                "postgres error {}: {}",
                db.code().code(),
                db.message()
            ));
        }
        if self.is_closed() {
            return DashboardError::DataSource("postgres connection closed".into());
        }
        DashboardError::DataSource(format!("postgres failure: {self}"))
    }
}

impl From<PgError> for InfraError {
    fn from(value: PgError) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* native_tls::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for native_tls::Error {
    fn into_dashboard(self) -> DashboardError {
        DashboardError::Configuration(format!("TLS connector could not be built: {self}"))
    }
}

impl From<native_tls::Error> for InfraError {
    fn from(value: native_tls::Error) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* lopdf::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for PdfError {
    fn into_dashboard(self) -> DashboardError {
        DashboardError::Export(format!("pdf serialization failed: {self}"))
    }
}

impl From<PdfError> for InfraError {
    fn from(value: PdfError) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* image::ImageError → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for ImageError {
    fn into_dashboard(self) -> DashboardError {
        match self {
            ImageError::Limits(limit) => {
                DashboardError::Render(format!("chart exceeds image limits: {limit}"))
            }
            ImageError::Parameter(param) => {
                DashboardError::Render(format!("invalid chart image parameter: {param}"))
            }
            other => DashboardError::Render(other.to_string()),
        }
    }
}

impl From<ImageError> for InfraError {
    fn from(value: ImageError) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → DashboardError */
/* -------------------------------------------------------------------------- */

impl IntoDashboardError for std::io::Error {
    fn into_dashboard(self) -> DashboardError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => DashboardError::Export(format!("path not found: {self}")),
            ErrorKind::PermissionDenied => {
                DashboardError::Export(format!("permission denied: {self}"))
            }
            _ => DashboardError::Export(format!("I/O failure: {self}")),
        }
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_dashboard())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

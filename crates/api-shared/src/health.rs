use crate::dto::HealthRes;

/// Health check shared by the REST server and the CLI
///
/// Reports liveness only; it does not probe the database or the storage root.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "DocVault is alive".into(),
        }
    }
}

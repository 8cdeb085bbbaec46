use crate::delivery::DeliveryConfig;

/// Read-only for the lifetime of the server.
pub struct AppState {
    pub config: DeliveryConfig,
}

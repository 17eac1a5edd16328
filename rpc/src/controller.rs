//! Service lifecycle control.

use chia_tools_types::ServiceName;

use crate::RpcError;

/// Query, stop and start chia services.
///
/// Implemented by [`DaemonClient`](crate::DaemonClient) over the admin
/// channel, and by a recording fake for tests. When nothing is listening,
/// implementations fail with [`RpcError::ConnectionRefused`].
#[allow(async_fn_in_trait)]
pub trait ServiceController {
    async fn is_running(&self, service: ServiceName) -> Result<bool, RpcError>;

    /// Stop `service`. A response of `success: false` is an error.
    async fn stop_service(&self, service: ServiceName) -> Result<(), RpcError>;

    /// Start `service`. A response of `success: false` is an error.
    async fn start_service(&self, service: ServiceName) -> Result<(), RpcError>;
}

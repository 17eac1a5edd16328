//! Nullable daemon: service control without a daemon.

use std::cell::Cell;

use chia_tools_rpc::{RpcError, ServiceController};
use chia_tools_types::ServiceName;

use crate::Journal;

/// How a nullable call responds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Ok,
    /// Nothing listening.
    Refused,
    /// The daemon answered `success: false` (or the transport failed) with
    /// this reason.
    Fail(String),
}

impl Response {
    fn into_result(self, command: &str) -> Result<(), RpcError> {
        match self {
            Response::Ok => Ok(()),
            Response::Refused => Err(RpcError::ConnectionRefused("null daemon".into())),
            Response::Fail(reason) => Err(RpcError::Unsuccessful {
                command: command.to_string(),
                reason,
            }),
        }
    }
}

/// A daemon that records service calls and tracks whether the full node is
/// running.
pub struct NullServiceController {
    running: Cell<bool>,
    query: Response,
    stop: Response,
    start: Response,
    journal: Journal,
}

impl NullServiceController {
    fn with_state(running: bool, query: Response) -> Self {
        Self {
            running: Cell::new(running),
            query,
            stop: Response::Ok,
            start: Response::Ok,
            journal: Journal::new(),
        }
    }

    /// Daemon up, full node running.
    pub fn running() -> Self {
        Self::with_state(true, Response::Ok)
    }

    /// Daemon up, full node stopped.
    pub fn stopped() -> Self {
        Self::with_state(false, Response::Ok)
    }

    /// Daemon not listening: every call is refused.
    pub fn refusing() -> Self {
        let mut controller = Self::with_state(false, Response::Refused);
        controller.stop = Response::Refused;
        controller.start = Response::Refused;
        controller
    }

    pub fn failing_query(mut self, reason: &str) -> Self {
        self.query = Response::Fail(reason.to_string());
        self
    }

    pub fn failing_stop(mut self, reason: &str) -> Self {
        self.stop = Response::Fail(reason.to_string());
        self
    }

    pub fn failing_start(mut self, reason: &str) -> Self {
        self.start = Response::Fail(reason.to_string());
        self
    }

    /// Record into a shared journal.
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = journal;
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    pub fn is_full_node_running(&self) -> bool {
        self.running.get()
    }
}

impl ServiceController for NullServiceController {
    async fn is_running(&self, service: ServiceName) -> Result<bool, RpcError> {
        self.journal.record(format!("is_running {service}"));
        self.query.clone().into_result("is_running")?;
        Ok(service == ServiceName::FullNode && self.running.get())
    }

    async fn stop_service(&self, service: ServiceName) -> Result<(), RpcError> {
        self.journal.record(format!("stop_service {service}"));
        self.stop.clone().into_result("stop_service")?;
        if service == ServiceName::FullNode {
            self.running.set(false);
        }
        Ok(())
    }

    async fn start_service(&self, service: ServiceName) -> Result<(), RpcError> {
        self.journal.record(format!("start_service {service}"));
        self.start.clone().into_result("start_service")?;
        if service == ServiceName::FullNode {
            self.running.set(true);
        }
        Ok(())
    }
}

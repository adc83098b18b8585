//! gRPC listener exposing the forwarder.
//!
//! # Responsibilities
//! - Translate wire messages into forwarding calls and back
//! - Map forwarding errors onto gRPC statuses
//! - Register server reflection next to `pb.Workers`
//! - Serve until the shutdown signal, then finish in-flight calls

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{Request, Response, Status};

use crate::forward::{ForwardError, ForwardRequest, ForwardResponse, Forwarder};
use crate::rpc::proto::workers_server::{Workers, WorkersServer};
use crate::rpc::proto::{Header, FILE_DESCRIPTOR_SET};
use crate::rpc::{WorkerRequest, WorkerResponse};

/// Why the gRPC listener stopped.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("failed to build reflection service: {0}")]
    Reflection(#[from] tonic_reflection::server::Error),

    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),
}

impl From<WorkerRequest> for ForwardRequest {
    fn from(message: WorkerRequest) -> Self {
        Self {
            method: message.method,
            url: message.url,
            headers: message.headers,
            body: message.body,
        }
    }
}

impl From<ForwardResponse> for WorkerResponse {
    fn from(response: ForwardResponse) -> Self {
        Self {
            ok: response.ok,
            url: response.url,
            status: i32::from(response.status),
            status_text: response.status_text,
            body: response.body,
            headers: response
                .headers
                .into_iter()
                .map(|(name, value)| (name, Header { value }))
                .collect(),
        }
    }
}

impl From<ForwardError> for Status {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::UnsupportedMethod(_)
            | ForwardError::InvalidUrl { .. }
            | ForwardError::InvalidHeader(_) => Status::invalid_argument(err.to_string()),
            ForwardError::OriginUnreachable(_) => Status::unavailable(err.to_string()),
        }
    }
}

/// `pb.Workers` implementation backed by a [`Forwarder`].
#[derive(Debug, Clone)]
pub struct WorkerService {
    forwarder: Arc<Forwarder>,
}

impl WorkerService {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self { forwarder }
    }
}

#[tonic::async_trait]
impl Workers for WorkerService {
    async fn do_request(
        &self,
        request: Request<WorkerRequest>,
    ) -> Result<Response<WorkerResponse>, Status> {
        let response = self.forwarder.forward(request.into_inner().into()).await?;
        Ok(Response::new(response.into()))
    }
}

/// The gRPC listener.
pub struct RpcServer {
    service: WorkerService,
}

impl RpcServer {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self {
            service: WorkerService::new(forwarder),
        }
    }

    /// Serve on `listener` until `shutdown` fires, then stop accepting and
    /// wait for in-flight calls.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), RpcError> {
        let reflection = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
            .build_v1()?;

        match listener.local_addr() {
            Ok(addr) => tracing::info!(address = %addr, "gRPC server starting"),
            Err(e) => tracing::warn!(error = %e, "gRPC server starting on unknown address"),
        }

        tonic::transport::Server::builder()
            .add_service(WorkersServer::new(self.service))
            .add_service(reflection)
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                let _ = shutdown.recv().await;
                tracing::info!("Closing down gRPC server");
            })
            .await?;

        tracing::info!("gRPC server stopped");
        Ok(())
    }
}

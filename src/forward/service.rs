//! The forwarding operation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::admission::Admission;
use crate::forward::error::ForwardError;
use crate::forward::types::{collect_headers, is_ok, status_text, ForwardRequest, ForwardResponse, Method};
use crate::http::client::OriginClient;
use crate::observability::metrics;

/// Performs HTTP operations on behalf of RPC callers.
///
/// Stateless across calls apart from the shared admission limiter and the
/// client's connection pool.
#[derive(Debug)]
pub struct Forwarder {
    client: OriginClient,
    admission: Arc<dyn Admission>,
    user_agent: HeaderValue,
}

impl Forwarder {
    pub fn new(client: OriginClient, admission: Arc<dyn Admission>, user_agent: HeaderValue) -> Self {
        Self {
            client,
            admission,
            user_agent,
        }
    }

    /// Execute `request` against its origin and translate the answer.
    ///
    /// Validation happens before admission, so a rejected request neither
    /// consumes a slot nor touches the network.
    pub async fn forward(&self, request: ForwardRequest) -> Result<ForwardResponse, ForwardError> {
        let call_id = Uuid::new_v4();
        let span = tracing::info_span!("forward", %call_id, method = %request.method);
        self.forward_inner(request).instrument(span).await
    }

    async fn forward_inner(&self, request: ForwardRequest) -> Result<ForwardResponse, ForwardError> {
        let method: Method = request.method.parse()?;
        let url = Url::parse(&request.url).map_err(|source| ForwardError::InvalidUrl {
            url: request.url.clone(),
            source,
        })?;
        let headers = self.outbound_headers(&request.headers)?;

        let mut builder = self.client.request(method.into(), url.clone()).headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        self.admission.acquire().await;

        let start = Instant::now();
        let result = execute(builder, &url).await;
        let elapsed = start.elapsed();

        match result {
            Ok(response) => {
                tracing::info!(
                    url = %response.url,
                    status = response.status,
                    elapsed = ?elapsed,
                    "{} successful",
                    method
                );
                metrics::record_forward(method.as_str(), "ok", elapsed);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Fetch error");
                metrics::record_forward(method.as_str(), err.kind(), elapsed);
                Err(err)
            }
        }
    }

    /// Caller headers plus the default User-Agent when none (or an empty
    /// one) was supplied.
    fn outbound_headers(
        &self,
        supplied: &HashMap<String, String>,
    ) -> Result<HeaderMap, ForwardError> {
        let mut headers = HeaderMap::with_capacity(supplied.len() + 1);
        for (name, value) in supplied {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ForwardError::InvalidHeader(name.clone()))?;
            let header_value =
                HeaderValue::from_str(value).map_err(|_| ForwardError::InvalidHeader(name.clone()))?;
            headers.insert(header_name, header_value);
        }

        let has_user_agent = headers
            .get(USER_AGENT)
            .is_some_and(|value| !value.as_bytes().is_empty());
        if !has_user_agent {
            headers.insert(USER_AGENT, self.user_agent.clone());
        }
        Ok(headers)
    }
}

/// Send the request. The reply reports `requested`, not wherever redirects
/// ended up.
async fn execute(
    builder: reqwest::RequestBuilder,
    requested: &Url,
) -> Result<ForwardResponse, ForwardError> {
    let response = builder.send().await.map_err(ForwardError::OriginUnreachable)?;

    let status = response.status();
    let url = requested.to_string();
    let headers = collect_headers(response.headers());
    let body = response.bytes().await.map_err(ForwardError::OriginUnreachable)?;

    Ok(ForwardResponse {
        ok: is_ok(status.as_u16()),
        url,
        status: status.as_u16(),
        status_text: status_text(status),
        body: String::from_utf8_lossy(&body).into_owned(),
        headers,
    })
}

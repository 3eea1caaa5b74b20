use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Request, Response};
use reqwest_middleware::ClientWithMiddleware;

use crate::http::Error;

/// Sends a fully built request and returns the response, whatever its status.
///
/// Status interpretation belongs to the caller. Wrap [`HttpTransport`] or
/// install `reqwest-middleware` middleware to add retries or timeouts.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn execute(&self, request: Request) -> Result<Response, Error>;
}

#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: ClientWithMiddleware,
}

impl HttpTransport {
    pub fn new(http: ClientWithMiddleware) -> Self {
        Self { http }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(reqwest_middleware::ClientBuilder::new(reqwest::Client::default()).build())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> Result<Response, Error> {
        Ok(self.http.execute(request).await?)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use reqwest::header::HeaderMap;
    use reqwest::{Method, StatusCode};

    use super::*;

    /// A request as the transport saw it.
    #[derive(Clone, Debug)]
    pub(crate) struct Recorded {
        pub(crate) method: Method,
        pub(crate) url: String,
        pub(crate) headers: HeaderMap,
        pub(crate) body: Vec<u8>,
    }

    impl Recorded {
        pub(crate) fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }
    }

    /// Replays canned responses in order and records every request.
    #[derive(Clone, Debug, Default)]
    pub(crate) struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<(u16, Option<String>, Vec<(String, String)>)>>>,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
            self.respond_with_headers(status, body, &[])
        }

        pub(crate) fn respond_with_headers(&self, status: u16, body: &str, headers: &[(&str, &str)]) -> &Self {
            let headers = headers.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
            self.responses
                .lock()
                .unwrap()
                .push_back((status, Some(body.to_string()), headers));
            self
        }

        /// A response whose body fails while it is read.
        pub(crate) fn respond_with_broken_body(&self, status: u16) -> &Self {
            self.responses.lock().unwrap().push_back((status, None, vec![]));
            self
        }

        pub(crate) fn requests(&self) -> Vec<Recorded> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn execute(&self, request: Request) -> Result<Response, Error> {
            let body = request
                .body()
                .and_then(|b| b.as_bytes())
                .map(|b| b.to_vec())
                .unwrap_or_default();
            self.requests.lock().unwrap().push(Recorded {
                method: request.method().clone(),
                url: request.url().to_string(),
                headers: request.headers().clone(),
                body,
            });
            let (status, body, headers) = self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted response left");
            let mut builder = http::Response::builder().status(StatusCode::from_u16(status).unwrap());
            for (k, v) in headers {
                builder = builder.header(k, v);
            }
            let body = match body {
                Some(body) => reqwest::Body::from(body),
                None => reqwest::Body::wrap_stream(futures_util::stream::once(async {
                    Err::<bytes::Bytes, _>(std::io::Error::from(std::io::ErrorKind::ConnectionReset))
                })),
            };
            Ok(Response::from(builder.body(body).unwrap()))
        }
    }
}

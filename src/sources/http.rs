use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::session::SessionContext;
use crate::sources::{FetchError, ItemSource};

/// Fetches a JSON array with a single GET, authenticated with the session's
/// bearer token.
pub struct HttpItemSource<T> {
    client: reqwest::Client,
    url: String,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpItemSource<T> {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            _item: PhantomData,
        })
    }
}

#[async_trait]
impl<T> ItemSource<T> for HttpItemSource<T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, ctx: &SessionContext) -> Result<Vec<T>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&ctx.token)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use actix_web::dev::ServerHandle;
    use actix_web::http::header;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::json;

    use super::*;
    use crate::domain::post::Post;

    async fn posts(req: HttpRequest) -> HttpResponse {
        let authorized = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            == Some("Bearer token-1");
        if !authorized {
            return HttpResponse::Unauthorized().finish();
        }
        HttpResponse::Ok().json(json!([
            { "id": 1, "userId": 7, "title": "first", "body": "a" },
            { "id": 2, "userId": 7, "title": "second", "body": "b" }
        ]))
    }

    fn start_server() -> (SocketAddr, ServerHandle) {
        let server = HttpServer::new(|| {
            App::new()
                .route("/posts", web::get().to(posts))
                .route(
                    "/unavailable",
                    web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
                )
                .route(
                    "/garbage",
                    web::get().to(|| async { HttpResponse::Ok().body("not json") }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind test server");
        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        (addr, handle)
    }

    fn source(addr: SocketAddr, path: &str) -> HttpItemSource<Post> {
        HttpItemSource::new(format!("http://{addr}{path}"), Duration::from_secs(5))
            .expect("client")
    }

    fn ctx(token: &str) -> SessionContext {
        SessionContext::new(token, "ann@example.com")
    }

    #[actix_web::test]
    async fn fetches_with_bearer_token() {
        let (addr, handle) = start_server();

        let posts = source(addr, "/posts").fetch(&ctx("token-1")).await;
        let unauthorized = source(addr, "/posts").fetch(&ctx("other")).await;
        handle.stop(true).await;

        let posts = posts.expect("posts");
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].title, "second");
        assert_eq!(posts[1].user_id, 7);
        assert_eq!(unauthorized.unwrap_err(), FetchError::Status(401));
    }

    #[actix_web::test]
    async fn non_success_status_is_status_error() {
        let (addr, handle) = start_server();
        let result = source(addr, "/unavailable").fetch(&ctx("token-1")).await;
        handle.stop(true).await;

        let err = result.unwrap_err();
        assert_eq!(err, FetchError::Status(503));
        assert_eq!(err.to_string(), "HTTP error! Status: 503");
    }

    #[actix_web::test]
    async fn invalid_body_is_decode_error() {
        let (addr, handle) = start_server();
        let result = source(addr, "/garbage").fetch(&ctx("token-1")).await;
        handle.stop(true).await;

        assert!(matches!(result, Err(FetchError::Decode(_))));
    }

    #[actix_web::test]
    async fn unreachable_host_is_transport_error() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("free port");

        let result = source(addr, "/posts").fetch(&ctx("token-1")).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }
}

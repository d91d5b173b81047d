use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use http::{StatusCode, request::Parts};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use slys_dispatch::Application;
use slys_http::Request;
use slys_http::params::parse_form;
use slys_views::Rendered;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

/// Error type of the server entry points.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP/1 server running every request through an [`Application`].
///
/// Request cycles are synchronous, so each one runs on the blocking pool.
pub struct HttpServer {
	app: Arc<Application>,
}

impl HttpServer {
	/// Create a new server for the given application
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use slys_conf::Settings;
	/// use slys_dispatch::ApplicationBuilder;
	/// use slys_server::HttpServer;
	///
	/// let app = ApplicationBuilder::new(Settings::default()).build().unwrap();
	/// let server = HttpServer::new(Arc::new(app));
	/// ```
	pub fn new(app: Arc<Application>) -> Self {
		Self { app }
	}

	/// Bind `addr` and serve until an accept error occurs.
	pub async fn listen(self, addr: SocketAddr) -> Result<(), BoxError> {
		let listener = TcpListener::bind(addr).await?;
		self.serve_listener(listener).await
	}

	/// Serve connections from an already bound listener.
	pub async fn serve_listener(self, listener: TcpListener) -> Result<(), BoxError> {
		tracing::info!(addr = %listener.local_addr()?, "server listening");

		loop {
			let (stream, remote_addr) = listener.accept().await?;
			let app = self.app.clone();

			tokio::task::spawn(async move {
				if let Err(e) = Self::handle_connection(stream, app).await {
					tracing::warn!(remote = %remote_addr, error = %e, "error handling connection");
				}
			});
		}
	}

	/// Handle a single TCP connection by processing HTTP requests
	pub async fn handle_connection(stream: TcpStream, app: Arc<Application>) -> Result<(), BoxError> {
		let io = TokioIo::new(stream);
		http1::Builder::new()
			.serve_connection(io, RequestService { app })
			.await?;

		Ok(())
	}
}

/// Service implementation for hyper
struct RequestService {
	app: Arc<Application>,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = BoxError;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let app = self.app.clone();

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body = body.collect().await?.to_bytes();
			let request = build_request(&parts, &body);

			let response = match tokio::task::spawn_blocking(move || app.run(request)).await {
				Ok(result) => respond(result),
				Err(e) => {
					tracing::error!(error = %e, "request cycle aborted");
					internal_error()
				}
			};

			Ok(response)
		})
	}
}

/// Build a routed [`Request`] from HTTP request parts and the collected body.
///
/// Form fields are read from URL-encoded bodies only and win over query
/// parameters of the same name.
pub fn build_request(parts: &Parts, body: &[u8]) -> Request {
	let target = parts
		.uri
		.path_and_query()
		.map(|path_and_query| path_and_query.as_str())
		.unwrap_or("/");

	let form = if is_form(&parts.headers) {
		parse_form(body)
	} else {
		Vec::new()
	};

	let xml_http_request = parts
		.headers
		.get("x-requested-with")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.eq_ignore_ascii_case("XMLHttpRequest"));

	Request::route(target, parts.method.clone(), form).with_xml_http_request(xml_http_request)
}

fn is_form(headers: &HeaderMap) -> bool {
	headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
		.is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

/// Turn the outcome of a request cycle into a response.
pub fn respond(result: slys_core::Result<Rendered>) -> hyper::Response<Full<Bytes>> {
	match result {
		Ok(rendered) => {
			let content_type = rendered.content_type();
			response(StatusCode::OK, content_type, rendered.into_body())
		}
		Err(e) => {
			tracing::error!(error = %e, "request cycle failed");
			internal_error()
		}
	}
}

fn internal_error() -> hyper::Response<Full<Bytes>> {
	response(
		StatusCode::INTERNAL_SERVER_ERROR,
		"text/plain; charset=utf-8",
		"Internal Server Error".to_string(),
	)
}

fn response(status: StatusCode, content_type: &'static str, body: String) -> hyper::Response<Full<Bytes>> {
	let mut response = hyper::Response::new(Full::new(Bytes::from(body)));
	*response.status_mut() = status;
	response
		.headers_mut()
		.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
	response
}

/// Serve `app` on the address from its `server.bind` setting.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use slys_conf::Settings;
/// use slys_dispatch::ApplicationBuilder;
///
/// # async fn example() -> Result<(), slys_server::BoxError> {
/// let app = ApplicationBuilder::new(Settings::default()).build()?;
/// slys_server::serve(Arc::new(app)).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(app: Arc<Application>) -> Result<(), BoxError> {
	let addr: SocketAddr = app.settings().server.bind.parse()?;
	HttpServer::new(app).listen(addr).await
}

use axum::http::HeaderValue;
use axum::{extract::Request, middleware::Next, response::Response};
use catalog_core::constants::TRANSACTION_ID_HEADER;
use catalog_core::TraceId;

/// Trace id middleware
///
/// Reads the `transaction-id` header, keeping it when it is a valid UUID and
/// generating a new one otherwise. The id is stored as a [`TraceId`] request
/// extension and echoed back in the response header.
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(TRANSACTION_ID_HEADER)
        .and_then(|h| h.to_str().ok());
    let trace_id = TraceId::from_header(header);

    request.extensions_mut().insert(trace_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(trace_id.as_str()) {
        response
            .headers_mut()
            .insert(TRANSACTION_ID_HEADER, header_value);
    }

    response
}

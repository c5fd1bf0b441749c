//! Browser `fetch` transport via `gloo-net`.

use gloo_net::http::{Method, RequestBuilder};
use js_sys::{Array, Uint8Array};
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use super::{HttpBody, HttpMethod, HttpRequest, HttpTransport, RawResponse, TransportError};

/// Production transport backed by the browser fetch API.
#[derive(Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }
}

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Build a browser FormData out of the multipart parts.
fn form_data(parts: &[super::MultipartPart]) -> Result<FormData, TransportError> {
    let form = FormData::new().map_err(|e| TransportError::new(format!("{e:?}")))?;
    for part in parts {
        let bytes = Uint8Array::from(part.data.as_slice());
        let sequence = Array::of1(&bytes);
        let options = BlobPropertyBag::new();
        options.set_type(&part.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &options)
            .map_err(|e| TransportError::new(format!("{e:?}")))?;
        form.append_with_blob_and_filename(&part.name, &blob, &part.file_name)
            .map_err(|e| TransportError::new(format!("{e:?}")))?;
    }
    Ok(form)
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<RawResponse, TransportError> {
        let mut builder = RequestBuilder::new(&req.url).method(method_of(req.method));
        for (key, value) in &req.headers {
            builder = builder.header(key, value);
        }

        let request = match &req.body {
            HttpBody::Empty => builder
                .build()
                .map_err(|e| TransportError::new(e.to_string()))?,
            HttpBody::Json(value) => builder
                .body(value.to_string())
                .map_err(|e| TransportError::new(e.to_string()))?,
            HttpBody::Multipart(parts) => {
                let form = form_data(parts)?;
                builder
                    .body(JsValue::from(form))
                    .map_err(|e| TransportError::new(e.to_string()))?
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(RawResponse { status, body })
    }
}

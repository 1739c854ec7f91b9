//! Browser Plumbing
//!
//! `fetch`-backed transport and localStorage-backed session for the shared
//! gateway.

use async_trait::async_trait;
use gloo_net::http::{Method as FetchMethod, RequestBuilder};
use std::sync::Arc;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use narrativeiq::api::{
    ApiGateway, FilePart, HttpRequest, HttpResponse, Method, RequestBody, Transport,
    DEFAULT_API_BASE,
};
use narrativeiq::auth::AuthSession;
use narrativeiq::error::{ClientError, ClientResult};
use narrativeiq::session::{SessionStore, TOKEN_KEY};

/// localStorage key overriding the build-time API base
const API_URL_KEY: &str = "niq_api_url";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// API base URL: localStorage override, then `NARRATIVEIQ_API_URL` at build
/// time, then the default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|s| s.get_item(API_URL_KEY).ok().flatten())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| {
            option_env!("NARRATIVEIQ_API_URL")
                .unwrap_or(DEFAULT_API_BASE)
                .to_string()
        });
    url.trim_end_matches('/').to_string()
}

/// Token kept in localStorage under [`TOKEN_KEY`]
#[derive(Debug, Default)]
pub struct LocalStorageSession;

impl SessionStore for LocalStorageSession {
    fn get(&self) -> Option<String> {
        local_storage()?.get_item(TOKEN_KEY).ok()?
    }

    fn set(&self, token: Option<&str>) {
        let Some(storage) = local_storage() else {
            return;
        };
        let result = match token {
            Some(token) => storage.set_item(TOKEN_KEY, token),
            None => storage.remove_item(TOKEN_KEY),
        };
        if let Err(e) = result {
            web_sys::console::warn_1(&format!("Failed to persist session: {:?}", e).into());
        }
    }
}

/// Transport over the browser's `fetch`
#[derive(Debug, Default)]
pub struct FetchTransport;

fn js_error(e: JsValue) -> ClientError {
    ClientError::Transport(format!("{:?}", e))
}

fn blob(bytes: &[u8], mime: Option<&str>) -> Result<Blob, JsValue> {
    let options = BlobPropertyBag::new();
    if let Some(mime) = mime {
        options.set_type(mime);
    }
    let array = js_sys::Uint8Array::from(bytes);
    Blob::new_with_u8_array_sequence_and_options(&js_sys::Array::of1(&array), &options)
}

fn form_data(file: &FilePart) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    let blob = blob(&file.bytes, file.content_type.as_deref())?;
    form.append_with_blob_and_filename("file", &blob, &file.filename)?;
    Ok(form)
}

#[async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        let method = match request.method {
            Method::Get => FetchMethod::GET,
            Method::Post => FetchMethod::POST,
            Method::Put => FetchMethod::PUT,
        };

        let mut builder = RequestBuilder::new(&request.url).method(method);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let built = match request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.body(value.to_string()),
            RequestBody::Multipart(file) => {
                let form = form_data(&file).map_err(js_error)?;
                builder.body(form)
            }
        }
        .map_err(|e| ClientError::Transport(e.to_string()))?;

        let response = built
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

/// Auth session wired to the browser transport and storage
pub fn build_session() -> Arc<AuthSession> {
    let gateway = ApiGateway::new(
        get_api_base(),
        Arc::new(FetchTransport),
        Arc::new(LocalStorageSession),
    );
    Arc::new(AuthSession::new(gateway))
}

/// Read a picked file into a multipart part
pub async fn read_file(file: web_sys::File) -> ClientResult<FilePart> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(js_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mut part = FilePart::new(file.name(), bytes);
    let mime = file.type_();
    if !mime.is_empty() {
        part = part.content_type(mime);
    }
    Ok(part)
}

/// Offer bytes to the user as a file download
pub fn download(bytes: &[u8], filename: &str, mime: &str) {
    use wasm_bindgen::JsCast;

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let Ok(blob) = blob(bytes, Some(mime)) else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };

    if let Ok(a) = document.create_element("a") {
        let _ = a.set_attribute("href", &url);
        let _ = a.set_attribute("download", filename);
        if let Some(el) = a.dyn_ref::<web_sys::HtmlElement>() {
            el.click();
        }
    }
    let _ = web_sys::Url::revoke_object_url(&url);
}

/// Object URL for displaying image bytes; caller revokes it
pub fn image_url(bytes: &[u8]) -> Option<String> {
    let blob = blob(bytes, Some("image/png")).ok()?;
    web_sys::Url::create_object_url_with_blob(&blob).ok()
}

//! Loopback redirect listener for the OAuth consent flow.
//!
//! A one-shot axum server on `127.0.0.1:{ephemeral}` receives Google's
//! redirect, hands the query parameters back to the waiting login and shuts
//! itself down. Only a request carrying the expected `state` ends the wait.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use mindspace_types::error::AuthError;

use super::types::CallbackParams;

const SUCCESS_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>MindSpace</title>
<style>
  body { font-family: system-ui, sans-serif; display: flex; justify-content: center;
    align-items: center; min-height: 100vh; margin: 0; background: #d1e5e4; }
  .card { text-align: center; padding: 3rem; border-radius: 16px; background: #fff; }
  h1 { color: #9333ea; }
</style></head>
<body><div class="card">
  <h1>Signed in</h1>
  <p>You can close this tab and return to MindSpace.</p>
</div></body></html>"#;

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>MindSpace</title>
<style>
  body { font-family: system-ui, sans-serif; display: flex; justify-content: center;
    align-items: center; min-height: 100vh; margin: 0; background: #d1e5e4; }
  .card { text-align: center; padding: 3rem; border-radius: 16px; background: #fff; }
  h1 { color: #ef4444; }
</style></head>
<body><div class="card">
  <h1>Login failed</h1>
  <p>Please return to MindSpace and try again.</p>
</div></body></html>"#;

#[derive(Clone)]
struct CallbackState {
    slot: Arc<Mutex<Option<oneshot::Sender<CallbackParams>>>>,
    expected_state: Arc<str>,
}

/// Serve the redirect URI on `listener` until the callback for
/// `expected_state` arrives.
///
/// Requests carrying neither `code` nor `error` (favicon fetches, prefetches)
/// and requests with any other `state` are answered with 400 and do not end
/// the wait.
pub async fn wait_for_callback(
    listener: TcpListener,
    expected_state: &str,
) -> Result<CallbackParams, AuthError> {
    let (tx, rx) = oneshot::channel();
    let state = CallbackState {
        slot: Arc::new(Mutex::new(Some(tx))),
        expected_state: Arc::from(expected_state),
    };

    let app = Router::new()
        .route("/", get(handle_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
        if let Err(e) = result {
            tracing::warn!(error = %e, "OAuth callback listener failed");
        }
    });

    let params = rx
        .await
        .map_err(|_| AuthError::Provider("callback listener stopped before redirect".to_string()))?;
    let _ = shutdown_tx.send(());
    Ok(params)
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if params.code.is_none() && params.error.is_none() {
        return (StatusCode::BAD_REQUEST, "missing authorization code").into_response();
    }
    if params.state.as_deref() != Some(&*state.expected_state) {
        tracing::warn!("Ignoring OAuth callback with unexpected state");
        return (StatusCode::BAD_REQUEST, Html(ERROR_HTML)).into_response();
    }

    let page = if params.error.is_some() { ERROR_HTML } else { SUCCESS_HTML };
    let sender = state.slot.lock().unwrap_or_else(|e| e.into_inner()).take();
    match sender {
        Some(tx) => {
            let _ = tx.send(params);
            Html(page).into_response()
        }
        None => (StatusCode::GONE, "login already completed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn bind() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    #[tokio::test]
    async fn test_receives_code_and_state() {
        let (listener, url) = bind().await;
        let waiter = tokio::spawn(async move { wait_for_callback(listener, "xyz").await });

        let resp = reqwest::get(format!("{url}/?code=4%2F0Ab&state=xyz")).await.unwrap();
        assert!(resp.status().is_success());

        let params = waiter.await.unwrap().unwrap();
        assert_eq!(params.code.as_deref(), Some("4/0Ab"));
        assert_eq!(params.state.as_deref(), Some("xyz"));
        assert!(params.error.is_none());
    }

    #[tokio::test]
    async fn test_request_without_code_keeps_waiting() {
        let (listener, url) = bind().await;
        let waiter = tokio::spawn(async move { wait_for_callback(listener, "s1").await });

        let prefetch = reqwest::get(format!("{url}/")).await.unwrap();
        assert_eq!(prefetch.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(!waiter.is_finished());

        reqwest::get(format!("{url}/?error=access_denied&state=s1")).await.unwrap();
        let params = waiter.await.unwrap().unwrap();
        assert_eq!(params.error.as_deref(), Some("access_denied"));
    }

    #[tokio::test]
    async fn test_stray_state_is_rejected_and_real_redirect_still_lands() {
        let (listener, url) = bind().await;
        let waiter = tokio::spawn(async move { wait_for_callback(listener, "expected").await });

        let stray = reqwest::get(format!("{url}/?code=x&state=stray")).await.unwrap();
        assert_eq!(stray.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(stray.text().await.unwrap().contains("Login failed"));

        let missing = reqwest::get(format!("{url}/?code=x")).await.unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(!waiter.is_finished());

        let real = reqwest::get(format!("{url}/?code=real&state=expected")).await.unwrap();
        assert!(real.status().is_success());

        let params = waiter.await.unwrap().unwrap();
        assert_eq!(params.code.as_deref(), Some("real"));
    }
}

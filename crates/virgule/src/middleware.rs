// File: src/middleware.rs
// Purpose: Built-in middleware: request IDs and panic recovery

use std::sync::Arc;

use futures::FutureExt;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{handler, middleware_fn, Handler, Middleware};

/// Attaches a v4 request id to the response as `x-request-id` and stores it
/// in the context under `request_id`.
pub fn request_id() -> Middleware {
    middleware_fn(|next: Handler| {
        handler(move |ctx: Arc<Context>| {
            let next = next.clone();
            async move {
                let id = uuid::Uuid::new_v4().to_string();
                ctx.set("request_id", id.as_str());
                ctx.set_header("x-request-id", &id);
                next(ctx).await
            }
        })
    })
}

/// Catches panics from inner stages and converts them into a generic
/// internal error, keeping the worker alive.
pub fn recover() -> Middleware {
    middleware_fn(|next: Handler| {
        handler(move |ctx: Arc<Context>| {
            let next = next.clone();
            async move {
                let path = ctx.path().to_string();
                match std::panic::AssertUnwindSafe(next(ctx)).catch_unwind().await {
                    Ok(result) => result,
                    Err(panic) => {
                        let message = panic_message(&panic);
                        tracing::error!(path = %path, panic = %message, "handler panicked");
                        Err(Error::Internal(anyhow::anyhow!(
                            "handler panicked: {message}"
                        )))
                    }
                }
            }
        })
    })
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::compose;
    use axum::http::StatusCode;
    use bytes::Bytes;

    fn test_context() -> Arc<Context> {
        let request = axum::http::Request::builder()
            .uri("/boom")
            .body(axum::body::Body::empty())
            .unwrap();
        let (parts, _) = request.into_parts();
        Arc::new(Context::from_parts(&parts, Bytes::new()))
    }

    #[tokio::test]
    async fn test_recover_turns_panic_into_internal_error() {
        let panicking = handler(|_ctx: Arc<Context>| async move {
            panic!("boom");
            #[allow(unreachable_code)]
            Ok(())
        });

        let composed = compose(&[recover()], &[], panicking);
        let result = composed(test_context()).await;
        assert!(matches!(result, Err(Error::Internal(_))));
    }

    #[tokio::test]
    async fn test_request_id_sets_header_and_store() {
        let terminal = handler(|ctx: Arc<Context>| async move {
            ctx.text(StatusCode::OK, "ok")
        });

        let composed = compose(&[request_id()], &[], terminal);
        let ctx = test_context();
        composed(ctx.clone()).await.unwrap();

        let id = ctx.get_string("request_id");
        assert!(!id.is_empty());

        let recorder = ctx.take_recorder();
        assert_eq!(
            recorder.headers().get("x-request-id").unwrap().to_str().unwrap(),
            id
        );
    }
}

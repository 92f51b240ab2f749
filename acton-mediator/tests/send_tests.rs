/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::sync::Arc;

use acton_mediator::prelude::*;
use anyhow::Ok;

use crate::setup::*;

mod setup;

fn ping_handler(trace: &Trace) -> impl Fn(Context, Arc<Ping>) -> futures::future::Ready<anyhow::Result<Pong>> {
    let trace = trace.clone();
    move |_ctx, _ping| {
        trace.record("handler");
        futures::future::ready(Ok(Pong("pong".to_string())))
    }
}

#[tokio::test]
async fn test_handler_response_is_returned_without_behaviours() -> anyhow::Result<()> {
    initialize_tracing();
    let trace = Trace::new();
    let mut mediator = Mediator::new();
    mediator.register_handler(ping_handler(&trace));

    let pong: Pong = mediator.send(&Context::new(), Ping).await?;

    assert_eq!(pong, Pong("pong".to_string()));
    assert_eq!(trace.entries(), vec!["handler"]);
    Ok(())
}

#[tokio::test]
async fn test_handler_receives_the_request_and_context() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator.register_handler(|ctx: Context, echo: Arc<Echo>| async move {
        let suffix = ctx.value::<&'static str>().copied().unwrap_or_default();
        Ok(format!("{}{}", echo.0, suffix))
    });

    let ctx = Context::new().with_value("!");
    let reply: String = mediator.send(&ctx, Echo("hello".to_string())).await?;

    assert_eq!(reply, "hello!");
    Ok(())
}

#[tokio::test]
async fn test_second_registration_replaces_the_first() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator
        .register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(Pong("first".to_string())) })
        .register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(Pong("second".to_string())) });

    let pong: Pong = mediator.send(&Context::new(), Ping).await?;

    assert_eq!(pong.0, "second");
    assert_eq!(mediator.handler_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_replacement_may_change_the_response_type() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator
        .register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(Pong("pong".to_string())) })
        .register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(7_u32) });

    let answer: u32 = mediator.send(&Context::new(), Ping).await?;
    assert_eq!(answer, 7);

    let error = mediator.send::<Pong, _>(&Context::new(), Ping).await.unwrap_err();
    assert!(error
        .downcast_ref::<MediatorError>()
        .is_some_and(MediatorError::is_response_type_mismatch));
    Ok(())
}

#[tokio::test]
async fn test_missing_handler_fails_without_running_anything() -> anyhow::Result<()> {
    initialize_tracing();
    let trace = Trace::new();
    let mut mediator = Mediator::new();
    mediator.register_handler(ping_handler(&trace));
    let behaviour_trace = trace.clone();
    mediator.register_behaviour::<dyn Message, _, _>(move |_ctx, _request, next| {
        behaviour_trace.record("behaviour");
        next.run()
    });

    let error = mediator
        .send::<Pong, _>(&Context::new(), Unhandled)
        .await
        .unwrap_err();

    match error.downcast_ref::<MediatorError>() {
        Some(MediatorError::HandlerNotFound { request_type }) => {
            assert!(request_type.ends_with("Unhandled"));
        }
        other => panic!("expected HandlerNotFound, got {other:?}"),
    }
    assert!(trace.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_wrong_response_type_is_rejected_before_anything_runs() -> anyhow::Result<()> {
    initialize_tracing();
    let trace = Trace::new();
    let mut mediator = Mediator::new();
    mediator.register_handler(ping_handler(&trace));
    let behaviour_trace = trace.clone();
    mediator.register_behaviour::<dyn Message, _, _>(move |_ctx, _request, next| {
        behaviour_trace.record("behaviour");
        next.run()
    });

    let error = mediator
        .send::<String, _>(&Context::new(), Ping)
        .await
        .unwrap_err();

    match error.downcast_ref::<MediatorError>() {
        Some(MediatorError::ResponseTypeMismatch {
            request_type,
            expected,
            registered,
        }) => {
            assert!(request_type.ends_with("Ping"));
            assert!(expected.ends_with("String"));
            assert!(registered.ends_with("Pong"));
        }
        other => panic!("expected ResponseTypeMismatch, got {other:?}"),
    }
    assert!(trace.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_handler_error_is_returned_unchanged() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator.register_handler(|_ctx, transfer: Arc<TransferFunds>| async move {
        if transfer.amount > 100 {
            return Err(InsufficientFunds {
                needed: transfer.amount - 100,
            }
            .into());
        }
        Ok(TransferReceipt {
            amount: transfer.amount,
        })
    });

    let request = TransferFunds {
        actor: "alice".to_string(),
        amount: 150,
    };
    let error = mediator
        .send::<TransferReceipt, _>(&Context::new(), request)
        .await
        .unwrap_err();

    assert_eq!(
        error.downcast_ref::<InsufficientFunds>(),
        Some(&InsufficientFunds { needed: 50 })
    );
    assert!(error.downcast_ref::<MediatorError>().is_none());
    Ok(())
}

#[tokio::test]
async fn test_same_request_twice_gives_identical_responses() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator.register_handler(|_ctx, echo: Arc<Echo>| async move { Ok(echo.0.to_uppercase()) });

    let ctx = Context::new();
    let first: String = mediator.send(&ctx, Echo("again".to_string())).await?;
    let second: String = mediator.send(&ctx, Echo("again".to_string())).await?;

    assert_eq!(first, "AGAIN");
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_send_arc_dispatches_a_shared_request() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator.register_handler(|_ctx, echo: Arc<Echo>| async move { Ok(echo.0.len()) });

    let request = Arc::new(Echo("shared".to_string()));
    let length: usize = mediator.send_arc(&Context::new(), Arc::clone(&request)).await?;

    assert_eq!(length, 6);
    assert_eq!(request.0, "shared");
    Ok(())
}

#[tokio::test]
async fn test_registry_introspection() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    assert!(!mediator.has_handler::<Ping>());
    assert_eq!(mediator.handler_count(), 0);

    mediator
        .register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(Pong::default()) })
        .register_handler(|_ctx, _echo: Arc<Echo>| async { Ok(String::new()) })
        .register_behaviour::<dyn Message, _, _>(|_ctx, _request, next| next.run());

    assert!(mediator.has_handler::<Ping>());
    assert!(!mediator.has_handler::<Unhandled>());
    assert_eq!(mediator.handler_count(), 2);
    assert_eq!(mediator.behaviour_count(), 1);
    Ok(())
}

/// A response type with no `Default` implementation.
#[derive(Debug, PartialEq, Eq)]
struct Quote(u64);

#[tokio::test]
async fn test_response_without_default_is_dispatched_as_an_option() -> anyhow::Result<()> {
    initialize_tracing();
    let mut mediator = Mediator::new();
    mediator.register_handler(|_ctx, _ping: Arc<Ping>| async { Ok(Some(Quote(12))) });

    let quote: Option<Quote> = mediator.send(&Context::new(), Ping).await?;
    assert_eq!(quote, Some(Quote(12)));

    mediator.register_behaviour::<Ping, _, _>(|_ctx, _ping, _next| Reply::ready_empty());
    let quote: Option<Quote> = mediator.send(&Context::new(), Ping).await?;
    assert_eq!(quote, None);
    Ok(())
}

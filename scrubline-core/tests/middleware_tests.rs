// scrubline-core/tests/middleware_tests.rs
use anyhow::{anyhow, Result};
use serde_json::json;

use scrubline_core::{
    Event, HandlerResponse, Logger, MemorySink, Middleware, Next, Pipeline, RequestContext,
    RequestLogging, StaticCorrelationId,
};

fn header_correlation_id(event: &Event) -> Option<String> {
    event["headers"]["x-correlation-id"].as_str().map(str::to_string)
}

#[test_log::test]
fn test_request_logging_tags_and_logs_outcome() -> Result<()> {
    let sink = MemorySink::new();
    let mut logger = Logger::with_sink(sink.clone());
    logger.set_level("debug");
    logger.set_tag("orders");
    logger.scrubber_mut().set_keys_with_defaults(&["token"]);

    let pipeline = Pipeline::new(|_: &Event, ctx: &mut RequestContext<MemorySink>| {
        ctx.logger.info(json!({"step": "handler", "token": "t0k3n"}));
        Ok(HandlerResponse::new(201).with_body("created"))
    })
    .with(RequestLogging::new(header_correlation_id));

    let event = json!({"headers": {"x-correlation-id": "abc-123"}, "body": {"password": "p"}});
    let response = pipeline.run(&event, &logger)?;
    assert_eq!(response.status_code, 201);

    let records = sink.records();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record["tag"], json!({"key": "orders", "correlationId": "abc-123"}));
    }
    assert_eq!(records[0]["level"], "debug");
    assert_eq!(records[0]["msg"]["event"]["body"]["password"], "********");
    assert_eq!(records[1]["msg"], json!({"step": "handler", "token": "********"}));
    assert_eq!(records[2]["msg"], json!({"statusCode": 201}));

    // The shared logger never sees the per-request tag.
    assert_eq!(logger.tag(), Some(&json!({"key": "orders"})));
    Ok(())
}

#[test]
fn test_requests_do_not_leak_correlation_ids() -> Result<()> {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(sink.clone());
    let pipeline = Pipeline::new(|_: &Event, _: &mut RequestContext<MemorySink>| {
        Ok(HandlerResponse::new(200))
    })
    .with(RequestLogging::new(header_correlation_id));

    pipeline.run(&json!({"headers": {"x-correlation-id": "first"}}), &logger)?;
    pipeline.run(&json!({"headers": {}}), &logger)?;

    let records = sink.records();
    assert_eq!(records[0]["tag"]["correlationId"], "first");
    assert!(records[1].get("tag").is_none());
    Ok(())
}

#[test]
fn test_handler_error_is_logged_and_returned() {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(sink.clone());
    let pipeline = Pipeline::new(|_: &Event, _: &mut RequestContext<MemorySink>| {
        Err(anyhow!("downstream unavailable"))
    })
    .with(RequestLogging::new(StaticCorrelationId("cid".into())).with_tag_key("requestId"));

    let err = pipeline.run(&json!({}), &logger).unwrap_err();
    assert_eq!(err.to_string(), "downstream unavailable");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "error");
    assert_eq!(records[0]["tag"], json!({"requestId": "cid"}));
    assert_eq!(records[0]["msg"]["message"], "downstream unavailable");
}

struct ShortCircuit;

impl Middleware<MemorySink> for ShortCircuit {
    fn handle(
        &self,
        event: &Event,
        ctx: &mut RequestContext<MemorySink>,
        next: Next<'_, MemorySink>,
    ) -> Result<HandlerResponse> {
        if event.get("unauthorized").is_some() {
            ctx.logger.warn("rejected");
            return Ok(HandlerResponse::new(401));
        }
        next.run(event, ctx)
    }
}

#[test]
fn test_middleware_can_short_circuit() -> Result<()> {
    let sink = MemorySink::new();
    let logger = Logger::with_sink(sink.clone());
    let pipeline = Pipeline::new(|_: &Event, _: &mut RequestContext<MemorySink>| {
        Ok(HandlerResponse::new(200))
    })
    .with(RequestLogging::new(StaticCorrelationId("c".into())))
    .with(ShortCircuit);

    let response = pipeline.run(&json!({"unauthorized": true}), &logger)?;
    assert_eq!(response.status_code, 401);
    let records = sink.records();
    assert_eq!(records[0]["msg"], json!({"message": "rejected"}));
    assert_eq!(records[1]["msg"], json!({"statusCode": 401}));
    Ok(())
}

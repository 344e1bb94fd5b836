// scrubline-core/tests/logger_tests.rs
use serde_json::{json, Value as JsonValue};

use scrubline_core::{Channel, Level, LogMessage, Logger, MemorySink, Value, UNSERIALIZABLE_MESSAGE};

fn memory_logger() -> (Logger<MemorySink>, MemorySink) {
    let sink = MemorySink::new();
    (Logger::with_sink(sink.clone()), sink)
}

#[test_log::test]
fn test_info_is_not_emitted_at_warn_level() {
    let (mut logger, sink) = memory_logger();
    logger.set_level("warn");
    logger.info("x");
    logger.debug("y");
    assert!(sink.is_empty());

    logger.warn("z");
    logger.error("w");
    let levels: Vec<JsonValue> = sink.records().iter().map(|r| r["level"].clone()).collect();
    assert_eq!(levels, vec![json!("warn"), json!("error")]);
}

#[test_log::test]
fn test_unknown_level_silences_everything() {
    let (mut logger, sink) = memory_logger();
    logger.set_level("off");
    for level in Level::ALL {
        logger.log(level, "anything");
    }
    assert!(sink.is_empty());
    assert!(!logger.is_enabled("error"));
}

#[test]
fn test_level_names_are_case_sensitive() {
    let (mut logger, sink) = memory_logger();
    logger.set_level("INFO");
    logger.error("x");
    assert!(sink.is_empty());
}

#[test]
fn test_plain_message_is_wrapped() {
    let (logger, sink) = memory_logger();
    logger.info("hello");
    assert_eq!(sink.lines()[0].1, r#"{"level":"info","msg":{"message":"hello"}}"#);
}

#[test]
fn test_scalars_and_arrays_are_wrapped_unscrubbed() {
    let (logger, sink) = memory_logger();
    logger.info(42i64);
    logger.info(json!([{"password": "x"}]));
    let records = sink.records();
    assert_eq!(records[0]["msg"], json!({"message": 42}));
    assert_eq!(records[1]["msg"], json!({"message": [{"password": "x"}]}));
}

#[test]
fn test_object_message_is_scrubbed() {
    let (logger, sink) = memory_logger();
    logger.info(json!({"password": "p", "user": "u"}));
    assert_eq!(
        sink.lines()[0].1,
        r#"{"level":"info","msg":{"password":"********","user":"u"}}"#
    );
}

#[test]
fn test_toggling_scrubbing() {
    let (mut logger, sink) = memory_logger();
    logger.set_scrubbing(false);
    logger.info(json!({"password": "p"}));
    logger.set_scrubbing(true);
    logger.info(json!({"password": "p"}));

    let records = sink.records();
    assert_eq!(records[0]["msg"], json!({"password": "p"}));
    assert_eq!(records[1]["msg"], json!({"password": "********"}));
}

#[test]
fn test_string_tag_is_sticky() {
    let (mut logger, sink) = memory_logger();
    logger.set_tag("T");
    logger.info("a");
    logger.warn("b");
    for record in sink.records() {
        assert_eq!(record["tag"], json!({"key": "T"}));
    }
    assert_eq!(
        sink.lines()[0].1,
        r#"{"level":"info","tag":{"key":"T"},"msg":{"message":"a"}}"#
    );
}

#[test]
fn test_add_tag_merges_shallowly() {
    let (mut logger, sink) = memory_logger();
    logger.set_tag(json!({"a": 1, "b": {"x": 1}}));
    logger.add_tag(json!({"b": {"y": 2}, "c": 3}));
    logger.info("m");
    assert_eq!(sink.records()[0]["tag"], json!({"a": 1, "b": {"y": 2}, "c": 3}));
}

#[test]
fn test_add_tag_on_string_tag() {
    let (mut logger, _) = memory_logger();
    logger.set_tag("T");
    logger.add_tag(json!({"correlationId": "c-1"}));
    assert_eq!(logger.tag(), Some(&json!({"key": "T", "correlationId": "c-1"})));
}

#[test]
fn test_error_message_shape() {
    let (logger, sink) = memory_logger();
    logger.error(LogMessage::error("boom", "stack trace here"));
    assert_eq!(
        sink.records()[0]["msg"],
        json!({"message": "boom", "stack": "stack trace here"})
    );
}

#[test]
fn test_anyhow_error_is_rendered_as_error() {
    let (logger, sink) = memory_logger();
    logger.error(anyhow::anyhow!("disk full").context("saving order"));
    let record = &sink.records()[0];
    assert_eq!(record["msg"]["message"], "saving order");
    assert!(record["msg"]["stack"].as_str().unwrap().contains("disk full"));
}

#[test]
fn test_channels_follow_levels() {
    let (mut logger, sink) = memory_logger();
    logger.set_level("debug");
    logger.debug("d");
    logger.info("i");
    logger.warn("w");
    logger.error("e");
    let channels: Vec<Channel> = sink.lines().into_iter().map(|(c, _)| c).collect();
    assert_eq!(
        channels,
        vec![Channel::Log, Channel::Info, Channel::Warn, Channel::Error]
    );
}

#[test_log::test]
fn test_cyclic_message_is_safe_when_scrubbed() {
    let (logger, sink) = memory_logger();
    let obj = Value::new_object();
    obj.insert("name", "n").unwrap();
    obj.insert("me", obj.clone()).unwrap();
    logger.info(&obj);
    assert_eq!(sink.records()[0]["msg"], json!({"name": "n", "me": "********"}));
}

#[test_log::test]
fn test_cyclic_message_without_scrubbing_falls_back() {
    let (mut logger, sink) = memory_logger();
    logger.set_scrubbing(false);
    logger.set_tag("T");
    let obj = Value::new_object();
    obj.insert("me", obj.clone()).unwrap();
    logger.warn(&obj);

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "warn");
    assert_eq!(records[0]["tag"], json!({"key": "T"}));
    assert_eq!(records[0]["msg"]["message"], UNSERIALIZABLE_MESSAGE);
}

#[test]
fn test_request_handles_do_not_share_tags() {
    let (mut base, sink) = memory_logger();
    base.set_tag("service");

    let mut first = base.for_request();
    let second = base.for_request();
    first.add_tag(json!({"correlationId": "one"}));

    second.info("from second");
    first.info("from first");
    base.info("from base");

    let records = sink.records();
    assert_eq!(records[0]["tag"], json!({"key": "service"}));
    assert_eq!(records[1]["tag"], json!({"key": "service", "correlationId": "one"}));
    assert_eq!(records[2]["tag"], json!({"key": "service"}));
}

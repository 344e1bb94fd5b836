// scrubline-core/src/middleware.rs
//! Handler middleware composition.
//!
//! A [`Pipeline`] is an ordered list of [`Middleware`] around one terminal
//! handler. Each middleware receives the event, the per-request context and a
//! [`Next`] to call the rest of the chain, and may inspect or amend the
//! response on the way out. The first middleware added is the outermost.
//!
//! Every run starts from [`Logger::for_request`], so tags added while serving
//! one request stay with that request.
//!
//! The header-level helpers that usually sit in such a chain (CORS, correlation
//! id extraction, identity propagation) are not part of this crate; they plug
//! in as `Middleware` implementations or as a [`CorrelationIdSource`].

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::logger::{LogSink, Logger};

/// The inbound event as delivered by the platform.
pub type Event = JsonValue;

/// The terminal handler of a pipeline.
pub type Handler<S> = dyn Fn(&Event, &mut RequestContext<S>) -> Result<HandlerResponse>;

/// An HTTP-style response in the shape serverless gateways expect.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl HandlerResponse {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// State carried through one run of a pipeline.
#[derive(Debug)]
pub struct RequestContext<S: LogSink> {
    /// This request's logger handle.
    pub logger: Logger<S>,
    pub correlation_id: Option<String>,
}

/// One step of a pipeline.
pub trait Middleware<S: LogSink> {
    fn handle(
        &self,
        event: &Event,
        ctx: &mut RequestContext<S>,
        next: Next<'_, S>,
    ) -> Result<HandlerResponse>;
}

/// The remainder of a pipeline, handed to each middleware.
pub struct Next<'a, S: LogSink> {
    middleware: &'a [Box<dyn Middleware<S>>],
    handler: &'a Handler<S>,
}

impl<S: LogSink> Next<'_, S> {
    /// Runs the remaining middleware and then the handler.
    pub fn run(self, event: &Event, ctx: &mut RequestContext<S>) -> Result<HandlerResponse> {
        match self.middleware.split_first() {
            Some((first, rest)) => first.handle(
                event,
                ctx,
                Next {
                    middleware: rest,
                    handler: self.handler,
                },
            ),
            None => (self.handler)(event, ctx),
        }
    }
}

/// Ordered middleware around a terminal handler.
pub struct Pipeline<S: LogSink + Clone + 'static> {
    middleware: Vec<Box<dyn Middleware<S>>>,
    handler: Box<Handler<S>>,
}

impl<S: LogSink + Clone + 'static> Pipeline<S> {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Event, &mut RequestContext<S>) -> Result<HandlerResponse> + 'static,
    {
        Self {
            middleware: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Appends a middleware inside the ones already added.
    pub fn with(mut self, middleware: impl Middleware<S> + 'static) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }

    /// Serves one event with a fresh request handle of `logger`.
    pub fn run(&self, event: &Event, logger: &Logger<S>) -> Result<HandlerResponse> {
        let mut ctx = RequestContext {
            logger: logger.for_request(),
            correlation_id: None,
        };
        Next {
            middleware: &self.middleware,
            handler: self.handler.as_ref(),
        }
        .run(event, &mut ctx)
    }
}

/// Supplies the correlation id for an event.
pub trait CorrelationIdSource {
    fn correlation_id(&self, event: &Event) -> Option<String>;
}

impl<F> CorrelationIdSource for F
where
    F: Fn(&Event) -> Option<String>,
{
    fn correlation_id(&self, event: &Event) -> Option<String> {
        self(event)
    }
}

/// Uses the same id for every event.
#[derive(Debug, Clone)]
pub struct StaticCorrelationId(pub String);

impl CorrelationIdSource for StaticCorrelationId {
    fn correlation_id(&self, _event: &Event) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Tags the request logger with the correlation id and logs the request and
/// its outcome.
///
/// The inbound event is logged at debug level as `{"event": ..}`, so the
/// scrubber sees it as an object. The outcome is `{"statusCode": ..}` at info
/// level, or the error at error level.
pub struct RequestLogging<C> {
    source: C,
    tag_key: String,
}

impl<C: CorrelationIdSource> RequestLogging<C> {
    pub fn new(source: C) -> Self {
        Self {
            source,
            tag_key: "correlationId".to_string(),
        }
    }

    /// Key the correlation id is stored under in the tag.
    pub fn with_tag_key(mut self, tag_key: impl Into<String>) -> Self {
        self.tag_key = tag_key.into();
        self
    }
}

impl<S: LogSink, C: CorrelationIdSource> Middleware<S> for RequestLogging<C> {
    fn handle(
        &self,
        event: &Event,
        ctx: &mut RequestContext<S>,
        next: Next<'_, S>,
    ) -> Result<HandlerResponse> {
        if let Some(id) = self.source.correlation_id(event) {
            let mut tag = Map::new();
            tag.insert(self.tag_key.clone(), JsonValue::String(id.clone()));
            ctx.logger.add_tag(tag);
            ctx.correlation_id = Some(id);
        }
        if ctx.logger.is_enabled("debug") {
            ctx.logger.debug(json!({ "event": event }));
        }

        let outcome = next.run(event, ctx);
        match &outcome {
            Ok(response) => ctx.logger.info(json!({ "statusCode": response.status_code })),
            Err(e) => ctx.logger.error(e),
        }
        outcome
    }
}

//! The transport capability set and its event channel.
//!
//! # Design
//! The library never performs I/O itself. A [`Transport`] is an object in the
//! style of a browser's asynchronous request object: it is opened, configured
//! and sent by the driver, and later reports what happened through an
//! [`EventSink`]. Transports may report events from any thread and may report
//! more than one event around the same terminal condition.
//!
//! The sink wraps a one-shot sender. The first terminal event takes the sender
//! and resolves the request; every later event finds the slot empty and is
//! ignored. This gives `Pending -> {Resolved | Rejected}` with no way back.
//!
//! A ready-state change is reported together with a view of the transport's
//! state, so the response is read while the transport is still at
//! [`ReadyState::Done`]. Whatever the transport does afterwards cannot leak into
//! the envelope.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

use crate::headers::{parse_headers, ResponseHeaders};
use crate::http::{Method, ResponseType};
use crate::types::{Body, ResponseData};

/// Lifecycle states reported by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    /// Terminal: the response (or a failure) is complete.
    Done = 4,
}

/// The readable half of a transport.
///
/// Passed to [`EventSink::ready_state_changed`], which reads the response
/// through it when the state is [`ReadyState::Done`]. A transport that reports
/// events from a worker thread can implement this on whatever shared state
/// that thread writes.
pub trait TransportState {
    fn ready_state(&self) -> ReadyState;

    fn status(&self) -> u16;

    fn status_text(&self) -> String;

    /// The body interpreted according to the requested response type.
    fn response(&self) -> ResponseData;

    /// The body as text.
    fn response_text(&self) -> String;

    /// Raw response header block, one `name: value` pair per CRLF-terminated
    /// line.
    fn all_response_headers(&self) -> String;
}

/// An object that performs one HTTP exchange on the driver's behalf.
///
/// The driver calls, in order: [`open`](Transport::open),
/// [`subscribe`](Transport::subscribe),
/// [`set_response_type`](Transport::set_response_type),
/// [`set_timeout`](Transport::set_timeout) (only for a non-zero timeout),
/// [`set_request_header`](Transport::set_request_header) once per header, and
/// finally [`send`](Transport::send).
pub trait Transport: TransportState {
    fn open(&mut self, method: Method, url: &str);

    /// Register the sink the transport reports ready-state changes, network
    /// errors and timeouts to.
    fn subscribe(&mut self, events: EventSink);

    fn set_response_type(&mut self, response_type: ResponseType);

    /// Milliseconds, always greater than zero.
    fn set_timeout(&mut self, millis: u64);

    fn set_request_header(&mut self, name: &str, value: &str);

    /// Start the exchange. Must not block waiting for the response.
    fn send(&mut self, body: Body);
}

/// What the transport held when it reported [`ReadyState::Done`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Completion {
    pub status: u16,
    pub status_text: String,
    pub data: ResponseData,
    pub headers: ResponseHeaders,
}

impl Completion {
    /// Read text-typed bodies through the text accessor, everything else
    /// through the structured one.
    fn read<S: TransportState + ?Sized>(state: &S, response_type: ResponseType) -> Self {
        let data = if response_type.is_text() {
            ResponseData::Text(state.response_text())
        } else {
            state.response()
        };
        Self {
            status: state.status(),
            status_text: state.status_text(),
            data,
            headers: parse_headers(&state.all_response_headers()),
        }
    }
}

/// Terminal outcomes a transport can report.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Signal {
    Done(Completion),
    Error,
    Timeout,
}

/// Handle a transport uses to report events for one request.
///
/// Cloning is cheap; all clones share the same one-shot slot. Every method
/// returns `true` only when that call resolved the request.
#[derive(Debug, Clone)]
pub struct EventSink {
    slot: Arc<Mutex<Option<oneshot::Sender<Signal>>>>,
    response_type: ResponseType,
    timeout_armed: bool,
}

impl EventSink {
    /// Create a sink and the receiver its first terminal event resolves.
    ///
    /// Timeout events are ignored unless `timeout_armed` is set.
    pub(crate) fn new(
        response_type: ResponseType,
        timeout_armed: bool,
    ) -> (Self, oneshot::Receiver<Signal>) {
        let (tx, rx) = oneshot::channel();
        let sink = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
            response_type,
            timeout_armed,
        };
        (sink, rx)
    }

    /// Report that `state` moved to a new ready state.
    ///
    /// Only [`ReadyState::Done`] is terminal. The response is read from
    /// `state` during this call, and only if this call resolves the request.
    pub fn ready_state_changed<S: TransportState + ?Sized>(&self, state: &S) -> bool {
        let ready_state = state.ready_state();
        if ready_state != ReadyState::Done {
            tracing::trace!(state = ?ready_state, "ready state changed");
            return false;
        }
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            tracing::trace!("ignoring completion after resolution");
            return false;
        }
        let completion = Completion::read(state, self.response_type);
        Self::fire(slot.take(), Signal::Done(completion))
    }

    /// Report a network-level failure.
    pub fn error(&self) -> bool {
        self.resolve(Signal::Error)
    }

    /// Report that the configured timeout elapsed.
    pub fn timeout(&self) -> bool {
        if !self.timeout_armed {
            tracing::trace!("ignoring timeout event, no timeout configured");
            return false;
        }
        self.resolve(Signal::Timeout)
    }

    /// Whether a terminal event has already been accepted.
    pub fn is_resolved(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn resolve(&self, signal: Signal) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        Self::fire(sender, signal)
    }

    fn fire(sender: Option<oneshot::Sender<Signal>>, signal: Signal) -> bool {
        match sender {
            Some(tx) => {
                // The waiting future may already be gone; the request still
                // counts as resolved.
                let _ = tx.send(signal);
                true
            }
            None => {
                tracing::trace!(?signal, "ignoring event after resolution");
                false
            }
        }
    }
}

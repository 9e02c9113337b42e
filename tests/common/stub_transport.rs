//! In-memory transport with scripted replies and call accounting

use arkrcon::{ConnectionError, Transport};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const SENTINEL: &str = "Server received, But no response!! \n";

/// Observations shared between a test and the transport it handed away
#[derive(Clone, Default)]
pub struct CallLog {
    exchanges: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    commands: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
}

impl CallLog {
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn last_command(&self) -> Option<String> {
        self.commands.lock().unwrap().last().cloned()
    }

    /// Highest number of exchanges observed running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

pub struct StubTransport {
    replies: VecDeque<Result<String, ConnectionError>>,
    default_reply: Option<String>,
    delay: Option<Duration>,
    open: bool,
    log: CallLog,
}

impl StubTransport {
    /// Answers each exchange with the next scripted reply, then fails with `ConnectionClosed`.
    pub fn scripted(replies: Vec<Result<String, ConnectionError>>) -> (Self, CallLog) {
        let log = CallLog::default();
        let transport = Self {
            replies: replies.into(),
            default_reply: None,
            delay: None,
            open: true,
            log: log.clone(),
        };
        (transport, log)
    }

    pub fn replying(reply: &str) -> (Self, CallLog) {
        Self::scripted(vec![Ok(reply.to_string())])
    }

    /// Answers every exchange with `reply`.
    pub fn always(reply: &str) -> (Self, CallLog) {
        let (mut transport, log) = Self::scripted(Vec::new());
        transport.default_reply = Some(reply.to_string());
        (transport, log)
    }

    /// Sleep inside every exchange, widening any window for interleaving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn exchange(&mut self, command: &str) -> Result<String, ConnectionError> {
        self.log.exchanges.fetch_add(1, Ordering::SeqCst);
        self.log.commands.lock().unwrap().push(command.to_string());

        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.pop_front() {
            Some(reply) => reply,
            None => self
                .default_reply
                .clone()
                .ok_or(ConnectionError::ConnectionClosed),
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        self.open = false;
        Ok(())
    }
}

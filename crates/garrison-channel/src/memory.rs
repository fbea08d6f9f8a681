//! Scripted in-memory chat client for tests.
//!
//! Inbound messages are queued up front with [`ScriptedChat::push_incoming`];
//! everything the bot sends is captured and inspectable via
//! [`ScriptedChat::sent`]. An optional failure switch makes every send fail,
//! for exercising the reply error path.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::channel::{ChannelError, ChatClient, IncomingMessage};

/// In-memory [`ChatClient`] with a scripted inbound queue.
#[derive(Default)]
pub struct ScriptedChat {
    incoming: Mutex<VecDeque<IncomingMessage>>,
    sent: Mutex<Vec<(String, String)>>,
    fail_sends: Mutex<bool>,
}

impl ScriptedChat {
    /// Create an empty scripted client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an inbound message for the dispatch loop to consume.
    pub fn push_incoming(&self, msg: IncomingMessage) {
        self.incoming.lock().unwrap().push_back(msg);
    }

    /// All `(channel_id, text)` pairs sent so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Make every subsequent `send_message` fail.
    pub fn fail_sends(&self) {
        *self.fail_sends.lock().unwrap() = true;
    }
}

#[async_trait]
impl ChatClient for ScriptedChat {
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<(), ChannelError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(ChannelError::Api("scripted send failure".into()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel_id.to_string(), text.to_string()));
        Ok(())
    }

    async fn next_message(&self) -> Result<Option<IncomingMessage>, ChannelError> {
        Ok(self.incoming.lock().unwrap().pop_front())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

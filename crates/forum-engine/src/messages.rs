//! Direct messages.
//!
//! Each recipient owns an inbox of top-level messages. Replies hang off the
//! message they answer and are never copied into any inbox. A store-level
//! index maps every top-level message id to the recipient holding it, and
//! each inbox maps ids to positions, so resolving a reply target is two
//! hash lookups.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use forum_types::models::DirectMessage;

use crate::{Engine, EngineError, EntityKind, Result, read, shared, write};

#[derive(Default)]
pub(crate) struct Inbox {
    pub(crate) messages: Vec<DirectMessage>,
    positions: HashMap<Uuid, usize>,
}

impl Inbox {
    fn push(&mut self, message: DirectMessage) {
        self.positions.insert(message.id, self.messages.len());
        self.messages.push(message);
    }

    fn get_mut(&mut self, id: Uuid) -> Option<&mut DirectMessage> {
        let position = *self.positions.get(&id)?;
        self.messages.get_mut(position)
    }
}

fn new_message(from: &str, to: &str, content: &str) -> DirectMessage {
    DirectMessage {
        id: Uuid::new_v4(),
        from: from.to_string(),
        to: to.to_string(),
        content: content.to_string(),
        created_at: Utc::now(),
        replies: Vec::new(),
    }
}

impl Engine {
    pub fn send_direct_message(&self, from: &str, to: &str, content: &str) -> Result<DirectMessage> {
        let inbox = {
            let mut store = self.store_mut();
            if !store.users.contains_key(from) {
                return Err(EngineError::not_found(EntityKind::Sender, from));
            }
            if !store.users.contains_key(to) {
                return Err(EngineError::not_found(EntityKind::Recipient, to));
            }
            store
                .inboxes
                .entry(to.to_string())
                .or_insert_with(|| shared(Inbox::default()))
                .clone()
        };

        let message = new_message(from, to, content);
        write(&inbox).push(message.clone());

        // Indexed only after the message is in place, so a reply can never
        // resolve an id whose inbox entry is still missing.
        self.store_mut()
            .message_index
            .insert(message.id, to.to_string());

        debug!(message_id = %message.id, from = %from, to = %to, "sent direct message");
        Ok(message)
    }

    /// Appends a reply to a top-level message. The reply goes back to the
    /// original sender and lives only in the original's `replies`.
    pub fn reply_to_direct_message(
        &self,
        original_id: Uuid,
        from: &str,
        content: &str,
    ) -> Result<DirectMessage> {
        let not_found = || EngineError::not_found(EntityKind::OriginalMessage, original_id);

        let inbox = {
            let store = self.store();
            let recipient = store.message_index.get(&original_id).ok_or_else(not_found)?;
            store.inboxes.get(recipient).cloned().ok_or_else(not_found)?
        };

        let mut inbox = write(&inbox);
        let original = inbox.get_mut(original_id).ok_or_else(not_found)?;

        let reply = new_message(from, &original.from, content);
        original.replies.push(reply.clone());

        debug!(message_id = %reply.id, original_id = %original_id, from = %from, "replied to direct message");
        Ok(reply)
    }

    /// Top-level inbox of `username`; empty if nothing was ever sent.
    pub fn get_direct_messages(&self, username: &str) -> Result<Vec<DirectMessage>> {
        let inbox = {
            let store = self.store();
            if !store.users.contains_key(username) {
                return Err(EngineError::not_found(EntityKind::User, username));
            }
            store.inboxes.get(username).cloned()
        };

        let messages = match inbox {
            Some(inbox) => {
                let inbox = read(&inbox);
                inbox.messages.clone()
            }
            None => Vec::new(),
        };
        Ok(messages)
    }
}

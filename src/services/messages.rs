// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Private messages between members.
//!
//! Each side deletes its own copy; the record is dropped once both have.

use std::sync::Arc;

use chrono::Utc;

use crate::db::{MessageStore, UserStore};
use crate::error::{AppError, Result};
use crate::models::{Message, MessageParty, User};

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    users: Arc<dyn UserStore>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageStore>, users: Arc<dyn UserStore>) -> Self {
        Self { messages, users }
    }

    pub async fn send(
        &self,
        sender: &User,
        receiver_id: &str,
        title: &str,
        content: &str,
    ) -> Result<Message> {
        if receiver_id == sender.uid {
            return Err(AppError::InvalidOperation(
                "Cannot send a message to yourself".to_string(),
            ));
        }
        let (title, content) = (title.trim(), content.trim());
        if title.is_empty() || content.is_empty() {
            return Err(AppError::BadRequest(
                "Message title and content are required".to_string(),
            ));
        }

        let receiver = self
            .users
            .get_user(receiver_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", receiver_id)))?;

        let snapshot = sender.snapshot();
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            sender_id: snapshot.id,
            sender_name: snapshot.name,
            sender_photo_url: snapshot.photo_url,
            sender_tier: snapshot.tier,
            receiver_id: receiver.uid.clone(),
            receiver_name: receiver.public_name().to_string(),
            title: title.to_string(),
            content: content.to_string(),
            is_read: false,
            created_at: Utc::now(),
            deleted_by_sender: false,
            deleted_by_receiver: false,
        };
        self.messages.create_message(&message).await?;

        tracing::info!(
            message_id = %message.id,
            sender = %message.sender_id,
            receiver = %message.receiver_id,
            "Message sent"
        );
        Ok(message)
    }

    /// Inbox, newest first, without messages the receiver deleted.
    pub async fn received(&self, uid: &str) -> Result<Vec<Message>> {
        let mut messages = self.messages.list_messages_received(uid).await?;
        messages.retain(|m| m.visible_to(MessageParty::Receiver));
        Ok(messages)
    }

    /// Outbox, newest first, without messages the sender deleted.
    pub async fn sent(&self, uid: &str) -> Result<Vec<Message>> {
        let mut messages = self.messages.list_messages_sent(uid).await?;
        messages.retain(|m| m.visible_to(MessageParty::Sender));
        Ok(messages)
    }

    pub async fn unread_count(&self, uid: &str) -> Result<usize> {
        Ok(self
            .received(uid)
            .await?
            .iter()
            .filter(|m| !m.is_read)
            .count())
    }

    /// Open a message. The receiver's first read marks it read.
    pub async fn read(&self, uid: &str, id: &str) -> Result<Message> {
        let mut message = self.get_visible(uid, id).await?.0;
        if message.receiver_id == uid && !message.is_read {
            self.messages.mark_message_read(id).await?;
            message.is_read = true;
        }
        Ok(message)
    }

    /// Delete the caller's copy.
    pub async fn delete(&self, uid: &str, id: &str) -> Result<()> {
        let (_, party) = self.get_visible(uid, id).await?;
        if !self.messages.delete_message_for(id, party).await? {
            return Err(AppError::NotFound(format!("Message {} not found", id)));
        }
        tracing::debug!(message_id = id, uid, ?party, "Message deleted for party");
        Ok(())
    }

    async fn get_visible(&self, uid: &str, id: &str) -> Result<(Message, MessageParty)> {
        let not_found = || AppError::NotFound(format!("Message {} not found", id));
        let message = self.messages.get_message(id).await?.ok_or_else(not_found)?;
        let party = message.party(uid).ok_or_else(|| {
            AppError::PermissionDenied("Not a party to this message".to_string())
        })?;
        if !message.visible_to(party) {
            return Err(not_found());
        }
        Ok((message, party))
    }
}

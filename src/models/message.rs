// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Private messages between members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::tier::TierType;

/// Message stored in Firestore (`messages/{id}`).
///
/// One shared record; sender and receiver each hold independent delete state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender_id: String,
    /// Sender name/photo/tier at time of sending
    pub sender_name: String,
    pub sender_photo_url: Option<String>,
    pub sender_tier: TierType,
    pub receiver_id: String,
    pub receiver_name: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub deleted_by_sender: bool,
    #[serde(default)]
    pub deleted_by_receiver: bool,
}

/// Which side of a message a member is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageParty {
    Sender,
    Receiver,
}

impl Message {
    /// The caller's role, or `None` if they are not a party to the message.
    ///
    /// A note to self is not allowed, so the roles never overlap.
    pub fn party(&self, uid: &str) -> Option<MessageParty> {
        if self.receiver_id == uid {
            Some(MessageParty::Receiver)
        } else if self.sender_id == uid {
            Some(MessageParty::Sender)
        } else {
            None
        }
    }

    /// Whether `party` still sees this message.
    pub fn visible_to(&self, party: MessageParty) -> bool {
        match party {
            MessageParty::Sender => !self.deleted_by_sender,
            MessageParty::Receiver => !self.deleted_by_receiver,
        }
    }

    /// Mark the message deleted for `party`.
    ///
    /// Returns `true` once both sides have deleted and the record can go.
    pub fn delete_for(&mut self, party: MessageParty) -> bool {
        match party {
            MessageParty::Sender => self.deleted_by_sender = true,
            MessageParty::Receiver => self.deleted_by_receiver = true,
        }
        self.deleted_by_sender && self.deleted_by_receiver
    }
}

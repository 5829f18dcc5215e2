//! Direct messages between members and the admin, grouped into conversations.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::snapshot::{DirectMessage, Member};

/// All messages exchanged between a user and one peer.
#[derive(Debug, Clone)]
pub struct Conversation<'a> {
    pub peer_id: String,
    /// Peer display name, or the id when the peer is not a known member.
    pub peer_name: String,
    pub last_message: &'a DirectMessage,
    pub message_count: usize,
    /// Messages sent to the user that are still unread.
    pub unread: usize,
}

/// Group `user_id`'s messages by peer, most recent conversation first.
pub fn group_conversations<'a>(
    messages: &'a [DirectMessage],
    members: &[Member],
    user_id: &str,
) -> Vec<Conversation<'a>> {
    let mut by_peer: HashMap<&str, Conversation<'a>> = HashMap::new();

    for msg in messages {
        let Some(peer) = msg.peer_of(user_id) else {
            continue;
        };
        let unread = usize::from(msg.receiver_id == user_id && !msg.read);
        by_peer
            .entry(peer)
            .and_modify(|c| {
                c.message_count += 1;
                c.unread += unread;
                if msg.created_at > c.last_message.created_at {
                    c.last_message = msg;
                }
            })
            .or_insert_with(|| Conversation {
                peer_id: peer.to_string(),
                peer_name: member_name(members, peer),
                last_message: msg,
                message_count: 1,
                unread,
            });
    }

    let mut conversations: Vec<Conversation<'a>> = by_peer.into_values().collect();
    conversations.sort_by(|a, b| {
        b.last_message
            .created_at
            .cmp(&a.last_message.created_at)
            .then_with(|| a.peer_id.cmp(&b.peer_id))
    });
    conversations
}

/// Messages between `user_id` and `peer_id`, oldest first.
pub fn thread<'a>(
    messages: &'a [DirectMessage],
    user_id: &str,
    peer_id: &str,
) -> Vec<&'a DirectMessage> {
    let mut out: Vec<&DirectMessage> = messages
        .iter()
        .filter(|m| m.peer_of(user_id) == Some(peer_id))
        .collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    out
}

/// A new unread message stamped with the current time.
pub fn new_message(from: &str, to: &str, content: &str) -> DirectMessage {
    DirectMessage {
        id: Uuid::new_v4().to_string(),
        sender_id: from.to_string(),
        receiver_id: to.to_string(),
        content: content.to_string(),
        created_at: Utc::now(),
        read: false,
    }
}

fn member_name(members: &[Member], id: &str) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::community::snapshot::MemberRole;
    use crate::core::community::test_support::at;

    fn msg(id: &str, from: &str, to: &str, minute: i64, read: bool) -> DirectMessage {
        DirectMessage {
            id: id.into(),
            sender_id: from.into(),
            receiver_id: to.into(),
            content: format!("message {id}"),
            created_at: at(minute),
            read,
        }
    }

    fn members() -> Vec<Member> {
        vec![
            Member {
                id: "admin".into(),
                name: "Admin".into(),
                role: MemberRole::Admin,
            },
            Member {
                id: "u1".into(),
                name: "Ana".into(),
                role: MemberRole::User,
            },
        ]
    }

    #[test]
    fn groups_by_peer_with_unread_counts() {
        let messages = vec![
            msg("1", "u1", "admin", 1, true),
            msg("2", "admin", "u1", 2, false),
            msg("3", "u2", "admin", 5, false),
            msg("4", "admin", "u1", 3, false),
            msg("5", "u2", "u1", 4, false),
        ];
        let convs = group_conversations(&messages, &members(), "admin");
        assert_eq!(convs.len(), 2);

        assert_eq!(convs[0].peer_id, "u2");
        assert_eq!(convs[0].peer_name, "u2");
        assert_eq!(convs[0].unread, 1);

        assert_eq!(convs[1].peer_name, "Ana");
        assert_eq!(convs[1].message_count, 3);
        assert_eq!(convs[1].last_message.id, "4");
        assert_eq!(convs[1].unread, 0);
    }

    #[test]
    fn messages_not_involving_user_are_ignored() {
        let messages = vec![msg("1", "u1", "u2", 1, false)];
        assert!(group_conversations(&messages, &members(), "admin").is_empty());
    }

    #[test]
    fn thread_is_oldest_first_and_two_way() {
        let messages = vec![
            msg("b", "admin", "u1", 2, false),
            msg("a", "u1", "admin", 1, false),
            msg("x", "u2", "admin", 0, false),
        ];
        let ids: Vec<&str> = thread(&messages, "u1", "admin")
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}

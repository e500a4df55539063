// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Per-request notification sink.
//!
//! A [`Notifications`] value is created for one request, passed by `&mut`
//! through validation, resolution and assembly, and read back by whoever
//! renders the response. It is never shared between requests.

use serde::{Deserialize, Serialize};

/// Severity of a notification
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Information,
    Warning,
    Error,
}

/// One human-readable message
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Ordered, append-only list of notifications for one request.
///
/// Insertion order is preserved and duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification. Empty messages are dropped.
    pub fn push(&mut self, notification: Notification) {
        if notification.message.is_empty() {
            return;
        }
        self.items.push(notification);
    }

    pub fn add(&mut self, message: impl Into<String>, severity: Severity) {
        self.push(Notification::new(message, severity));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.add(message, Severity::Success);
    }

    pub fn information(&mut self, message: impl Into<String>) {
        self.add(message, Severity::Information);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(message, Severity::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.add(message, Severity::Error);
    }

    /// Append every message as an Error, keeping their order
    pub fn errors<I, S>(&mut self, messages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for message in messages {
            self.error(message);
        }
    }

    /// Move all notifications from `other` to the end of this list
    pub fn merge(&mut self, other: Notifications) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|n| n.severity == Severity::Error)
    }

    #[must_use]
    pub fn has_notifications(&self) -> bool {
        !self.items.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Messages with the given severity, in insertion order
    pub fn messages(&self, severity: Severity) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |n| n.severity == severity)
            .map(|n| n.message.as_str())
    }

    pub fn into_vec(self) -> Vec<Notification> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Notifications {
    type Item = &'a Notification;
    type IntoIter = std::slice::Iter<'a, Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved_and_not_deduplicated() {
        let mut n = Notifications::new();
        n.error("File 2019-01-10.csv could not be found");
        n.information("fallback");
        n.error("File 2019-01-10.csv could not be found");

        let messages: Vec<_> = n.as_slice().iter().map(|x| x.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "File 2019-01-10.csv could not be found",
                "fallback",
                "File 2019-01-10.csv could not be found",
            ]
        );
        assert_eq!(n.len(), 3);
    }

    #[test]
    fn test_has_errors_only_for_error_severity() {
        let mut n = Notifications::new();
        assert!(!n.has_notifications());
        n.success("ok");
        n.warning("careful");
        n.information("fyi");
        assert!(n.has_notifications());
        assert!(!n.has_errors());

        n.error("boom");
        assert!(n.has_errors());
        assert_eq!(n.messages(Severity::Error).collect::<Vec<_>>(), vec!["boom"]);
    }

    #[test]
    fn test_empty_message_is_dropped() {
        let mut n = Notifications::new();
        n.error("");
        assert!(n.is_empty());
        assert!(!n.has_errors());
    }

    #[test]
    fn test_merge_appends() {
        let mut first = Notifications::new();
        first.error("a");
        let mut second = Notifications::new();
        second.errors(["b", "c"]);

        first.merge(second);
        let all: Vec<_> = first.messages(Severity::Error).collect();
        assert_eq!(all, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_serializes_with_type_key() {
        let n = Notification::new("Device Id cannot be empty", Severity::Error);
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"message":"Device Id cannot be empty","type":"Error"}"#);
    }
}

//! Notification banners
//!
//! Banners are stacked newest first at the top of the main content
//! container. Runtime notifications live for three seconds; dismissible
//! alerts rendered with the page live for five seconds after the page is
//! ready.

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

use super::html::escape;

/// Visual kind of a banner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    /// Parse the kind names used by page markup. Unknown names are `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }

    /// Bootstrap alert class
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Error => "alert-danger",
            Self::Warning => "alert-warning",
            Self::Info => "alert-info",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a banner came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Rendered by the server with the page (flash messages)
    PageLoad,
    /// Raised by a page handler
    Runtime,
}

pub type NotificationId = Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub origin: Origin,
    /// Whether the banner carries a close control
    pub dismissible: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// A runtime banner. These always carry a close control.
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            origin: Origin::Runtime,
            dismissible: true,
            created_at: Utc::now(),
        }
    }

    /// An alert that arrived with the page markup
    pub fn page_alert(message: impl Into<String>, kind: NotificationKind, dismissible: bool) -> Self {
        Self {
            origin: Origin::PageLoad,
            dismissible,
            ..Self::new(message, kind)
        }
    }

    pub fn render_html(&self) -> String {
        let mut classes = format!("alert {}", self.kind.css_class());
        if self.dismissible {
            classes.push_str(" alert-dismissible fade show");
        }

        let close = if self.dismissible {
            r#"<button type="button" class="btn-close" data-bs-dismiss="alert"></button>"#
        } else {
            ""
        };

        format!(
            r#"<div class="{}" role="alert" data-notification-id="{}">{}{}</div>"#,
            classes,
            self.id,
            escape(&self.message),
            close
        )
    }
}

/// Ordered banner stack, newest first
#[derive(Debug, Clone, Default)]
pub struct NotificationStack {
    banners: Vec<Notification>,
}

impl NotificationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the top of the container
    pub fn push(&mut self, notification: Notification) {
        self.banners.insert(0, notification);
    }

    /// Remove a banner through its close control. Non-dismissible banners
    /// have no close control and stay.
    pub fn dismiss(&mut self, id: NotificationId) -> Option<Notification> {
        let index = self
            .banners
            .iter()
            .position(|n| n.id == id && n.dismissible)?;
        Some(self.banners.remove(index))
    }

    /// Dismissible alerts that came with the page
    pub fn page_alerts(&self) -> Vec<NotificationId> {
        self.banners
            .iter()
            .filter(|n| n.origin == Origin::PageLoad && n.dismissible)
            .map(|n| n.id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.banners.iter()
    }

    pub fn top(&self) -> Option<&Notification> {
        self.banners.first()
    }

    pub fn len(&self) -> usize {
        self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banners.is_empty()
    }

    pub fn render_html(&self) -> String {
        self.banners.iter().map(Notification::render_html).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classes() {
        assert_eq!(NotificationKind::from_name("error").css_class(), "alert-danger");
        assert_eq!(NotificationKind::from_name("success").css_class(), "alert-success");
        assert_eq!(NotificationKind::from_name("warning").css_class(), "alert-warning");
        assert_eq!(NotificationKind::from_name("info").css_class(), "alert-info");
        assert_eq!(NotificationKind::from_name("bogus"), NotificationKind::Info);
        assert_eq!(NotificationKind::default().css_class(), "alert-info");
    }

    #[test]
    fn test_render_escapes_message() {
        let n = Notification::new("<b>Saved</b> & done", NotificationKind::Success);
        let html = n.render_html();
        assert!(html.contains(r#"class="alert alert-success alert-dismissible fade show""#));
        assert!(html.contains("&lt;b&gt;Saved&lt;/b&gt; &amp; done"));
        assert!(html.contains("btn-close"));
    }

    #[test]
    fn test_stack_newest_first() {
        let mut stack = NotificationStack::new();
        let first = Notification::new("one", NotificationKind::Info);
        let second = Notification::new("two", NotificationKind::Error);
        let second_id = second.id;
        stack.push(first);
        stack.push(second);

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top().unwrap().id, second_id);
    }

    #[test]
    fn test_dismiss_requires_close_control() {
        let mut stack = NotificationStack::new();
        let sticky = Notification::page_alert("Read me", NotificationKind::Warning, false);
        let sticky_id = sticky.id;
        let closable = Notification::page_alert("Welcome back", NotificationKind::Success, true);
        let closable_id = closable.id;
        stack.push(sticky);
        stack.push(closable);

        assert_eq!(stack.page_alerts(), vec![closable_id]);
        assert!(stack.dismiss(sticky_id).is_none());
        assert_eq!(stack.dismiss(closable_id).unwrap().message, "Welcome back");
        assert_eq!(stack.len(), 1);
        assert!(stack.dismiss(closable_id).is_none());
    }
}

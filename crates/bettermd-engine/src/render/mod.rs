//! Preview rendering contract.
//!
//! The core never renders HTML itself. It builds a [`RenderRequest`] from the
//! encoded Markdown, hands it to whatever performs the external call, and feeds
//! the outcome back through [`PreviewSequencer::complete`]. Responses can come
//! back out of order; the sequencer makes sure an older one never replaces a
//! newer preview.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TEMPLATE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub content: String,
    pub template: String,
}

impl RenderRequest {
    pub fn to_json(&self) -> Result<String, RenderError> {
        serde_json::to_string(self).map_err(|e| RenderError::InvalidPayload(e.to_string()))
    }
}

/// `html_content` is opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResponse {
    pub html_content: String,
}

impl RenderResponse {
    pub fn from_json(json: &str) -> Result<Self, RenderError> {
        serde_json::from_str(json).map_err(|e| RenderError::InvalidPayload(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Render request failed: {0}")]
    Request(String),
    #[error("Invalid render payload: {0}")]
    InvalidPayload(String),
}

/// Sequence number of a render request. Later requests get larger tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// What happened to the preview when a response arrived. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Applied { ticket: Ticket },
    /// A newer response was already applied; this one was dropped.
    Stale { ticket: Ticket },
    /// The external call failed; the previous preview is kept.
    Failed { ticket: Ticket, error: RenderError },
}

/// Orders preview updates for one editing session.
#[derive(Debug)]
pub struct PreviewSequencer {
    template: String,
    issued: u64,
    applied: Option<Ticket>,
    html: Option<String>,
}

impl PreviewSequencer {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            issued: 0,
            applied: None,
            html: None,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = template.into();
    }

    /// The currently displayed preview, if any.
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    /// Start a preview refresh for `content`.
    ///
    /// Blank content issues no request: the preview is cleared immediately and
    /// any response still in flight becomes stale.
    pub fn begin(&mut self, content: &str) -> Option<(Ticket, RenderRequest)> {
        let ticket = self.next_ticket();
        if content.trim().is_empty() {
            self.applied = Some(ticket);
            self.html = None;
            return None;
        }
        Some((
            ticket,
            RenderRequest {
                content: content.to_string(),
                template: self.template.clone(),
            },
        ))
    }

    /// Feed back the outcome of the request issued under `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<RenderResponse, RenderError>,
    ) -> Notification {
        if self.applied.is_some_and(|applied| applied >= ticket) {
            log::debug!("dropping stale preview response {ticket:?}");
            return Notification::Stale { ticket };
        }
        match outcome {
            Ok(response) => {
                self.applied = Some(ticket);
                self.html = Some(response.html_content);
                Notification::Applied { ticket }
            }
            Err(error) => {
                log::warn!("preview render failed: {error}");
                Notification::Failed { ticket, error }
            }
        }
    }

    fn next_ticket(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }
}

impl Default for PreviewSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;

    fn html(s: &str) -> Result<RenderResponse, RenderError> {
        Ok(RenderResponse {
            html_content: s.to_string(),
        })
    }

    #[test]
    fn test_request_uses_current_template() {
        let mut preview = PreviewSequencer::default();
        let (_, request) = preview.begin("# Title").unwrap();
        assert_eq!(request.template, "default");

        preview.set_template("academic");
        let (_, request) = preview.begin("# Title").unwrap();
        assert_eq!(request.template, "academic");
    }

    #[test]
    fn test_request_json_shape() {
        let request = RenderRequest {
            content: "# Title".to_string(),
            template: DEFAULT_TEMPLATE.to_string(),
        };
        assert_snapshot!(request.to_json().unwrap(), @r##"{"content":"# Title","template":"default"}"##);
    }

    #[test]
    fn test_response_from_json() {
        let response = RenderResponse::from_json(r#"{"html_content":"<h1>Title</h1>"}"#).unwrap();
        assert_eq!(response.html_content, "<h1>Title</h1>");

        let err = RenderResponse::from_json(r#"{"html":"x"}"#).unwrap_err();
        assert!(matches!(err, RenderError::InvalidPayload(_)));
    }

    #[test]
    fn test_out_of_order_response_is_stale() {
        let mut preview = PreviewSequencer::default();
        let (first, _) = preview.begin("one").unwrap();
        let (second, _) = preview.begin("two").unwrap();

        assert_eq!(
            preview.complete(second, html("<p>two</p>")),
            Notification::Applied { ticket: second }
        );
        assert_eq!(
            preview.complete(first, html("<p>one</p>")),
            Notification::Stale { ticket: first }
        );
        assert_eq!(preview.html(), Some("<p>two</p>"));
    }

    #[test]
    fn test_in_order_responses_both_apply() {
        let mut preview = PreviewSequencer::default();
        let (first, _) = preview.begin("one").unwrap();
        let (second, _) = preview.begin("two").unwrap();

        preview.complete(first, html("<p>one</p>"));
        assert_eq!(preview.html(), Some("<p>one</p>"));
        preview.complete(second, html("<p>two</p>"));
        assert_eq!(preview.html(), Some("<p>two</p>"));
    }

    #[test]
    fn test_failure_keeps_previous_preview() {
        let mut preview = PreviewSequencer::default();
        let (first, _) = preview.begin("one").unwrap();
        preview.complete(first, html("<p>one</p>"));

        let (second, _) = preview.begin("two").unwrap();
        let notification =
            preview.complete(second, Err(RenderError::Request("connection refused".into())));

        assert!(matches!(notification, Notification::Failed { .. }));
        assert_eq!(preview.html(), Some("<p>one</p>"));
    }

    #[test]
    fn test_blank_content_clears_and_invalidates_in_flight() {
        let mut preview = PreviewSequencer::default();
        let (first, _) = preview.begin("one").unwrap();
        preview.complete(first, html("<p>one</p>"));
        let (pending, _) = preview.begin("two").unwrap();

        assert_eq!(preview.begin("  \n "), None);
        assert_eq!(preview.html(), None);

        assert_eq!(
            preview.complete(pending, html("<p>two</p>")),
            Notification::Stale { ticket: pending }
        );
        assert_eq!(preview.html(), None);
    }
}

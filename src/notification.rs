//! Display and click-routing decisions for push notifications.
//!
//! The push SDK delivers payloads either with a `notification` block or as
//! data-only messages; both shapes are accepted here.

use serde::Serialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_TITLE: &str = "Advent Calendar";
pub const DEFAULT_BODY: &str = "You have a new surprise waiting!";
pub const DEFAULT_TARGET: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDisplay {
    pub title: String,
    pub body: String,
    pub target: String,
}

fn text_at<'a>(payload: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers
        .iter()
        .filter_map(|p| payload.pointer(p).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
}

impl NotificationDisplay {
    pub fn from_payload(payload: &Value) -> Self {
        let title =
            text_at(payload, &["/notification/title", "/data/title"]).unwrap_or(DEFAULT_TITLE);
        let body =
            text_at(payload, &["/notification/body", "/data/body"]).unwrap_or(DEFAULT_BODY);
        let target =
            text_at(payload, &["/data/url", "/fcmOptions/link"]).unwrap_or(DEFAULT_TARGET);
        Self {
            title: title.to_string(),
            body: body.to_string(),
            target: target.to_string(),
        }
    }
}

/// What the worker should do when a notification is clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Focus the window at this index; it already shows the target.
    Focus(usize),
    /// Focus the window at this index and navigate it to the target.
    FocusAndNavigate(usize, Url),
    OpenWindow(Url),
}

/// Prefer a window already on the target path, then any same-origin window, else open a new one.
///
/// `target` may be relative; it is resolved against `origin`.
pub fn choose_click_target(
    origin: &Url,
    windows: &[Url],
    target: &str,
) -> Result<ClickAction, url::ParseError> {
    let target = origin.join(target)?;

    if let Some(index) = windows
        .iter()
        .position(|w| w.origin() == target.origin() && w.path() == target.path())
    {
        return Ok(ClickAction::Focus(index));
    }
    if let Some(index) = windows.iter().position(|w| w.origin() == target.origin()) {
        return Ok(ClickAction::FocusAndNavigate(index, target));
    }
    Ok(ClickAction::OpenWindow(target))
}

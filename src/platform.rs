//! Platform and browser identification from user-agent strings.

use serde::{Deserialize, Serialize};

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(&needle.to_ascii_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
    Blackberry,
    Unix,
    Windows,
    Mac,
}

impl Platform {
    /// Identify the platform from a user-agent string. Match order matters:
    /// Android user agents also contain "Linux", and iOS ones contain "Mac",
    /// so the more specific tokens are checked first.
    pub fn from_user_agent(user_agent: &str) -> Option<Self> {
        if ["iPad", "iPhone", "iPod"]
            .iter()
            .any(|token| contains_ci(user_agent, token))
        {
            Some(Platform::Ios)
        } else if contains_ci(user_agent, "Android") {
            Some(Platform::Android)
        } else if contains_ci(user_agent, "BB10") {
            Some(Platform::Blackberry)
        } else if contains_ci(user_agent, "Linux") || contains_ci(user_agent, "X11") {
            Some(Platform::Unix)
        } else if contains_ci(user_agent, "Win") {
            Some(Platform::Windows)
        } else if contains_ci(user_agent, "Mac") {
            Some(Platform::Mac)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Client {
    Opera,
    Edge,
    Chrome,
    Ie,
    Gecko,
    Konqueror,
    Safari,
}

impl Client {
    /// Identify the browser engine from the user-agent and vendor strings.
    ///
    /// Chromium-family agents also advertise "Safari" and "like Gecko", so
    /// the checks run in most-specific-first order and the Gecko check
    /// requires a "Gecko/" build token rather than the bare word.
    pub fn from_user_agent(user_agent: &str, vendor: &str) -> Option<Self> {
        if contains_ci(user_agent, "Opera") || contains_ci(user_agent, "OPR/") {
            Some(Client::Opera)
        } else if contains_ci(user_agent, "Edge") || contains_ci(user_agent, "Edg/") {
            Some(Client::Edge)
        } else if contains_ci(user_agent, "Chrome") || contains_ci(user_agent, "CriOS") {
            Some(Client::Chrome)
        } else if contains_ci(user_agent, "MSIE") || contains_ci(user_agent, "Trident") {
            Some(Client::Ie)
        } else if contains_ci(user_agent, "Gecko/") || contains_ci(user_agent, "Firefox") {
            Some(Client::Gecko)
        } else if contains_ci(user_agent, "KHTML") {
            if vendor == "KDE" {
                Some(Client::Konqueror)
            } else if contains_ci(vendor, "Apple") {
                Some(Client::Safari)
            } else {
                None
            }
        } else {
            None
        }
    }
}

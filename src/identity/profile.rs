//! Emulated platform and browser labels
//!
//! Everything derived from these labels (user agent, client hints, client
//! properties) is computed from the same values, so the identity presents one
//! consistent environment.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system the identity claims to run on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    #[default]
    Windows,
    #[serde(rename = "Mac OS X", alias = "macOS", alias = "MacOs")]
    MacOs,
    Linux,
}

impl Platform {
    /// Label used in client properties
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "Mac OS X",
            Platform::Linux => "Linux",
        }
    }

    /// Value of the `sec-ch-ua-platform` client hint, including quotes
    pub fn client_hint(&self) -> &'static str {
        match self {
            Platform::Windows => "\"Windows\"",
            Platform::MacOs => "\"macOS\"",
            Platform::Linux => "\"Linux\"",
        }
    }

    /// Parenthesised platform segment of the user agent
    pub fn user_agent_segment(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows NT 10.0; Win64; x64",
            Platform::MacOs => "Macintosh; Intel Mac OS X 10_15_7",
            Platform::Linux => "X11; Linux x86_64",
        }
    }

    /// OS version reported in client properties
    pub fn os_version(&self) -> &'static str {
        match self {
            Platform::Windows => "10",
            Platform::MacOs => "10.15.7",
            Platform::Linux => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Chromium-family browser the identity claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Browser {
    Chrome,
    #[default]
    Chromium,
    #[serde(rename = "Edge", alias = "Microsoft Edge")]
    Edge,
}

impl Browser {
    /// Label used in client properties
    pub fn label(&self) -> &'static str {
        match self {
            Browser::Chrome => "Chrome",
            Browser::Chromium => "Chromium",
            Browser::Edge => "Edge",
        }
    }

    /// Value of the `sec-ch-ua` brand list for a major version
    pub fn client_hint(&self, major: &str) -> String {
        match self {
            Browser::Chrome => format!(
                "\"Not_A Brand\";v=\"99\", \"Google Chrome\";v=\"{major}\", \"Chromium\";v=\"{major}\""
            ),
            Browser::Chromium => format!("\"Not_A Brand\";v=\"99\", \"Chromium\";v=\"{major}\""),
            Browser::Edge => format!(
                "\"Not_A Brand\";v=\"99\", \"Microsoft Edge\";v=\"{major}\", \"Chromium\";v=\"{major}\""
            ),
        }
    }

    /// Full user agent string for a platform and version
    pub fn user_agent(&self, platform: Platform, version: &str) -> String {
        let full = full_version(version);
        let base = format!(
            "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{full} Safari/537.36",
            platform.user_agent_segment()
        );
        match self {
            Browser::Edge => format!("{base} Edg/{full}"),
            Browser::Chrome | Browser::Chromium => base,
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Leading component of a dotted version
pub fn major_version(version: &str) -> &str {
    version.split('.').next().unwrap_or(version)
}

/// Pad a dotted version to the four components Chromium reports
pub fn full_version(version: &str) -> String {
    let mut parts: Vec<&str> = version.split('.').filter(|p| !p.is_empty()).collect();
    parts.resize(parts.len().max(4), "0");
    parts.join(".")
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The CGI endpoints of a BRC/FR camera.

/// One `/command/{name}.cgi` endpoint.
///
/// The first seven carry device parameters. The meta endpoints carry only
/// hidden query parameters that steer inquiry and subscription plumbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Assignable,
    Ptzf,
    PresetPosition,
    Network,
    Imaging,
    Project,
    CameraOperation,
    Inquiry,
    Subscribe,
    PullInquiry,
    Unsubscribe,
}

impl Endpoint {
    /// Every endpoint, parameter endpoints first.
    pub const ALL: [Self; 11] = [
        Self::Assignable,
        Self::Ptzf,
        Self::PresetPosition,
        Self::Network,
        Self::Imaging,
        Self::Project,
        Self::CameraOperation,
        Self::Inquiry,
        Self::Subscribe,
        Self::PullInquiry,
        Self::Unsubscribe,
    ];

    /// The `{name}` in `/command/{name}.cgi`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Assignable => "assignable",
            Self::Ptzf => "ptzf",
            Self::PresetPosition => "presetposition",
            Self::Network => "network",
            Self::Imaging => "imaging",
            Self::Project => "project",
            Self::CameraOperation => "cameraoperation",
            Self::Inquiry => "inquiry",
            Self::Subscribe => "subscribe",
            Self::PullInquiry => "pullinquiry",
            Self::Unsubscribe => "unsubscribe",
        }
    }

    /// Reverse lookup by wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.name() == name)
    }

    /// Whether this endpoint only carries plumbing parameters.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Self::Inquiry | Self::Subscribe | Self::PullInquiry | Self::Unsubscribe
        )
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

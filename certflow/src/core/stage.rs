//! Certification stage and domain enums.

use crate::errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One discrete certification check within a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CertStage {
    /// Static analysis and lint gates.
    CodeQuality,
    /// Security and vulnerability scanning.
    Security,
    /// Regulatory compliance checks.
    Compliance,
    /// Functional test suite.
    Functional,
    /// End-to-end test suite.
    E2e,
    /// Long-running soak tests.
    Soak,
    /// Performance benchmarks.
    Performance,
}

impl CertStage {
    /// All known stages, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CodeQuality,
        Self::Security,
        Self::Compliance,
        Self::Functional,
        Self::E2e,
        Self::Soak,
        Self::Performance,
    ];

    /// Returns the stable token used as a `stage_results` key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::CodeQuality => "code_quality",
            Self::Security => "security",
            Self::Compliance => "compliance",
            Self::Functional => "functional",
            Self::E2e => "e2e",
            Self::Soak => "soak",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for CertStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for CertStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|stage| stage.key() == s)
            .ok_or_else(|| ValidationError::unknown_token("stage", s))
    }
}

/// Target domain a workflow certifies against.
///
/// Each domain carries a fixed default stage sequence; requests may override
/// it with an explicit stage list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Core platform services.
    Core,
    /// Transport and logistics.
    Transport,
    /// Banking and payments.
    Banking,
    /// Healthcare.
    Healthcare,
}

impl Domain {
    /// All known domains, in declaration order.
    pub const ALL: [Self; 4] = [Self::Core, Self::Transport, Self::Banking, Self::Healthcare];

    /// Returns the stable string token for the domain.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Transport => "transport",
            Self::Banking => "banking",
            Self::Healthcare => "healthcare",
        }
    }

    /// The fixed stage sequence run for this domain when a request does not
    /// supply its own.
    #[must_use]
    pub fn default_stages(self) -> &'static [CertStage] {
        match self {
            Self::Core => &[
                CertStage::CodeQuality,
                CertStage::Security,
                CertStage::Functional,
            ],
            Self::Transport => &[
                CertStage::CodeQuality,
                CertStage::Security,
                CertStage::Functional,
                CertStage::Performance,
            ],
            Self::Banking => &[
                CertStage::CodeQuality,
                CertStage::Security,
                CertStage::Compliance,
                CertStage::Functional,
                CertStage::E2e,
            ],
            Self::Healthcare => &[
                CertStage::CodeQuality,
                CertStage::Security,
                CertStage::Compliance,
                CertStage::Functional,
                CertStage::Soak,
            ],
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| ValidationError::unknown_token("domain", s))
    }
}

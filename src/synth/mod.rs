// src/synth/mod.rs
//! Text-to-speech requests against the hosted model, and the user-facing
//! error categories its failures map to.

pub mod gemini;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gemini::GeminiClient;

/// Prebuilt voices offered by the speech model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Voice {
    #[default]
    Kore,
    Puck,
    Charon,
    Fenrir,
    Zephyr,
}

impl Voice {
    pub const ALL: [Voice; 5] = [Voice::Kore, Voice::Puck, Voice::Charon, Voice::Fenrir, Voice::Zephyr];

    /// Name the API expects.
    pub fn name(self) -> &'static str {
        match self {
            Voice::Kore => "Kore",
            Voice::Puck => "Puck",
            Voice::Charon => "Charon",
            Voice::Fenrir => "Fenrir",
            Voice::Zephyr => "Zephyr",
        }
    }

    /// Short description shown next to the name.
    pub fn character(self) -> &'static str {
        match self {
            Voice::Kore => "Balanced",
            Voice::Puck => "Energetic",
            Voice::Charon => "Deep",
            Voice::Fenrir => "Authoritative",
            Voice::Zephyr => "Calm",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    /// Next (`step > 0`) or previous voice, wrapping around.
    pub fn cycle(self, step: isize) -> Voice {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + step).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

impl fmt::Display for Voice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Voice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown voice '{}'", s))
    }
}

/// What to say and with which voice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice: Voice,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, voice: Voice) -> Self {
        Self {
            text: text.into(),
            voice,
        }
    }
}

/// User-facing failure categories, each with a fixed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisErrorKind {
    InvalidRequest,
    AuthFailure,
    RateLimited,
    Overloaded,
    ContentBlocked,
    Network,
    EmptyResponse,
    Unknown,
}

impl SynthesisErrorKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidRequest => {
                "The request content was invalid or unsupported. Please check your inputs."
            }
            Self::AuthFailure => "Authentication failed. Access denied.",
            Self::RateLimited => {
                "You are sending requests too fast. Please wait a moment and try again."
            }
            Self::Overloaded => {
                "Gemini services are currently experiencing high traffic. Please retry in a few moments."
            }
            Self::ContentBlocked => {
                "The content was blocked due to safety guidelines. Please revise your input."
            }
            Self::Network => "Network connection issue. Please check your internet connection.",
            Self::EmptyResponse => "The model could not generate a valid response for this input.",
            Self::Unknown => "An unexpected error occurred. Please try again.",
        }
    }

    /// Category for an HTTP status, if it has a dedicated one.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            400 => Some(Self::InvalidRequest),
            401 | 403 => Some(Self::AuthFailure),
            429 => Some(Self::RateLimited),
            500 | 503 => Some(Self::Overloaded),
            _ => None,
        }
    }
}

impl fmt::Display for SynthesisErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Classify a free-form error message. Rules are checked in order, so a
/// message mentioning both a status code and "blocked" is classified by
/// its status.
pub fn classify_message(message: &str) -> SynthesisErrorKind {
    let msg = message.to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| msg.contains(n));

    if has(&["400"]) {
        SynthesisErrorKind::InvalidRequest
    } else if has(&["401", "403"]) {
        SynthesisErrorKind::AuthFailure
    } else if has(&["429"]) {
        SynthesisErrorKind::RateLimited
    } else if has(&["500", "503", "overloaded"]) {
        SynthesisErrorKind::Overloaded
    } else if has(&["safety", "blocked"]) {
        SynthesisErrorKind::ContentBlocked
    } else if has(&["fetch", "network"]) {
        SynthesisErrorKind::Network
    } else if has(&["candidate", "no audio data"]) {
        SynthesisErrorKind::EmptyResponse
    } else {
        SynthesisErrorKind::Unknown
    }
}

/// A failed synthesis call. `detail` is for logs; show `kind` to users.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind} ({detail})")]
pub struct SynthesisError {
    pub kind: SynthesisErrorKind,
    pub detail: String,
}

impl SynthesisError {
    pub fn new(kind: SynthesisErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Build from a message alone, classifying it.
    pub fn from_message(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(classify_message(&detail), detail)
    }

    pub fn user_message(&self) -> &'static str {
        self.kind.message()
    }
}

/// Anything that can turn text into base64 16-bit PCM (24 kHz mono).
pub trait SpeechSynthesizer: Send + Sync {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<String, SynthesisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_parse_and_cycle() {
        assert_eq!("puck".parse::<Voice>(), Ok(Voice::Puck));
        assert!("Nova".parse::<Voice>().is_err());
        assert_eq!(Voice::Zephyr.cycle(1), Voice::Kore);
        assert_eq!(Voice::Kore.cycle(-1), Voice::Zephyr);
        assert_eq!(Voice::Charon.to_string(), "Charon");
    }

    #[test]
    fn test_status_categories() {
        assert_eq!(SynthesisErrorKind::from_status(400), Some(SynthesisErrorKind::InvalidRequest));
        assert_eq!(SynthesisErrorKind::from_status(403), Some(SynthesisErrorKind::AuthFailure));
        assert_eq!(SynthesisErrorKind::from_status(429), Some(SynthesisErrorKind::RateLimited));
        assert_eq!(SynthesisErrorKind::from_status(503), Some(SynthesisErrorKind::Overloaded));
        assert_eq!(SynthesisErrorKind::from_status(404), None);
    }

    #[test]
    fn test_message_classification() {
        let cases = [
            ("HTTP 400 Bad Request", SynthesisErrorKind::InvalidRequest),
            ("got 401", SynthesisErrorKind::AuthFailure),
            ("Error 429: quota", SynthesisErrorKind::RateLimited),
            ("The model is overloaded", SynthesisErrorKind::Overloaded),
            ("Response was blocked", SynthesisErrorKind::ContentBlocked),
            ("SAFETY filter", SynthesisErrorKind::ContentBlocked),
            ("Failed to fetch", SynthesisErrorKind::Network),
            ("No audio data received", SynthesisErrorKind::EmptyResponse),
            ("something odd", SynthesisErrorKind::Unknown),
        ];
        for (message, expected) in cases {
            assert_eq!(classify_message(message), expected, "{}", message);
        }
    }

    #[test]
    fn test_status_wins_over_later_rules() {
        assert_eq!(classify_message("400 blocked"), SynthesisErrorKind::InvalidRequest);
    }

    #[test]
    fn test_user_message_is_fixed_text() {
        let err = SynthesisError::from_message("connection reset by network");
        assert_eq!(err.kind, SynthesisErrorKind::Network);
        assert_eq!(
            err.user_message(),
            "Network connection issue. Please check your internet connection."
        );
        assert!(err.to_string().contains("connection reset"));
    }
}

//! Content validation
//!
//! Structural and heuristic checks on free-text payloads, run
//! synchronously before any storage write. The heuristics are cheap
//! and explainable; false positives are acceptable because the user
//! can edit and resubmit.

use std::sync::OnceLock;

use regex::Regex;

use crate::admission::error::AdmissionDenied;

/// Longest allowed run of one repeated character.
const MAX_REPEAT_RUN: usize = 10;

fn shouting_re() -> Option<&'static Regex> {
	static RE: OnceLock<Option<Regex>> = OnceLock::new();
	// Entire text is a 20+ char run of uppercase letters, whitespace
	// and exclamation marks.
	RE.get_or_init(|| Regex::new(r"^[A-Z\s!]{20,}$").ok()).as_ref()
}

fn url_re() -> Option<&'static Regex> {
	static RE: OnceLock<Option<Regex>> = OnceLock::new();
	// URL-like token with 10+ characters after the scheme/www prefix.
	RE.get_or_init(|| Regex::new(r"(?i)(?:https?://|www\.)\S{10,}").ok()).as_ref()
}

/// Validate a free-text payload against length bounds and spam
/// heuristics. Returns the trimmed text on success.
pub fn validate(
	text: Option<&str>,
	min_length: usize,
	max_length: usize,
) -> Result<Box<str>, AdmissionDenied> {
	let Some(text) = text else {
		return Err(AdmissionDenied::InvalidContent { detail: "Content is required".into() });
	};

	let trimmed = text.trim();
	if trimmed.chars().count() < min_length {
		return Err(AdmissionDenied::InvalidContent {
			detail: format!("Content must be at least {} characters", min_length),
		});
	}
	if trimmed.chars().count() > max_length {
		return Err(AdmissionDenied::InvalidContent {
			detail: format!("Content must be less than {} characters", max_length),
		});
	}

	if is_spam(trimmed) {
		return Err(AdmissionDenied::SpamDetected);
	}

	Ok(trimmed.into())
}

/// Heuristic spam patterns: a single character repeated 11+ times,
/// an all-caps shout covering the whole text, an embedded URL-like
/// token, or any non-ASCII character.
fn is_spam(text: &str) -> bool {
	has_repeat_run(text)
		|| shouting_re().is_some_and(|re| re.is_match(text))
		|| url_re().is_some_and(|re| re.is_match(text))
		|| text.chars().any(|c| c > '\u{7f}')
}

/// True if any character repeats more than `MAX_REPEAT_RUN` times
/// consecutively. The regex crate has no backreferences, so this is a
/// direct scan.
fn has_repeat_run(text: &str) -> bool {
	let mut run = 0usize;
	let mut prev: Option<char> = None;
	for c in text.chars() {
		if Some(c) == prev {
			run += 1;
			if run > MAX_REPEAT_RUN {
				return true;
			}
		} else {
			prev = Some(c);
			run = 1;
		}
	}
	false
}


// vim: ts=4

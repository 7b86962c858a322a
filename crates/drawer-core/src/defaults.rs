//! Centralized default constants for Drawer.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own
//! magic numbers.

use chrono::NaiveDate;

// =============================================================================
// UPLOADS
// =============================================================================

/// Maximum accepted upload size in bytes (10 MB).
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// MIME types accepted by the upload endpoints.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/webp",
];

/// Directory (relative to the working directory) where uploads are stored.
pub const UPLOAD_DIR: &str = "uploads";

/// Public URL prefix under which stored uploads are served.
pub const UPLOAD_URL_PREFIX: &str = "/uploads";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Gemini generation model.
pub const GEN_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini API base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Token budget for document extraction calls.
pub const EXTRACTION_MAX_TOKENS: u32 = 16384;

/// Token budget for conversational calls.
pub const CHAT_MAX_TOKENS: u32 = 8192;

// =============================================================================
// CALENDAR
// =============================================================================

/// Offset added to note ids in calendar feeds so reminder events never
/// collide with bill events derived from document ids.
pub const NOTE_EVENT_ID_OFFSET: i32 = 100_000;

/// Maximum characters of note content shown in a reminder event title.
pub const REMINDER_TITLE_LEN: usize = 50;

/// Default inclusive start of a calendar query when none is given.
pub fn calendar_range_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid constant date")
}

/// Default inclusive end of a calendar query when none is given.
pub fn calendar_range_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 12, 31).expect("valid constant date")
}

// =============================================================================
// INSIGHTS
// =============================================================================

/// Upcoming-due reminders fire when the due date is at most this many
/// days away.
pub const DUE_SOON_DAYS: i64 = 7;

/// Negative percent-change dead zone: decreases shallower than this do
/// not produce a comparative insight. Any positive change always does.
pub const DECREASE_ALERT_THRESHOLD_PCT: i64 = -5;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 5000;

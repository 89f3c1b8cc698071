//! Best-effort normalization of loosely-typed backend JSON.
//!
//! The backend's response shapes drifted across dashboard revisions. The
//! helpers here coerce individual fields (`percent`, `risk`, `search`), and
//! `adapt` maps whole payloads onto the canonical schema in `common::types`.

pub mod adapt;
pub mod classify;
pub mod percent;
pub mod risk;
pub mod search;

pub use classify::{classify_direction, classify_signal, proximity_alerts, sentiment_band};
pub use percent::normalize_percent;
pub use risk::normalize_risk_flag;
pub use search::{deep_find_by_key, signals_error};

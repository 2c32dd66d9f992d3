//! Buyer-intent detection from B2B interaction content and metadata.
//!
//! Two layers: a per-interaction extractor that matches hand-raise signals
//! (demo, trial, quote) and subtle signals (pricing, case study, competitor
//! research) against compiled pattern tables, and a per-lead aggregator that
//! rolls the extracted signals into counts plus a one-line summary.

pub mod aggregate;
pub mod extractor;

pub use aggregate::aggregate_lead_intent;
pub use extractor::extract_intent;

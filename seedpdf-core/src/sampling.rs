//! Small value samplers shared by the randomizers.

use chrono::{DateTime, TimeZone, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// Page width of the sampling area (US Letter).
pub const PAGE_WIDTH: f64 = 612.0;
/// Page height of the sampling area (US Letter).
pub const PAGE_HEIGHT: f64 = 792.0;

/// Axis-aligned rectangle `[llx lly urx ury]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    pub fn letter() -> Self {
        Self::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT)
    }

    pub fn is_ordered(&self) -> bool {
        self.llx < self.urx && self.lly < self.ury
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}]",
            format_number(self.llx),
            format_number(self.lly),
            format_number(self.urx),
            format_number(self.ury)
        )
    }
}

/// Format a real the way PDF writers usually do: no trailing zeros.
pub fn format_number(value: f64) -> String {
    let formatted = format!("{value:.2}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Bernoulli draw; probabilities outside [0, 1] saturate.
pub fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    if probability >= 1.0 {
        return true;
    }
    probability > 0.0 && rng.gen::<f64>() < probability
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Alphanumeric string of `len` characters; safe inside a literal string.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
}

/// Rectangle with lower-left strictly below and left of upper-right.
pub fn random_rect<R: Rng + ?Sized>(rng: &mut R) -> Rect {
    let llx = round2(rng.gen_range(0.0..=400.0));
    let lly = round2(rng.gen_range(0.0..=600.0));
    let urx = round2(rng.gen_range(llx + 1.0..=PAGE_WIDTH));
    let ury = round2(rng.gen_range(lly + 1.0..=PAGE_HEIGHT));
    Rect::new(llx, lly, urx, ury)
}

/// RGB components in [0, 1], rendered as a PDF array.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let r = round2(rng.gen_range(0.0..=1.0));
    let g = round2(rng.gen_range(0.0..=1.0));
    let b = round2(rng.gen_range(0.0..=1.0));
    format!(
        "[{} {} {}]",
        format_number(r),
        format_number(g),
        format_number(b)
    )
}

/// Border array `[h v w]`: two small radii and a positive width.
pub fn random_border<R: Rng + ?Sized>(rng: &mut R) -> String {
    let horizontal = rng.gen_range(0..=3);
    let vertical = rng.gen_range(0..=3);
    let width = rng.gen_range(1..=10);
    format!("[{horizontal} {vertical} {width}]")
}

/// Random UTC instant between 2000-01-01 and 2030-01-01 as a PDF date string.
pub fn random_pdf_date<R: Rng + ?Sized>(rng: &mut R) -> String {
    let seconds = rng.gen_range(946_684_800i64..1_893_456_000i64);
    let date = Utc
        .timestamp_opt(seconds, 0)
        .single()
        .unwrap_or_else(Utc::now);
    format_pdf_date(date)
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
pub fn format_pdf_date(date: DateTime<Utc>) -> String {
    let formatted = date.format("D:%Y%m%d%H%M%S");

    // For UTC, the offset is always +00'00
    format!("{formatted}+00'00")
}

// Lesson package pricing with volume discounts.
use site_shared::models::PackagePricing;
use site_shared::utils::round_cents;

pub const MAX_LESSONS: u32 = 52;
pub const MAX_LESSON_MINUTES: u32 = 240;
pub const PACKAGE_SIZES: [i64; 4] = [1, 4, 8, 12];

fn rate_for(minutes: u32) -> f64 {
    match minutes {
        30 => 40.0,
        45 => 55.0,
        60 => 70.0,
        90 => 100.0,
        other => 70.0 / 60.0 * other as f64,
    }
}

fn discount_percent(lessons: u32) -> u32 {
    if lessons >= 12 {
        15
    } else if lessons >= 8 {
        10
    } else if lessons >= 4 {
        5
    } else {
        0
    }
}

/// Out-of-range inputs are clamped rather than rejected: negative counts price as zero,
/// counts above a year of weekly lessons price as [`MAX_LESSONS`].
pub fn calculate_package_pricing(lesson_minutes: i64, lessons: i64) -> PackagePricing {
    let lesson_minutes = lesson_minutes.clamp(0, MAX_LESSON_MINUTES as i64) as u32;
    let lessons = lessons.clamp(0, MAX_LESSONS as i64) as u32;

    let rate = rate_for(lesson_minutes);
    let discount_percent = discount_percent(lessons);
    let price_per_lesson = round_cents(rate * (100 - discount_percent) as f64 / 100.0);
    let subtotal = round_cents(rate * lessons as f64);
    let total = round_cents(price_per_lesson * lessons as f64);

    PackagePricing {
        lessons,
        lesson_minutes,
        price_per_lesson,
        subtotal,
        discount_percent,
        savings: round_cents(subtotal - total),
        total,
    }
}

/// The standard packages for one lesson length.
pub fn package_options(lesson_minutes: i64) -> Vec<PackagePricing> {
    PACKAGE_SIZES
        .iter()
        .map(|&lessons| calculate_package_pricing(lesson_minutes, lessons))
        .collect()
}

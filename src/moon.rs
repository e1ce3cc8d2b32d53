//! Moon phase indicator
//!
//! Simplified Julian-day estimate, good to about a day. Only used for the
//! little phase badge in the footer.

use serde::{Deserialize, Serialize};

/// Mean synodic month in days
const SYNODIC_MONTH: f64 = 29.530_588_2;
/// Julian-day style offset placing a new moon near phase 0
const EPOCH_OFFSET: f64 = 694_039.09;

/// A calendar date (proleptic Gregorian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 1-31
    pub day: u32,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Today in the browser's local time zone
    #[cfg(target_arch = "wasm32")]
    pub fn today() -> Self {
        let now = js_sys::Date::new_0();
        Self {
            year: now.get_full_year() as i32,
            month: now.get_month() + 1,
            day: now.get_date(),
        }
    }

    /// Today (UTC)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn today() -> Self {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        Self::from_unix_days(secs.div_euclid(86_400))
    }

    /// Civil date for a count of days since 1970-01-01
    pub fn from_unix_days(days: i64) -> Self {
        let z = days + 719_468;
        let era = z.div_euclid(146_097);
        let doe = z - era * 146_097;
        let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
        let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
        let year = (yoe + era * 400) as i32 + i32::from(month <= 2);
        Self { year, month, day }
    }
}

/// One of the eight named phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MoonPhase::New => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::Full => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            MoonPhase::New => "\u{1F311}",
            MoonPhase::WaxingCrescent => "\u{1F312}",
            MoonPhase::FirstQuarter => "\u{1F313}",
            MoonPhase::WaxingGibbous => "\u{1F314}",
            MoonPhase::Full => "\u{1F315}",
            MoonPhase::WaningGibbous => "\u{1F316}",
            MoonPhase::LastQuarter => "\u{1F317}",
            MoonPhase::WaningCrescent => "\u{1F318}",
        }
    }

    /// Position in the cycle as a percentage (0 = new, 50 = full)
    pub fn cycle_percent(&self) -> f32 {
        (*self as u8) as f32 * 12.5
    }
}

/// Phase of the moon on `date`
pub fn moon_phase(date: CalendarDate) -> MoonPhase {
    let (c, e) = if date.month < 3 {
        (date.year - 1, date.month + 12)
    } else {
        (date.year, date.month)
    };

    let days = (365.25 * c as f64).floor() + (30.6001 * (e + 1) as f64).floor() + date.day as f64
        - EPOCH_OFFSET;
    let cycles = days / SYNODIC_MONTH;
    let fraction = cycles - cycles.floor();

    let index = (fraction * 8.0).round() as usize;
    MoonPhase::ALL[index % 8]
}

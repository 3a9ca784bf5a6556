mod client_portal;
mod simulated;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::BarSize;

pub use client_portal::{ClientPortalBrokerage, ClientPortalConfig};
pub use simulated::SimulatedBrokerage;

/// Bar date in the brokerage's text form: `YYYYMMDD` for daily bars,
/// `YYYYMMDD  HH:MM:SS` otherwise.
pub(crate) fn format_bar_date(ts: OffsetDateTime, bar_size: BarSize) -> String {
    let formatted = if bar_size == BarSize::OneDay {
        ts.format(format_description!("[year][month][day]"))
    } else {
        ts.format(format_description!(
            "[year][month][day]  [hour]:[minute]:[second]"
        ))
    };
    formatted.unwrap_or_default()
}

//! Time related utils.

use chrono::format::Fixed;
use chrono::format::Item;
use chrono::format::Numeric;
use chrono::format::Pad;
use chrono::SecondsFormat;
use chrono::SubsecRound;
use chrono::Utc;

/// DateTime is the alias for chrono::DateTime<Utc>.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a new DateTime from current time.
pub fn now() -> DateTime {
    Utc::now()
}

/// Drop the sub-second part of the given time.
///
/// Azure only accepts whole seconds in signed timestamps, truncating first keeps
/// `expiry - start` exact.
pub fn truncate_to_seconds(t: DateTime) -> DateTime {
    t.trunc_subsecs(0)
}

/// Format time into http date: `Sun, 06 Nov 1994 08:49:37 GMT`
///
/// ## Note
///
/// HTTP date is slightly different from RFC2822.
///
/// - Timezone is fixed to GMT.
/// - Day must be 2 digit.
pub fn format_http_date(t: DateTime) -> String {
    const HTTP_DATE: &[Item<'static>] = &[
        Item::Fixed(Fixed::ShortWeekdayName),
        Item::Literal(", "),
        Item::Numeric(Numeric::Day, Pad::Zero),
        Item::Literal(" "),
        Item::Fixed(Fixed::ShortMonthName),
        Item::Literal(" "),
        Item::Numeric(Numeric::Year, Pad::Zero),
        Item::Literal(" "),
        Item::Numeric(Numeric::Hour, Pad::Zero),
        Item::Literal(":"),
        Item::Numeric(Numeric::Minute, Pad::Zero),
        Item::Literal(":"),
        Item::Numeric(Numeric::Second, Pad::Zero),
        Item::Literal(" GMT"),
    ];

    t.format_with_items(HTTP_DATE.iter()).to_string()
}

/// Format time into RFC3339 with whole seconds: `2022-03-13T07:20:04Z`
pub fn format_rfc3339(t: DateTime) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

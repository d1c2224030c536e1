//! Canonical string values for JSCalendar's enumerated properties.
//!
//! Objects keep these properties as plain strings so that unknown values
//! survive a decode and can be reported by the validator. Each concept has
//! exactly one allowlist, the enum below.

use std::str::FromStr;

use strum::{AsRefStr, Display, EnumIter, EnumString};

/// True if `value` is one of `E`'s canonical spellings.
pub fn is_known<E: FromStr>(value: &str) -> bool {
    E::from_str(value).is_ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum EventStatus {
    Confirmed,
    Cancelled,
    Tentative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    NeedsAction,
    InProcess,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Progress {
    NeedsAction,
    InProcess,
    Completed,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FreeBusyStatus {
    Free,
    Busy,
    Tentative,
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Privacy {
    Public,
    Private,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ParticipationStatus {
    NeedsAction,
    Accepted,
    Declined,
    Tentative,
    Delegated,
}

impl ParticipationStatus {
    /// The iCalendar PARTSTAT spelling.
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            ParticipationStatus::NeedsAction => "NEEDS-ACTION",
            ParticipationStatus::Accepted => "ACCEPTED",
            ParticipationStatus::Declined => "DECLINED",
            ParticipationStatus::Tentative => "TENTATIVE",
            ParticipationStatus::Delegated => "DELEGATED",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
pub enum ParticipantRole {
    Owner,
    Attendee,
    Optional,
    Informational,
    Chair,
    Contact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ParticipantKind {
    Individual,
    Group,
    Resource,
    Location,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum ScheduleAgent {
    Server,
    Client,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Method {
    Publish,
    Request,
    Reply,
    Add,
    Cancel,
    Refresh,
    Counter,
    #[strum(serialize = "declineCounter")]
    DeclineCounter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
pub enum DescriptionContentType {
    #[strum(serialize = "text/plain")]
    TextPlain,
    #[strum(serialize = "text/html")]
    TextHtml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum RelativeTo {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum AlertAction {
    Display,
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    /// The iCalendar FREQ spelling.
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            Frequency::Yearly => "YEARLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Daily => "DAILY",
            Frequency::Hourly => "HOURLY",
            Frequency::Minutely => "MINUTELY",
            Frequency::Secondly => "SECONDLY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Skip {
    Omit,
    Backward,
    Forward,
}

/// Calendar systems accepted for `rscale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CalendarScale {
    Gregorian,
    Chinese,
    Hebrew,
    Islamic,
    IslamicCivil,
    IslamicTbla,
    Persian,
    Ethiopic,
    Coptic,
    Japanese,
    Buddhist,
    Indian,
}

/// Day codes used by `byDay`. Index order matches `firstDayOfWeek` (0 = Monday).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsRefStr, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Mo,
    Tu,
    We,
    Th,
    Fr,
    Sa,
    Su,
}

impl Weekday {
    /// Accepts two-letter codes or full English names, in any case.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let code = match lower.as_str() {
            "monday" => "mo",
            "tuesday" => "tu",
            "wednesday" => "we",
            "thursday" => "th",
            "friday" => "fr",
            "saturday" => "sa",
            "sunday" => "su",
            other => other,
        };
        Weekday::from_str(code).ok()
    }

    /// The iCalendar BYDAY spelling.
    pub fn as_ics_str(&self) -> &'static str {
        match self {
            Weekday::Mo => "MO",
            Weekday::Tu => "TU",
            Weekday::We => "WE",
            Weekday::Th => "TH",
            Weekday::Fr => "FR",
            Weekday::Sa => "SA",
            Weekday::Su => "SU",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_spellings() {
        assert_eq!(TaskStatus::NeedsAction.as_ref(), "needs-action");
        assert_eq!(Method::DeclineCounter.as_ref(), "declineCounter");
        assert_eq!(CalendarScale::IslamicCivil.as_ref(), "islamic-civil");
        assert_eq!(CalendarScale::IslamicTbla.as_ref(), "islamic-tbla");
        assert_eq!(DescriptionContentType::TextHtml.as_ref(), "text/html");
        assert_eq!(Weekday::Fr.as_ref(), "fr");
        assert_eq!(ScheduleAgent::None.as_ref(), "none");
    }

    #[test]
    fn test_is_known_is_case_sensitive() {
        assert!(is_known::<EventStatus>("confirmed"));
        assert!(!is_known::<EventStatus>("CONFIRMED"));
        assert!(!is_known::<EventStatus>("needs-action"));
        assert!(is_known::<TaskStatus>("needs-action"));
        assert!(!is_known::<TaskStatus>("failed"));
        assert!(is_known::<Progress>("failed"));
    }

    #[test]
    fn test_every_variant_round_trips_through_its_spelling() {
        for role in ParticipantRole::iter() {
            assert_eq!(role.as_ref().parse::<ParticipantRole>().unwrap(), role);
        }
        for freq in Frequency::iter() {
            assert_eq!(freq.as_ics_str().to_lowercase(), freq.as_ref());
        }
    }

    #[test]
    fn test_weekday_from_name() {
        assert_eq!(Weekday::from_name("Friday"), Some(Weekday::Fr));
        assert_eq!(Weekday::from_name("MO"), Some(Weekday::Mo));
        assert_eq!(Weekday::from_name("xx"), None);
    }
}

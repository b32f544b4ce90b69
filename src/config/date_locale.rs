use crate::error::{
    BadDateTimeFormatterSnafu, InvalidLocaleSnafu, InvalidTimezoneSnafu, RosterResult,
};
use icu::{
    calendar::{Date, Iso},
    datetime::{
        DateTimeFormatter, DateTimeFormatterPreferences,
        fieldsets::YMD,
        options::{Alignment, YearStyle},
    },
    locale::Locale,
};
use jiff::{Timestamp, civil, tz::TimeZone};
use jiff_icu::ConvertFrom;
use snafu::ResultExt;

#[derive(Debug, Clone)]
pub struct DateLocaleConfig {
    pub timezone: TimeZone,
    dtf_prefs: DateTimeFormatterPreferences,
}

impl DateLocaleConfig {
    pub fn new(timezone: String, locale: String) -> RosterResult<Self> {
        let timezone = TimeZone::get(&timezone).context(InvalidTimezoneSnafu { tz: timezone })?;
        let locale =
            Locale::try_from_str(&locale).context(InvalidLocaleSnafu { provided: locale })?;

        let mut dtf_prefs = DateTimeFormatterPreferences::default();
        dtf_prefs.locale_preferences = (&locale).into();

        let config = Self {
            timezone,
            dtf_prefs,
        };
        //fail at startup rather than on the first render
        config.created_at_formatter()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn utc_en_us() -> Self {
        Self::new("UTC".to_string(), "en-US".to_string())
            .expect("UTC and en-US are always available")
    }

    /// Builds the formatter used for the `Added:` line of a student card.
    ///
    /// ICU formatters aren't `Send`, so this is built per render rather than stored.
    pub fn created_at_formatter(&self) -> RosterResult<CreatedAtFormatter<'_>> {
        let formatter = DateTimeFormatter::try_new(self.dtf_prefs, {
            let mut fieldset = YMD::short();
            fieldset.alignment = Some(Alignment::Column);
            fieldset.year_style = Some(YearStyle::Full);
            fieldset
        })
        .context(BadDateTimeFormatterSnafu)?;

        Ok(CreatedAtFormatter {
            config: self,
            formatter,
        })
    }

    /// The calendar date a server timestamp falls on, in the configured timezone.
    ///
    /// Timestamps without an offset are taken as civil time already in that zone.
    pub fn local_date(&self, raw: &str) -> Option<civil::Date> {
        let raw = raw.trim();
        if let Ok(timestamp) = raw.parse::<Timestamp>() {
            return Some(timestamp.to_zoned(self.timezone.clone()).date());
        }

        raw.parse::<civil::DateTime>()
            .map(|datetime| datetime.date())
            .or_else(|_| raw.parse::<civil::Date>())
            .ok()
    }
}

pub struct CreatedAtFormatter<'a> {
    config: &'a DateLocaleConfig,
    formatter: DateTimeFormatter<YMD>,
}

impl CreatedAtFormatter<'_> {
    /// Unparseable timestamps come back verbatim.
    pub fn format(&self, raw: &str) -> String {
        let Some(date) = self.config.local_date(raw) else {
            warn!(?raw, "Unable to parse created_at timestamp");
            return raw.to_string();
        };

        let date: Date<Iso> = Date::convert_from(date);
        self.formatter.format(&date).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn offset_timestamps_land_in_the_configured_zone() {
        let utc = DateLocaleConfig::utc_en_us();
        let new_york = DateLocaleConfig::new("America/New_York".to_string(), "en-US".to_string())
            .expect("valid config");

        assert_eq!(utc.local_date("2024-01-01T03:00:00Z"), Some(date(2024, 1, 1)));
        assert_eq!(
            new_york.local_date("2024-01-01T03:00:00Z"),
            Some(date(2023, 12, 31))
        );
    }

    #[test]
    fn naive_timestamps_are_read_as_civil_time() {
        let config = DateLocaleConfig::utc_en_us();

        assert_eq!(
            config.local_date("2024-03-05T17:45:12.123456"),
            Some(date(2024, 3, 5))
        );
        assert_eq!(config.local_date("2024-03-05"), Some(date(2024, 3, 5)));
        assert_eq!(config.local_date("yesterday"), None);
    }

    #[test]
    fn formats_with_the_full_year() {
        let config = DateLocaleConfig::utc_en_us();
        let formatter = config.created_at_formatter().expect("formatter loads");

        let formatted = formatter.format("2024-01-01T00:00:00Z");
        assert!(formatted.contains("2024"), "{formatted}");
        assert_ne!(formatted, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn unparseable_timestamps_are_shown_as_is() {
        let config = DateLocaleConfig::utc_en_us();
        let formatter = config.created_at_formatter().expect("formatter loads");

        assert_eq!(formatter.format("not a date"), "not a date");
    }

    #[test]
    fn rejects_unknown_timezones_and_locales() {
        assert!(DateLocaleConfig::new("Mars/Olympus".to_string(), "en-US".to_string()).is_err());
        assert!(DateLocaleConfig::new("UTC".to_string(), "!!".to_string()).is_err());
    }
}

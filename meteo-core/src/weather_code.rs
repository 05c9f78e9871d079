//! WMO weather interpretation codes as used by Open-Meteo.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

/// Description for codes missing from the table.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Icon for codes missing from the table.
pub const UNKNOWN_ICON: &str = "mdi-weather-cloudy";

/// A single table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WmoEntry {
    pub code: i32,
    pub description: &'static str,
    pub icon: &'static str,
}

const fn entry(code: i32, description: &'static str, icon: &'static str) -> WmoEntry {
    WmoEntry {
        code,
        description,
        icon,
    }
}

/// The full code table, ordered by code.
pub static WMO_TABLE: &[WmoEntry] = &[
    entry(0, "Clear sky", "mdi-weather-sunny"),
    entry(1, "Mainly clear", "mdi-weather-partly-cloudy"),
    entry(2, "Partly cloudy", "mdi-weather-partly-cloudy"),
    entry(3, "Overcast", "mdi-weather-cloudy"),
    entry(45, "Fog", "mdi-weather-fog"),
    entry(48, "Depositing rime fog", "mdi-weather-fog"),
    entry(51, "Light drizzle", "mdi-weather-partly-rainy"),
    entry(53, "Moderate drizzle", "mdi-weather-partly-rainy"),
    entry(55, "Dense drizzle", "mdi-weather-partly-rainy"),
    entry(61, "Slight rain", "mdi-weather-rainy"),
    entry(63, "Moderate rain", "mdi-weather-rainy"),
    entry(65, "Heavy rain", "mdi-weather-pouring"),
    entry(71, "Slight snow fall", "mdi-weather-snowy"),
    entry(73, "Moderate snow fall", "mdi-weather-snowy"),
    entry(75, "Heavy snow fall", "mdi-weather-snowy-heavy"),
    entry(77, "Snow grains", "mdi-weather-snowy"),
    entry(80, "Slight rain showers", "mdi-weather-partly-rainy"),
    entry(81, "Moderate rain showers", "mdi-weather-rainy"),
    entry(82, "Violent rain showers", "mdi-weather-pouring"),
    entry(85, "Slight snow showers", "mdi-weather-snowy"),
    entry(86, "Heavy snow showers", "mdi-weather-snowy-heavy"),
    entry(95, "Thunderstorm", "mdi-weather-lightning-rainy"),
    entry(96, "Thunderstorm with slight hail", "mdi-weather-lightning-rainy"),
    entry(99, "Thunderstorm with heavy hail", "mdi-weather-lightning-rainy"),
];

/// WMO weather code as reported upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WmoCode(pub i32);

impl WmoCode {
    pub fn entry(self) -> Option<&'static WmoEntry> {
        WMO_TABLE
            .binary_search_by_key(&self.0, |e| e.code)
            .ok()
            .map(|idx| &WMO_TABLE[idx])
    }

    pub fn description(self) -> &'static str {
        self.entry().map_or(UNKNOWN_DESCRIPTION, |e| e.description)
    }

    pub fn icon(self) -> &'static str {
        self.entry().map_or(UNKNOWN_ICON, |e| e.icon)
    }

    /// Description and icon in one lookup, so both always come from the same row.
    pub fn display(self) -> (&'static str, &'static str) {
        match self.entry() {
            Some(e) => (e.description, e.icon),
            None => (UNKNOWN_DESCRIPTION, UNKNOWN_ICON),
        }
    }
}

pub fn describe_code(code: i32) -> &'static str {
    WmoCode(code).description()
}

pub fn icon_for(code: i32) -> &'static str {
    WmoCode(code).icon()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_unique() {
        assert!(WMO_TABLE.windows(2).all(|w| w[0].code < w[1].code));
    }

    #[test]
    fn full_table_regression() {
        let expected: &[(i32, &str, &str)] = &[
            (0, "Clear sky", "mdi-weather-sunny"),
            (1, "Mainly clear", "mdi-weather-partly-cloudy"),
            (2, "Partly cloudy", "mdi-weather-partly-cloudy"),
            (3, "Overcast", "mdi-weather-cloudy"),
            (45, "Fog", "mdi-weather-fog"),
            (48, "Depositing rime fog", "mdi-weather-fog"),
            (51, "Light drizzle", "mdi-weather-partly-rainy"),
            (53, "Moderate drizzle", "mdi-weather-partly-rainy"),
            (55, "Dense drizzle", "mdi-weather-partly-rainy"),
            (61, "Slight rain", "mdi-weather-rainy"),
            (63, "Moderate rain", "mdi-weather-rainy"),
            (65, "Heavy rain", "mdi-weather-pouring"),
            (71, "Slight snow fall", "mdi-weather-snowy"),
            (73, "Moderate snow fall", "mdi-weather-snowy"),
            (75, "Heavy snow fall", "mdi-weather-snowy-heavy"),
            (77, "Snow grains", "mdi-weather-snowy"),
            (80, "Slight rain showers", "mdi-weather-partly-rainy"),
            (81, "Moderate rain showers", "mdi-weather-rainy"),
            (82, "Violent rain showers", "mdi-weather-pouring"),
            (85, "Slight snow showers", "mdi-weather-snowy"),
            (86, "Heavy snow showers", "mdi-weather-snowy-heavy"),
            (95, "Thunderstorm", "mdi-weather-lightning-rainy"),
            (96, "Thunderstorm with slight hail", "mdi-weather-lightning-rainy"),
            (99, "Thunderstorm with heavy hail", "mdi-weather-lightning-rainy"),
        ];

        assert_eq!(WMO_TABLE.len(), expected.len());
        for (code, description, icon) in expected {
            assert_eq!(describe_code(*code), *description, "code {code}");
            assert_eq!(icon_for(*code), *icon, "code {code}");
        }
    }

    #[test]
    fn unknown_codes_fall_back() {
        for code in [-1, 4, 44, 56, 66, 100, i32::MIN, i32::MAX] {
            assert_eq!(describe_code(code), UNKNOWN_DESCRIPTION);
            assert_eq!(icon_for(code), UNKNOWN_ICON);
        }
    }

    #[test]
    fn lookups_are_total() {
        for code in -200..=200 {
            assert!(!describe_code(code).is_empty());
            assert!(!icon_for(code).is_empty());
            assert_eq!(
                WmoCode(code).display(),
                (describe_code(code), icon_for(code))
            );
        }
    }
}

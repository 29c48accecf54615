//! WMO weather interpretation codes.

/// Short description for a WMO code, or an empty string when the code is unknown.
pub fn describe(code: f64) -> &'static str {
    let Some(code) = as_code(code) else {
        return "";
    };

    match code {
        0 => "Clear",
        1 => "Mostly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Icy fog",
        51 => "Light drizzle",
        53 => "Drizzle",
        55 => "Heavy drizzle",
        56 => "Light freezing drizzle",
        57 => "Heavy freezing drizzle",
        61 => "Light rain",
        63 => "Rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Light snowfall",
        73 => "Snowfall",
        75 => "Heavy snowfall",
        77 => "Snow grains",
        80 => "Light rain showers",
        81 => "Rain showers",
        82 => "Heavy rain showers",
        85 => "Light snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with light hail",
        99 => "Thunderstorm with heavy hail",
        _ => "",
    }
}

const CLEAR: &str = "   \\ | /\n  -- O --\n   / | \\";
const PARTLY: &str = "  \\ /\n -- .--.\n   (    ).";
const CLOUDY: &str = "    .--.\n .-(    ).\n(___.__)__)";
const FOG: &str = " _ - _ - _\n  _ - _ -\n _ - _ - _";
const DRIZZLE: &str = "    .--.\n .-(    ).\n  ' ' ' '";
const RAIN: &str = "    .--.\n .-(    ).\n  / / / /";
const SNOW: &str = "    .--.\n .-(    ).\n  * * * *";
const THUNDER: &str = "    .--.\n .-(    ).\n   /_ /_";

/// Multi-line ASCII glyph for a WMO code, or an empty string when the code is unknown.
pub fn icon(code: f64) -> &'static str {
    let Some(code) = as_code(code) else {
        return "";
    };

    match code {
        0 | 1 => CLEAR,
        2 => PARTLY,
        3 => CLOUDY,
        45 | 48 => FOG,
        51 | 53 | 55 | 56 | 57 => DRIZZLE,
        61 | 63 | 65 | 66 | 67 | 80 | 81 | 82 => RAIN,
        71 | 73 | 75 | 77 | 85 | 86 => SNOW,
        95 | 96 | 99 => THUNDER,
        _ => "",
    }
}

/// Every code that has an icon, in ascending order.
pub fn icon_codes() -> Vec<u8> {
    (0..=99u8)
        .filter(|c| !icon(f64::from(*c)).is_empty())
        .collect()
}

fn as_code(code: f64) -> Option<u8> {
    if code.fract() != 0.0 || !(0.0..=255.0).contains(&code) {
        return None;
    }
    Some(code as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_have_descriptions() {
        assert_eq!(describe(0.0), "Clear");
        assert_eq!(describe(63.0), "Rain");
        assert_eq!(describe(99.0), "Thunderstorm with heavy hail");
    }

    #[test]
    fn unknown_codes_are_empty() {
        assert_eq!(describe(4.0), "");
        assert_eq!(describe(2.5), "");
        assert_eq!(describe(-1.0), "");
        assert_eq!(icon(100.0), "");
    }

    #[test]
    fn every_described_code_has_an_icon() {
        let codes = icon_codes();
        for code in 0..=99u8 {
            let described = !describe(f64::from(code)).is_empty();
            assert_eq!(described, codes.contains(&code), "code {code}");
        }
    }
}

/// A station equation: the station `back` on the incoming side of `position`
/// is renamed `ahead` from there on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StationEquation {
    pub back: f64,
    pub ahead: f64,
    /// Distance along the alignment at which the equation applies
    /// (LandXML `staInternal`), if known.
    pub position: Option<f64>,
    /// `increasing` or `decreasing`, as written in the source document.
    pub increment: Option<String>,
    pub description: Option<String>,
}

/// Parses station text such as `12+34.56` (= 1234.56) or `1234.56`.
///
/// Returns `None` unless the text is a finite number once the `+` separator
/// is removed.
#[must_use]
pub fn parse_station(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.matches('+').count() > 1 || text.starts_with('+') || text.ends_with('+') {
        return None;
    }
    text.replace('+', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Formats a station as `NN+NN.NN` for the given station length (100 or
/// 1000 document units).
#[must_use]
pub fn format_station(station: f64, station_length: f64) -> String {
    let digits = if station_length >= 1000.0 { 3 } else { 2 };

    // Round to whole hundredths before splitting off the minor part.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (hundredths, per_station) = (
        (station.abs() * 100.0).round() as u64,
        ((station_length * 100.0).round() as u64).max(1),
    );
    let sign = if station < 0.0 && hundredths > 0 { "-" } else { "" };
    let major = hundredths / per_station;
    #[allow(clippy::cast_precision_loss)]
    let minor = (hundredths % per_station) as f64 / 100.0;
    format!(
        "{sign}{major}+{minor:0width$.2}",
        width = digits + 3
    )
}

/// Converts a station to distance along the alignment.
///
/// Station ranges run from `start_station` to the first equation's `back`,
/// then from each equation's `ahead` to the next one's `back`; the last range
/// is open ended. Returns `None` if the station lies in no range.
#[must_use]
pub fn station_to_distance(
    station: f64,
    start_station: f64,
    equations: &[StationEquation],
) -> Option<f64> {
    let mut range_start = start_station;
    let mut distance = 0.0;

    for equation in equations {
        if (range_start..=equation.back).contains(&station) {
            return Some(distance + station - range_start);
        }
        distance += equation.back - range_start;
        range_start = equation.ahead;
    }

    (station >= range_start).then(|| distance + station - range_start)
}

/// Radius of a curve with the given degree of curve (arc definition, in
/// radians) over `station_length`.
#[must_use]
pub fn radius_from_degree_of_curve(degree: f64, station_length: f64) -> f64 {
    station_length / degree
}

/// Degree of curve (arc definition, in radians) of a curve with the given
/// radius over `station_length`.
#[must_use]
pub fn degree_of_curve_from_radius(radius: f64, station_length: f64) -> f64 {
    station_length / radius
}

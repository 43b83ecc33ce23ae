use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A monitored point of interest. Coordinates are WGS84 degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct StationsFile {
    pub stations: Vec<Station>,
}

/// Load and validate the station list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stations(path: &Path) -> Result<StationsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_stations(&content)
}

/// Parse and validate a station list from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_stations(content: &str) -> Result<StationsFile, ConfigError> {
    let stations_file: StationsFile = serde_yaml::from_str(content)?;
    validate_stations(&stations_file)?;
    Ok(stations_file)
}

fn validate_stations(stations_file: &StationsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for station in &stations_file.stations {
        if station.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "station name must be non-empty".to_string(),
            ));
        }

        if !station.lat.is_finite() || !(-90.0..=90.0).contains(&station.lat) {
            return Err(ConfigError::Validation(format!(
                "station '{}' has invalid latitude {}; must be within [-90, 90]",
                station.name, station.lat
            )));
        }

        if !station.lon.is_finite() || !(-180.0..=180.0).contains(&station.lon) {
            return Err(ConfigError::Validation(format!(
                "station '{}' has invalid longitude {}; must be within [-180, 180]",
                station.name, station.lon
            )));
        }

        if !seen_names.insert(station.name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate station name: '{}'",
                station.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parse_stations_accepts_valid_list() {
        let yaml = r"
stations:
  - name: Gordon
    lat: -42.73
    lon: 146.05
  - name: Poatina
    lat: -41.81
    lon: 146.91
";
        let file = parse_stations(yaml).expect("valid stations");
        assert_eq!(file.stations.len(), 2);
        assert_eq!(file.stations[0].name, "Gordon");
        assert!((file.stations[1].lon - 146.91).abs() < 1e-9);
    }

    #[test]
    fn parse_stations_accepts_boundary_coordinates() {
        let yaml = r"
stations:
  - name: Pole
    lat: -90.0
    lon: 180.0
";
        assert!(parse_stations(yaml).is_ok());
    }

    #[test]
    fn parse_stations_rejects_out_of_range_latitude() {
        let yaml = r"
stations:
  - name: Nowhere
    lat: 91.0
    lon: 0.0
";
        let err = parse_stations(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("latitude")),
            "got: {err:?}"
        );
    }

    #[test]
    fn parse_stations_rejects_out_of_range_longitude() {
        let yaml = r"
stations:
  - name: Nowhere
    lat: 0.0
    lon: -180.5
";
        let err = parse_stations(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("longitude")));
    }

    #[test]
    fn parse_stations_rejects_blank_name() {
        let yaml = r#"
stations:
  - name: "  "
    lat: 0.0
    lon: 0.0
"#;
        assert!(matches!(
            parse_stations(yaml),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn parse_stations_rejects_duplicate_names_case_insensitively() {
        let yaml = r"
stations:
  - name: Gordon
    lat: -42.73
    lon: 146.05
  - name: gordon
    lat: -42.0
    lon: 146.0
";
        let err = parse_stations(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate")));
    }

    #[test]
    fn parse_stations_reports_malformed_yaml() {
        let err = parse_stations("stations: [ {name: A, lat: }").unwrap_err();
        assert!(matches!(err, ConfigError::StationsFileParse(_)));
    }

    #[test]
    fn load_stations_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "stations:\n  - name: Trevallyn\n    lat: -41.43\n    lon: 147.11")
            .expect("write");
        let loaded = load_stations(file.path()).expect("load");
        assert_eq!(loaded.stations[0].name, "Trevallyn");
    }

    #[test]
    fn load_stations_reports_missing_file() {
        let err = load_stations(Path::new("/definitely/not/here/stations.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::StationsFileIo { .. }));
    }
}

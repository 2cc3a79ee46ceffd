//! Station file naming.

#[derive(Debug, Clone, PartialEq)]
/// An ISD-Lite archive file name, `USAF-WBAN-YEAR.gz`. See the
/// [ISD-Lite format document](https://www.ncei.noaa.gov/pub/data/noaa/isd-lite/isd-lite-format.pdf).
pub struct StationFile {
    pub usaf: Option<String>,
    pub wban: Option<String>,
    pub year: Option<i32>,
    stem: String,
}

impl StationFile {
    pub fn from_file_name(file_name: &str) -> Self {
        let stem = file_name
            .rsplit('/')
            .next()
            .unwrap_or(file_name)
            .trim_end_matches(".gz")
            .to_string();

        let parts: Vec<String> = stem.split('-').map(str::to_string).collect();

        match parts.as_slice() {
            [usaf, wban, year] if year.parse::<i32>().is_ok() => StationFile {
                usaf: Some(usaf.clone()),
                wban: Some(wban.clone()),
                year: year.parse().ok(),
                stem,
            },
            _ => StationFile {
                usaf: None,
                wban: None,
                year: None,
                stem,
            },
        }
    }

    /// Identifier used for output tables: the file name without `.gz`.
    pub fn identifier(&self) -> &str {
        &self.stem
    }

    pub fn station_id(&self) -> Option<String> {
        match (&self.usaf, &self.wban) {
            (Some(usaf), Some(wban)) => Some(format!("{}-{}", usaf, wban)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn should_parse_isd_lite_file_name() {
        let f = StationFile::from_file_name("010010-99999-2017.gz");

        assert_eq!(f.usaf.as_deref(), Some("010010"));
        assert_eq!(f.wban.as_deref(), Some("99999"));
        assert_eq!(f.year, Some(2017));
        assert_eq!(f.identifier(), "010010-99999-2017");
        assert_eq!(f.station_id(), Some("010010-99999".to_string()));
    }

    #[test]
    fn should_keep_stem_for_unknown_file() {
        let f = StationFile::from_file_name("isd-lite-format.pdf");

        assert_eq!(f.usaf, None);
        assert_eq!(f.identifier(), "isd-lite-format.pdf");
        assert_eq!(f.station_id(), None);
    }

    #[test]
    fn should_strip_directory() {
        let f = StationFile::from_file_name("2017/722950-23174-2017.gz");
        assert_eq!(f.identifier(), "722950-23174-2017");
    }
}

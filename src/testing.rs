//! In-memory remote and fixture builders shared by the unit tests.

use crate::remote::error::FetchError;
use crate::remote::RemoteSource;
use crate::types::station::StationMetadata;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use zip::write::SimpleFileOptions;

/// Serves fixed directory listings and file payloads. A file may have several payloads: each
/// fetch takes the next one and the last one repeats.
#[derive(Default)]
pub struct FakeRemote {
    listings: Mutex<HashMap<String, Vec<String>>>,
    payloads: Mutex<HashMap<(String, String), Vec<Vec<u8>>>>,
    fetched: Mutex<HashMap<String, usize>>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, directory: &str, name: &str, bytes: Vec<u8>) -> Self {
        self.with_payloads(directory, name, vec![bytes])
    }

    pub fn with_payloads(self, directory: &str, name: &str, payloads: Vec<Vec<u8>>) -> Self {
        self.listings
            .lock()
            .unwrap()
            .entry(directory.to_string())
            .or_default()
            .push(name.to_string());
        self.payloads
            .lock()
            .unwrap()
            .insert((directory.to_string(), name.to_string()), payloads);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn network_calls(&self) -> usize {
        self.list_calls() + self.fetch_calls()
    }

    pub fn fetches_of(&self, name: &str) -> usize {
        self.fetched.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl RemoteSource for FakeRemote {
    async fn list(&self, directory: &str) -> Result<Vec<String>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .listings
            .lock()
            .unwrap()
            .get(directory)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch(&self, directory: &str, file_name: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let count = {
            let mut fetched = self.fetched.lock().unwrap();
            let count = fetched.entry(file_name.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let payloads = self.payloads.lock().unwrap();
        let sequence = payloads
            .get(&(directory.to_string(), file_name.to_string()))
            .ok_or_else(|| {
                FetchError::DownloadIo(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{directory}/{file_name}"),
                ))
            })?;
        let index = (count - 1).min(sequence.len() - 1);
        Ok(sequence[index].clone())
    }
}

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y%m%d").unwrap()
}

pub fn station(id: u32, name: &str, start: &str, end: &str) -> StationMetadata {
    StationMetadata {
        id,
        start: date(start),
        end: date(end),
        elevation: 443.0,
        latitude: 47.6952,
        longitude: 9.1307,
        name: name.to_string(),
        region: "Baden-Württemberg".to_string(),
    }
}

pub fn located(mut station: StationMetadata, latitude: f64, longitude: f64) -> StationMetadata {
    station.latitude = latitude;
    station.longitude = longitude;
    station
}

/// Renders stations in the fixed-width roster layout, header included.
pub fn roster_text(stations: &[StationMetadata]) -> String {
    let mut text = String::from(
        "Stations_id von_datum bis_datum Stationshoehe geoBreite geoLaenge Stationsname Bundesland\n\
         ----------- --------- --------- ------------- --------- --------- ----------------------------------------- ----------\n",
    );
    for s in stations {
        text.push_str(&format!(
            "{:05} {} {} {:>14} {:>11.4} {:>9.4} {:<41}{}\n",
            s.id,
            s.start.format("%Y%m%d"),
            s.end.format("%Y%m%d"),
            s.elevation,
            s.latitude,
            s.longitude,
            s.name,
            s.region
        ));
    }
    text
}

pub fn latin1(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

pub fn roster_bytes(stations: &[StationMetadata]) -> Vec<u8> {
    latin1(&roster_text(stations))
}

/// A zip archive holding the given members.
pub fn zip_bytes(members: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in members {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// A station archive the way the remote ships them: metadata members plus one `produkt_` file.
pub fn station_zip(stem: &str, data: &str) -> Vec<u8> {
    let product = format!("produkt_{stem}.txt");
    zip_bytes(&[
        ("Metadaten_Geographie.txt", b"Stations_id;Stationshoehe\n"),
        (product.as_str(), latin1(data).as_slice()),
    ])
}

/// Hourly air temperature data file with one row per `(MESS_DATUM, TT_TU)` pair.
pub fn hourly_air_data(station_id: u32, rows: &[(&str, &str)]) -> String {
    let mut text = String::from("STATIONS_ID;MESS_DATUM;QN_9;TT_TU;RF_TU;eor\n");
    for (timestamp, value) in rows {
        text.push_str(&format!(
            "{station_id:>11};{timestamp};    3;{value:>6};  80.0;eor\n"
        ));
    }
    text
}

/// Daily `kl` rows from `first` to `last` inclusive, with the mean temperature set to `value`.
pub fn daily_kl_data(station_id: u32, first: NaiveDate, last: NaiveDate, value: f64) -> String {
    let mut text = String::from(
        "STATIONS_ID;MESS_DATUM;QN_3;  FX;  FM;QN_4; RSK;RSKF; SDK;SHK_TAG;  NM; VPM;  PM; TMK; UPM; TXK; TNK; TGK;eor\n",
    );
    for day in first.iter_days().take_while(|d| *d <= last) {
        text.push_str(&format!(
            "{station_id:>11};{};   10;  -999;   2.1;   3;   0.0;   0;  5.2;   0;   6.3;  8.1; 965.1;{value:>5.1};  78.0;  12.0;   1.0;  -1.0;eor\n",
            day.format("%Y%m%d"),
        ));
    }
    text
}

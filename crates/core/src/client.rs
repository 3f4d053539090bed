//! HTTP client for the data.police.uk street crime API.
//!
//! Builds point and polygon queries, normalizes responses into
//! [`CrimeRecord`]s and classifies the failure modes the UI distinguishes:
//! the remote 10,000-record cap (HTTP 503), degenerate geometry, and
//! everything else. Queries are never retried; each failure is terminal and
//! the user re-issues the search.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::model::{CrimeRecord, LatLng};
use url::Url;

/// Status the API uses to signal that the query matches more than its
/// 10,000-record cap.
const TOO_MANY_RESULTS_STATUS: u16 = 503;

/// Search geometry of a single query.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Fixed-radius search around one coordinate; the radius is defined by
    /// the remote API.
    Point(LatLng),
    /// Search bounded by a user-drawn polygon. Must have at least 3 vertices.
    Polygon(Vec<LatLng>),
}

/// Client for the street crime endpoint.
pub struct PoliceClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl PoliceClient {
    pub fn new(config: &Config) -> Result<Self> {
        let endpoint = Url::parse(&config.api_url)
            .map_err(|e| AppError::Config(format!("Invalid API URL: {e}")))?;

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
        })
    }

    /// Fetches crimes within the API-defined radius around a point.
    pub async fn fetch_by_point(&self, point: LatLng, month: &str) -> Result<Vec<CrimeRecord>> {
        let url = self.query_url(month, &Geometry::Point(point))?;
        self.execute(url).await
    }

    /// Fetches crimes inside a polygon boundary.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidGeometry`] for fewer than 3 vertices. The
    /// UI disables area search before that point; this guards the seam for
    /// library consumers.
    pub async fn fetch_by_area(&self, vertices: &[LatLng], month: &str) -> Result<Vec<CrimeRecord>> {
        let url = self.query_url(month, &Geometry::Polygon(vertices.to_vec()))?;
        self.execute(url).await
    }

    /// Builds the request URL for a month and geometry.
    ///
    /// The polygon boundary is encoded as ordered `lat,lng` pairs joined by
    /// `:`, the format the API documents. The query string is assembled by
    /// hand to keep those delimiters literal on the wire.
    fn query_url(&self, month: &str, geometry: &Geometry) -> Result<Url> {
        let query = match geometry {
            Geometry::Point(point) => {
                format!("date={month}&lat={}&lng={}", point.lat, point.lng)
            }
            Geometry::Polygon(vertices) => {
                if vertices.len() < 3 {
                    return Err(AppError::InvalidGeometry(vertices.len()));
                }
                format!("date={month}&poly={}", poly_param(vertices))
            }
        };

        Url::parse(&format!("{}?{query}", self.endpoint))
            .map_err(|e| AppError::Config(format!("Invalid query URL: {e}")))
    }

    async fn execute(&self, url: Url) -> Result<Vec<CrimeRecord>> {
        log::debug!("GET {url}");
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if status.as_u16() == TOO_MANY_RESULTS_STATUS {
            return Err(AppError::TooManyResults);
        }
        if !status.is_success() {
            return Err(AppError::Status(status.as_u16()));
        }

        let records: Vec<CrimeRecord> = response.json().await?;
        log::debug!("received {} records", records.len());
        Ok(records)
    }
}

/// Encodes polygon vertices as `lat1,lng1:lat2,lng2:...`.
fn poly_param(vertices: &[LatLng]) -> String {
    vertices
        .iter()
        .map(|v| format!("{},{}", v.lat, v.lng))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one canned HTTP response on an ephemeral port and reports the
    /// raw request it received.
    fn serve_once(response: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let read = stream.read(&mut buf).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..read]).to_string());
                let _ = stream.write_all(response.as_bytes());
            }
        });
        (format!("http://{addr}"), rx)
    }

    fn json_response(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
    }

    fn client_for(url: &str) -> PoliceClient {
        let config = Config {
            api_url: url.to_string(),
            default_month: "2024-01".to_string(),
        };
        PoliceClient::new(&config).unwrap()
    }

    fn vertices() -> Vec<LatLng> {
        vec![
            LatLng::new(52.63, -1.13),
            LatLng::new(52.64, -1.12),
            LatLng::new(52.62, -1.11),
        ]
    }

    const THREE_RECORDS: &str = r#"[
        {"category": "burglary",
         "location": {"latitude": "52.630", "longitude": "-1.130", "street": {"name": "On or near High Street"}},
         "month": "2024-01",
         "outcome_status": {"category": "Under investigation"}},
        {"category": "drugs",
         "location": {"latitude": "52.630", "longitude": "-1.130", "street": {"name": "On or near High Street"}},
         "month": "2024-01",
         "outcome_status": null},
        {"category": "robbery",
         "location": {"latitude": "52.640", "longitude": "-1.120", "street": {"name": "On or near Park Road"}},
         "month": "2024-01",
         "outcome_status": null}
    ]"#;

    #[test]
    fn point_query_url_carries_date_and_coordinates() {
        let client = client_for("https://data.police.uk/api/crimes-street/all-crime");
        let url = client
            .query_url("2024-01", &Geometry::Point(LatLng::new(52.63, -1.13)))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.police.uk/api/crimes-street/all-crime?date=2024-01&lat=52.63&lng=-1.13"
        );
    }

    #[test]
    fn polygon_query_url_joins_vertices_with_colons() {
        let client = client_for("https://data.police.uk/api/crimes-street/all-crime");
        let url = client
            .query_url("2024-01", &Geometry::Polygon(vertices()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://data.police.uk/api/crimes-street/all-crime?date=2024-01&poly=52.63,-1.13:52.64,-1.12:52.62,-1.11"
        );
    }

    #[test]
    fn polygon_query_url_rejects_degenerate_polygons() {
        let client = client_for("https://data.police.uk/api/crimes-street/all-crime");
        let two = vec![LatLng::new(52.63, -1.13), LatLng::new(52.64, -1.12)];
        let err = client
            .query_url("2024-01", &Geometry::Polygon(two))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidGeometry(2)));
    }

    #[tokio::test]
    async fn point_fetch_sends_one_get_and_parses_records() {
        let (url, requests) = serve_once(json_response(THREE_RECORDS));
        let client = client_for(&url);

        let records = client
            .fetch_by_point(LatLng::new(52.63, -1.13), "2024-01")
            .await
            .unwrap();

        let request = requests.recv().unwrap();
        let request_line = request.lines().next().unwrap_or_default();
        assert!(request_line.starts_with("GET "));
        assert!(request_line.contains("date=2024-01"));
        assert!(request_line.contains("lat=52.63"));
        assert!(request_line.contains("lng=-1.13"));

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].category, "burglary");
        assert!(records[0].coords().is_some());
    }

    #[tokio::test]
    async fn area_fetch_accepts_empty_result_sets() {
        let (url, _requests) = serve_once(json_response("[]"));
        let client = client_for(&url);

        let records = client.fetch_by_area(&vertices(), "2024-01").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn remote_cap_maps_to_too_many_results() {
        let response = "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let (url, _requests) = serve_once(response.to_string());
        let client = client_for(&url);

        let err = client.fetch_by_area(&vertices(), "2024-01").await.unwrap_err();
        assert!(matches!(err, AppError::TooManyResults));
    }

    #[tokio::test]
    async fn other_server_errors_map_to_status() {
        let response = "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";
        let (url, _requests) = serve_once(response.to_string());
        let client = client_for(&url);

        let err = client
            .fetch_by_point(LatLng::new(52.63, -1.13), "2024-01")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Status(500)));
    }

    #[tokio::test]
    async fn degenerate_polygon_never_reaches_the_network() {
        // Unroutable endpoint: the call must fail on geometry before any I/O.
        let client = client_for("http://127.0.0.1:1");
        let one = vec![LatLng::new(52.63, -1.13)];

        let err = client.fetch_by_area(&one, "2024-01").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidGeometry(1)));
    }
}

//! Connector reaching both a local InfluxDB (`http://localhost:8086`) and
//! InfluxDB Cloud over TLS (`https://<region>.cloud2.influxdata.com`).

use std::time::Duration;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;

/// Create the connector used by [`HyperClient`](crate::HyperClient).
///
/// `https://` goes through rustls with the Mozilla roots from
/// `webpki-roots`, which cover the certificates InfluxDB Cloud serves.
/// Plain `http://` is accepted too, since a self-hosted server listens
/// without TLS unless `tls-cert` is configured.
#[must_use]
pub fn https_connector(connect_timeout: Duration) -> HttpsConnector<HttpConnector> {
    let root_store: rustls::RootCertStore =
        webpki_roots::TLS_SERVER_ROOTS.iter().cloned().collect();

    let tls_config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    let mut http = HttpConnector::new();
    http.set_connect_timeout(Some(connect_timeout));
    http.enforce_http(false);

    HttpsConnectorBuilder::new()
        .with_tls_config(tls_config)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_connector() {
        let _connector = https_connector(Duration::from_secs(1));
    }
}

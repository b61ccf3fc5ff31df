//! Firmware transfer, pushed in the request body or pulled by the board

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use url::Url;

use crate::config::UploadConfig;
use crate::errors::{OtaError, Phase, Result};
use crate::models::{FirmwareImage, Payload, TransferResult};
use crate::server::SketchServer;
use crate::transport::{HttpRequest, TransferObserver, Transport};
use crate::utils::network;

pub struct UploadService<'a> {
    config: &'a UploadConfig,
    transport: &'a dyn Transport,
    observer: Arc<dyn TransferObserver>,
}

impl<'a> UploadService<'a> {
    pub fn new(
        config: &'a UploadConfig,
        transport: &'a dyn Transport,
        observer: Arc<dyn TransferObserver>,
    ) -> Self {
        Self {
            config,
            transport,
            observer,
        }
    }

    /// Send the sketch to `endpoint`; anything but a 200 answer fails the run
    pub async fn run(&self, endpoint: &str, sketch: &Path) -> Result<TransferResult> {
        let image = FirmwareImage::load(sketch).await?;
        let mut payload = image.payload(self.config.binary);

        let served_url = if self.config.self_serve {
            let url = self.serve(&image).await?;
            println!("📡 Serving sketch on {}", url);
            payload = Payload::download_url(&url, self.config.binary);
            Some(url)
        } else {
            None
        };

        let url = self.config.endpoint_url(endpoint)?;
        log::debug!(
            "Uploading {} bytes as {} to {}",
            payload.body.len(),
            payload.content_type,
            url
        );

        let request = HttpRequest::post(url, payload.body, payload.content_type)
            .with_credentials(self.config.credentials.clone());

        let response = self
            .transport
            .execute(request, self.observer.clone())
            .await
            .map_err(|source| OtaError::Transport {
                phase: Phase::Upload,
                source,
            })?;

        if response.status != 200 {
            return Err(OtaError::RemoteRejection {
                status: response.status,
                body: response.body,
            });
        }

        if self.config.verbose {
            println!("{}", response.body);
            println!("✅ Sketch uploaded successfully");
        }

        Ok(TransferResult {
            status: response.status,
            body: response.body,
            served_url,
        })
    }

    /// Publish the sketch directory and return the URL the board should fetch
    async fn serve(&self, image: &FirmwareImage) -> Result<String> {
        let file_name = image.file_name().ok_or_else(|| {
            OtaError::Config(format!("{} has no file name", image.path().display()))
        })?;

        let local_ip = network::detect_local_ip(&self.config.address, self.config.port).await?;
        let bind_addr = serve_bind_addr(local_ip, self.config.serve_port());
        let server = SketchServer::start(&image.directory(), bind_addr)?;
        match served_file_url(local_ip, server.local_addr().port(), &file_name) {
            Ok(url) => {
                server.detach();
                Ok(url)
            }
            Err(e) => {
                server.stop();
                Err(e)
            }
        }
    }
}

/// Wildcard address of the same family as the address handed to the board
pub fn serve_bind_addr(local_ip: IpAddr, port: u16) -> SocketAddr {
    match local_ip {
        IpAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        IpAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
    }
}

/// `http://<ip>:<port>/<file name>` as seen from the board.
///
/// The port is always spelled out and the file name is encoded as a single
/// path segment.
pub fn served_file_url(ip: IpAddr, port: u16, file_name: &str) -> Result<String> {
    let host = match ip {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{}]", v6),
    };

    let mut path = Url::parse("http://localhost/")?;
    path.path_segments_mut()
        .map_err(|_| OtaError::RequestBuild("Base URL cannot carry a path".to_string()))?
        .pop_if_empty()
        .push(file_name);

    Ok(format!("http://{}:{}{}", host, port, path.path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_served_file_url() {
        let url = served_file_url(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 17)), 8266, "blink.bin")
            .unwrap();
        assert_eq!(url, "http://10.0.0.17:8266/blink.bin");
    }

    #[test]
    fn test_served_file_url_escapes_and_brackets() {
        let url = served_file_url(IpAddr::V6(Ipv6Addr::LOCALHOST), 8266, "my sketch.bin").unwrap();
        assert_eq!(url, "http://[::1]:8266/my%20sketch.bin");
    }

    #[test]
    fn test_served_file_url_keeps_default_port() {
        let url =
            served_file_url(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 17)), 80, "blink.bin").unwrap();
        assert_eq!(url, "http://10.0.0.17:80/blink.bin");
    }

    #[test]
    fn test_served_file_url_with_colon_in_name() {
        let url =
            served_file_url(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 17)), 8080, "fw:v2.bin").unwrap();
        assert_eq!(url, "http://10.0.0.17:8080/fw:v2.bin");
    }

    #[test]
    fn test_served_file_url_encodes_slashes_in_name() {
        let url =
            served_file_url(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 17)), 8080, "a/b.bin").unwrap();
        assert_eq!(url, "http://10.0.0.17:8080/a%2Fb.bin");
    }

    #[test]
    fn test_serve_bind_addr_matches_family() {
        let v4 = serve_bind_addr(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 17)), 8266);
        assert_eq!(v4, SocketAddr::from(([0, 0, 0, 0], 8266)));

        let v6 = serve_bind_addr(IpAddr::V6("fd00::10".parse().unwrap()), 8266);
        assert!(v6.is_ipv6());
        assert!(v6.ip().is_unspecified());
        assert_eq!(v6.port(), 8266);
    }
}

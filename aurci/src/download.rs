//! Release archive download

use std::{
    fs::{self, File},
    io,
    path::Path,
};

use crate::{Error, Result};

const USER_AGENT: &str = concat!("aurci/", env!("CARGO_PKG_VERSION"));

/// Fetches a URL into a local file
pub trait Downloader {
    fn download(&self, url: &str, out: &Path) -> std::result::Result<(), String>;
}

/// Blocking HTTP downloader
pub struct HttpDownloader {
    client: reqwest::blocking::Client,
}

impl HttpDownloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl Downloader for HttpDownloader {
    fn download(&self, url: &str, out: &Path) -> std::result::Result<(), String> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status()));
        }

        if let Some(output_dir) = out.parent() {
            fs::create_dir_all(output_dir).map_err(|e| e.to_string())?;
        }

        let temp_path = format!("{}.part", out.display());
        let result = File::create(&temp_path)
            .map_err(|e| e.to_string())
            .and_then(|mut file| {
                io::copy(&mut response, &mut file).map_err(|e| e.to_string())
            })
            .and_then(|_| fs::rename(&temp_path, out).map_err(|e| e.to_string()));

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        thread,
    };

    fn serve_once(status: u16, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);

            let head = format!(
                "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status,
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body);
        });

        format!("http://{}/archive/1.0.0.tar.gz", addr)
    }

    fn leftovers(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_download_writes_body() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/pkg-1.0.0.tar.gz");

        let downloader = HttpDownloader::new().unwrap();
        downloader
            .download(&serve_once(200, b"\x1f\x8barchive"), &out)
            .unwrap();

        assert_eq!(fs::read(&out).unwrap(), b"\x1f\x8barchive");
        assert_eq!(leftovers(out.parent().unwrap()), vec!["pkg-1.0.0.tar.gz"]);
    }

    #[test]
    fn test_error_status_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("pkg-1.0.0.tar.gz");

        let downloader = HttpDownloader::new().unwrap();
        let err = downloader
            .download(&serve_once(404, b"Not Found"), &out)
            .unwrap_err();

        assert!(err.contains("404"), "{}", err);
        assert!(leftovers(dir.path()).is_empty());
    }

    #[test]
    fn test_unwritable_target_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        // the target is an existing directory, so the final rename fails
        let out = dir.path().join("pkg-1.0.0.tar.gz");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("keep"), "").unwrap();

        let downloader = HttpDownloader::new().unwrap();
        let result = downloader.download(&serve_once(200, b"archive"), &out);

        assert!(result.is_err());
        assert_eq!(leftovers(dir.path()), vec!["pkg-1.0.0.tar.gz"]);
    }
}

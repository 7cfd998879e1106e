use anyhow::Result;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Three days of mixed traffic: browser hits, crawler hits, an error, a
/// null size and one line with an unparsable timestamp.
pub const SAMPLE_LOG: &str = concat!(
    "127.0.0.1 - - [10/Oct/2023:13:55:36 -0700] \"GET /index.html HTTP/1.1\" 200 612 \"-\" \"Mozilla/5.0 (compatible; Googlebot/2.1)\"\n",
    "192.168.0.7 - - [10/Oct/2023:14:02:11 -0700] \"GET /about.html HTTP/1.1\" 200 1024 \"http://example.com/\" \"Mozilla/5.0 (Windows NT 10.0)\"\n",
    "192.168.0.7 - - [11/Oct/2023:09:15:00 -0700] \"POST /api/login HTTP/1.1\" 401 - \"-\" \"Mozilla/5.0 (Windows NT 10.0)\"\n",
    "10.1.1.5 - - [12/Oct/2023:22:40:09 -0700] \"GET /robots.txt HTTP/1.1\" 404 209 \"-\" \"Bingbot/2.0\"\n",
    "10.1.1.5 - - [broken timestamp] \"GET /weird HTTP/1.1\" 500 33 \"-\" \"curl/8.0\"\n",
);

pub fn write_log(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

pub fn write_gzip_log(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    let file = fs::File::create(&path)?;
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(content.as_bytes())?;
    encoder.finish()?;
    Ok(path)
}

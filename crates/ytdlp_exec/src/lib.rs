//! # ytdlp_exec
//!
//! Thin async wrapper around the `yt-dlp` executable, scoped to what the
//! transcript pipeline needs: best-effort audio downloads into a
//! caller-supplied directory.
//!
//! yt-dlp already implements YouTube's moving-target extraction logic, so we
//! shell out instead of scraping media URLs ourselves. Stderr output is
//! captured and the tail of it is carried inside [`YtDlpError`] so callers can
//! surface download diagnostics without any shared mutable state.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

/// Format selector matching the original download preference order.
const AUDIO_FORMAT: &str = "bestaudio[ext=m4a]/bestaudio[ext=webm]/bestaudio/best";

/// Number of stderr lines preserved as diagnostic context on failure.
const DIAGNOSTIC_LINES: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct YtDlpOptions {
    /// Netscape-format cookie file passed via `--cookies`.
    pub cookies_path: Option<PathBuf>,
    /// Directory containing the ffmpeg binaries, passed via `--ffmpeg-location`.
    pub ffmpeg_location: Option<PathBuf>,
    /// HTTP(S) proxy URL passed via `--proxy`.
    pub proxy: Option<String>,
    /// Whole-download retry count. Zero means yt-dlp's default.
    pub retries: u32,
    /// Per-fragment retry count. Zero means yt-dlp's default.
    pub fragment_retries: u32,
}

impl YtDlpOptions {
    pub fn with_retries(retries: u32, fragment_retries: u32) -> Self {
        YtDlpOptions {
            retries,
            fragment_retries,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    bin: PathBuf,
    options: YtDlpOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("failed to spawn {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("yt-dlp exited with status {status}: {diagnostic}")]
    Download { status: i32, diagnostic: String },
    #[error("yt-dlp succeeded but produced no file in {}", dir.display())]
    NoOutput { dir: PathBuf },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl YtDlp {
    /// `bin` is the executable name or path, usually just `yt-dlp`.
    pub fn new(bin: impl Into<PathBuf>, options: YtDlpOptions) -> Self {
        YtDlp {
            bin: bin.into(),
            options,
        }
    }

    /// Downloads the best available audio stream for `url` into `dest_dir`
    /// and returns the path of the downloaded file.
    ///
    /// `dest_dir` must already exist. The output filename is
    /// `<video id>.<ext>`, whatever extension the selected format carries.
    pub async fn download_audio(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, YtDlpError> {
        let output_template = dest_dir.join("%(id)s.%(ext)s");
        let args = self.build_audio_args(url, &output_template);

        tracing::debug!(bin = %self.bin.display(), url, "invoking yt-dlp");
        let output = Command::new(&self.bin)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| YtDlpError::Spawn {
                bin: self.bin.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = tail_lines(&stderr, DIAGNOSTIC_LINES);
            return Err(YtDlpError::Download {
                status: output.status.code().unwrap_or(-1),
                diagnostic,
            });
        }

        first_file_in(dest_dir)?.ok_or_else(|| YtDlpError::NoOutput {
            dir: dest_dir.to_path_buf(),
        })
    }

    fn build_audio_args(&self, url: &str, output_template: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-f".into(),
            AUDIO_FORMAT.into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--quiet".into(),
            "--geo-bypass".into(),
            "--no-check-certificate".into(),
        ];
        if self.options.retries > 0 {
            args.push("--retries".into());
            args.push(self.options.retries.to_string().into());
        }
        if self.options.fragment_retries > 0 {
            args.push("--fragment-retries".into());
            args.push(self.options.fragment_retries.to_string().into());
        }
        if let Some(ffmpeg) = &self.options.ffmpeg_location {
            args.push("--ffmpeg-location".into());
            args.push(ffmpeg.as_os_str().to_owned());
        }
        if let Some(cookies) = &self.options.cookies_path {
            args.push("--cookies".into());
            args.push(cookies.as_os_str().to_owned());
        }
        if let Some(proxy) = &self.options.proxy {
            args.push("--proxy".into());
            args.push(proxy.into());
        }
        args.push("-o".into());
        args.push(output_template.as_os_str().to_owned());
        args.push(url.into());
        args
    }
}

/// Keeps the last `n` lines of `text`, joined with ` | `.
fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join(" | ")
}

fn first_file_in(dir: &Path) -> Result<Option<PathBuf>, std::io::Error> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_args_have_no_optional_flags() {
        let ytdlp = YtDlp::new("yt-dlp", YtDlpOptions::default());
        let args = os(&ytdlp.build_audio_args("https://youtu.be/abc", Path::new("/tmp/%(id)s.%(ext)s")));

        assert_eq!(args[0], "-f");
        assert_eq!(args[1], AUDIO_FORMAT);
        assert!(args.contains(&"--no-playlist".to_string()));
        assert!(args.contains(&"--geo-bypass".to_string()));
        assert!(!args.contains(&"--cookies".to_string()));
        assert!(!args.contains(&"--proxy".to_string()));
        assert!(!args.contains(&"--retries".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn optional_flags_are_forwarded() {
        let options = YtDlpOptions {
            cookies_path: Some(PathBuf::from("/etc/cookies.txt")),
            ffmpeg_location: Some(PathBuf::from("/opt/ffmpeg")),
            proxy: Some("http://proxy:8080".into()),
            retries: 3,
            fragment_retries: 3,
        };
        let ytdlp = YtDlp::new("yt-dlp", options);
        let args = os(&ytdlp.build_audio_args("u", Path::new("out/%(id)s.%(ext)s")));

        let pair = |flag: &str| {
            let idx = args.iter().position(|a| a == flag).unwrap();
            args[idx + 1].clone()
        };
        assert_eq!(pair("--cookies"), "/etc/cookies.txt");
        assert_eq!(pair("--ffmpeg-location"), "/opt/ffmpeg");
        assert_eq!(pair("--proxy"), "http://proxy:8080");
        assert_eq!(pair("--retries"), "3");
        assert_eq!(pair("--fragment-retries"), "3");
    }

    #[test]
    fn tail_lines_keeps_last_entries() {
        let text = "one\ntwo\n\nthree\nfour\nfive\nsix\nseven\n";
        assert_eq!(tail_lines(text, 3), "five | six | seven");
        assert_eq!(tail_lines("only", 6), "only");
        assert_eq!(tail_lines("", 6), "");
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let ytdlp = YtDlp::new("definitely-not-yt-dlp-xyz", YtDlpOptions::default());
        let err = ytdlp
            .download_audio("https://youtu.be/abc", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, YtDlpError::Spawn { .. }));
    }
}

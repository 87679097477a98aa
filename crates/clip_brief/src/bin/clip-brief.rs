use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use clip_brief::{
    http::{create_router, serve, AppState},
    openai::OpenAIClient,
    tracing::init_tracing_subscriber,
    types::DEFAULT_LANGUAGE,
    yt::{audio_fetcher::YtDlpWrapper, captions::YouTubeCaptions},
    BriefProcessorBuilder, Error,
};
use ytdlp_exec::{YtDlp, YtDlpOptions};

#[derive(Parser)]
#[command(name = "clip-brief", about = "Video transcript five-line summarizer")]
struct Cli {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: Option<String>,

    /// Path to a Netscape-format cookie file for yt-dlp
    #[arg(long, env = "YTDLP_COOKIES_PATH")]
    cookies_path: Option<PathBuf>,

    /// Directory containing the ffmpeg binaries
    #[arg(long, env = "FFMPEG_BIN")]
    ffmpeg_location: Option<PathBuf>,

    /// HTTP(S) proxy for downloads
    #[arg(long, env = "HTTPS_PROXY")]
    proxy: Option<String>,

    /// yt-dlp executable name or path
    #[arg(long, env = "YTDLP_BIN", default_value = "yt-dlp")]
    ytdlp_bin: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server
    Serve {
        #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8000")]
        addr: SocketAddr,
    },
    /// Summarize a single URL and print the lines to stdout
    Run {
        url: String,

        /// Summary language
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        language: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let api_key = cli
        .openai_key
        .ok_or(Error::ConfigurationMissing("OPENAI_API_KEY"))?;
    let proxy = cli.proxy.or_else(|| std::env::var("HTTP_PROXY").ok());

    let ytdlp = YtDlp::new(
        cli.ytdlp_bin,
        YtDlpOptions {
            cookies_path: cli.cookies_path,
            ffmpeg_location: cli.ffmpeg_location,
            proxy,
            ..YtDlpOptions::with_retries(3, 3)
        },
    );
    let openai = OpenAIClient::new(&api_key);

    let processor = BriefProcessorBuilder::new()
        .captions(YouTubeCaptions::new())
        .audio_fetcher(YtDlpWrapper::new(ytdlp))
        .transcriber(openai.clone())
        .chat_model(openai)
        .build();

    match cli.command {
        Command::Serve { addr } => {
            let router = create_router(Arc::new(AppState::new(processor)));
            serve(addr, router).await?;
        }
        Command::Run { url, language } => {
            let brief = processor.process(&url, &language).await?;
            for line in &brief.summary_lines {
                println!("- {line}");
            }
        }
    }

    Ok(())
}

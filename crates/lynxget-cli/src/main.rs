//! lynxget CLI entry point (spec.md §6 "CLI surface").

mod logging;
mod output;

use clap::Parser;
use lynxget_config::RuntimeConfig;
use lynxget_fetch::telemetry::{EnvTelemetrySink, TelemetrySink};
use lynxget_fetch::transport::TransportRequest;
use lynxget_fetch::{http_fetch_with_archive_fallback, HttpTransport, ReqwestTransport};
use url::Url;

#[derive(Parser)]
#[command(name = "lynxget")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-strategy article extraction with anti-bot detection and archive fallback")]
struct Cli {
    /// Page to fetch and extract.
    url: String,

    /// Print the full FetchResult as JSON.
    #[arg(long)]
    json: bool,

    /// Print the raw HTML response instead of extracting.
    #[arg(long)]
    raw: bool,

    /// Only run anti-bot detection and print the detections.
    #[arg(long)]
    detect: bool,

    /// Suppress progress output on stderr.
    #[arg(short, long)]
    quiet: bool,

    /// TLS/header preset name, forwarded to the transport.
    #[arg(long)]
    preset: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = RuntimeConfig::from_env();
    logging::init(&config);

    let exit_code = run(&cli, &config).await;
    std::process::exit(exit_code);
}

async fn run(cli: &Cli, config: &RuntimeConfig) -> i32 {
    let preset = cli.preset.clone().or_else(|| config.tls_preset.clone());

    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(err) => {
            eprintln!("failed to build HTTP transport: {err}");
            return 1;
        }
    };

    if cli.raw {
        return run_raw(&transport, cli, preset).await;
    }

    output::print_progress(cli.quiet, &format!("fetching {}...", cli.url));
    let result = http_fetch_with_archive_fallback(&transport, &cli.url).await;

    let site = Url::parse(&cli.url).ok().and_then(|u| u.host_str().map(str::to_string)).unwrap_or_else(|| cli.url.clone());
    EnvTelemetrySink::from_env().record(&site, &result);

    if cli.detect {
        output::print_detections(&result);
        return 0;
    }

    if cli.json {
        output::print_json(&result);
    } else {
        output::print_text(&result);
    }

    if result.success {
        0
    } else {
        1
    }
}

async fn run_raw(transport: &ReqwestTransport, cli: &Cli, preset: Option<String>) -> i32 {
    let request = TransportRequest { preset, ..TransportRequest::default() };
    output::print_progress(cli.quiet, &format!("fetching {} (raw)...", cli.url));
    let response = transport.get(&cli.url, &request).await;

    match (&response.html, response.success && (200..300).contains(&response.status_code)) {
        (Some(html), true) => {
            println!("{html}");
            0
        }
        _ => {
            if let Some(error) = &response.error {
                eprintln!("error: {error}");
            } else {
                eprintln!("error: unexpected status {}", response.status_code);
            }
            1
        }
    }
}

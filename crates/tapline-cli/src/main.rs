//! Command-line launcher for tapline Appium sessions.
//!
//! # Usage
//!
//! ```bash
//! # Check that the automation server is up
//! tapline status --url http://127.0.0.1:4723
//!
//! # Open and close a native Android session on an emulator
//! tapline launch android-native --device-name Pixel_7 --udid emulator-5554 --port 8200 --emulator yes
//!
//! # Open mobile Safari with a specific config file
//! tapline --config ./config.json launch ios-web --device-name "iPhone 15" --udid 00008110 --port 27753
//!
//! # Log into the sample app and print the product page title
//! tapline smoke-login --device-name Pixel_7 --udid emulator-5554 --port 8200 \
//!     --username standard_user --password secret_sauce
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use tapline_core::config::{ConfigKey, ConfigLookup, JsonConfig};
use tapline_core::driver::{DeviceTarget, DriverFactory, DriverKind, HttpConnector};
use tapline_core::error::DriverError;
use tapline_core::page::Page;
use tapline_core::session::Session;
use tapline_core::transport::{HttpTransport, Transport};
use tapline_core::wire::WireCommand;
use tapline_pages::LoginPage;

/// Launch and exercise Appium sessions on Android and iOS devices.
#[derive(Parser)]
#[command(name = "tapline")]
#[command(about = "Launch and exercise Appium sessions on mobile devices")]
#[command(version)]
struct Cli {
    /// Path to the JSON config file (defaults to ~/.tapline/config.json)
    #[arg(short, long, env = "TAPLINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Automation server URL, overriding `appiumURL` from the config
    #[arg(short, long, env = "TAPLINE_APPIUM_URL", global = true)]
    url: Option<String>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Variant {
    AndroidNative,
    AndroidWeb,
    IosNative,
    IosWeb,
}

impl From<Variant> for DriverKind {
    fn from(variant: Variant) -> Self {
        match variant {
            Variant::AndroidNative => DriverKind::AndroidNative,
            Variant::AndroidWeb => DriverKind::AndroidWeb,
            Variant::IosNative => DriverKind::IosNative,
            Variant::IosWeb => DriverKind::IosWeb,
        }
    }
}

#[derive(Args)]
struct DeviceArgs {
    /// Device or AVD name
    #[arg(long)]
    device_name: String,
    /// Device identifier
    #[arg(long)]
    udid: String,
    /// Local helper port (systemPort, chromedriverPort, wdaLocalPort, webkitDebugProxyPort)
    #[arg(long)]
    port: u16,
    /// `yes` boots the named AVD (Android only)
    #[arg(long, default_value = "no")]
    emulator: String,
}

impl DeviceArgs {
    fn target(&self) -> DeviceTarget {
        DeviceTarget::new(&self.device_name, &self.udid, self.port).emulator(&self.emulator)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print the automation server status
    Status,

    /// Open a session, print its id and platform, then close it
    Launch {
        /// Driver variant
        variant: Variant,
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Log into the sample app and print the product page title
    SmokeLogin {
        #[command(flatten)]
        device: DeviceArgs,
        /// Login user name
        #[arg(long, env = "TAPLINE_USERNAME")]
        username: String,
        /// Login password
        #[arg(long, env = "TAPLINE_PASSWORD")]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

#[derive(Debug)]
enum CliError {
    Connection(String),
    ActionFailed(String),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Connection(_) => ExitCode::from(2),
            CliError::ActionFailed(_) => ExitCode::from(1),
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Connection(msg) => write!(f, "Connection error: {}", msg),
            CliError::ActionFailed(msg) => write!(f, "Action failed: {}", msg),
        }
    }
}

impl From<DriverError> for CliError {
    fn from(err: DriverError) -> Self {
        match &err {
            DriverError::Initialization { source, .. } => {
                CliError::Connection(format!("{err}: {source}"))
            }
            DriverError::Config(_) => CliError::Connection(err.to_string()),
            _ => CliError::ActionFailed(err.to_string()),
        }
    }
}

fn load_config(cli: &Cli) -> Result<JsonConfig, CliError> {
    let loaded = match &cli.config {
        Some(path) => JsonConfig::load(path),
        None => JsonConfig::load_default(),
    };
    let mut config = loaded.map_err(|e| CliError::Connection(e.to_string()))?;
    if let Some(url) = &cli.url {
        config.set(ConfigKey::AppiumUrl, url.as_str());
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Status => {
            let url = config
                .get(ConfigKey::AppiumUrl)
                .map_err(|e| CliError::Connection(e.to_string()))?;
            let transport =
                HttpTransport::new(&url).map_err(|e| CliError::Connection(e.to_string()))?;
            let status = transport
                .send(&WireCommand::get("/status"))
                .await
                .map_err(|e| CliError::Connection(format!("{url}: {e}")))?;
            if cli.format == OutputFormat::Json {
                println!("{}", status);
            } else {
                let pretty = serde_json::to_string_pretty(&status).unwrap_or_else(|_| status.to_string());
                println!("{}", pretty);
            }
            Ok(())
        }
        Command::Launch { variant, device } => {
            let factory = DriverFactory::new(Arc::new(config), HttpConnector);
            let kind = DriverKind::from(*variant);
            let session = factory.create(kind, &device.target()).await?;
            if cli.format == OutputFormat::Json {
                println!(
                    "{}",
                    json!({
                        "session": session.id(),
                        "platform": session.platform().name(),
                        "variant": kind.name(),
                        "app": kind.app_kind().name(),
                    })
                );
            } else {
                println!("{} {}", session.id(), session.platform());
            }
            session.quit().await?;
            Ok(())
        }
        Command::SmokeLogin {
            device,
            username,
            password,
        } => {
            let factory = DriverFactory::new(Arc::new(config), HttpConnector);
            let session = factory
                .create(DriverKind::AndroidNative, &device.target())
                .await?;
            let outcome = smoke_login(&session, username, password).await;
            if let Err(e) = session.quit().await {
                tracing::warn!(error = %e, "failed to close session");
            }
            let title = outcome?;
            if cli.format == OutputFormat::Json {
                println!("{}", json!({ "session": session.id(), "title": title }));
            } else {
                println!("{}", title);
            }
            Ok(())
        }
    }
}

async fn smoke_login(session: &Session, username: &str, password: &str) -> Result<String, DriverError> {
    let login = LoginPage::load(session).await?;
    let products = login.login(username, password).await?;
    products.title().await
}

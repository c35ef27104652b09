use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use clap::Parser;
use promptshop::ai::GeminiImageClient;
use promptshop::models::Config;
use promptshop::session::Session;
use promptshop::upload::split_data_uri;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "promptshop")]
#[command(about = "Generate or edit images with a text prompt")]
struct CliArgs {
    /// Text prompt describing the desired image or edit.
    #[arg(value_name = "PROMPT")]
    prompt: String,

    /// Photo to edit; omit to generate from the prompt alone.
    #[arg(short, long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Where to write the resulting image. Defaults to
    /// `promptshop-output.<ext>` with the extension taken from the result.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Image model ID (overrides the IMAGE_MODEL environment variable).
    #[arg(short, long, value_name = "MODEL")]
    model: Option<String>,
}

fn extension_for(media_type: &str) -> &'static str {
    match media_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}

async fn run(args: CliArgs) -> Result<PathBuf> {
    let config = Config::from_env()?;
    let model = args.model.unwrap_or(config.image_model);

    let client = GeminiImageClient::new(config.gemini_api_key, model);
    let mut session = Session::new(Box::new(client));

    if let Some(path) = &args.image {
        session.select_image(path).await;
        if let Some(message) = session.error() {
            return Err(anyhow!("{}: {}", message, path.display()));
        }
    }

    session.set_prompt(args.prompt);
    session.submit().await;

    if let Some(message) = session.error() {
        return Err(anyhow!("{}", message));
    }

    let data_uri = session
        .result()
        .ok_or_else(|| anyhow!("No result produced"))?;
    let (media_type, payload) = split_data_uri(data_uri)
        .ok_or_else(|| anyhow!("Result is not a valid data-URI"))?;

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("Failed to decode result payload")?;

    let output = args.output.unwrap_or_else(|| {
        PathBuf::from(format!("promptshop-output.{}", extension_for(media_type)))
    });
    std::fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} bytes ({}) to {}", bytes.len(), media_type, output.display());
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptshop=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(output) => {
            println!("{}", output.display());
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

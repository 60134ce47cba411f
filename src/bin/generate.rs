//! mycm_generate - One-shot post generation from the command line
//!
//! Runs the pipeline once, prints copy and hashtags, and writes the image.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use mycm::{BusinessProfile, GeneratedPost, Pipeline, PipelineError, PostRequest, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// MyCm one-shot post generator
#[derive(Parser, Debug)]
#[command(
    name = "mycm_generate",
    version,
    about = "Generate one social media post (copy, hashtags and image)"
)]
struct Args {
    /// Business name
    #[arg(long)]
    name: String,

    /// Business description and tone
    #[arg(long)]
    description: String,

    /// Neighbourhood and city
    #[arg(long)]
    location: String,

    /// Idea for the post
    #[arg(long)]
    idea: String,

    /// Image output path (default: post-<hash>.<ext> in --dir)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Directory for the default image file name
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Only compose the text, skip the image provider
    #[arg(long)]
    text_only: bool,

    /// TOML config file (default: ./mycm.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn print_post(post: &GeneratedPost) {
    println!("--- Copy ---");
    println!("{}", post.copy);
    println!();
    println!("--- Hashtags ---");
    println!("{}", post.hashtags);
    println!();
    println!("--- Image prompt ---");
    println!("{}", post.image_prompt);
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mycm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;
    let pipeline = Pipeline::from_settings(&settings)?;

    let request = PostRequest::new(
        BusinessProfile::new(&args.name, &args.description, &args.location),
        &args.idea,
    );

    // Ctrl-C drops the pipeline future, aborting any in-flight request
    if args.text_only {
        let post = tokio::select! {
            result = pipeline.compose(&request) => result?,
            _ = tokio::signal::ctrl_c() => bail!("Cancelled"),
        };
        print_post(&post);
        return Ok(());
    }

    let finished = tokio::select! {
        result = pipeline.run(request) => result,
        _ = tokio::signal::ctrl_c() => bail!("Cancelled"),
    };

    match finished {
        Ok(finished) => {
            print_post(&finished.post);
            let path = finished.image.save(args.out.as_deref(), &args.dir)?;
            println!();
            println!("Image ({}) written to {}", finished.image.mime_type(), path.display());
            Ok(())
        }
        Err(PipelineError::Image { post, error }) => {
            print_post(&post);
            bail!("Post text generated, but the image failed: {}", error)
        }
        Err(e) => {
            if let Some(detail) = e.error().detail() {
                eprintln!("{}", detail);
            }
            Err(e.into())
        }
    }
}

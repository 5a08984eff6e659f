use std::{env, path::Path};

use anyhow::{anyhow, Context, Result};
use log::info;
use pixella::{
    CaptureContext, ImageKind, ImageRef, Stage, WorkflowConfig, WorkflowController, WorkflowEvent,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Pixella starting up...");

    let path_arg = env::args()
        .nth(1)
        .ok_or_else(|| anyhow!("usage: pixella <image-path>"))?;
    let image = image_ref_from_path(Path::new(&path_arg))?;

    let settings_path = env::var("PIXELLA_SETTINGS").unwrap_or_else(|_| "pixella.json".into());
    let config = WorkflowConfig::load(Path::new(&settings_path))?;

    let context = CaptureContext {
        author: env::var("PIXELLA_AUTHOR").ok(),
        location: env::var("PIXELLA_LOCATION").ok(),
        device: env::var("PIXELLA_DEVICE").ok(),
    };

    let controller = WorkflowController::new(config);
    let mut events = controller.subscribe();

    controller.select_file(image, context).await;

    loop {
        let event = events.recv().await.context("event stream closed")?;
        match event {
            WorkflowEvent::UploadProgress { percent, .. } => info!("uploading... {percent}%"),
            WorkflowEvent::VerifyProgress { percent, .. } => info!("verifying... {percent}%"),
            WorkflowEvent::StageChanged { stage, .. } => match stage {
                Stage::Uploaded => {
                    controller.request_verify().await;
                }
                Stage::Verified => {
                    if let Some(summary) = controller.request_results().await {
                        println!("{}: {}", summary.card.title, summary.card.message);
                        println!("-> {}", summary.card.action_label);
                    }
                }
                _ => {}
            },
            WorkflowEvent::ResultReady { outcome, .. } => {
                info!("final outcome: {outcome:?}");
                break;
            }
        }
    }

    Ok(())
}

fn image_ref_from_path(path: &Path) -> Result<ImageRef> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let kind = ImageKind::from_extension(extension)
        .ok_or_else(|| anyhow!("unsupported image type: {}", path.display()))?;
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("image")
        .to_string();

    Ok(ImageRef {
        file_name,
        kind,
        byte_size: metadata.len(),
    })
}

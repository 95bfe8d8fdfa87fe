use super::StrategyOutput;
use crate::core::planner::Plan;
use crate::core::{GeneratedFile, Task};
use crate::errors::StrategyError;
use crate::media::ImageGenerator;
use tracing::{info, warn};
use uuid::Uuid;

const IMAGE_CONTENT_TYPE: &str = "image/png";

pub(super) async fn run(
    images: &dyn ImageGenerator,
    task: &Task,
    plan: &Plan,
) -> Result<StrategyOutput, StrategyError> {
    let url = images
        .generate_image(&task.instruction)
        .await
        .map_err(StrategyError::ImageGeneration)?;

    let Some(url) = url else {
        warn!("Image service returned no URL for task {}", task.id);
        return Ok(StrategyOutput {
            result_text: format!(
                "Plan: {}\n\nThe image service did not return an image.",
                plan.text
            ),
            files: Vec::new(),
            observation: "Image service returned no URL".to_string(),
        });
    };

    let name = format!("{}-{}.png", task.task_type, Uuid::new_v4());
    info!("Generated image {} for task {}", name, task.id);

    Ok(StrategyOutput {
        result_text: format!(
            "Plan: {}\n\nGenerated {} image: {}",
            plan.text, task.task_type, url
        ),
        observation: format!("Generated image {}", name),
        files: vec![GeneratedFile {
            url,
            content_type: IMAGE_CONTENT_TYPE.to_string(),
            name,
        }],
    })
}

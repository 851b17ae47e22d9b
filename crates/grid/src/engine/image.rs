//! Image domain — list, match against job specs, remove tracked images.

use std::collections::HashMap;

use super::client::{EngineClient, EngineError};
use super::jobspec::JobSpec;

/// Image descriptor exposed to the dashboard.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ImageInfo {
    pub id: String,
    pub repo_tags: Vec<String>,
    pub created_at: i64,
    pub size: i64,
    pub labels: HashMap<String, String>,
}

impl From<bollard::models::ImageSummary> for ImageInfo {
    fn from(s: bollard::models::ImageSummary) -> Self {
        Self {
            id: s.id,
            repo_tags: s.repo_tags,
            created_at: s.created,
            size: s.size,
            labels: s.labels,
        }
    }
}

impl EngineClient {
    /// List all images on the Docker host.
    pub async fn list_images(&self) -> Result<Vec<ImageInfo>, EngineError> {
        use bollard::query_parameters::ListImagesOptions;

        let options = Some(ListImagesOptions {
            all: false,
            ..Default::default()
        });

        let images = self.client.list_images(options).await?;
        Ok(images.into_iter().map(ImageInfo::from).collect())
    }

    /// First image carrying the given job-spec subtype, if any.
    pub async fn image_for_subtype(
        &self,
        subtype: &str,
    ) -> Result<Option<ImageInfo>, EngineError> {
        let images = self.list_images().await?;
        Ok(select_for_subtype(&images, &self.type_label(), subtype).cloned())
    }

    /// Job specs whose subtype label matches no image on the host.
    pub async fn missing_images(&self, specs: &[JobSpec]) -> Result<Vec<JobSpec>, EngineError> {
        let images = self.list_images().await?;
        Ok(missing_subtypes(&images, &self.type_label(), specs))
    }

    /// Remove every image carrying a label in the tracked namespace.
    /// Returns the number of images removed.
    pub async fn delete_images(&self) -> Result<usize, EngineError> {
        use bollard::query_parameters::RemoveImageOptions;

        let images = self.list_images().await?;
        let mut removed = 0;
        for image in images {
            if !image.labels.keys().any(|k| k.starts_with(self.label_ns())) {
                continue;
            }

            let options = Some(RemoveImageOptions {
                force: true,
                noprune: false,
                ..Default::default()
            });
            self.client.remove_image(&image.id, options, None).await?;
            tracing::info!(image = %image.id, "removed tracked image");
            removed += 1;
        }
        Ok(removed)
    }
}

/// First image whose type label equals the wanted subtype.
pub fn select_for_subtype<'a>(
    images: &'a [ImageInfo],
    type_label: &str,
    subtype: &str,
) -> Option<&'a ImageInfo> {
    images
        .iter()
        .find(|im| im.labels.get(type_label).map(String::as_str) == Some(subtype))
}

/// Job specs with no matching image.
pub fn missing_subtypes(images: &[ImageInfo], type_label: &str, specs: &[JobSpec]) -> Vec<JobSpec> {
    specs
        .iter()
        .filter(|spec| select_for_subtype(images, type_label, &spec.image_subtype).is_none())
        .cloned()
        .collect()
}

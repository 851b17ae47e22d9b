//! Job-spec catalog — the kinds of work the dashboard can submit.
//!
//! Each spec names the script the scheduler runs and the image subtype
//! it needs. The catalog is configuration; these are the defaults.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Stable identifier used in submission requests.
    pub id: String,
    /// Human-readable description shown in the submit form.
    pub description: String,
    /// Script the scheduler runs, relative to the script directory.
    pub job_script: String,
    /// Image subtype label value the job's container must carry.
    pub image_subtype: String,
}

impl JobSpec {
    pub fn lookup<'a>(specs: &'a [JobSpec], id: &str) -> Option<&'a JobSpec> {
        specs.iter().find(|spec| spec.id == id)
    }
}

pub fn default_specs() -> Vec<JobSpec> {
    vec![
        JobSpec {
            id: "gpu".to_string(),
            description: "GPU training".to_string(),
            job_script: "run-gpu-job.sh".to_string(),
            image_subtype: "gpu".to_string(),
        },
        JobSpec {
            id: "cpu".to_string(),
            description: "CPU batch".to_string(),
            job_script: "run-cpu-job.sh".to_string(),
            image_subtype: "cpu".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let specs = default_specs();
        assert_eq!(JobSpec::lookup(&specs, "gpu").map(|s| s.image_subtype.as_str()), Some("gpu"));
        assert!(JobSpec::lookup(&specs, "quantum").is_none());
    }

    #[test]
    fn test_default_spec_ids_are_unique() {
        let specs = default_specs();
        let mut ids: Vec<_> = specs.iter().map(|s| &s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), specs.len());
    }
}

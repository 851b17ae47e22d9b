//! Smi — pure parsing of `nvidia-smi -q -x` output.
//!
//! Only the fields the dashboard renders are pulled out of the report;
//! everything else in the (large) document is ignored. Values come with
//! unit suffixes ("1500 MiB", "95 %", "61 C") which are stripped here.

use roxmltree::Node;
use serde::Serialize;

use super::client::GpuError;

/// One telemetry snapshot across all attached GPUs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuReport {
    pub driver_version: String,
    pub gpus: Vec<GpuInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuInfo {
    /// PCI bus id, e.g. `00000000:01:00.0`.
    pub id: String,
    pub product_name: String,
    pub memory_total_mib: Option<u64>,
    pub memory_used_mib: Option<u64>,
    pub utilization_pct: Option<u64>,
    pub temperature_c: Option<u64>,
    pub processes: Vec<GpuProcess>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpuProcess {
    pub pid: u32,
    /// Process type as nvidia-smi labels it ("C" compute, "G" graphics).
    pub kind: String,
    pub process_name: String,
    pub used_memory_mib: Option<u64>,
}

/// Parse a full `nvidia-smi -q -x` document.
pub fn parse_smi_xml(xml: &str) -> Result<GpuReport, GpuError> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| GpuError::Parse(format!("invalid nvidia-smi XML: {e}")))?;
    let root = doc.root_element();

    let driver_version = child_text(root, "driver_version")
        .unwrap_or_default()
        .to_string();

    let gpus = root
        .children()
        .filter(|n| n.has_tag_name("gpu"))
        .map(parse_gpu)
        .collect();

    Ok(GpuReport {
        driver_version,
        gpus,
    })
}

fn parse_gpu(gpu: Node<'_, '_>) -> GpuInfo {
    let fb = gpu.children().find(|n| n.has_tag_name("fb_memory_usage"));
    let utilization = gpu.children().find(|n| n.has_tag_name("utilization"));
    let temperature = gpu.children().find(|n| n.has_tag_name("temperature"));

    let processes = gpu
        .children()
        .find(|n| n.has_tag_name("processes"))
        .map(|procs| {
            procs
                .children()
                .filter(|n| n.has_tag_name("process_info"))
                .filter_map(parse_process)
                .collect()
        })
        .unwrap_or_default();

    GpuInfo {
        id: gpu.attribute("id").unwrap_or_default().to_string(),
        product_name: child_text(gpu, "product_name").unwrap_or_default().to_string(),
        memory_total_mib: fb.and_then(|n| child_text(n, "total")).and_then(parse_mib),
        memory_used_mib: fb.and_then(|n| child_text(n, "used")).and_then(parse_mib),
        utilization_pct: utilization
            .and_then(|n| child_text(n, "gpu_util"))
            .and_then(parse_unit_value),
        temperature_c: temperature
            .and_then(|n| child_text(n, "gpu_temp"))
            .and_then(parse_unit_value),
        processes,
    }
}

fn parse_process(info: Node<'_, '_>) -> Option<GpuProcess> {
    let pid = child_text(info, "pid")?.parse().ok()?;
    Some(GpuProcess {
        pid,
        kind: child_text(info, "type").unwrap_or_default().to_string(),
        process_name: child_text(info, "process_name")
            .unwrap_or_default()
            .to_string(),
        used_memory_mib: child_text(info, "used_memory").and_then(parse_mib),
    })
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|c| c.has_tag_name(tag))
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `"1500 MiB"` → 1500. `"N/A"` and friends parse to `None`.
fn parse_mib(s: &str) -> Option<u64> {
    parse_unit_value(s)
}

fn parse_unit_value(s: &str) -> Option<u64> {
    s.split_whitespace().next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"<?xml version="1.0"?>
<nvidia_smi_log>
  <timestamp>Fri Aug  7 10:00:00 2026</timestamp>
  <driver_version>550.54.14</driver_version>
  <attached_gpus>2</attached_gpus>
  <gpu id="00000000:01:00.0">
    <product_name>NVIDIA A100</product_name>
    <fb_memory_usage>
      <total>40960 MiB</total>
      <used>1500 MiB</used>
      <free>39460 MiB</free>
    </fb_memory_usage>
    <utilization>
      <gpu_util>95 %</gpu_util>
      <memory_util>40 %</memory_util>
    </utilization>
    <temperature>
      <gpu_temp>61 C</gpu_temp>
    </temperature>
    <processes>
      <process_info>
        <pid>1234</pid>
        <type>C</type>
        <process_name>python</process_name>
        <used_memory>1400 MiB</used_memory>
      </process_info>
      <process_info>
        <pid>5678</pid>
        <type>C</type>
        <process_name>trainer</process_name>
        <used_memory>100 MiB</used_memory>
      </process_info>
    </processes>
  </gpu>
  <gpu id="00000000:02:00.0">
    <product_name>NVIDIA A100</product_name>
    <fb_memory_usage>
      <total>40960 MiB</total>
      <used>N/A</used>
    </fb_memory_usage>
    <processes>
    </processes>
  </gpu>
</nvidia_smi_log>"#;

    #[test]
    fn test_report_header() {
        let report = parse_smi_xml(REPORT).unwrap();
        assert_eq!(report.driver_version, "550.54.14");
        assert_eq!(report.gpus.len(), 2);
    }

    #[test]
    fn test_gpu_fields() {
        let report = parse_smi_xml(REPORT).unwrap();
        let gpu = &report.gpus[0];

        assert_eq!(gpu.id, "00000000:01:00.0");
        assert_eq!(gpu.product_name, "NVIDIA A100");
        assert_eq!(gpu.memory_total_mib, Some(40960));
        assert_eq!(gpu.memory_used_mib, Some(1500));
        assert_eq!(gpu.utilization_pct, Some(95));
        assert_eq!(gpu.temperature_c, Some(61));
    }

    #[test]
    fn test_process_list() {
        let report = parse_smi_xml(REPORT).unwrap();
        let procs = &report.gpus[0].processes;

        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0].pid, 1234);
        assert_eq!(procs[0].kind, "C");
        assert_eq!(procs[0].process_name, "python");
        assert_eq!(procs[0].used_memory_mib, Some(1400));
    }

    #[test]
    fn test_not_available_values_are_none() {
        let report = parse_smi_xml(REPORT).unwrap();
        let gpu = &report.gpus[1];

        assert_eq!(gpu.memory_used_mib, None);
        assert_eq!(gpu.utilization_pct, None);
        assert!(gpu.processes.is_empty());
    }

    #[test]
    fn test_invalid_xml_is_an_error() {
        assert!(matches!(
            parse_smi_xml("<nvidia_smi_log"),
            Err(GpuError::Parse(_))
        ));
    }

    #[test]
    fn test_unit_stripping() {
        assert_eq!(parse_unit_value("1500 MiB"), Some(1500));
        assert_eq!(parse_unit_value("95 %"), Some(95));
        assert_eq!(parse_unit_value("N/A"), None);
        assert_eq!(parse_unit_value(""), None);
    }
}

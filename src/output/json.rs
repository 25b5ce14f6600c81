use crate::error::Result;
use crate::model::ScanReport;

pub fn format_json(report: &ScanReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn print_json(report: &ScanReport) -> Result<()> {
    println!("{}", format_json(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DetectionOutcome, VersionInfo};

    #[test]
    fn test_format_json_fields() {
        let detection = DetectionOutcome {
            total_probed: 4,
            matched_as_distinct: 4,
            tie_break_used: false,
            is_wordpress: true,
        };
        let report = ScanReport::new("http://wp.test/", detection)
            .with_version(VersionInfo::new("4.7.1", "4.8"))
            .with_advisories(vec!["CVE-2017-1001000".to_string()]);

        let json = format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["target"], "http://wp.test/");
        assert_eq!(value["is_wordpress"], true);
        assert_eq!(value["version"]["current_version"], "4.7.1");
        assert_eq!(value["outdated"], true);
        assert_eq!(value["advisories"][0], "CVE-2017-1001000");
        assert_eq!(value["detection"]["total_probed"], 4);
    }

    #[test]
    fn test_format_json_omits_missing_version() {
        let report = ScanReport::new("http://example.test/", DetectionOutcome::default());
        let json = format_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("version").is_none());
    }
}

// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Reader for the `<kind>, <json record>` template format

use super::constants::COMMENT_PREFIX;
use crate::domain::template::TemplateStore;
use crate::shared::error::{Result, TopologyError};
use regex::Regex;
use serde_json::Value;
use std::fs::read_to_string;
use std::path::Path;
use tracing::{info, instrument, warn};

#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records accepted into the store.
    pub records: usize,
    /// One `MalformedLine` error per dropped line.
    pub rejected: Vec<TopologyError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

pub struct TopologyReader {
    line_re: Regex,
}

impl TopologyReader {
    pub fn new() -> Result<Self> {
        // the kind tag must be at least two characters before the first comma
        let line_re = Regex::new(r"^([^,]{2,}),(.*)$")?;
        Ok(Self { line_re })
    }

    #[instrument(skip(self, store))]
    pub fn load_file(&self, path: &Path, store: &mut TemplateStore) -> Result<LoadReport> {
        let content = read_to_string(path)?;
        let report = self.load_str(&content, store);
        info!(
            "Loaded {} template records from {} ({} rejected)",
            report.records,
            path.display(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// Feed every record in `content` into `store`. Bad lines are reported and
    /// skipped; they never stop the load.
    pub fn load_str(&self, content: &str, store: &mut TemplateStore) -> LoadReport {
        let mut report = LoadReport::default();

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;

            let (tag, record) = match self.parse_line(line_no, raw) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(err) => {
                    warn!("{}", err);
                    report.rejected.push(err);
                    continue;
                }
            };

            match store.add(record) {
                Ok(kind) => {
                    if tag != kind.as_str() {
                        warn!(
                            "line {}: tag '{}' disagrees with record kind '{}', using '{}'",
                            line_no, tag, kind, kind
                        );
                    }
                    report.records += 1;
                }
                Err(err) => {
                    let err = TopologyError::malformed(line_no, err.to_string());
                    warn!("{}", err);
                    report.rejected.push(err);
                }
            }
        }

        report
    }

    /// Split one line into its kind tag and JSON record.
    /// Blank and comment lines yield `None`.
    pub fn parse_line(&self, line_no: usize, raw: &str) -> Result<Option<(String, Value)>> {
        let line = raw.trim();
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return Ok(None);
        }

        let caps = self.line_re.captures(line).ok_or_else(|| {
            TopologyError::malformed(line_no, "expected '<kind>, <json record>'")
        })?;

        let tag = caps[1].trim().to_string();
        let record: Value = serde_json::from_str(&caps[2]).map_err(|e| {
            TopologyError::malformed(line_no, format!("invalid JSON record: {}", e))
        })?;

        Ok(Some((tag, record)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::template::Kind;

    const SAMPLE: &str = r#"
# containers
container, {"kind": "container", "key": "container-cpu", "cpu":[800, 500, 600], "mem": [100, 50, 60], "qps": [120, 50]}

pod, {"kind": "pod", "key": "pod1", "containers":["container-cpu"]}
vnode, {"kind": "vnode", "key": "vnode1", "cpu": 5200, "mem": 8192, "pods":["pod1", "pod1"]}
node, {"kind": "node", "key": "node1", "cpu": 10400, "mem": 16384, "vnodes": ["vnode1"], "num": 5}
"#;

    #[test]
    fn test_load_sample() {
        let reader = TopologyReader::new().unwrap();
        let mut store = TemplateStore::new();
        let report = reader.load_str(SAMPLE, &mut store);

        assert!(report.is_clean());
        assert_eq!(report.records, 4);
        for kind in Kind::EXPANDED {
            assert_eq!(store.count(kind), 1);
        }
        assert_eq!(store.node("node1").unwrap().num, 5);
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        let reader = TopologyReader::new().unwrap();
        assert!(reader.parse_line(1, "   ").unwrap().is_none());
        assert!(reader.parse_line(2, "  # pod, {}").unwrap().is_none());
    }

    #[test]
    fn test_malformed_lines_are_reported_with_line_numbers() {
        let content = r#"pod {"kind": "pod", "key": "p", "containers": []}
p, {"kind": "pod", "key": "p", "containers": []}
pod, {"kind": "pod", "key": "p", "containers": [}
pod, {"kind": "switch", "key": "s"}
pod, {"key": "nokind"}
pod, {"kind": "pod", "key": "ok", "containers": []}
"#;
        let reader = TopologyReader::new().unwrap();
        let mut store = TemplateStore::new();
        let report = reader.load_str(content, &mut store);

        assert_eq!(report.records, 1);
        let lines: Vec<_> = report
            .rejected
            .iter()
            .map(|e| match e {
                TopologyError::MalformedLine { line, .. } => *line,
                other => panic!("unexpected error: {}", other),
            })
            .collect();
        assert_eq!(lines, vec![1, 2, 3, 4, 5]);
        assert!(store.contains(Kind::Pod, "ok"));
    }

    #[test]
    fn test_record_kind_wins_over_tag() {
        let reader = TopologyReader::new().unwrap();
        let mut store = TemplateStore::new();
        let report = reader.load_str(
            r#"vnode, {"kind": "pod", "key": "p", "containers": ["c"]}"#,
            &mut store,
        );
        assert_eq!(report.records, 1);
        assert!(store.contains(Kind::Pod, "p"));
        assert!(!store.contains(Kind::VNode, "p"));
    }

    #[test]
    fn test_load_missing_file() {
        let reader = TopologyReader::new().unwrap();
        let mut store = TemplateStore::new();
        let err = reader
            .load_file(Path::new("/nonexistent/input.topo"), &mut store)
            .unwrap_err();
        assert!(matches!(err, TopologyError::Io(_)));
    }
}

//! Description panels: documentation of one entry plus its derived warnings

use crate::{Entry, Tags, TestPass};
use serde::Serialize;

pub const LOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const WARN_MISSING_DESCRIPTION: &str = "Missing description";
pub const WARN_DECLARED_NOT_USED: &str = "Declared and not used";
pub const WARN_USED_NOT_DECLARED: &str = "Used but not declared";
pub const WARN_FIELD_NOT_IN_RESULT: &str = "Field not found in test result";
pub const WARN_FIELD_NOT_DESCRIBED: &str = "Field found in test result but not described";

/// A parameter row in a description panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocParam {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DocParam {
    fn new(name: &str, description: &str, warning: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            warning: warning.map(str::to_string),
        }
    }
}

/// Content of a description panel, keyed by `id`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Description {
    /// Panel identifier (the item's full path)
    pub id: String,
    pub name: String,
    pub description: String,
    pub inputs: Vec<DocParam>,
    pub outputs: Vec<DocParam>,
    pub load_time: Option<String>,
    pub timeout: String,
    pub parse_warning: Option<String>,
    pub test_duration: Option<String>,
    pub test_result: Option<String>,
    pub test_pass: TestPass,
    pub test_params: Vec<DocParam>,
    pub error: Option<String>,
    pub tags: Tags,
}

impl Description {
    /// Build the panel for an entry whose item lives at `id`
    pub fn from_entry(id: &str, entry: &Entry) -> Self {
        let mut has_warning = false;

        if entry.description.trim().is_empty() {
            has_warning = true;
        }

        let mut inputs = Vec::with_capacity(entry.inputs.len());
        for param in &entry.inputs {
            let used = entry.used.iter().any(|u| *u == param.key);
            let warning = (!used).then_some(WARN_DECLARED_NOT_USED);
            has_warning |= warning.is_some();
            inputs.push(DocParam::new(&param.key, &param.description, warning));
        }
        for used in &entry.used {
            if !entry.inputs.iter().any(|p| p.key == *used) && !inputs.iter().any(|p| p.name == *used) {
                inputs.push(DocParam::new(used, "", Some(WARN_USED_NOT_DECLARED)));
                has_warning = true;
            }
        }

        let error = entry.error.as_ref().filter(|e| !e.is_empty()).cloned();

        // Result columns are checked only for runs without an error
        let columns = match error {
            Some(_) => None,
            None => result_columns(entry.test_result.as_ref()),
        };
        let mut outputs = Vec::with_capacity(entry.outputs.len());
        for param in &entry.outputs {
            let warning = match &columns {
                Some(cols) if !cols.iter().any(|c| *c == param.key) => Some(WARN_FIELD_NOT_IN_RESULT),
                _ => None,
            };
            has_warning |= warning.is_some();
            outputs.push(DocParam::new(&param.key, &param.description, warning));
        }
        if let Some(cols) = &columns {
            for col in cols {
                if !entry.outputs.iter().any(|p| p.key == *col) {
                    outputs.push(DocParam::new(col, "", Some(WARN_FIELD_NOT_DESCRIBED)));
                    has_warning = true;
                }
            }
        }

        let parse_warning = entry
            .parse_warning
            .as_ref()
            .filter(|w| !w.is_empty())
            .cloned();
        has_warning |= parse_warning.is_some();

        let test_result = match &entry.test_result {
            Some(value) => match serde_json::to_string_pretty(value) {
                Ok(s) => Some(s),
                Err(e) => {
                    has_warning = true;
                    Some(e.to_string())
                }
            },
            None => None,
        };

        let name = id.rsplit('/').next().unwrap_or(id).to_string();

        Self {
            id: id.to_string(),
            name,
            description: entry.description.clone(),
            inputs,
            outputs,
            load_time: entry
                .loaded_at
                .map(|t| t.format(LOAD_TIME_FORMAT).to_string()),
            timeout: entry
                .timeout
                .clone()
                .unwrap_or_else(|| "Default".to_string()),
            parse_warning,
            test_duration: entry.test_duration.clone(),
            test_result,
            test_pass: entry.test_pass,
            test_params: entry
                .test_params
                .iter()
                .map(|p| DocParam::new(&p.key, &p.description, None))
                .collect(),
            tags: Tags::new(has_warning, error.is_some()),
            error,
        }
    }

    /// All warning messages on this panel, in display order
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.description.trim().is_empty() {
            out.push(WARN_MISSING_DESCRIPTION.to_string());
        }
        for p in self.inputs.iter().chain(self.outputs.iter()) {
            if let Some(w) = &p.warning {
                out.push(format!("{}: {}", p.name, w));
            }
        }
        if let Some(w) = &self.parse_warning {
            out.push(w.clone());
        }
        out
    }
}

/// Column names of the first row of a non-empty array-of-objects test result
fn result_columns(result: Option<&serde_json::Value>) -> Option<Vec<String>> {
    let rows = result?.as_array()?;
    let first = rows.first()?.as_object()?;
    Some(first.keys().cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamDoc;
    use chrono::TimeZone;
    use serde_json::json;

    fn documented() -> Entry {
        Entry {
            name: "sales/daily".into(),
            description: "Daily sales".into(),
            inputs: vec![ParamDoc::new("from", "start date")],
            outputs: vec![ParamDoc::new("total", "sum")],
            used: vec!["from".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_clean_entry_has_no_tags() {
        let d = Description::from_entry("/sales/daily", &documented());
        assert_eq!(d.tags, Tags::new(false, false));
        assert_eq!(d.name, "daily");
        assert_eq!(d.timeout, "Default");
        assert!(d.warnings().is_empty());
    }

    #[test]
    fn test_missing_description_warns() {
        let mut e = documented();
        e.description = "  ".into();
        let d = Description::from_entry("/sales/daily", &e);
        assert!(d.tags.has_warning);
        assert_eq!(d.warnings(), vec![WARN_MISSING_DESCRIPTION.to_string()]);
    }

    #[test]
    fn test_declared_and_used_mismatch() {
        let mut e = documented();
        e.used = vec!["to".into()];
        let d = Description::from_entry("/sales/daily", &e);
        assert!(d.tags.has_warning);
        assert_eq!(d.inputs.len(), 2);
        assert_eq!(d.inputs[0].warning.as_deref(), Some(WARN_DECLARED_NOT_USED));
        assert_eq!(d.inputs[1].name, "to");
        assert_eq!(d.inputs[1].warning.as_deref(), Some(WARN_USED_NOT_DECLARED));
    }

    #[test]
    fn test_result_columns_checked_against_outputs() {
        let mut e = documented();
        e.test_result = Some(json!([{ "count": 3 }]));
        let d = Description::from_entry("/sales/daily", &e);
        assert!(d.tags.has_warning);
        assert_eq!(d.outputs[0].warning.as_deref(), Some(WARN_FIELD_NOT_IN_RESULT));
        assert_eq!(d.outputs[1].name, "count");
        assert_eq!(d.outputs[1].warning.as_deref(), Some(WARN_FIELD_NOT_DESCRIBED));
        assert!(d.test_result.unwrap().contains("\"count\": 3"));
    }

    #[test]
    fn test_empty_result_skips_column_checks() {
        let mut e = documented();
        e.test_result = Some(json!([]));
        let d = Description::from_entry("/sales/daily", &e);
        assert!(!d.tags.has_warning);
        assert_eq!(d.outputs.len(), 1);
    }

    #[test]
    fn test_error_sets_error_tag_only() {
        let mut e = documented();
        e.error = Some("relation does not exist".into());
        let d = Description::from_entry("/sales/daily", &e);
        assert_eq!(d.tags, Tags::new(false, true));
    }

    #[test]
    fn test_errored_run_skips_column_checks() {
        let mut e = documented();
        e.error = Some("syntax error".into());
        e.test_result = Some(json!([{ "count": 3 }]));
        let d = Description::from_entry("/sales/daily", &e);
        assert_eq!(d.tags, Tags::new(false, true));
        assert_eq!(d.outputs.len(), 1);
        assert!(d.outputs[0].warning.is_none());
        assert!(d.warnings().is_empty());
    }

    #[test]
    fn test_pass_and_params_carried_to_panel() {
        let d = Description::from_entry("/sales/daily", &documented());
        assert_eq!(d.test_pass, TestPass::NoError);
        assert!(d.test_params.is_empty());

        let e: Entry = serde_json::from_value(json!({
            "name": "sales/daily",
            "description": "Daily sales",
            "testPass": "onerowonly",
            "testParams": [{ "key": "from", "description": "2024-01-01" }]
        }))
        .unwrap();
        let d = Description::from_entry("/sales/daily", &e);
        assert_eq!(d.test_pass, TestPass::OneRowOnly);
        assert_eq!(d.test_pass.to_string(), "onerowonly");
        assert_eq!(d.test_params.len(), 1);
        assert_eq!(d.test_params[0].name, "from");
        assert_eq!(d.test_params[0].description, "2024-01-01");
        assert!(d.test_params[0].warning.is_none());
        assert!(!d.tags.has_warning);
    }

    #[test]
    fn test_parse_warning_and_load_time() {
        let mut e = documented();
        e.parse_warning = Some("unterminated comment".into());
        e.loaded_at = Some(chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap());
        e.timeout = Some("30s".into());
        let d = Description::from_entry("/sales/daily", &e);
        assert!(d.tags.has_warning);
        assert_eq!(d.load_time.as_deref(), Some("2024-03-09 14:05:00"));
        assert_eq!(d.timeout, "30s");
    }
}

use super::StrategyOutput;
use crate::constants::{CODE_SYSTEM_PROMPT, FALLBACK_FILE_NAME};
use crate::core::mime::content_type_for;
use crate::core::planner::Plan;
use crate::core::{GeneratedFile, Task};
use crate::errors::StrategyError;
use crate::llm::{build_validator, parse_conforming, LlmClient};
use crate::storage::ObjectStore;
use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tracing::{debug, info};

/// A non-empty JSON object whose values are all strings and whose keys are
/// file names (not empty, not ending in `/` or `.`)
static FILE_MAP_VALIDATOR: Lazy<Validator> = Lazy::new(|| {
    build_validator(&json!({
        "type": "object",
        "minProperties": 1,
        "propertyNames": { "minLength": 1, "pattern": "[^/.]$" },
        "additionalProperties": { "type": "string" }
    }))
    .expect("file map schema is valid")
});

/// Reads a model response as `file name -> content`, in response order.
///
/// Anything that is not a non-empty object of strings keyed by file names
/// (plain text, arrays, nested values, `{}`, keys like `""` or `"assets/"`)
/// becomes a single `index.html` holding the whole response.
pub fn parse_project_files(response: &str) -> Vec<(String, String)> {
    match parse_conforming(&FILE_MAP_VALIDATOR, response) {
        Some(Value::Object(map)) => map
            .into_iter()
            .filter_map(|(name, content)| match content {
                Value::String(content) => Some((name, content)),
                _ => None,
            })
            .collect(),
        _ => {
            info!("Code response is not a file mapping, keeping it as {}", FALLBACK_FILE_NAME);
            vec![(FALLBACK_FILE_NAME.to_string(), response.to_string())]
        }
    }
}

pub(super) async fn run(
    llm: &LlmClient,
    storage: &dyn ObjectStore,
    task: &Task,
    plan: &Plan,
) -> Result<StrategyOutput, StrategyError> {
    let prompt = format!(
        "Project type: {}\nPlan: {}\n\nRequest:\n{}",
        task.task_type, plan.text, task.instruction
    );
    let response = llm
        .complete(CODE_SYSTEM_PROMPT, &prompt)
        .await
        .map_err(StrategyError::LanguageModel)?;

    let project = parse_project_files(&response);
    let mut files = Vec::with_capacity(project.len());

    // Sequential so the returned order matches the mapping order
    for (name, content) in project {
        let content_type = content_type_for(&name);
        let key = format!("tasks/{}/{}", task.id, name);
        debug!("Storing {} as {}", key, content_type);

        let url = storage
            .put_object(&key, content.into_bytes(), content_type)
            .await
            .map_err(|source| StrategyError::Storage {
                name: name.clone(),
                source,
            })?;

        files.push(GeneratedFile {
            url,
            content_type: content_type.to_string(),
            name,
        });
    }

    let listing = files
        .iter()
        .map(|f| format!("- {} ({})", f.name, f.url))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(StrategyOutput {
        result_text: format!(
            "Plan: {}\n\nGenerated {} file(s) for the {} project:\n{}",
            plan.text,
            files.len(),
            task.task_type,
            listing
        ),
        observation: format!("Stored {} file(s)", files.len()),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(files: &[(String, String)]) -> Vec<&str> {
        files.iter().map(|(n, _)| n.as_str()).collect()
    }

    #[test]
    fn mapping_keeps_response_order() {
        let files = parse_project_files(
            r#"{"index.html": "<html></html>", "styles.css": "body {}", "app.js": "run()"}"#,
        );
        assert_eq!(names(&files), ["index.html", "styles.css", "app.js"]);
        assert_eq!(files[2].1, "run()");
    }

    #[test]
    fn plain_text_falls_back_to_index_html() {
        let response = "<!doctype html><p>Hello</p>";
        let files = parse_project_files(response);
        assert_eq!(files, vec![("index.html".to_string(), response.to_string())]);
    }

    #[test]
    fn other_json_shapes_fall_back() {
        for response in [
            r#"["index.html", "app.js"]"#,
            r#"{"index.html": {"content": "<p/>"}}"#,
            r#"{"count": 3}"#,
            "{}",
            "42",
        ] {
            let files = parse_project_files(response);
            assert_eq!(names(&files), ["index.html"], "response: {}", response);
            assert_eq!(files[0].1, response);
        }
    }

    #[test]
    fn unusable_file_names_fall_back() {
        for response in [
            r#"{"": "<html></html>"}"#,
            r#"{".": "x"}"#,
            r#"{"assets/": "x", "index.html": "<p/>"}"#,
        ] {
            let files = parse_project_files(response);
            assert_eq!(names(&files), ["index.html"], "response: {}", response);
            assert_eq!(files[0].1, response);
        }
    }
}

//! Action entrypoint logic: resolve labels, then publish them.

use serde_json::Value;
use tracing::{debug, info};

use crate::config::CommitContext;
use crate::error::Result;
use crate::github::PullRequestSource;
use crate::labels::LabelSet;
use crate::normalize::{name_to_environment_variable_name, name_to_identifier};
use crate::resolver::LabelResolver;
use crate::workflow::WorkflowSink;

/// Output name for the space-delimited identifier string.
pub const LABELS_OUTPUT: &str = "labels";
/// Output name for the identifier-to-`true` object.
pub const LABELS_OBJECT_OUTPUT: &str = "labels-object";

/// Values published as step outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelOutputs {
    pub labels: String,
    pub labels_object: LabelSet,
}

/// Export one variable per raw label and set the `labels` / `labels-object`
/// outputs.
///
/// Exports are not deduplicated: two labels that fold to the same variable
/// name are exported twice with the same value. Identifiers are deduplicated.
///
/// # Errors
///
/// Returns an error if the sink fails to write.
pub fn publish_labels<W>(label_names: &[String], sink: &mut W) -> Result<LabelOutputs>
where
    W: WorkflowSink + ?Sized,
{
    let mut labels_object = LabelSet::new();

    for label in label_names {
        let identifier = name_to_identifier(label);
        let environment_variable = name_to_environment_variable_name(label);

        sink.export_variable(&environment_variable, "1")?;
        info!(
            "\nFound label {label}. \n  Setting env var for remaining steps: {environment_variable}=1"
        );
        labels_object.insert(identifier);
    }

    let labels = labels_object.to_delimited_string();
    let labels_value = Value::String(labels.clone());
    let labels_json = serde_json::to_value(&labels_object)?;

    info!("\nAction output:\nlabels: {labels_value}\nlabels-object: {labels_json}");
    sink.set_output(LABELS_OUTPUT, &labels_value)?;
    sink.set_output(LABELS_OBJECT_OUTPUT, &labels_json)?;

    Ok(LabelOutputs {
        labels,
        labels_object,
    })
}

/// Run the whole action for one commit.
///
/// # Errors
///
/// API errors from the source and write errors from the sink are returned
/// unchanged; nothing is published if resolution fails.
pub async fn run<S, W>(
    commit: &CommitContext,
    resolver: &LabelResolver<S>,
    sink: &mut W,
) -> Result<LabelOutputs>
where
    S: PullRequestSource,
    W: WorkflowSink + ?Sized,
{
    debug!("Start");
    debug!(
        "PR context - Owner: {} Repo: {} Commit_SHA: {}",
        commit.owner, commit.repo, commit.sha
    );

    let label_names = resolver.resolve(commit).await?;
    debug!("PR label names: {}", label_names.join(","));

    publish_labels(&label_names, sink)
}

//! Fail-fast composite pipelines.
//!
//! A pipeline is an ordered list of named stages. Each stage starts only after
//! the previous one succeeded; the first failure stops the run and later
//! stages are never invoked.

use serde::Serialize;

use crate::build;
use crate::context::DeployContext;
use crate::error::Result;
use crate::lifecycle::{LocalStack, StackTarget};
use crate::remote::{self, RemoteStack};
use crate::requirements::{self, RequirementScope};
use crate::utils::style::{self, Tone};

type StageFn<'s> = Box<dyn FnOnce() -> Result<()> + 's>;

pub struct Stage<'s> {
    pub id: &'static str,
    action: StageFn<'s>,
}

impl<'s> Stage<'s> {
    pub fn new(id: &'static str, action: impl FnOnce() -> Result<()> + 's) -> Self {
        Self {
            id,
            action: Box::new(action),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRunResult {
    pub pipeline: String,
    pub completed_steps: Vec<String>,
}

/// Run `stages` in order, stopping at the first failure.
///
/// A result is only produced when every stage succeeded. On failure the
/// error is the failing stage's own, tagged with the stage id under
/// `details.step`.
pub fn run(name: &str, stages: Vec<Stage<'_>>) -> Result<PipelineRunResult> {
    let mut completed_steps = Vec::with_capacity(stages.len());

    for stage in stages {
        if let Err(err) = (stage.action)() {
            style::step(
                &format!("Pipeline '{}' stopped at step '{}'", name, stage.id),
                Tone::Failure,
            );
            return Err(err.at_step(stage.id));
        }
        completed_steps.push(stage.id.to_string());
    }

    style::step(&format!("Pipeline '{}' completed", name), Tone::Success);

    Ok(PipelineRunResult {
        pipeline: name.to_string(),
        completed_steps,
    })
}

/// requirements → build → test → image build → start.
pub fn full(ctx: &DeployContext) -> Result<PipelineRunResult> {
    let ctx = *ctx;

    run(
        "full",
        vec![
            Stage::new("requirements", move || {
                requirements::check(&ctx, RequirementScope::Local)
            }),
            Stage::new("build", move || build::build(&ctx)),
            Stage::new("test", move || build::test(&ctx)),
            Stage::new("image-build", move || build::image_build(&ctx)),
            Stage::new("start", move || LocalStack::new(ctx).start(false)),
        ],
    )
}

/// requirements (with cloud CLI) → build → test → remote deploy → remote start.
pub fn full_remote(ctx: &DeployContext) -> Result<PipelineRunResult> {
    let ctx = *ctx;

    run(
        "full-ec2",
        vec![
            Stage::new("requirements", move || {
                requirements::check(&ctx, RequirementScope::Remote)
            }),
            Stage::new("build", move || build::build(&ctx)),
            Stage::new("test", move || build::test(&ctx)),
            Stage::new("ec2-deploy", move || {
                remote::deploy(&RemoteStack::connect(ctx)?)
            }),
            Stage::new("ec2-start", move || RemoteStack::connect(ctx)?.start(false)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, ErrorCode};
    use std::cell::RefCell;

    #[test]
    fn runs_all_stages_in_order() {
        let seen = RefCell::new(Vec::new());
        let result = run(
            "demo",
            vec![
                Stage::new("a", || {
                    seen.borrow_mut().push("a");
                    Ok(())
                }),
                Stage::new("b", || {
                    seen.borrow_mut().push("b");
                    Ok(())
                }),
            ],
        )
        .unwrap();

        assert_eq!(*seen.borrow(), vec!["a", "b"]);
        assert_eq!(result.completed_steps, vec!["a", "b"]);
        assert_eq!(result.pipeline, "demo");
    }

    #[test]
    fn stops_at_first_failure_and_tags_step() {
        let seen = RefCell::new(Vec::new());
        let err = run(
            "demo",
            vec![
                Stage::new("a", || {
                    seen.borrow_mut().push("a");
                    Ok(())
                }),
                Stage::new("b", || {
                    seen.borrow_mut().push("b");
                    Err(Error::artifact_not_found("app.jar"))
                }),
                Stage::new("c", || {
                    seen.borrow_mut().push("c");
                    Ok(())
                }),
            ],
        )
        .unwrap_err();

        assert_eq!(*seen.borrow(), vec!["a", "b"]);
        assert_eq!(err.code, ErrorCode::BuildArtifactNotFound);
        assert_eq!(err.details["step"], "b");
    }
}

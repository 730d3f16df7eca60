//! One operation per named action.

use serde::Serialize;

use crate::build;
use crate::context::DeployContext;
use crate::error::Result;
use crate::lifecycle::{self, LocalStack, StackTarget};
use crate::package::{self, PackageResult};
use crate::pipeline::{self, PipelineRunResult};
use crate::remote::{self, RemoteStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    Build,
    Test,
    Deploy,
    Start,
    Stop,
    Restart,
    Clean,
    Full,
    Ec2Deploy,
    Ec2Start,
    Ec2Stop,
    Ec2Restart,
    Ec2Status,
    Ec2Logs,
    Ec2InstallDocker,
    FullEc2,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::Build,
        Action::Test,
        Action::Deploy,
        Action::Start,
        Action::Stop,
        Action::Restart,
        Action::Clean,
        Action::Full,
        Action::Ec2Deploy,
        Action::Ec2Start,
        Action::Ec2Stop,
        Action::Ec2Restart,
        Action::Ec2Status,
        Action::Ec2Logs,
        Action::Ec2InstallDocker,
        Action::FullEc2,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Build => "build",
            Action::Test => "test",
            Action::Deploy => "deploy",
            Action::Start => "start",
            Action::Stop => "stop",
            Action::Restart => "restart",
            Action::Clean => "clean",
            Action::Full => "full",
            Action::Ec2Deploy => "ec2-deploy",
            Action::Ec2Start => "ec2-start",
            Action::Ec2Stop => "ec2-stop",
            Action::Ec2Restart => "ec2-restart",
            Action::Ec2Status => "ec2-status",
            Action::Ec2Logs => "ec2-logs",
            Action::Ec2InstallDocker => "ec2-install-docker",
            Action::FullEc2 => "full-ec2",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Action::Ec2Deploy
                | Action::Ec2Start
                | Action::Ec2Stop
                | Action::Ec2Restart
                | Action::Ec2Status
                | Action::Ec2Logs
                | Action::Ec2InstallDocker
                | Action::FullEc2
        )
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a successful action produced beyond its console output.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionOutcome {
    Done,
    Packaged(PackageResult),
    Pipeline(PipelineRunResult),
}

/// Perform `action`. `force` only affects start and restart.
pub fn perform(ctx: &DeployContext, action: Action, force: bool) -> Result<ActionOutcome> {
    match action {
        Action::Build => build::build(ctx).map(done),
        Action::Test => build::test(ctx).map(done),
        Action::Deploy => package::deploy_local(ctx).map(ActionOutcome::Packaged),
        Action::Start => LocalStack::new(*ctx).start(force).map(done),
        Action::Stop => LocalStack::new(*ctx).stop().map(done),
        Action::Restart => LocalStack::new(*ctx).restart(force).map(done),
        Action::Clean => lifecycle::cleanup(ctx).map(done),
        Action::Full => pipeline::full(ctx).map(ActionOutcome::Pipeline),

        Action::Ec2Deploy => remote::deploy(&RemoteStack::connect(*ctx)?).map(done),
        Action::Ec2Start => RemoteStack::connect(*ctx)?.start(force).map(done),
        Action::Ec2Stop => RemoteStack::connect(*ctx)?.stop().map(done),
        Action::Ec2Restart => RemoteStack::connect(*ctx)?.restart(force).map(done),
        Action::Ec2Status => RemoteStack::connect(*ctx)?.status().map(done),
        Action::Ec2Logs => RemoteStack::connect(*ctx)?.follow_logs().map(done),
        Action::Ec2InstallDocker => {
            let stack = RemoteStack::connect(*ctx)?;
            remote::provision(stack.executor(), &ctx.config.remote).map(done)
        }
        Action::FullEc2 => pipeline::full_remote(ctx).map(ActionOutcome::Pipeline),
    }
}

fn done(_: ()) -> ActionOutcome {
    ActionOutcome::Done
}

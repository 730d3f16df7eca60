use clap::{Parser, Subcommand};

use commands::GlobalArgs;
use dockhand::Action;

mod commands;
mod output;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(version = VERSION)]
#[command(about = "Build, test and deploy the application locally or to a remote host")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalArgs,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Build the application
    Build,
    /// Run tests
    Test,
    /// Copy the built artifact into the deployment directory
    Deploy,
    /// Start the application with Docker Compose (builds if needed)
    Start,
    /// Stop the application
    Stop,
    /// Restart the application
    Restart,
    /// Clean up Docker resources
    Clean,
    /// Full local deployment (check, build, test, image build, start)
    Full,
    /// Provision the remote host and copy the application to it
    Ec2Deploy,
    /// Start the application on the remote host
    Ec2Start,
    /// Stop the application on the remote host
    Ec2Stop,
    /// Restart the application on the remote host
    Ec2Restart,
    /// Show container status and recent logs on the remote host
    Ec2Status,
    /// Follow application logs on the remote host
    Ec2Logs,
    /// Install Docker and Docker Compose on the remote host
    Ec2InstallDocker,
    /// Full remote deployment (check, build, test, deploy, start)
    FullEc2,
}

impl Commands {
    fn action(self) -> Action {
        match self {
            Commands::Build => Action::Build,
            Commands::Test => Action::Test,
            Commands::Deploy => Action::Deploy,
            Commands::Start => Action::Start,
            Commands::Stop => Action::Stop,
            Commands::Restart => Action::Restart,
            Commands::Clean => Action::Clean,
            Commands::Full => Action::Full,
            Commands::Ec2Deploy => Action::Ec2Deploy,
            Commands::Ec2Start => Action::Ec2Start,
            Commands::Ec2Stop => Action::Ec2Stop,
            Commands::Ec2Restart => Action::Ec2Restart,
            Commands::Ec2Status => Action::Ec2Status,
            Commands::Ec2Logs => Action::Ec2Logs,
            Commands::Ec2InstallDocker => Action::Ec2InstallDocker,
            Commands::FullEc2 => Action::FullEc2,
        }
    }
}

fn main() -> std::process::ExitCode {
    // Missing or unknown actions print usage and exit 2 before anything runs.
    let cli = Cli::parse();

    let result = commands::run(cli.command.action(), &cli.global);

    if cli.global.json {
        output::print_json_result(&result);
    } else if let Err(err) = &result {
        output::print_error_line(err);
    }

    let exit_code = match &result {
        Ok((_, code)) => *code,
        Err(err) => output::exit_code_for_error(err),
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}

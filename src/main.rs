use anyhow::Result;
use bob::areas::repository::Repository;
use bob::config::Config;
use bob::error::Error;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bob",
    version,
    author = "Sami Barbut-Dica",
    about = "Version bumps and CI triggers as atomic commits",
    long_about = "bob rewrites files of a hosted repository through its git-data API. \
    Every command reads one snapshot of a branch, rewrites the selected files \
    and publishes them as a single commit, or fails without touching the branch.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[arg(long, global = true, help = "Path to the configuration file")]
    config: Option<PathBuf>,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "bump",
        about = "Bump the build number",
        long_about = "This command increments the build number of every configured plist \
        and commits the result."
    )]
    Bump {
        #[arg(short, long, help = "The branch to commit to")]
        branch: Option<String>,
    },
    #[command(
        name = "align",
        about = "Align version and build number",
        long_about = "This command sets the version and build number of every configured plist. \
        The build number defaults to 1."
    )]
    Align {
        #[arg(index = 1, help = "The version, e.g. 2.1.0")]
        version: String,
        #[arg(index = 2, help = "The build number")]
        build: Option<String>,
        #[arg(short, long, help = "The branch to commit to")]
        branch: Option<String>,
    },
    #[command(
        name = "replace",
        about = "Replace a pattern in files",
        long_about = "This command replaces every match of a regular expression in the given files \
        and commits the result. A file without a match fails the command."
    )]
    Replace {
        #[arg(short, long = "path", required = true, help = "A file to rewrite")]
        paths: Vec<String>,
        #[arg(long, help = "The regular expression to replace")]
        pattern: String,
        #[arg(long = "with", help = "The literal replacement")]
        replacement: String,
        #[arg(short, long, help = "The commit message")]
        message: Option<String>,
        #[arg(short, long, help = "The branch to commit to")]
        branch: Option<String>,
    },
    #[command(
        name = "trigger",
        about = "Trigger a CI build",
        long_about = "This command asks the CI service to run a configured target on a branch. \
        The target may be omitted when exactly one is configured."
    )]
    Trigger {
        #[arg(index = 1, help = "The target to build")]
        target: Option<String>,
        #[arg(short, long, help = "The branch to build")]
        branch: Option<String>,
    },
    #[command(
        name = "check-branch",
        about = "Check that a branch exists",
        long_about = "This command verifies a branch exists and suggests similarly named branches otherwise."
    )]
    CheckBranch {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(
        name = "ls-tree",
        about = "List the files of a branch",
        long_about = "This command prints the recursive tree listing of a branch's head commit."
    )]
    LsTree {
        #[arg(short, long, help = "The branch to list")]
        branch: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of a blob",
        long_about = "This command prints the decoded content of a blob. \
        It requires the SHA of the blob to be specified."
    )]
    CatFile {
        #[arg(index = 1, help = "The blob SHA to print")]
        sha: String,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,bob={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&Config::locate(cli.config.as_deref()))?;
    let repository = Repository::from_config(config, Box::new(std::io::stdout()))?;

    match &cli.command {
        Commands::Bump { branch } => repository.bump(branch.as_deref()).await?,
        Commands::Align {
            version,
            build,
            branch,
        } => {
            repository
                .align(version, build.as_deref(), branch.as_deref())
                .await?
        }
        Commands::Replace {
            paths,
            pattern,
            replacement,
            message,
            branch,
        } => {
            repository
                .replace(
                    paths,
                    pattern,
                    replacement,
                    message.as_deref(),
                    branch.as_deref(),
                )
                .await?
        }
        Commands::Trigger { target, branch } => {
            repository
                .trigger(target.as_deref(), branch.as_deref())
                .await?
        }
        Commands::CheckBranch { branch } => repository.check_branch(branch).await?,
        Commands::LsTree { branch } => repository.ls_tree(branch.as_deref()).await?,
        Commands::CatFile { sha } => repository.cat_file(sha).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            if let Some(Error::Conflict { .. }) = err.downcast_ref::<Error>() {
                eprintln!("{}", "hint: the branch moved; run the command again".yellow());
            }
            ExitCode::FAILURE
        }
    }
}

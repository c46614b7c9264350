use std::path::PathBuf;

use clap::Parser;

use crate::notice::NoticePolicy;

#[derive(Parser, Debug)]
#[command(
    name = "osgi-licenses",
    about = "Recover license metadata from OSGi bundles whose POMs declare none",
    version
)]
pub struct Cli {
    /// Project directory, bundle directory, or a single .jar
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Fetch missing parent POMs from remote repositories
    #[arg(long)]
    pub online: bool,

    /// Config file [default: ./.osgi-licenses/config.toml, fallback ~/.config/osgi-licenses/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maven local repository [default: ~/.m2/repository]
    #[arg(long, value_name = "DIR")]
    pub local_repo: Option<PathBuf>,

    /// How about.html notices become license records
    #[arg(long, value_name = "POLICY")]
    pub notice_policy: Option<NoticePolicyArg>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Rewrite jar:file: locations to plain file: paths
    #[arg(long)]
    pub localize: bool,

    /// Copy license files embedded in bundles into DIR (implies --localize)
    #[arg(long, value_name = "DIR")]
    pub copy_to: Option<PathBuf>,

    /// Show every dependency and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum NoticePolicyArg {
    EnumerateAll,
    SingleBest,
}

impl From<&NoticePolicyArg> for NoticePolicy {
    fn from(arg: &NoticePolicyArg) -> Self {
        match arg {
            NoticePolicyArg::EnumerateAll => NoticePolicy::EnumerateAll,
            NoticePolicyArg::SingleBest => NoticePolicy::SingleBest,
        }
    }
}

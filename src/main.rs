//! `osgi-licenses` — recover license metadata from OSGi bundles whose POMs declare none.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Detect the input kind ([`detector::detect_input`]): a project or loose bundles.
//! 4. List dependencies and map them to local archives ([`analyzer`], [`host`]).
//! 5. Per dependency, take the declared licenses or fall back to the bundle's
//!    own contents ([`hook`], [`extractor`]).
//! 6. Optionally copy embedded license files out and rewrite their locations ([`localize`]).
//! 7. Render the requested report ([`report`]).
//! 8. Exit `0`, or `1` when some dependency has no license information at all.

mod analyzer;
mod archive;
mod cli;
mod config;
mod descriptor;
mod detector;
mod error;
mod extractor;
mod hook;
mod host;
mod localize;
mod lookup;
mod models;
mod notice;
mod report;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use analyzer::Analyzer;
use cli::{Cli, ReportFormat};
use config::load_config;
use detector::{detect_input, Input};
use extractor::ArchiveExtractor;
use hook::{ArtifactMap, LicenseHook};
use lookup::maven::MavenRepository;
use lookup::CachingLookup;
use models::{Coordinates, DependencyLicenses};
use notice::NoticePolicy;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    // Resolve input path
    let path = cli
        .path
        .canonicalize()
        .unwrap_or_else(|_| cli.path.clone());

    let config = load_config(&path, cli.config.as_deref())?;

    let Some(input) = detect_input(&path) else {
        eprintln!(
            "No pom.xml, gradle.lockfile or .jar bundles found in {}",
            path.display()
        );
        std::process::exit(1);
    };

    // CLI flags win over config
    let local_repo = cli
        .local_repo
        .clone()
        .unwrap_or_else(|| config.repository.local_path());
    let policy = cli
        .notice_policy
        .as_ref()
        .map(NoticePolicy::from)
        .unwrap_or(config.notice.policy);

    let repository = if cli.online {
        MavenRepository::online(&local_repo, config.repository.remotes.clone())?
    } else {
        MavenRepository::offline(&local_repo)
    };
    let lookup = CachingLookup::new(&repository);
    let extractor = ArchiveExtractor::new(&lookup, policy)?;

    let (dependencies, artifacts) = match input {
        Input::Project => {
            let deps = analyzer::java::JavaAnalyzer::new().analyze(&path)?;
            let artifacts = host::artifact_map(&deps, &repository);
            (deps, artifacts)
        }
        Input::Bundles => {
            let bundles = analyzer::bundles::scan(&path)?;
            let deps: Vec<Coordinates> = bundles.iter().map(|b| b.coordinates.clone()).collect();
            let mut artifacts = ArtifactMap::versioned();
            for bundle in bundles {
                artifacts.insert(bundle);
            }
            (deps, artifacts)
        }
    };

    if !cli.quiet {
        eprintln!(
            "  {} {} dependencies, notice policy {}",
            "→".cyan(),
            dependencies.len(),
            policy
        );
    }

    let hook = LicenseHook::new(&artifacts, &extractor);
    let mut results = collect_all(&hook, &dependencies, &input, &repository, cli.quiet)?;

    if let Some(target) = &cli.copy_to {
        let copied = localize::copy_license_files(&mut results, target)?;
        if !cli.quiet {
            eprintln!(
                "  {} copied {} license files to {}",
                "→".cyan(),
                copied,
                target.display()
            );
        }
    }
    if cli.localize || cli.copy_to.is_some() {
        localize::localize_locations(&mut results);
    }

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(&results, &path, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    if results.iter().any(DependencyLicenses::is_unlicensed) {
        std::process::exit(1);
    }

    Ok(())
}

fn collect_all(
    hook: &LicenseHook<'_>,
    dependencies: &[Coordinates],
    input: &Input,
    repository: &MavenRepository,
    quiet: bool,
) -> Result<Vec<DependencyLicenses>> {
    let pb = if !quiet {
        let pb = ProgressBar::new(dependencies.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut results = Vec::with_capacity(dependencies.len());
    for dependency in dependencies {
        if let Some(pb) = &pb {
            pb.set_message(dependency.artifact_id.clone());
        }

        let licenses = hook.collect(dependency, |d| match input {
            Input::Project => host::declared_licenses(repository, d),
            Input::Bundles => Vec::new(),
        });
        results.push(DependencyLicenses {
            coordinates: dependency.clone(),
            licenses,
        });

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    Ok(results)
}

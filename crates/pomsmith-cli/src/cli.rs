//! CLI argument definitions for pomsmith.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pomsmith_core::dependency::DependencyScope;

#[derive(Parser, Debug)]
#[command(
    name = "pomsmith",
    version,
    about = "Add dependencies to Maven POMs",
    long_about = "pomsmith inserts dependency declarations into pom.xml files, resolving \
                  version ranges against Maven repositories and keeping the file's formatting."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a dependency to a pom.xml
    Add {
        /// Dependency: group:artifact[:version], version may be a range
        dep: String,
        /// POM to edit
        #[arg(long, default_value = "pom.xml")]
        pom: PathBuf,
        /// Dependency scope: compile, provided, runtime, test, system, import
        #[arg(short, long)]
        scope: Option<DependencyScope>,
        /// Artifact type (default jar)
        #[arg(long = "type")]
        type_: Option<String>,
        /// Artifact classifier
        #[arg(long)]
        classifier: Option<String>,
        /// Mark the dependency optional
        #[arg(long)]
        optional: bool,
        /// Reuse the version of existing dependencies whose whole group id matches this regex
        #[arg(long)]
        family: Option<String>,
        #[command(flatten)]
        filter: VersionFilter,
        /// Use only cached repository metadata
        #[arg(long)]
        offline: bool,
    },

    /// Print the version an expression resolves to
    Resolve {
        /// Coordinate: group:artifact
        coordinate: String,
        /// Exact version, range, latest.release or latest.integration
        expression: String,
        #[command(flatten)]
        filter: VersionFilter,
        /// Use only cached repository metadata
        #[arg(long)]
        offline: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Catalog filtering shared by `add` and `resolve`.
#[derive(clap::Args, Debug)]
pub struct VersionFilter {
    /// Consider only release versions
    #[arg(long, conflicts_with = "include_prereleases")]
    pub releases_only: bool,
    /// Consider snapshots and other pre-releases too
    #[arg(long)]
    pub include_prereleases: bool,
    /// Regular expression candidate versions must match
    #[arg(long)]
    pub version_pattern: Option<String>,
    /// Version written when a range matches nothing
    #[arg(long)]
    pub fallback_version: Option<String>,
}

impl VersionFilter {
    /// The flag override for `[resolve] releases-only`, if any.
    pub fn releases_only(&self) -> Option<bool> {
        if self.releases_only {
            Some(true)
        } else if self.include_prereleases {
            Some(false)
        } else {
            None
        }
    }
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}

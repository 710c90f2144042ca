//! Command dispatch and handler modules.

mod add;
mod resolve;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Add {
            dep,
            pom,
            scope,
            type_,
            classifier,
            optional,
            family,
            filter,
            offline,
        } => add::exec(
            &pom,
            pomsmith_ops::ops_add::AddOptions {
                spec: dep,
                scope,
                type_,
                classifier,
                optional,
                family,
                releases_only: filter.releases_only(),
                version_pattern: filter.version_pattern,
                fallback_version: filter.fallback_version,
                offline,
            },
        ),
        Command::Resolve {
            coordinate,
            expression,
            filter,
            offline,
            json,
        } => resolve::exec(
            pomsmith_ops::ops_resolve::ResolveOptions {
                coordinate,
                expression,
                releases_only: filter.releases_only(),
                version_pattern: filter.version_pattern,
                fallback_version: filter.fallback_version,
                offline,
            },
            json,
        ),
    }
}

//! Handler for `pomsmith add`.

use std::path::Path;

use miette::Result;

use pomsmith_core::config::GlobalConfig;
use pomsmith_maven::editor::AddOutcome;
use pomsmith_ops::ops_add::{self, AddOptions};
use pomsmith_resolver::session::VersionDecision;
use pomsmith_util::errors::PomsmithError;
use pomsmith_util::progress;

pub fn exec(pom: &Path, opts: AddOptions) -> Result<()> {
    if !pom.is_file() {
        return Err(PomsmithError::Manifest {
            message: format!("No POM found at {}", pom.display()),
        }
        .into());
    }
    let config = GlobalConfig::load()?;

    match ops_add::add_dependency(pom, &opts, &config)? {
        AddOutcome::Added {
            declaration,
            decision,
            created_container,
        } => {
            let coordinate = &declaration.coordinate;
            match decision {
                VersionDecision::Managed { version } => progress::status(
                    "Added",
                    &format!("{coordinate} (version {version} is managed)"),
                ),
                VersionDecision::Family { version } => progress::status(
                    "Added",
                    &format!("{coordinate}:{version} (from its dependency family)"),
                ),
                VersionDecision::Requested { version } => {
                    progress::status("Added", &format!("{coordinate}:{version}"))
                }
            }
            if created_container {
                progress::status_info("Created", "<dependencies> section");
            }
        }
        AddOutcome::Unchanged { declaration } => progress::status_info(
            "Unchanged",
            &format!("{} is already present", declaration.coordinate),
        ),
        AddOutcome::AlreadyDeclared { version } => {
            let at = version.map(|v| format!(" at {v}")).unwrap_or_default();
            progress::status_warn("Skipped", &format!("{} is already declared{at}", opts.spec));
        }
    }
    Ok(())
}

//! Handler for `pomsmith resolve`.

use miette::Result;

use pomsmith_core::config::GlobalConfig;
use pomsmith_ops::ops_resolve::{self, ResolveOptions};

pub fn exec(opts: ResolveOptions, json: bool) -> Result<()> {
    let config = GlobalConfig::load()?;
    let resolved = ops_resolve::resolve(&opts, &config)?;
    if json {
        println!("{}", resolved.to_json()?);
    } else {
        println!("{}", resolved.version);
    }
    Ok(())
}

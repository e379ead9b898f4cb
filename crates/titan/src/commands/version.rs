//! Version command

use crate::cli::VersionArgs;
use crate::output;
use crate::version::VersionInfo;
use anyhow::Result;

pub fn run(args: VersionArgs) -> Result<()> {
    let info = VersionInfo::current();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("{}", info);
        output::section("Layout", &info.fields());
    }

    Ok(())
}

//! Options command
//!
//! List the configure options an extension declares and the flags they map to

use anyhow::{Context, Result};
use pickle::Package;
use pickle::build::primary_flag;

pub(crate) fn run(dir: &str) -> Result<()> {
    let package = Package::from_manifest(dir)
        .with_context(|| format!("Failed to load extension in {dir}"))?;

    let primary = primary_flag(package.name(), package.configure_options())?;

    println!("{} {}", package.name(), package.version());
    println!("  primary: {primary}");

    let options = package.configure_options();
    if options.is_empty() {
        println!("  No configure options declared");
        return Ok(());
    }

    for option in options {
        let flag = option
            .flag()
            .unwrap_or_else(|e| format!("<invalid: {e}>"));
        let default = if option.default { "on" } else { "off" };
        match &option.prompt {
            Some(prompt) => println!("  {:<24} {default:<4} {flag}  # {prompt}", option.name),
            None => println!("  {:<24} {default:<4} {flag}", option.name),
        }
    }

    Ok(())
}

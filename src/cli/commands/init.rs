use crate::config::Config;

pub fn cmd_init() -> anyhow::Result<()> {
    let (path, created) = Config::create_default_if_missing()?;
    if created {
        println!("✓ Config file created at {}", path.display());
        println!("  Set api.base_url and run again.");
    } else {
        println!("Config already exists at {}", path.display());
    }
    Ok(())
}

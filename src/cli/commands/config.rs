use console::style;

use crate::config::AppConfig;
use crate::error::Result;

pub fn show(config: &AppConfig) -> Result<()> {
    println!("{}", style("Current Configuration").bold().cyan());
    println!();
    print!("  Host:      ");
    if config.host.is_empty() {
        println!("{}", style("(not set)").red());
    } else {
        println!("{}", style(&config.host).white());
    }
    println!("  Port:      {}", style(config.port).white());
    println!("  User:      {}", style(&config.user).white());
    println!("  Password:  {}", style(config.redacted_password()).dim());
    println!("  Container: {}", style(&config.container).white());
    println!("  App path:  {}", style(&config.app_path).dim());
    println!();

    match config.validate() {
        Ok(()) => println!("{} Ready to connect", style("✓").green().bold()),
        Err(e) => println!("{} {}", style("!").yellow().bold(), e),
    }

    Ok(())
}

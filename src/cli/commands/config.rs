use crate::config::Config;
use crate::context::AppContext;
use crate::errors::AppResult;
use crate::ui::messages::info;

/// Handle the `config` subcommand
pub fn handle(print_config: bool, cfg: &Config, ctx: &AppContext) -> AppResult<()> {
    let path = Config::config_file();

    if print_config {
        println!("📄 Current configuration ({}):\n", path.display());
        println!("{}", serde_yaml::to_string(cfg)?);
    } else {
        info(format!("Configuration file : {}", path.display()));
        info(format!("Data directory     : {}", ctx.data_dir().display()));
        info(format!("Database           : {}", ctx.db_path().display()));
    }
    Ok(())
}

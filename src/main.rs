// cmdtree - Command tree dispatcher
use cmdtree::cli::build_app;
use cmdtree::infrastructure::{config::ConfigManager, logging::init_logging};
use cmdtree::{CmdTreeError, CmdTreeResult, Streams};

fn main() {
    let code = match run() {
        Ok(()) => 0,
        Err(e) => {
            match &e {
                CmdTreeError::Flags(inner) => eprint!("{}", inner),
                other => eprintln!("Error: {}", other),
            }
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> CmdTreeResult<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_config()?;
    
    init_logging(&config.global.log_level, config.global.log_location)?;
    
    let app = build_app(config, manager, Streams::stdio());
    app.execute_from(std::env::args())
}

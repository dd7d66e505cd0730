use clap::{Arg, Command};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libins_scans::config::MergeConfig;
use libins_scans::merge::merge_scans;

fn make_template_config(path: &Path) {
    let config = MergeConfig::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn main() {
    // Create a cli
    let matches = Command::new("ins_merge_cli")
        .about("Merge repeated INS scans by tolerance-binned QH or EN")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("new")
                .about("Make a template configuration yaml file")
                .arg(Arg::new("path").required(true).help("Path for the template")),
        )
        .arg(Arg::new("config").help("Path to the merge configuration file"))
        .get_matches();

    // Initialize feedback
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("Could not create logging!");

    if let Some(("new", sub_matches)) = matches.subcommand() {
        let path = PathBuf::from(
            sub_matches
                .get_one::<String>("path")
                .expect("We require args"),
        );
        log::info!("Making a template config at {}...", path.to_string_lossy());
        make_template_config(&path);
        log::info!("Done.");
        return;
    }

    let Some(config_path) = matches.get_one::<String>("config") else {
        log::error!("A merge configuration file is required.");
        return;
    };
    let config_path = PathBuf::from(config_path);

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match MergeConfig::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Data Path: {}", config.data_dir.to_string_lossy());
    log::info!("Save Path: {}", config.save_dir.to_string_lossy());
    log::info!("Scan Files: {}", config.scan_files.join(", "));
    log::info!(
        "Scan Constant: {} Step Size: {}",
        config.scan_constant,
        config.step_size
    );

    match merge_scans(&config) {
        Ok(save_path) => log::info!(
            "Successfully merged scans into {}",
            save_path.to_string_lossy()
        ),
        Err(e) => log::error!("Merging failed with error: {e}"),
    }

    log::info!("Done.");
}

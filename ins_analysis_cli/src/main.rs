use clap::{Arg, Command};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use libins_scans::analysis::{run_analysis, PlotKind};
use libins_scans::config::AnalysisConfig;

fn make_template_config(path: &Path) {
    let config = AnalysisConfig::default();
    let yaml_str = serde_yaml::to_string(&config).unwrap();
    let mut file = File::create(path).expect("Could create template config file!");
    file.write_all(yaml_str.as_bytes())
        .expect("Failed to write yaml data to file!");
}

fn main() {
    // Create a cli
    let matches = Command::new("ins_analysis_cli")
        .about("Analyze and plot INS data against Takin simulation output")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("new")
                .about("Make a template configuration yaml file")
                .arg(Arg::new("path").required(true).help("Path for the template")),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .help("Path to the analysis configuration file"),
        )
        .arg(
            Arg::new("plot_type")
                .short('p')
                .long("plot-type")
                .value_parser(["2D", "3D"])
                .default_value("2D")
                .help("Choose plot type: '2D' or '3D'"),
        )
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

    let Some(plot_kind) = matches
        .get_one::<String>("plot_type")
        .and_then(|p| PlotKind::parse(p))
    else {
        log::error!("Choose a valid plot type: '2D' or '3D'.");
        return;
    };

    let Some(config_path) = matches.get_one::<String>("input") else {
        log::error!("An analysis configuration file is required.");
        return;
    };
    let config_path = PathBuf::from(config_path);

    // Load our config
    log::info!("Loading config from {}...", config_path.to_string_lossy());
    let config = match AnalysisConfig::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{e}");
            return;
        }
    };
    log::info!("Config successfully loaded.");
    log::info!("Data Path: {}", config.data_dir.to_string_lossy());
    log::info!("Takin Path: {}", config.takin_dir.to_string_lossy());
    log::info!("Save Path: {}", config.save_dir.to_string_lossy());
    log::info!(
        "Scan Files: {} Takin Files: {}",
        config.scan_files.len(),
        config.takin_files.len()
    );

    match run_analysis(&config, plot_kind) {
        Ok(Some(output)) => log::info!("{plot_kind} plot saved to {}", output.to_string_lossy()),
        Ok(None) => (),
        Err(e) => log::error!("Analysis failed with error: {e}"),
    }

    log::info!("Done.");
}

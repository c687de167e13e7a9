use std::path::PathBuf;

use argparse::{ArgumentParser, Print, Store, StoreOption};

pub struct ArgsOptions {
    pub config_file_path: PathBuf,
    pub states_file_path: PathBuf,
    pub view: String,

    // Only used by the autofill view
    pub registry_file_path: Option<PathBuf>,
    pub device_id: Option<String>,

    // Only used by the controls view
    pub press: Option<String>,
}

impl ArgsOptions {
    pub fn parse() -> Self {
        let mut options = ArgsOptions::default();

        {
            let mut parser = ArgumentParser::new();
            parser.set_description("Compute DVI heat pump card views from a state snapshot");

            // Card configuration file path
            parser.refer(&mut options.config_file_path).add_option(
                &["-c", "--config"],
                Store,
                "The file path of the card configuration",
            );

            // Entity state snapshot file path
            parser.refer(&mut options.states_file_path).add_option(
                &["-s", "--states"],
                Store,
                "The file path of the entity state snapshot",
            );

            parser.refer(&mut options.view).add_option(
                &["-v", "--view"],
                Store,
                "The view to print: curve, diagram, controls or autofill",
            );

            parser.refer(&mut options.registry_file_path).add_option(
                &["-r", "--registry"],
                StoreOption,
                "The file path of the entity registry (autofill)",
            );

            parser.refer(&mut options.device_id).add_option(
                &["-d", "--device"],
                StoreOption,
                "The device to auto-fill the card from (autofill)",
            );

            parser.refer(&mut options.press).add_option(
                &["-p", "--press"],
                StoreOption,
                "Print the service call of the given button (controls)",
            );

            // Show version
            parser.add_option(
                &["-V", "--version"],
                Print(env!("CARGO_PKG_VERSION").to_string()),
                "Show the version",
            );

            parser.parse_args_or_exit();
        }

        options
    }
}

impl Default for ArgsOptions {
    fn default() -> Self {
        Self {
            config_file_path: PathBuf::from("card.json"),
            states_file_path: PathBuf::from("states.json"),
            view: "curve".to_string(),

            registry_file_path: None,
            device_id: None,

            press: None,
        }
    }
}

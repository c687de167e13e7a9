use anyhow::{Context, Result, anyhow};
use dvi_cards::{
    arg_parser::ArgsOptions,
    card_config::{CardConfig, ChipKind},
    controls, diagram,
    discovery::{self, EntityRegistry},
    entity_state::StateSnapshot,
    errors::CardError,
    heat_curve_view, logger,
};
use serde_json::{Value, json};
use tracing::{debug, info};

enum View {
    Curve,
    Diagram,
    Controls,
    Autofill,
}

impl View {
    fn parse(name: &str) -> Result<View, CardError> {
        match name {
            "curve" => Ok(View::Curve),
            "diagram" => Ok(View::Diagram),
            "controls" => Ok(View::Controls),
            "autofill" => Ok(View::Autofill),
            _ => Err(CardError::UnknownView(name.to_string())),
        }
    }
}

fn main() -> Result<()> {
    logger::init_logging();

    // Parse the command line arguments
    let args_options = ArgsOptions::parse();

    let view = View::parse(&args_options.view)?;

    let config = CardConfig::load(&args_options.config_file_path)
        .with_context(|| "Failed to load the card configuration")?;
    let states = StateSnapshot::load(&args_options.states_file_path)
        .with_context(|| "Failed to load the state snapshot")?;

    debug!("Building {} view", args_options.view);

    let output = match view {
        View::Curve => {
            let curve = heat_curve_view::build(&config, &states);

            if curve.series.is_none() {
                info!("Heat curve readings unavailable, nothing to plot");
            }

            serde_json::to_value(curve)?
        }
        View::Diagram => serde_json::to_value(diagram::build(&config, &states))?,
        View::Controls => controls_output(&config, &states, args_options.press.as_deref())?,
        View::Autofill => {
            let registry_path = args_options
                .registry_file_path
                .as_ref()
                .ok_or_else(|| anyhow!("The autofill view needs an entity registry (-r)"))?;

            let device_id = args_options
                .device_id
                .as_deref()
                .or(config.device_id.as_deref())
                .ok_or_else(|| anyhow!("The autofill view needs a device id (-d)"))?;

            let registry = EntityRegistry::load(registry_path)
                .with_context(|| "Failed to load the entity registry")?;

            discovery::autofill(&config, &states, &registry, device_id).to_json()
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

// Either the call of a single button or every wired button and chip popup
fn controls_output(
    config: &CardConfig,
    states: &StateSnapshot,
    press: Option<&str>,
) -> Result<Value> {
    if let Some(id) = press {
        let button = controls::button(id).ok_or_else(|| CardError::UnknownButton(id.to_string()))?;

        return Ok(serde_json::to_value(controls::press(config, states, button))?);
    }

    let buttons: Vec<Value> = controls::available_buttons(config)
        .into_iter()
        .map(|button| {
            json!({
                "id": button.id,
                "entity_id": config.entity(button.role),
                "call": controls::press(config, states, button),
            })
        })
        .collect();

    let popups: Vec<Value> = ChipKind::ALL
        .into_iter()
        .filter_map(|chip| controls::popup(config, chip))
        .map(|call| json!(call))
        .collect();

    Ok(json!({
        "buttons": buttons,
        "popups": popups,
    }))
}

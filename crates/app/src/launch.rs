//! Command-line launch options for the desktop app.

use std::path::PathBuf;

use cellmerge_core::MovementMode;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Takes precedence over the movement mode stored in the save.
    pub movement_override: Option<MovementMode>,
    pub track_path: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
}

pub fn resolve_launch_options_from_args(args: &[String]) -> Result<LaunchOptions, String> {
    let mut options = LaunchOptions::default();
    let mut index = 1usize;

    while index < args.len() {
        let argument = args[index].as_str();
        let Some((flag, inline_value)) = split_flag(argument) else {
            index += 1;
            continue;
        };

        let value = match inline_value {
            Some(value) => value.to_string(),
            None => {
                let Some(value) = args.get(index + 1) else {
                    return Err(format!("missing value for {flag}"));
                };
                index += 1;
                value.clone()
            }
        };

        match flag {
            "--movement" => {
                set_once(&mut options.movement_override, flag, value.parse::<MovementMode>()?)?
            }
            "--track" => set_once(&mut options.track_path, flag, PathBuf::from(value))?,
            "--config" => set_once(&mut options.config_path, flag, PathBuf::from(value))?,
            _ => {}
        }
        index += 1;
    }

    Ok(options)
}

fn split_flag(argument: &str) -> Option<(&'static str, Option<&str>)> {
    ["--movement", "--track", "--config"].into_iter().find_map(|flag| {
        if argument == flag {
            Some((flag, None))
        } else {
            argument.strip_prefix(flag)?.strip_prefix('=').map(|value| (flag, Some(value)))
        }
    })
}

fn set_once<T>(slot: &mut Option<T>, flag: &str, value: T) -> Result<(), String> {
    if slot.is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    *slot = Some(value);
    Ok(())
}

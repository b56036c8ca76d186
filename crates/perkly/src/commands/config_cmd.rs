//! Config subcommand handlers.

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = config::output_format(global, &cfg)?;
            let color = output::should_color(config::color_mode(global, &cfg)?);

            let out = match format {
                OutputFormat::Table | OutputFormat::Plain => {
                    let toml_str =
                        toml::to_string_pretty(&cfg).map_err(|e| CliError::ConfigInvalid {
                            field: "config".into(),
                            reason: format!("failed to serialize config: {e}"),
                        })?;
                    let header = output::dim(
                        &format!("# {}", config::config_path().display()),
                        color,
                    );
                    format!("{header}\n{}", toml_str.trim_end())
                }
                format => output::render_single(format, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            // Resolve color from the config being replaced; a missing or
            // broken one must not block init.
            let color = config::load_config()
                .ok()
                .and_then(|cfg| config::color_mode(global, &cfg).ok())
                .or(global.color)
                .unwrap_or(ColorMode::Auto);

            let written = config::save_config(&Config::default())?;
            if !global.quiet {
                eprintln!(
                    "{}",
                    output::success(
                        &format!("Configuration written to {}", written.display()),
                        output::should_color(color),
                    )
                );
            }
            Ok(())
        }
    }
}

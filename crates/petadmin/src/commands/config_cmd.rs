//! Config subcommand handlers.

use dialoguer::{Input, Select};
use petadmin_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{active_profile_name, available_profiles};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

fn parse<T: std::str::FromStr>(field: &str, value: &str, expected: &str) -> Result<T, CliError> {
    value.parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("must be {expected}"),
    })
}

/// Apply `key = value` to a profile.
fn set_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" | "url" => {
            url::Url::parse(&value).map_err(|e| CliError::Validation {
                field: "api_url".into(),
                reason: format!("invalid URL: {e}"),
            })?;
            profile.api_url = value;
        }
        "username" => profile.username = Some(value),
        "password_env" | "password-env" => profile.password_env = Some(value),
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => profile.insecure = Some(parse(key, &value, "'true' or 'false'")?),
        "timeout" => profile.timeout = Some(parse(key, &value, "a number (seconds)")?),
        "page_size" | "page-size" => {
            let size: u32 = parse(key, &value, "a positive number")?;
            if size == 0 {
                return Err(CliError::Validation {
                    field: "page_size".into(),
                    reason: "must be at least 1".into(),
                });
            }
            profile.page_size = Some(size);
        }
        "search_debounce_ms" | "search-debounce-ms" => {
            profile.search_debounce_ms = Some(parse(key, &value, "a number (milliseconds)")?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: api_url, username, \
                     password_env, ca_cert, insecure, timeout, page_size, search_debounce_ms"
                ),
            });
        }
    }
    Ok(())
}

/// Copy of the config safe to print.
fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some("********".into());
        }
    }
    cfg
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("petadmin configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let mut profile = Profile::default();
            let api_url: String = Input::new()
                .with_prompt("Backend URL")
                .default("https://localhost:8080".into())
                .interact_text()
                .map_err(prompt_err)?;
            set_key(&mut profile, "api_url", api_url)?;

            let username: String = Input::new()
                .with_prompt("Username (leave empty if the backend needs no login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            if !username.trim().is_empty() {
                profile.username = Some(username.trim().to_owned());
                let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
                if pass.is_empty() {
                    return Err(CliError::Validation {
                        field: "password".into(),
                        reason: "password cannot be empty".into(),
                    });
                }

                let store_choices = &[
                    "Store password in system keyring (recommended)",
                    "Save to config file (plaintext)",
                ];
                let store_selection = Select::new()
                    .with_prompt("Where to store the password?")
                    .items(store_choices)
                    .default(0)
                    .interact()
                    .map_err(prompt_err)?;

                if store_selection == 0 {
                    config::store_password(&profile_name, &pass)?;
                    eprintln!("   Password stored in system keyring");
                } else {
                    profile.password = Some(pass);
                }
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            eprintln!("\nConfiguration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: petadmin pets list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = redacted(config::load_config_or_default());
            let out = output::render_single(
                global.output,
                &cfg,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n({e})")),
                |c| c.default_profile.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_or_default();
            let profile_name = active_profile_name(global, &cfg);
            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            eprintln!("Set {key} on profile '{profile_name}'");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: petadmin config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("Default profile set to '{name}'");
            Ok(())
        }

        // ── SetPassword ─────────────────────────────────────────────
        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(&cfg),
                    name: profile_name,
                });
            }

            let secret = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            config::store_password(&profile_name, &secret)?;
            eprintln!("Password stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_key_parses_typed_values() {
        let mut profile = Profile::default();
        set_key(&mut profile, "page-size", "25".into()).unwrap();
        set_key(&mut profile, "insecure", "true".into()).unwrap();
        set_key(&mut profile, "url", "https://api.example.com".into()).unwrap();

        assert_eq!(profile.page_size, Some(25));
        assert_eq!(profile.insecure, Some(true));
        assert_eq!(profile.api_url, "https://api.example.com");
    }

    #[test]
    fn set_key_rejects_bad_input() {
        let mut profile = Profile::default();
        assert!(set_key(&mut profile, "page_size", "0".into()).is_err());
        assert!(set_key(&mut profile, "timeout", "soon".into()).is_err());
        assert!(set_key(&mut profile, "color", "red".into()).is_err());
        assert_eq!(profile, Profile::default());
    }

    #[test]
    fn show_never_prints_plaintext_passwords() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                password: Some("hunter2".into()),
                ..Profile::default()
            },
        );
        let shown = redacted(cfg);
        assert_eq!(
            shown.profiles["default"].password.as_deref(),
            Some("********")
        );
    }
}

//! Flag overrides on top of `petadmin-config` profiles.
//!
//! This is the single boundary where CLI flags cross into
//! `petadmin_core::ClientConfig`.

use petadmin_config::{self as config, Config, ConfigError, Defaults, Profile};
use petadmin_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Format the profile names for "available profiles" help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Build a `ClientConfig` from the config file, profile, and CLI overrides.
pub fn build_client_config(global: &GlobalOpts) -> Result<ClientConfig, CliError> {
    let cfg = config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    let profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        // An explicitly requested profile must exist.
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(&cfg),
            });
        }
        // No profile: flags and env vars alone.
        None => Profile::default(),
    };

    resolve_profile(profile, &profile_name, &cfg.defaults, global)
}

/// Apply flag overrides to `profile` and translate it.
pub fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    if let Some(ref url) = global.url {
        profile.api_url.clone_from(url);
    }
    if profile.api_url.is_empty() {
        return Err(CliError::NoConfig {
            path: config::config_path().display().to_string(),
        });
    }
    if global.username.is_some() {
        profile.username.clone_from(&global.username);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    config::profile_to_client_config(&profile, profile_name, defaults).map_err(|e| match e {
        ConfigError::Validation { field, reason } if field == "api_url" => CliError::Validation {
            field: "url".into(),
            reason,
        },
        other => other.into(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;
    use petadmin_core::TlsVerification;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["petadmin"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["pets", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn profile() -> Profile {
        Profile {
            api_url: "https://registry.example.com".into(),
            timeout: Some(5),
            ..Profile::default()
        }
    }

    #[test]
    fn flags_override_profile() {
        let opts = global(&["--url", "https://other.example.com", "-k", "--timeout", "9"]);
        let client = resolve_profile(profile(), "default", &Defaults::default(), &opts).unwrap();

        assert_eq!(client.url.host_str(), Some("other.example.com"));
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(client.timeout, Duration::from_secs(9));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let opts = global(&[]);
        let client = resolve_profile(profile(), "default", &Defaults::default(), &opts).unwrap();
        assert_eq!(client.timeout, Duration::from_secs(5));
        assert_eq!(client.store.page_size, 10);
    }

    #[test]
    fn missing_url_asks_for_config() {
        let opts = global(&[]);
        let err = resolve_profile(Profile::default(), "default", &Defaults::default(), &opts)
            .unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn bad_url_names_the_flag() {
        let opts = global(&["--url", "not a url"]);
        let err = resolve_profile(Profile::default(), "default", &Defaults::default(), &opts)
            .unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "url"));
    }
}

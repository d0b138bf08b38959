use comfy_table::{Cell, Table};

use crate::error::{Result, TallyError};
use crate::settings::{
    load_settings, log_path, normalize_base_url, save_settings, settings_path, Settings,
};

pub fn format_settings(settings: &Settings) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("base_url"), Cell::new(&settings.base_url)]);
    table.add_row(vec![Cell::new("timeout_secs"), Cell::new(settings.timeout_secs)]);
    table.add_row(vec![
        Cell::new("settings file"),
        Cell::new(settings_path().display()),
    ]);
    table.add_row(vec![Cell::new("log file"), Cell::new(log_path().display())]);
    table.to_string()
}

pub fn show(settings: &Settings) -> Result<()> {
    println!("Settings\n{}", format_settings(settings));
    Ok(())
}

/// Apply changes on top of existing settings. At least one change is required.
pub fn apply(mut settings: Settings, base_url: Option<String>, timeout_secs: Option<u64>) -> Result<Settings> {
    if base_url.is_none() && timeout_secs.is_none() {
        return Err(TallyError::Settings(
            "nothing to change; pass --base-url or --timeout-secs".to_string(),
        ));
    }
    if let Some(url) = base_url {
        settings.base_url = normalize_base_url(&url)?;
    }
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            return Err(TallyError::Settings("timeout must be at least 1 second".to_string()));
        }
        settings.timeout_secs = secs;
    }
    Ok(settings)
}

pub fn set(base_url: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
    let settings = apply(load_settings(), base_url, timeout_secs)?;
    save_settings(&settings)?;
    tracing::info!(base_url = %settings.base_url, timeout_secs = settings.timeout_secs, "Settings saved");
    println!("Saved settings to {}", settings_path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_requires_a_change() {
        assert!(apply(Settings::default(), None, None).is_err());
    }

    #[test]
    fn test_apply_normalizes_url() {
        let s = apply(Settings::default(), Some("http://api.local:9000/".to_string()), None).unwrap();
        assert_eq!(s.base_url, "http://api.local:9000");
        assert_eq!(s.timeout_secs, 10);
    }

    #[test]
    fn test_apply_rejects_zero_timeout() {
        assert!(apply(Settings::default(), None, Some(0)).is_err());
        assert_eq!(apply(Settings::default(), None, Some(3)).unwrap().timeout_secs, 3);
    }

    #[test]
    fn test_format_settings_lists_values() {
        let out = format_settings(&Settings::default());
        assert!(out.contains("http://localhost:3001"));
        assert!(out.contains("timeout_secs"));
    }
}

//! Secrets file discovery and backend selection.
//!
//! Uses figment::Jail so the working directory and environment are sandboxed.

use std::io::Write;

use figment::Jail;
use kev_secrets::{KEY_PAT, KEY_PROJECT, SecretError, SecretOverrides, load_file_overrides};

#[test]
fn streamlit_secrets_in_working_directory_are_loaded() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".streamlit"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".streamlit/secrets.toml",
            r#"
[azure]
project = "Web"
pat = "from-file"
"#,
        )?;

        let overrides = load_file_overrides().expect("file backend loads");
        let SecretOverrides::Values(values) = overrides else {
            panic!("expected values");
        };
        assert!(values.contains(&(KEY_PAT.to_string(), "from-file".to_string())));
        assert!(values.contains(&(KEY_PROJECT.to_string(), "Web".to_string())));
        Ok(())
    });
}

#[test]
fn explicit_path_env_var_is_honoured() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "AZURE_PAT = \"dashboard-pat\"").expect("write");

    Jail::expect_with(|jail| {
        jail.set_env("KEVOPS_SECRETS__PATH", file.path().display());
        let values = load_file_overrides().expect("loads").into_values();
        assert_eq!(values, vec![(KEY_PAT.to_string(), "dashboard-pat".to_string())]);
        Ok(())
    });
}

#[test]
fn file_backend_requires_a_file() {
    Jail::expect_with(|jail| {
        jail.set_env("KEVOPS_SECRETS__BACKEND", "file");
        jail.set_env("KEVOPS_SECRETS__PATH", "/definitely/not/here/secrets.toml");
        let err = load_file_overrides().unwrap_err();
        assert!(matches!(err, SecretError::ExplicitFileMissing { .. }));
        Ok(())
    });
}

#[test]
fn auto_backend_rejects_a_missing_explicit_path() {
    Jail::expect_with(|jail| {
        jail.set_env("KEVOPS_SECRETS__PATH", "/definitely/not/here/secrets.toml");
        let err = load_file_overrides().unwrap_err();
        match err {
            SecretError::ExplicitFileMissing { path } => {
                assert_eq!(path.to_str(), Some("/definitely/not/here/secrets.toml"));
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    });
}

#[test]
fn auto_backend_without_file_is_disabled() {
    Jail::expect_with(|jail| {
        let home = jail.directory().display().to_string();
        jail.set_env("HOME", home);
        let overrides = load_file_overrides().expect("auto never fails on a missing file");
        assert_eq!(overrides, SecretOverrides::Disabled);
        Ok(())
    });
}

#[test]
fn malformed_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "pat = ").expect("write");

    Jail::expect_with(|jail| {
        jail.set_env("KEVOPS_SECRETS__PATH", file.path().display());
        let err = load_file_overrides().unwrap_err();
        assert!(matches!(err, SecretError::Toml { .. }));
        Ok(())
    });
}

#[test]
fn disabled_backend_skips_everything() {
    Jail::expect_with(|jail| {
        jail.set_env("KEVOPS_SECRETS__BACKEND", "none");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| e.to_string())?;
        let overrides = runtime
            .block_on(kev_secrets::load_overrides())
            .expect("disabled never fails");
        assert_eq!(overrides, SecretOverrides::Disabled);
        Ok(())
    });
}

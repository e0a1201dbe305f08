//! Layered loading under an isolated environment.

use std::time::Duration;

use figment::Jail;
use reddit_config::{ConfigError, Settings};

fn err(e: ConfigError) -> figment::Error {
    e.to_string().into()
}

#[test]
fn environment_supplies_credentials() {
    Jail::expect_with(|jail| {
        jail.set_env("REDDIT_CLIENT_ID", "app-id");
        jail.set_env("REDDIT_CLIENT_SECRET", "app-secret");

        let settings = Settings::load().map_err(err)?;
        let creds = settings.credentials().map_err(err)?;
        assert_eq!(creds.client_id, "app-id");
        assert_eq!(creds.user_agent, "mcp-reddit-agent/0.1");
        assert!(!creds.can_write());
        Ok(())
    });
}

#[test]
fn login_enables_writes() {
    Jail::expect_with(|jail| {
        jail.set_env("REDDIT_CLIENT_ID", "app-id");
        jail.set_env("REDDIT_CLIENT_SECRET", "app-secret");
        jail.set_env("REDDIT_USERNAME", "bot");
        jail.set_env("REDDIT_PASSWORD", "correct-horse");
        jail.set_env("REDDIT_USER_AGENT", "my-agent/2.0");

        let creds = Settings::load().map_err(err)?.credentials().map_err(err)?;
        assert!(creds.can_write());
        assert_eq!(creds.user_agent, "my-agent/2.0");
        Ok(())
    });
}

#[test]
fn missing_client_id_is_reported() {
    Jail::expect_with(|jail| {
        jail.set_env("REDDIT_CLIENT_SECRET", "app-secret");
        let settings = Settings::load().map_err(err)?;
        assert!(matches!(
            settings.credentials(),
            Err(ConfigError::Missing("REDDIT_CLIENT_ID"))
        ));
        Ok(())
    });
}

#[test]
fn file_is_overridden_by_environment() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "reddit-mcp.toml",
            r#"
            [reddit]
            client_id = "file-id"
            client_secret = "file-secret"

            [runtime]
            call_timeout_secs = 5
            rest_bind = "127.0.0.1:9000"
            "#,
        )?;
        jail.set_env("REDDIT_CLIENT_ID", "env-id");
        jail.set_env("REDDIT_MCP_CALL_TIMEOUT_SECS", "12");

        let settings = Settings::load().map_err(err)?;
        let creds = settings.credentials().map_err(err)?;
        assert_eq!(creds.client_id, "env-id");
        assert_eq!(creds.client_secret, "file-secret");
        assert_eq!(settings.call_timeout().map_err(err)?, Duration::from_secs(12));
        assert_eq!(settings.rest_bind().map_err(err)?.port(), 9000);
        Ok(())
    });
}

#[test]
fn explicit_config_path() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[runtime]\nrest_bind = \"127.0.0.1:7777\"\n")?;
        let settings = Settings::load_from(Some(jail.directory().join("custom.toml").as_path()))
            .map_err(err)?;
        assert_eq!(settings.runtime.rest_bind, "127.0.0.1:7777");
        assert_eq!(settings.runtime.call_timeout_secs, 30);
        Ok(())
    });
}

#[test]
fn unparseable_bind_address() {
    Jail::expect_with(|jail| {
        jail.set_env("REDDIT_MCP_REST_BIND", "not-an-address");
        let settings = Settings::load().map_err(err)?;
        assert!(matches!(settings.rest_bind(), Err(ConfigError::Invalid { .. })));
        Ok(())
    });
}

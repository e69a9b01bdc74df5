//! Doctor command - verify credentials and connectivity.

use crate::cli::{IdentityArgs, Output};
use crate::config::{
    is_contaminated, Settings, CLIENT_ID_VAR, CLIENT_SECRET_VAR, REFRESH_TOKEN_VAR,
};
use crate::spotify::SpotifyClient;
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        eprintln!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            eprintln!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub async fn run_doctor(identity: &IdentityArgs, settings: &Settings) -> anyhow::Result<()> {
    Output::header("spotify-mcp Doctor");
    eprintln!();

    let mut checks = Vec::new();

    Output::section("Client Identity");
    let identity_checks = check_identity_values(identity);
    for check in &identity_checks {
        check.print();
    }
    checks.extend(identity_checks);
    eprintln!();

    Output::section("Endpoints");
    Output::kv("Web API", &settings.spotify.api_base_url);
    Output::kv("Token endpoint", &settings.spotify.token_url());
    Output::kv(
        "Config file",
        &Settings::default_config_path().display().to_string(),
    );
    eprintln!();

    Output::section("Token Renewal");
    let renewal = check_renewal(identity, settings).await;
    renewal.print();
    checks.push(renewal);
    eprintln!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. The server will not be able to reach Spotify.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! spotify-mcp is ready to serve.");
    }

    Ok(())
}

/// Presence and hygiene of each identity value. Values are never echoed.
fn check_identity_values(identity: &IdentityArgs) -> Vec<CheckResult> {
    [
        (CLIENT_ID_VAR, identity.client_id.as_deref()),
        (CLIENT_SECRET_VAR, identity.client_secret.as_deref()),
        (REFRESH_TOKEN_VAR, identity.refresh_token.as_deref()),
    ]
    .into_iter()
    .map(|(var, value)| match value {
        None => CheckResult::error(var, "not set", &format!("Set with: export {}=...", var)),
        Some("") => CheckResult::error(var, "empty", &format!("Set with: export {}=...", var)),
        Some(v) if is_contaminated(v) => CheckResult::warning(
            var,
            "set, but has surrounding whitespace or quotes",
            "Spotify will likely reject the value; remove the extra characters",
        ),
        Some(_) => CheckResult::ok(var, "set"),
    })
    .collect()
}

/// Attempt one renewal against the token endpoint.
async fn check_renewal(identity: &IdentityArgs, settings: &Settings) -> CheckResult {
    const NAME: &str = "Access token";

    let identity = match identity.resolve() {
        Ok(identity) => identity,
        Err(_) => {
            return CheckResult::warning(
                NAME,
                "skipped",
                "Fix the identity errors above first",
            )
        }
    };

    let client = match SpotifyClient::from_settings(&settings.spotify, identity) {
        Ok(client) => client,
        Err(e) => return CheckResult::error(NAME, &e.to_string(), "Check the [spotify] settings"),
    };

    match client.credentials().access_token().await {
        Ok(_) => {
            let valid_until = client
                .credentials()
                .cached_expiry()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                .unwrap_or_else(|| "unknown".to_string());
            CheckResult::ok(NAME, &format!("renewed, trusted until {}", valid_until))
        }
        Err(e) => CheckResult::error(
            NAME,
            &e.to_string(),
            "Check the client ID/secret pair and that the refresh token was issued to this client",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(id: Option<&str>, secret: Option<&str>, refresh: Option<&str>) -> IdentityArgs {
        IdentityArgs {
            client_id: id.map(str::to_string),
            client_secret: secret.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
        }
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_identity_checks_classify_values() {
        let checks = check_identity_values(&args(Some("id"), Some(""), Some(" token\n")));
        let statuses: Vec<_> = checks.iter().map(|c| &c.status).collect();
        assert_eq!(
            statuses,
            vec![&CheckStatus::Ok, &CheckStatus::Error, &CheckStatus::Warning]
        );
        assert_eq!(checks[1].name, CLIENT_SECRET_VAR);
    }

    #[test]
    fn test_identity_checks_never_echo_values() {
        let checks = check_identity_values(&args(Some("abc123"), Some("\"s3cret\""), None));
        for check in &checks {
            assert!(!check.message.contains("abc123"));
            assert!(!check.message.contains("s3cret"));
            assert!(!check.hint.as_deref().unwrap_or_default().contains("s3cret"));
        }
        assert_eq!(checks[2].message, "not set");
    }

    #[tokio::test]
    async fn test_renewal_skipped_without_identity() {
        let check = check_renewal(&args(None, None, None), &Settings::default()).await;
        assert_eq!(check.status, CheckStatus::Warning);
        assert_eq!(check.message, "skipped");
    }

    #[tokio::test]
    async fn test_renewal_reports_token_endpoint_failure() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/api/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant"}"#)
            .create_async()
            .await;

        let mut settings = Settings::default();
        settings.spotify.accounts_base_url = server.url();
        settings.spotify.api_base_url = format!("{}/v1", server.url());

        let check = check_renewal(&args(Some("id"), Some("secret"), Some("refresh")), &settings).await;
        assert_eq!(check.status, CheckStatus::Error);
        assert!(check.message.contains("status 400"));
        assert!(check.message.contains("invalid_grant"));
    }
}

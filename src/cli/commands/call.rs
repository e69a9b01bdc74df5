//! Call command - run one tool through the gateway without a server.

use crate::cli::{IdentityArgs, Output};
use crate::config::Settings;
use crate::mcp::Gateway;
use crate::spotify::SpotifyClient;
use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

/// Dispatch `tool` once and print the result text.
///
/// Exits with status 1 when the tool reports an error.
pub async fn run_call(
    tool: &str,
    args: Option<&str>,
    identity: &IdentityArgs,
    settings: &Settings,
) -> Result<()> {
    let arguments = parse_arguments(args)?;

    let identity = identity.resolve()?;
    let client = SpotifyClient::from_settings(&settings.spotify, identity)?;
    let gateway = Gateway::new(Arc::new(client));

    let result = gateway.dispatch(tool, arguments).await;
    if result.is_error {
        Output::error(&result.joined_text());
        std::process::exit(1);
    }

    println!("{}", result.joined_text());
    Ok(())
}

fn parse_arguments(args: Option<&str>) -> Result<Option<Value>> {
    args.map(|raw| serde_json::from_str(raw).context("--args must be valid JSON"))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_arguments() {
        assert_eq!(parse_arguments(None).unwrap(), None);
        assert_eq!(
            parse_arguments(Some(r#"{"query":"abba"}"#)).unwrap(),
            Some(json!({ "query": "abba" }))
        );
        let err = parse_arguments(Some("{query")).unwrap_err();
        assert!(err.to_string().contains("--args must be valid JSON"));
    }
}

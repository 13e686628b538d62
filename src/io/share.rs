//! Shareable links: inputs as base64 JSON in an `inputs` query parameter.
//!
//! The token is percent-encoded when written and percent-decoded when read,
//! so links survive tools that escape `+`, `/` and `=`. Raw base64 tokens are
//! accepted as well.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::domain::ValuationInputs;
use crate::error::AppError;

/// Origin of the local web calculator dev server.
pub const DEFAULT_SHARE_BASE_URL: &str = "http://localhost:3000/";

const QUERY_KEY: &str = "inputs";

/// Serialize `inputs` into a link rooted at `base_url`.
pub fn encode_share_link(inputs: &ValuationInputs, base_url: &str) -> Result<String, AppError> {
    let json = serde_json::to_string(inputs)
        .map_err(|e| AppError::new(2, format!("Failed to serialize inputs: {e}")))?;
    let token = STANDARD.encode(json);
    let base = base_url.split(['?', '#']).next().unwrap_or(base_url);
    Ok(format!("{base}?{QUERY_KEY}={}", urlencoding::encode(&token)))
}

/// Decode a full link or a bare base64 token back into inputs.
pub fn decode_share_link(link: &str) -> Result<ValuationInputs, AppError> {
    let raw = extract_token(link.trim());
    if raw.is_empty() {
        return Err(AppError::new(2, "Share link has no inputs parameter."));
    }
    let token = urlencoding::decode(raw)
        .map_err(|e| AppError::new(2, format!("Could not load scenario from URL: {e}")))?;

    let bytes = STANDARD
        .decode(token.as_bytes())
        .map_err(|e| AppError::new(2, format!("Could not load scenario from URL: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::new(2, format!("Could not load scenario from URL: {e}")))?;

    if !value.as_object().is_some_and(|obj| obj.contains_key("ticker")) {
        return Err(AppError::new(
            2,
            "Could not load scenario from URL: payload is not an inputs object.",
        ));
    }

    let inputs: ValuationInputs = serde_json::from_value(value)
        .map_err(|e| AppError::new(2, format!("Could not load scenario from URL: {e}")))?;
    ValuationInputs::check_forecast_years(inputs.forecast_years)
        .map_err(|e| AppError::new(2, format!("Could not load scenario from URL: {e}")))?;
    tracing::debug!("decoded share link");
    Ok(inputs)
}

fn extract_token(link: &str) -> &str {
    let Some((_, query)) = link.split_once('?') else {
        return link;
    };
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == QUERY_KEY)
        .map(|(_, value)| value)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::InputMode;

    #[test]
    fn link_round_trips_inputs() {
        let inputs = ValuationInputs {
            ticker: "NVDA".to_string(),
            input_mode: InputMode::Explicit,
            forecast_years: 2,
            explicit_fcfs: vec![1.5, 2.5],
            ..ValuationInputs::default()
        };
        let link = encode_share_link(&inputs, "https://example.com/dcf?old=1").unwrap();
        assert!(link.starts_with("https://example.com/dcf?inputs="));
        assert_eq!(decode_share_link(&link).unwrap(), inputs);
    }

    #[test]
    fn bare_token_and_extra_params_are_accepted() {
        let inputs = ValuationInputs::default();
        let link = encode_share_link(&inputs, DEFAULT_SHARE_BASE_URL).unwrap();
        let token = link.split_once("inputs=").unwrap().1.to_string();

        assert_eq!(decode_share_link(&token).unwrap(), inputs);
        let noisy = format!("http://x/?a=1&inputs={token}&b=2#top");
        assert_eq!(decode_share_link(&noisy).unwrap(), inputs);
    }

    #[test]
    fn payload_without_ticker_is_rejected() {
        let token = STANDARD.encode(r#"{"forecastYears": 5}"#);
        let err = decode_share_link(&token).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let token = STANDARD.encode("[1, 2, 3]");
        assert!(decode_share_link(&token).is_err());
        assert!(decode_share_link("http://x/?other=1").is_err());
        assert!(decode_share_link("not base64!").is_err());
    }

    #[test]
    fn escaped_and_raw_tokens_both_decode() {
        let inputs = ValuationInputs::default();
        let raw = STANDARD.encode(serde_json::to_string(&inputs).unwrap());
        let escaped = raw.replace('+', "%2B").replace('/', "%2F").replace('=', "%3D");

        assert_eq!(decode_share_link(&raw).unwrap(), inputs);
        assert_eq!(decode_share_link(&format!("http://x/?inputs={escaped}")).unwrap(), inputs);

        let link = encode_share_link(&inputs, DEFAULT_SHARE_BASE_URL).unwrap();
        let token = link.split_once("inputs=").unwrap().1;
        assert!(!token.contains(['+', '/', '=']));
    }

    #[test]
    fn oversized_horizon_is_rejected() {
        let inputs = ValuationInputs {
            forecast_years: 2_000_000_000,
            ..ValuationInputs::default()
        };
        let link = encode_share_link(&inputs, DEFAULT_SHARE_BASE_URL).unwrap();
        let err = decode_share_link(&link).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Forecast years"));
    }
}

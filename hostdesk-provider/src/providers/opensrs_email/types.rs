use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============ OMA request types ============

/// Credentials block carried in every OMA request body
#[derive(Debug, Serialize)]
pub struct OmaCredentials<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

/// OMA request envelope: credentials plus method parameters at the top level
#[derive(Debug, Serialize)]
pub struct OmaRequest<'a, P: Serialize> {
    pub credentials: OmaCredentials<'a>,
    #[serde(flatten)]
    pub params: P,
}

#[derive(Debug, Serialize)]
pub struct AuthenticateParams {
    pub fetch_extra_info: bool,
    pub generate_session_token: bool,
}

#[derive(Debug, Serialize)]
pub struct GetDomainParams<'a> {
    pub domain: &'a str,
}

#[derive(Debug, Serialize)]
pub struct GetUserParams<'a> {
    pub user: &'a str,
}

// ============ OMA response types ============

/// Common OMA reply; method specific fields are optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OmaResponse {
    pub success: bool,
    pub error: Option<String>,
    pub error_number: Option<i64>,
    pub session_token: Option<String>,
    pub attributes: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_flattens_params() {
        let req = OmaRequest {
            credentials: OmaCredentials {
                user: "admin",
                password: "pw",
            },
            params: GetDomainParams {
                domain: "example.com",
            },
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["credentials"]["user"], "admin");
        assert_eq!(json["credentials"]["password"], "pw");
        assert_eq!(json["domain"], "example.com");
    }

    #[test]
    fn failure_reply_parses() {
        let resp: OmaResponse = serde_json::from_str(
            r#"{"success":false,"error":"Authentication failed","error_number":2}"#,
        )
        .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.error_number, Some(2));
        assert!(resp.attributes.is_none());
    }
}
